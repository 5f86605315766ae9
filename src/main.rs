mod cli;

use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::{
    Cli, Command, DatabaseCommand, DocumentDbCommand, IdCommand, InstanceCommand,
    PrivateNetworkCommand, WaitTarget, WebhostingOfferCommand,
};
use scwsync::output::{OutputFormat, identifier_tree, render_resource};
use scwsync::providers::scaleway::DocumentDbInstances;
use scwsync::terraform::state::ResourceState;
use scwsync::{
    CompositeId, Filter, Poller, ProviderConfig, ReadOutcome, Reconciler, RegionalId, Resource,
    ResourceId, ScalewayProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = cli.global.output;

    let config = cli.global.provider_config();

    match cli.command {
        Command::Id {
            command: IdCommand::Decode { id },
        } => {
            println!("{}", identifier_tree(&id)?);
        }
        Command::PrivateNetwork {
            command: PrivateNetworkCommand::Read(args),
        } => {
            let (provider, reconciler) = connect(&config)?;
            let filter = Filter::from_options(
                "private_network_id",
                args.private_network_id,
                args.name,
                &config.default_region,
            )?;
            let outcome = reconciler.read(&provider.private_networks(), &filter).await?;
            report(
                "scaleway_vpc_private_network",
                outcome,
                |pn| pn.into_resource(),
                output,
            )?;
        }
        Command::Documentdb {
            command: DocumentDbCommand::Instance { command },
        } => match command {
            InstanceCommand::Read(args) => {
                let (provider, reconciler) = connect(&config)?;
                let filter = Filter::from_options(
                    "instance_id",
                    args.instance_id,
                    args.name,
                    &config.default_region,
                )?;
                let outcome = reconciler
                    .read(&provider.documentdb_instances(), &filter)
                    .await?;
                report(
                    "scaleway_documentdb_instance",
                    outcome,
                    |instance| instance.into_resource(),
                    output,
                )?;
            }
            InstanceCommand::Wait(args) => {
                let (provider, reconciler) = connect(&config)?;
                let id = RegionalId::normalize(&args.instance_id, &config.default_region)?;
                let poller = reconciler.poller();
                let mut spec = match args.until {
                    WaitTarget::Ready => DocumentDbInstances::until_ready(poller, id.clone())?,
                    WaitTarget::Deleted => DocumentDbInstances::until_deleted(poller, id.clone())?,
                };
                if let Some(secs) = args.timeout {
                    spec = spec.with_timeout(Duration::from_secs(secs));
                }
                if let Some(secs) = args.interval {
                    spec = spec.with_interval(Duration::from_secs(secs))?;
                }

                let instance = reconciler
                    .wait(&provider.documentdb_instances(), &spec)
                    .await
                    .wrap_err_with(|| format!("waiting for documentdb instance {id}"))?;

                match instance {
                    Some(instance) => {
                        println!("{}", render_resource(&instance.into_resource(), output)?)
                    }
                    None => println!("{id} deleted"),
                }
            }
        },
        Command::Documentdb {
            command:
                DocumentDbCommand::Database {
                    command: DatabaseCommand::Read(args),
                },
        } => {
            let (provider, reconciler) = connect(&config)?;
            let id = CompositeId::parse(&args.database_id)?;
            let outcome = reconciler
                .read_id(&provider.documentdb_databases(), id.clone())
                .await?;
            report(
                "scaleway_documentdb_database",
                outcome,
                |db| db.into_resource(id.region(), id.parent_id()),
                output,
            )?;
        }
        Command::WebhostingOffer {
            command: WebhostingOfferCommand::Read(args),
        } => {
            let (provider, reconciler) = connect(&config)?;
            let filter = Filter::from_options(
                "offer_id",
                args.offer_id,
                args.name,
                &config.default_region,
            )?;
            let outcome = reconciler
                .read(&provider.webhosting_offers(), &filter)
                .await?;
            // NOTE: Offers are a data source, a missing one is an error
            let (id, offer) = outcome.require()?;
            println!(
                "{}",
                render_resource(&offer.into_resource(id.region()), output)?
            );
        }
    }

    Ok(())
}

fn connect(config: &ProviderConfig) -> Result<(ScalewayProvider, Reconciler)> {
    config.validate()?;
    let provider = ScalewayProvider::new(config)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling");
            ctrl_c.cancel();
        }
    });

    let poller = Poller::new(config.wait, cancel)?;
    Ok((provider, Reconciler::new(poller)))
}

fn report<I, T, F>(
    resource_type: &str,
    outcome: ReadOutcome<I, T>,
    to_resource: F,
    output: OutputFormat,
) -> Result<()>
where
    I: ResourceId,
    F: FnOnce(T) -> Resource,
{
    let mut state = ResourceState::new(resource_type);
    let id = outcome.id().clone();

    match state.apply(outcome, to_resource) {
        Some(resource) => println!("{}", render_resource(&resource, output)?),
        None => println!("{id} not found, state cleared"),
    }

    Ok(())
}
