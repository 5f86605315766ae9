use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use scwsync::IdentityError;
use scwsync::config::{DEFAULT_REGION, SCALEWAY_API_BASE};
use scwsync::identity::validate_uuid_or_regional;
use scwsync::output::OutputFormat;
use scwsync::{ProviderConfig, WaitSettings};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, global = true, env = "SCW_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    #[arg(long, global = true, env = "SCW_DEFAULT_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    #[arg(long, global = true, env = "SCW_API_URL", default_value = SCALEWAY_API_BASE)]
    pub api_url: String,

    /// Seconds between two polls of a resource
    #[arg(long, global = true, env = "SCW_WAIT_RETRY_INTERVAL")]
    pub retry_interval: Option<u64>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl GlobalArgs {
    pub fn provider_config(&self) -> ProviderConfig {
        let mut wait = WaitSettings::default();
        if let Some(secs) = self.retry_interval {
            wait.retry_interval = Duration::from_secs(secs);
        }

        ProviderConfig {
            secret_key: self.secret_key.clone(),
            default_region: self.region.clone(),
            api_url: self.api_url.clone(),
            wait,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// VPC private networks
    PrivateNetwork {
        #[command(subcommand)]
        command: PrivateNetworkCommand,
    },
    /// Managed DocumentDB
    Documentdb {
        #[command(subcommand)]
        command: DocumentDbCommand,
    },
    /// Web hosting offers
    WebhostingOffer {
        #[command(subcommand)]
        command: WebhostingOfferCommand,
    },
    /// Inspect identifiers
    Id {
        #[command(subcommand)]
        command: IdCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrivateNetworkCommand {
    Read(PrivateNetworkReadArgs),
}

#[derive(clap::Args, Debug)]
pub struct PrivateNetworkReadArgs {
    #[arg(long, conflicts_with = "name", value_parser = uuid_or_regional)]
    pub private_network_id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum DocumentDbCommand {
    Instance {
        #[command(subcommand)]
        command: InstanceCommand,
    },
    Database {
        #[command(subcommand)]
        command: DatabaseCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum InstanceCommand {
    Read(InstanceReadArgs),
    Wait(InstanceWaitArgs),
}

#[derive(clap::Args, Debug)]
pub struct InstanceReadArgs {
    #[arg(long, conflicts_with = "name", value_parser = uuid_or_regional)]
    pub instance_id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WaitTarget {
    Ready,
    Deleted,
}

#[derive(clap::Args, Debug)]
pub struct InstanceWaitArgs {
    #[arg(long, value_parser = uuid_or_regional)]
    pub instance_id: String,

    #[arg(long, value_enum, default_value_t = WaitTarget::Ready)]
    pub until: WaitTarget,

    /// Seconds before giving up
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Seconds between polls, overriding --retry-interval for this wait
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum DatabaseCommand {
    Read(DatabaseReadArgs),
}

#[derive(clap::Args, Debug)]
pub struct DatabaseReadArgs {
    /// `<region>/<instance_id>/<name>`
    #[arg(long)]
    pub database_id: String,
}

#[derive(Subcommand, Debug)]
pub enum WebhostingOfferCommand {
    Read(OfferReadArgs),
}

#[derive(clap::Args, Debug)]
pub struct OfferReadArgs {
    #[arg(long, conflicts_with = "name", value_parser = uuid_or_regional)]
    pub offer_id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum IdCommand {
    Decode { id: String },
}

/// Resource ids are either a bare UUID or `<region>/<uuid>`.
fn uuid_or_regional(raw: &str) -> Result<String, IdentityError> {
    validate_uuid_or_regional(raw)?;
    Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    #[test]
    fn test_private_network_read_by_name() {
        let cli = Cli::parse_from(["scwsync", "private-network", "read", "--name=main"]);

        if let Command::PrivateNetwork {
            command: PrivateNetworkCommand::Read(args),
        } = cli.command
        {
            assert_eq!(args.name, Some("main".to_string()));
            assert!(args.private_network_id.is_none());
        } else {
            panic!(
                "Expected PrivateNetwork Read command, got {:?}",
                cli.command
            );
        }
    }

    #[test]
    fn test_private_network_id_conflicts_with_name() {
        let result = Cli::try_parse_from([
            "scwsync",
            "private-network",
            "read",
            "--name=main",
            "--private-network-id=fr-par/11111111-2222-3333-4444-555555555555",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resource_ids_must_be_uuids() {
        let rejected = vec![
            vec!["scwsync", "private-network", "read", "--private-network-id=fr-par/not-a-uuid"],
            vec!["scwsync", "documentdb", "instance", "read", "--instance-id=mydb"],
            vec!["scwsync", "webhosting-offer", "read", "--offer-id=fr-par/performance"],
        ];
        for argv in rejected {
            let err = Cli::try_parse_from(argv).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }

        let result = Cli::try_parse_from([
            "scwsync",
            "documentdb",
            "instance",
            "wait",
            "--instance-id=fr-par/inst1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resource_id_accepts_bare_and_regional_uuid() {
        let cli = Cli::parse_from([
            "scwsync",
            "private-network",
            "read",
            "--private-network-id=nl-ams/11111111-2222-3333-4444-555555555555",
        ]);
        if let Command::PrivateNetwork {
            command: PrivateNetworkCommand::Read(args),
        } = cli.command
        {
            assert_eq!(
                args.private_network_id.as_deref(),
                Some("nl-ams/11111111-2222-3333-4444-555555555555")
            );
        } else {
            panic!("Expected PrivateNetwork Read command, got {:?}", cli.command);
        }

        let result = Cli::try_parse_from([
            "scwsync",
            "webhosting-offer",
            "read",
            "--offer-id=de2426b4-a9e9-11ec-b909-0242ac120002",
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_instance_wait_defaults_to_ready() {
        let cli = Cli::parse_from([
            "scwsync",
            "documentdb",
            "instance",
            "wait",
            "--instance-id=fr-par/11111111-2222-3333-4444-555555555555",
        ]);

        if let Command::Documentdb {
            command:
                DocumentDbCommand::Instance {
                    command: InstanceCommand::Wait(args),
                },
        } = cli.command
        {
            assert_eq!(
                args.instance_id,
                "fr-par/11111111-2222-3333-4444-555555555555"
            );
            assert_eq!(args.until, WaitTarget::Ready);
            assert!(args.timeout.is_none());
        } else {
            panic!("Expected Instance Wait command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_instance_wait_until_deleted() {
        let cli = Cli::parse_from([
            "scwsync",
            "documentdb",
            "instance",
            "wait",
            "--instance-id=11111111-2222-3333-4444-555555555555",
            "--until=deleted",
            "--timeout=60",
        ]);

        if let Command::Documentdb {
            command:
                DocumentDbCommand::Instance {
                    command: InstanceCommand::Wait(args),
                },
        } = cli.command
        {
            assert_eq!(args.until, WaitTarget::Deleted);
            assert_eq!(args.timeout, Some(60));
            assert!(args.interval.is_none());
        } else {
            panic!("Expected Instance Wait command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "scwsync",
            "webhosting-offer",
            "read",
            "--name=performance",
            "--region=nl-ams",
            "--output=json",
        ]);

        assert_eq!(cli.global.region, "nl-ams");
        assert_eq!(cli.global.output, OutputFormat::Json);
    }

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        let backup: Vec<(&str, Option<String>)> = [
            "SCW_SECRET_KEY",
            "SCW_DEFAULT_REGION",
            "SCW_API_URL",
            "SCW_WAIT_RETRY_INTERVAL",
        ]
        .into_iter()
        .map(|key| (key, std::env::var(key).ok()))
        .collect();
        unsafe {
            for (key, _) in &backup {
                std::env::remove_var(key);
            }
        }

        let cli = Cli::parse_from(["scwsync", "id", "decode", "fr-par/abc"]);

        unsafe {
            for (key, value) in backup {
                if let Some(value) = value {
                    std::env::set_var(key, value);
                }
            }
        }

        let config = cli.global.provider_config();
        assert!(config.secret_key.is_none());
        assert_eq!(config.default_region, "fr-par");
        assert_eq!(config.api_url, "https://api.scaleway.com");
        assert_eq!(config.wait, WaitSettings::default());
    }

    #[test]
    #[serial]
    fn test_retry_interval_from_env() {
        let backup = std::env::var("SCW_WAIT_RETRY_INTERVAL").ok();

        unsafe {
            std::env::set_var("SCW_WAIT_RETRY_INTERVAL", "2");
        }

        let cli = Cli::parse_from(["scwsync", "id", "decode", "fr-par/abc"]);

        unsafe {
            match backup {
                Some(value) => std::env::set_var("SCW_WAIT_RETRY_INTERVAL", value),
                None => std::env::remove_var("SCW_WAIT_RETRY_INTERVAL"),
            }
        }

        let config = cli.global.provider_config();
        assert_eq!(config.wait.retry_interval, Duration::from_secs(2));
    }

    #[test]
    #[serial]
    fn test_secret_key_flag_takes_precedence_over_env() {
        let backup = std::env::var("SCW_SECRET_KEY").ok();

        unsafe {
            std::env::set_var("SCW_SECRET_KEY", "env_key");
        }

        let cli = Cli::parse_from([
            "scwsync",
            "private-network",
            "read",
            "--name=main",
            "--secret-key=cli_key",
        ]);

        unsafe {
            match backup {
                Some(key) => std::env::set_var("SCW_SECRET_KEY", key),
                None => std::env::remove_var("SCW_SECRET_KEY"),
            }
        }

        assert_eq!(cli.global.secret_key, Some("cli_key".to_string()));
    }
}
