use tabled::{Table, Tabled};
use termtree::Tree;

use crate::identity::{IdentityError, decode_composite, decode_regional};
use crate::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "TYPE")]
    resource_type: String,
    #[tabled(rename = "ID")]
    resource_id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "REGION")]
    region: String,
}

pub fn render_resource(resource: &Resource, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(resource),
        OutputFormat::Table => {
            let row = ResourceRow {
                resource_type: resource.resource_type.clone(),
                resource_id: resource.resource_id.clone(),
                name: resource.name.clone(),
                region: resource.region.clone(),
            };
            Ok(Table::new([row]).to_string())
        }
    }
}

/// Shows which segment of an identifier is which. Two segments are read as
/// a regional id, three as a composite one.
pub fn identifier_tree(raw: &str) -> Result<Tree<String>, IdentityError> {
    let segments = raw.split(crate::identity::SEPARATOR).count();
    let tree = if segments == 3 {
        let (region, parent_id, leaf_name) = decode_composite(raw)?;
        Tree::new(format!("region: {region}")).with_leaves([Tree::new(
            format!("parent: {parent_id}"),
        )
        .with_leaves([format!("name: {leaf_name}")])])
    } else {
        let (region, local_id) = decode_regional(raw)?;
        Tree::new(format!("region: {region}")).with_leaves([format!("id: {local_id}")])
    };
    Ok(tree)
}
