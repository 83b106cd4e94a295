use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use assetrules::fields::asset;
use assetrules::{AssetClass, ProvisionResult, ServiceClass, provision_identifier};

use crate::output::{OutputManager, TableDisplay};
use crate::theme::TABLE;
use crate::usage::ExampleGroup;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Provisioning",
    commands: &[
        "assetrules provision 000123 --service-type flowline",
        "assetrules provision 000123 --asset-type well --existing ADIB002   # keeps ADIB002",
        "assetrules --output json provision 000123 --asset-type facility",
    ],
}];

#[derive(Args)]
pub struct ProvisionArgs {
    /// Sequence value assigned by the host (`rel_uniqueidentifier`)
    pub sequence: String,

    /// Asset type (well, pipeline, facility, burrow-pit)
    #[arg(long)]
    pub asset_type: Option<AssetClass>,

    /// Service type (bulkline, flowline, manifold)
    #[arg(long)]
    pub service_type: Option<ServiceClass>,

    /// Value already held by the identifier field
    #[arg(long)]
    pub existing: Option<String>,
}

#[derive(Serialize)]
#[serde(transparent)]
struct ProvisionReport(ProvisionResult);

impl TableDisplay for ProvisionReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table();
        output.add_table_header(&mut table, &["Field", "Value"]);
        match &self.0 {
            ProvisionResult::Provisioned(provision) => {
                let written = match &provision.write {
                    Some(value) => output.colored_cell(value.as_str(), TABLE.written),
                    None => output.colored_cell("(kept existing value)", TABLE.muted),
                };
                table.add_row(vec![Cell::new(provision.field), written]);
                table.add_row(vec![Cell::new(asset::ASSET_CODE), Cell::new(&provision.composite_code)]);
                table.add_row(vec![Cell::new(asset::NAME), Cell::new(&provision.display_name)]);
            }
            ProvisionResult::NoApplicableClass => {
                table.add_row(vec![Cell::new("result"), Cell::new("no applicable asset or service type")]);
            }
            ProvisionResult::MissingSequence => {
                table.add_row(vec![Cell::new("result"), Cell::new("sequence value is empty")]);
            }
        }
        table
    }

    fn to_compact(&self) -> String {
        match &self.0 {
            ProvisionResult::Provisioned(provision) => format!(
                "{}={} {}={} {}={}",
                provision.field,
                provision.write.as_deref().unwrap_or(&provision.display_name),
                asset::ASSET_CODE,
                provision.composite_code,
                asset::NAME,
                provision.display_name
            ),
            ProvisionResult::NoApplicableClass => "no_applicable_class".to_string(),
            ProvisionResult::MissingSequence => "missing_sequence".to_string(),
        }
    }
}

pub fn handle_provision(args: ProvisionArgs, output: &OutputManager) -> Result<()> {
    let result = provision_identifier(
        &args.sequence,
        args.asset_type,
        args.service_type,
        args.existing.as_deref(),
    );

    match &result {
        ProvisionResult::Provisioned(provision) => {
            output.verbose(&format!("Resolved {} -> {}", provision.kind.label(), provision.field));
        }
        ProvisionResult::NoApplicableClass => {
            output.warning("No asset or service type given; nothing would be written.");
        }
        ProvisionResult::MissingSequence => {
            output.warning("Sequence value is empty; nothing would be written.");
        }
    }

    output.display(&ProvisionReport(result))
}
