use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;

use assetrules::normalizer::{Segments, clean_code, segments};
use assetrules::{AssetClass, IdentifierKind, NormalizationResult, ServiceClass, normalize};

use crate::output::{OutputManager, TableDisplay};
use crate::theme::TABLE;
use crate::usage::ExampleGroup;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Flowline Identifiers",
        commands: &[
            "assetrules normalize 'adibw 002 lfln' --service-type flowline",
            "assetrules normalize flid0042 --service-type flowline      # short code, kept",
        ],
    },
    ExampleGroup {
        title: "Well Codes",
        commands: &["assetrules normalize ' adib-002 ' --asset-type well"],
    },
];

#[derive(Args)]
pub struct NormalizeArgs {
    /// Identifier as entered by the operator
    pub code: String,

    /// Asset type (well, pipeline, facility, burrow-pit)
    #[arg(long)]
    pub asset_type: Option<AssetClass>,

    /// Service type (bulkline, flowline, manifold)
    #[arg(long)]
    pub service_type: Option<ServiceClass>,
}

#[derive(Serialize)]
struct NormalizeReport {
    input: String,
    kind: Option<IdentifierKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segments: Option<Segments>,
    result: NormalizationResult,
}

impl TableDisplay for NormalizeReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table();
        output.add_table_header(&mut table, &["Field", "Value"]);
        table.add_row(vec![Cell::new("Input"), Cell::new(format!("'{}'", self.input))]);
        table.add_row(vec![
            Cell::new("Kind"),
            Cell::new(self.kind.map(IdentifierKind::label).unwrap_or("-")),
        ]);
        if let Some(parts) = &self.segments {
            table.add_row(vec![
                Cell::new("Segments"),
                Cell::new(format!("{} | {} | {}", parts.first, parts.middle, parts.last)),
            ]);
        }
        let result = match &self.result {
            NormalizationResult::Unchanged => output.colored_cell("unchanged", TABLE.muted),
            NormalizationResult::Replace(code) => output.colored_cell(code.as_str(), TABLE.written),
        };
        table.add_row(vec![Cell::new("Result"), result]);
        table
    }

    fn to_compact(&self) -> String {
        match &self.result {
            NormalizationResult::Unchanged => self.input.clone(),
            NormalizationResult::Replace(code) => code.clone(),
        }
    }
}

pub fn handle_normalize(args: NormalizeArgs, output: &OutputManager) -> Result<()> {
    let kind = IdentifierKind::resolve(args.asset_type, args.service_type);
    if kind.is_none() {
        output.warning("No asset or service type given; identifiers are left unchanged.");
    }

    let result = normalize(&args.code, args.asset_type, args.service_type);
    let segments = match (&result, kind) {
        (NormalizationResult::Replace(_), Some(IdentifierKind::Flowline)) => Some(segments(&clean_code(&args.code))),
        _ => None,
    };
    output.verbose(&format!("Normalizing '{}' as {:?}", args.code, kind));

    output.display(&NormalizeReport {
        input: args.code,
        kind,
        segments,
        result,
    })
}
