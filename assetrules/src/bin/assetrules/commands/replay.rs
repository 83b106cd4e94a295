use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use serde::{Deserialize, Serialize};

use assetrules::fields::asset;
use assetrules::handlers::{HandlerStatus, PERSIST_STEP};
use assetrules::trace::Tee;
use assetrules::{
    Config, DispatchReport, Dispatcher, HandlerOutcome, LogSink, MemorySink, MemoryStore, Message, Record, RecordId,
};

use crate::output::{OutputManager, TableDisplay};
use crate::theme::{ICONS, TABLE};
use crate::usage::ExampleGroup;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Replay",
    commands: &[
        "assetrules replay demos/flowline_asset.json",
        "assetrules --verbose replay demos/flowline_asset.json     # include handler traces",
        "assetrules --output json replay demos/flowline_asset.json",
    ],
}];

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON fixture with seed `records` and ordered `submissions`
    pub fixture: PathBuf,
}

/// Seed records plus the changes to submit against them.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub records: Vec<Record>,
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Deserialize)]
pub struct Submission {
    pub message: Message,
    pub target: Record,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read fixture {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse fixture {}", path.display()))
    }
}

#[derive(Serialize)]
struct EventSummary {
    index: usize,
    message: Message,
    entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<DispatchReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    trace: Vec<String>,
}

#[derive(Serialize)]
struct ReplayReport {
    events: Vec<EventSummary>,
    records: Vec<Record>,
}

fn describe_outcome(outcome: &HandlerOutcome) -> String {
    match outcome {
        HandlerOutcome::NoChange { reason } => format!("no change ({reason})"),
        HandlerOutcome::TargetChanged { field, value } => format!("{field} -> {value}"),
        HandlerOutcome::RecordUpdated { entity, summary, .. } => format!("{entity}: {summary}"),
        HandlerOutcome::StagesCopied {
            removed, created, ..
        } => format!("{created} stage(s) copied, {removed} removed"),
    }
}

fn short_id(id: RecordId) -> String {
    id.to_string().chars().take(8).collect()
}

impl TableDisplay for ReplayReport {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table();
        output.add_table_header(&mut table, &["#", "Event", "Handler", "Result"]);
        for event in &self.events {
            let label = format!("{} {}", event.message, event.entity);
            if let Some(report) = &event.report {
                if report.entries.is_empty() {
                    table.add_row(vec![
                        Cell::new(event.index),
                        Cell::new(&label),
                        Cell::new("-"),
                        output.colored_cell("no handlers matched", TABLE.muted),
                    ]);
                }
                for entry in &report.entries {
                    let result = match &entry.status {
                        HandlerStatus::Applied(outcome) => output.colored_cell(
                            format!("{} {}", ICONS.applied, describe_outcome(outcome)),
                            TABLE.applied,
                        ),
                        HandlerStatus::Skipped { reason } => {
                            output.colored_cell(format!("{} {reason}", ICONS.skipped), TABLE.muted)
                        }
                    };
                    table.add_row(vec![
                        Cell::new(event.index),
                        Cell::new(&label),
                        Cell::new(entry.handler),
                        result,
                    ]);
                }
            }
            if let Some(error) = &event.error {
                table.add_row(vec![
                    Cell::new(event.index),
                    Cell::new(&label),
                    Cell::new(ICONS.error),
                    output.colored_cell(error.as_str(), TABLE.failed),
                ]);
            }
        }
        table
    }

    fn to_compact(&self) -> String {
        let failed = self.events.iter().filter(|event| event.error.is_some()).count();
        format!(
            "events={} failed={} records={}",
            self.events.len(),
            failed,
            self.records.len()
        )
    }
}

fn records_table(records: &[Record], output: &OutputManager) -> Table {
    let mut table = output.create_table();
    output.add_table_header(&mut table, &["Entity", "Id", "Attribute", "Value"]);
    for record in records {
        for (index, (field, value)) in record.attributes.iter().enumerate() {
            let (entity, id) = if index == 0 {
                (record.entity.clone(), short_id(record.id))
            } else {
                (String::new(), String::new())
            };
            table.add_row(vec![
                Cell::new(entity),
                Cell::new(id),
                Cell::new(field),
                Cell::new(value.to_string()),
            ]);
        }
    }
    table
}

pub fn handle_replay(args: ReplayArgs, config: &Config, output: &OutputManager) -> Result<()> {
    let fixture = Fixture::load(&args.fixture)?;
    let dispatcher = Dispatcher::from_settings(&config.handlers).context("Invalid [handlers] configuration")?;
    output.verbose(&format!("Handlers: {}", dispatcher.handler_names().join(", ")));

    output.info(&format!(
        "Loaded {} record(s) and {} submission(s) from {}",
        fixture.records.len(),
        fixture.submissions.len(),
        args.fixture.display()
    ));

    let mut store = MemoryStore::new().with_autonumber(asset::ENTITY, asset::UNIQUE_IDENTIFIER);
    for record in fixture.records {
        store.insert(record);
    }

    let log_sink = LogSink::default();
    let mut events = Vec::with_capacity(fixture.submissions.len());
    for (index, submission) in fixture.submissions.into_iter().enumerate() {
        let memory = MemorySink::new();
        let sink = Tee {
            first: &log_sink,
            second: &memory,
        };
        let entity = submission.target.entity.clone();
        let result = dispatcher.submit(submission.message, submission.target, &mut store, &sink);

        let (report, error) = match result {
            Ok(report) => (Some(report), None),
            Err(err) => {
                if err.handler == PERSIST_STEP {
                    output.error(&format!("Event {}: could not persist {entity}: {}", index + 1, err.source));
                } else {
                    output.error(&format!("Event {}: {err}", index + 1));
                }
                (None, Some(err.to_string()))
            }
        };
        let trace = memory.take();
        for line in &trace {
            output.verbose(line);
        }
        events.push(EventSummary {
            index: index + 1,
            message: submission.message,
            entity,
            report,
            error,
            trace,
        });
    }

    let failed = events.iter().filter(|event| event.error.is_some()).count();
    let report = ReplayReport {
        events,
        records: store.all_records().into_iter().cloned().collect(),
    };

    output.heading("Events");
    output.display(&report)?;
    if !output.options.quiet && output.options.output_format == crate::output::OutputFormat::Table {
        output.heading("Records");
        println!("{}", records_table(&report.records, output));
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} event(s) failed", report.events.len());
    }
    output.success(&format!("Replayed {} event(s)", report.events.len()));
    Ok(())
}
