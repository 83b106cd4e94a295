use super::{CREATE_OR_UPDATE, HandlerOutcome, RecordHandler, Registration};
use crate::context::{EventContext, Stage};
use crate::errors::{RuleError, RuleResult};
use crate::fields::{asset, cycle};
use crate::record::{FieldValue, Record, RecordId};
use crate::store::{Condition, Query, RecordStore, SortOrder};
use crate::trace::DiagnosticSink;
use crate::types::ReadinessStatus;

const FIRST_CYCLE: &str = "First cycle for this asset.";
const NO_CHANGE: &str = "No change from previous cycle.";
const READY_FOR_ABANDONMENT: &str = "Asset is Ready For Abandonment – changes not tracked.";
const ABANDONED: &str = "Asset is Abandoned – changes not tracked.";
const UNKNOWN_READINESS: &str = "Readiness status unknown – changes not tracked.";

/// Records in `rel_p50modtracker` how a yearly cycle's cost figures moved
/// compared with the asset's previous cycle.
pub struct ChangeTracker;

impl ChangeTracker {
    pub const NAME: &'static str = "change_tracker";
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CycleFigures {
    edm_cost: Option<f64>,
    modification: Option<f64>,
    decommissioning_year: Option<i32>,
}

impl CycleFigures {
    fn from_record(record: &Record) -> Self {
        Self {
            edm_cost: record.decimal(cycle::P50_EDM_COST),
            modification: record.decimal(cycle::P50_MOD),
            decommissioning_year: record.option_value(cycle::DECOMMISSIONING_YEAR),
        }
    }

    fn describe_changes(previous: &Self, current: &Self) -> String {
        let mut changes = Vec::new();
        if previous.edm_cost != current.edm_cost {
            changes.push(format!(
                "P50 EDM Cost ({} to {})",
                format_amount(previous.edm_cost),
                format_amount(current.edm_cost)
            ));
        }
        if previous.modification != current.modification {
            changes.push(format!(
                "P50 MOD ({} to {})",
                format_amount(previous.modification),
                format_amount(current.modification)
            ));
        }
        if previous.decommissioning_year != current.decommissioning_year {
            changes.push(format!(
                "Decomm Year ({} to {})",
                format_year(previous.decommissioning_year),
                format_year(current.decommissioning_year)
            ));
        }

        if changes.is_empty() {
            NO_CHANGE.to_string()
        } else {
            format!("Change detected: {}.", changes.join(", "))
        }
    }
}

/// Whole amount with thousands separators, `—` when absent.
pub fn format_amount(value: Option<f64>) -> String {
    let Some(value) = value else {
        return "—".to_string();
    };
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if rounded < 0.0 { format!("-{grouped}") } else { grouped }
}

fn format_year(value: Option<i32>) -> String {
    value.map(|year| year.to_string()).unwrap_or_default()
}

fn write_tracker(store: &mut dyn RecordStore, cycle_id: RecordId, text: &str) -> RuleResult<()> {
    let update = Record::new(cycle::ENTITY, cycle_id).with(cycle::TRACKER, text);
    store.update(&update).map_err(RuleError::write(cycle::ENTITY))
}

impl RecordHandler for ChangeTracker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn registration(&self) -> Registration {
        Registration::new(cycle::ENTITY, CREATE_OR_UPDATE, Stage::PostOperation)
    }

    fn execute(
        &self,
        ctx: &mut EventContext,
        store: &mut dyn RecordStore,
        sink: &dyn DiagnosticSink,
    ) -> RuleResult<HandlerOutcome> {
        let Some(asset_ref) = ctx.target.reference(cycle::ASSET).cloned() else {
            sink.trace("No asset selected. Skipping.");
            return Err(RuleError::not_applicable("no asset selected"));
        };
        let cycle_id = ctx.output_id.unwrap_or(ctx.target.id);

        let parent = store
            .retrieve(asset::ENTITY, asset_ref.id, &[asset::READINESS_STATUS])
            .map_err(RuleError::read(asset::ENTITY))?;
        let readiness = parent
            .option_value(asset::READINESS_STATUS)
            .and_then(ReadinessStatus::from_option_value);

        let blocked = match readiness {
            Some(ReadinessStatus::ReadyForAbandonment) => {
                sink.trace("BLOCKED: Ready For Abandonment");
                Some(READY_FOR_ABANDONMENT)
            }
            Some(ReadinessStatus::Abandoned) => {
                sink.trace("BLOCKED: Abandoned");
                Some(ABANDONED)
            }
            Some(ReadinessStatus::NotAbandoned) => None,
            None => Some(UNKNOWN_READINESS),
        };
        if let Some(message) = blocked {
            write_tracker(store, cycle_id, message)?;
            return Ok(HandlerOutcome::RecordUpdated {
                entity: cycle::ENTITY,
                id: cycle_id,
                summary: message.to_string(),
            });
        }

        let current = CycleFigures::from_record(&ctx.target);
        let query = Query::new(cycle::ENTITY)
            .columns(&[
                cycle::P50_EDM_COST,
                cycle::P50_MOD,
                cycle::DECOMMISSIONING_YEAR,
                cycle::CREATED_ON,
            ])
            .filter(Condition::field_eq(cycle::ASSET, FieldValue::Reference(asset_ref)))
            .filter(Condition::id_ne(cycle_id))
            .order_by(cycle::CREATED_ON, SortOrder::Desc)
            .top(1);
        let previous = store
            .retrieve_multiple(&query)
            .map_err(RuleError::read(cycle::ENTITY))?;

        let message = match previous.first() {
            None => FIRST_CYCLE.to_string(),
            Some(previous) => CycleFigures::describe_changes(&CycleFigures::from_record(previous), &current),
        };

        write_tracker(store, cycle_id, &message)?;
        sink.trace(&format!("TRACKED: {message}"));
        Ok(HandlerOutcome::RecordUpdated {
            entity: cycle::ENTITY,
            id: cycle_id,
            summary: message,
        })
    }
}
