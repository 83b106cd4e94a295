//! Record handlers and the dispatcher that runs them.
//!
//! A handler declares which entity, messages and stage it reacts to through
//! its [`Registration`]. The [`Dispatcher`] runs every matching handler in
//! order; a [`RuleError::NotApplicable`] result is a skip, any other error
//! aborts the event.

mod approval;
mod change_tracker;
mod flowline;
mod type_sync;
mod unique_id;
mod well_code;

pub use approval::ApprovalTemplateCopy;
pub use change_tracker::{ChangeTracker, format_amount};
pub use flowline::FlowlineIdValidation;
pub use type_sync::AssetTypeSync;
pub use unique_id::UniqueIdPopulation;
pub use well_code::WellCodeValidation;

use serde::Serialize;

use crate::config::HandlerSettings;
use crate::context::{EventContext, Message, Stage};
use crate::errors::{ConfigError, DispatchError, RuleError, RuleResult};
use crate::record::{Record, RecordId};
use crate::store::RecordStore;
use crate::trace::DiagnosticSink;

/// Names accepted in `[handlers].enabled`, in dispatch order.
pub const HANDLER_NAMES: [&str; 6] = [
    FlowlineIdValidation::NAME,
    WellCodeValidation::NAME,
    UniqueIdPopulation::NAME,
    ChangeTracker::NAME,
    AssetTypeSync::NAME,
    ApprovalTemplateCopy::NAME,
];

/// Entity, messages and stage a handler is registered for.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub entity: &'static str,
    pub messages: &'static [Message],
    pub stage: Stage,
}

impl Registration {
    pub const fn new(entity: &'static str, messages: &'static [Message], stage: Stage) -> Self {
        Self {
            entity,
            messages,
            stage,
        }
    }

    pub fn matches(&self, ctx: &EventContext) -> bool {
        ctx.entity() == self.entity && ctx.stage == self.stage && self.messages.contains(&ctx.message)
    }
}

const CREATE_OR_UPDATE: &[Message] = &[Message::Create, Message::Update];
const CREATE_ONLY: &[Message] = &[Message::Create];

/// What a handler did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HandlerOutcome {
    NoChange { reason: String },
    /// The in-flight target was modified before it is persisted.
    TargetChanged { field: &'static str, value: String },
    /// A separate update was issued against the store.
    RecordUpdated { entity: &'static str, id: RecordId, summary: String },
    StagesCopied { request: RecordId, removed: usize, created: usize },
}

impl HandlerOutcome {
    pub fn no_change(reason: impl Into<String>) -> Self {
        Self::NoChange { reason: reason.into() }
    }
}

pub trait RecordHandler {
    fn name(&self) -> &'static str;

    fn registration(&self) -> Registration;

    fn execute(
        &self,
        ctx: &mut EventContext,
        store: &mut dyn RecordStore,
        sink: &dyn DiagnosticSink,
    ) -> RuleResult<HandlerOutcome>;
}

/// Builds a handler from its configuration name.
pub fn handler_by_name(name: &str) -> Option<Box<dyn RecordHandler>> {
    let handler: Box<dyn RecordHandler> = match name {
        FlowlineIdValidation::NAME => Box::new(FlowlineIdValidation),
        WellCodeValidation::NAME => Box::new(WellCodeValidation),
        UniqueIdPopulation::NAME => Box::new(UniqueIdPopulation),
        ChangeTracker::NAME => Box::new(ChangeTracker),
        AssetTypeSync::NAME => Box::new(AssetTypeSync),
        ApprovalTemplateCopy::NAME => Box::new(ApprovalTemplateCopy),
        _ => return None,
    };
    Some(handler)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HandlerStatus {
    Applied(HandlerOutcome),
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerReport {
    pub handler: &'static str,
    pub stage: Stage,
    pub status: HandlerStatus,
}

/// Handler results for one event, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchReport {
    pub record: Option<RecordId>,
    pub entries: Vec<HandlerReport>,
}

impl DispatchReport {
    pub fn applied(&self) -> impl Iterator<Item = (&'static str, &HandlerOutcome)> {
        self.entries.iter().filter_map(|entry| match &entry.status {
            HandlerStatus::Applied(outcome) => Some((entry.handler, outcome)),
            HandlerStatus::Skipped { .. } => None,
        })
    }

    pub fn outcome_of(&self, handler: &str) -> Option<&HandlerOutcome> {
        self.applied()
            .find(|(name, _)| *name == handler)
            .map(|(_, outcome)| outcome)
    }

    pub fn was_skipped(&self, handler: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.handler == handler && matches!(entry.status, HandlerStatus::Skipped { .. }))
    }
}

/// Name reported when persisting the submitted record itself fails.
pub const PERSIST_STEP: &str = "persist";

/// Ordered set of handlers run for each event.
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Box<dyn RecordHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every handler, in [`HANDLER_NAMES`] order.
    pub fn with_all_handlers() -> Self {
        Self {
            handlers: HANDLER_NAMES.iter().filter_map(|name| handler_by_name(name)).collect(),
        }
    }

    pub fn from_settings(settings: &HandlerSettings) -> Result<Self, ConfigError> {
        let mut handlers = Vec::with_capacity(settings.enabled.len());
        for name in &settings.enabled {
            let handler = handler_by_name(name).ok_or_else(|| ConfigError::UnknownHandler { name: name.clone() })?;
            handlers.push(handler);
        }
        Ok(Self { handlers })
    }

    pub fn with_handler(mut self, handler: impl RecordHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    /// Runs every handler registered for the event's entity, message and stage.
    pub fn dispatch(
        &self,
        ctx: &mut EventContext,
        store: &mut dyn RecordStore,
        sink: &dyn DiagnosticSink,
    ) -> Result<DispatchReport, DispatchError> {
        let mut report = DispatchReport {
            record: Some(ctx.output_id.unwrap_or(ctx.target.id)),
            entries: Vec::new(),
        };
        self.dispatch_into(ctx, store, sink, &mut report)?;
        Ok(report)
    }

    fn dispatch_into(
        &self,
        ctx: &mut EventContext,
        store: &mut dyn RecordStore,
        sink: &dyn DiagnosticSink,
        report: &mut DispatchReport,
    ) -> Result<(), DispatchError> {
        for handler in &self.handlers {
            if !handler.registration().matches(ctx) {
                continue;
            }
            let name = handler.name();
            let status = match handler.execute(ctx, store, sink) {
                Ok(outcome) => HandlerStatus::Applied(outcome),
                Err(err) if err.is_not_applicable() => {
                    sink.trace(&format!("{name}: {err}. Skipping."));
                    HandlerStatus::Skipped {
                        reason: err.to_string(),
                    }
                }
                Err(err) => {
                    sink.trace(&format!("ERROR: {name}: {err}"));
                    return Err(DispatchError {
                        handler: name,
                        source: err,
                    });
                }
            };
            report.entries.push(HandlerReport {
                handler: name,
                stage: ctx.stage,
                status,
            });
        }
        Ok(())
    }

    /// Runs a submitted change through the full pipeline: pre-operation
    /// handlers on the in-flight target, persistence, then post-operation
    /// handlers.
    ///
    /// Updates carry the stored record as pre-image. Persisting a create
    /// reports the new id to post-operation handlers.
    pub fn submit(
        &self,
        message: Message,
        target: Record,
        store: &mut dyn RecordStore,
        sink: &dyn DiagnosticSink,
    ) -> Result<DispatchReport, DispatchError> {
        let mut ctx = EventContext::new(message, Stage::PreOperation, target);
        if message == Message::Update {
            let pre_image = store
                .retrieve(ctx.entity(), ctx.target.id, &[])
                .map_err(RuleError::read(ctx.entity()))
                .map_err(|source| DispatchError {
                    handler: PERSIST_STEP,
                    source,
                })?;
            ctx.pre_image = Some(pre_image);
        }

        let mut report = DispatchReport {
            record: Some(ctx.target.id),
            entries: Vec::new(),
        };
        self.dispatch_into(&mut ctx, store, sink, &mut report)?;

        let persisted = match message {
            Message::Create => store.create(ctx.target.clone()).map(Some),
            Message::Update => store.update(&ctx.target).map(|_| None),
        };
        let created = persisted
            .map_err(RuleError::write(ctx.entity()))
            .map_err(|source| {
                sink.trace(&format!("ERROR: {PERSIST_STEP}: {source}"));
                DispatchError {
                    handler: PERSIST_STEP,
                    source,
                }
            })?;

        ctx.stage = Stage::PostOperation;
        ctx.output_id = created;
        report.record = Some(created.unwrap_or(ctx.target.id));
        self.dispatch_into(&mut ctx, store, sink, &mut report)?;
        Ok(report)
    }
}
