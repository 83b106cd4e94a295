use super::{CREATE_OR_UPDATE, HandlerOutcome, RecordHandler, Registration};
use crate::context::{EventContext, Message, Stage};
use crate::errors::{RuleError, RuleResult};
use crate::fields::approval;
use crate::record::{EntityRef, FieldValue, Record, RecordId};
use crate::store::{Condition, Query, RecordStore, SortOrder};
use crate::trace::DiagnosticSink;

const DEFAULT_STAGE_NAME: &str = "Stage";

/// Replaces an approval request's stages with copies of its template's stages.
pub struct ApprovalTemplateCopy;

impl ApprovalTemplateCopy {
    pub const NAME: &'static str = "approval_template_copy";
}

/// Request stage built from one template stage.
fn request_stage(request_id: RecordId, template_stage: &Record) -> Record {
    let name = template_stage
        .non_empty_text(approval::STAGE_TEMPLATE_NAME)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(DEFAULT_STAGE_NAME);
    let order = template_stage.integer(approval::STAGE_ORDER).unwrap_or(0);

    let mut stage = Record::new(approval::REQUEST_STAGE_ENTITY, RecordId::new())
        .with(
            approval::REQUEST_STAGE_REQUEST,
            EntityRef::new(approval::REQUEST_ENTITY, request_id),
        )
        .with(approval::REQUEST_STAGE_NAME, name)
        .with(approval::STAGE_ORDER, FieldValue::Integer(order));
    if let Some(approver) = template_stage.reference(approval::STAGE_TEMPLATE_APPROVER) {
        stage.set(approval::REQUEST_STAGE_APPROVER, approver.clone());
    }
    stage
}

impl RecordHandler for ApprovalTemplateCopy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn registration(&self) -> Registration {
        Registration::new(approval::REQUEST_ENTITY, CREATE_OR_UPDATE, Stage::PostOperation)
    }

    fn execute(
        &self,
        ctx: &mut EventContext,
        store: &mut dyn RecordStore,
        sink: &dyn DiagnosticSink,
    ) -> RuleResult<HandlerOutcome> {
        let Some(template) = ctx.target.reference(approval::TEMPLATE).cloned() else {
            return Err(RuleError::not_applicable("no approval template selected"));
        };
        let request_id = match ctx.message {
            Message::Create => ctx.output_id.unwrap_or(ctx.target.id),
            Message::Update => ctx.target.id,
        };
        sink.trace(&format!("Copying stages from template {} to request {request_id}", template.id));

        let template_query = Query::new(approval::STAGE_TEMPLATE_ENTITY)
            .columns(&[
                approval::STAGE_TEMPLATE_NAME,
                approval::STAGE_ORDER,
                approval::STAGE_TEMPLATE_APPROVER,
            ])
            .filter(Condition::field_eq(approval::TEMPLATE, FieldValue::Reference(template)))
            .order_by(approval::STAGE_ORDER, SortOrder::Asc);
        let template_stages = store
            .retrieve_multiple(&template_query)
            .map_err(RuleError::read(approval::STAGE_TEMPLATE_ENTITY))?;
        if template_stages.is_empty() {
            sink.trace("No template stages found.");
            return Ok(HandlerOutcome::no_change("template has no stages"));
        }

        let existing_query = Query::new(approval::REQUEST_STAGE_ENTITY).filter(Condition::field_eq(
            approval::REQUEST_STAGE_REQUEST,
            EntityRef::new(approval::REQUEST_ENTITY, request_id),
        ));
        let existing = store
            .retrieve_multiple(&existing_query)
            .map_err(RuleError::read(approval::REQUEST_STAGE_ENTITY))?;
        for old in &existing {
            store
                .delete(&old.entity, old.id)
                .map_err(RuleError::write(approval::REQUEST_STAGE_ENTITY))?;
        }

        for template_stage in &template_stages {
            store
                .create(request_stage(request_id, template_stage))
                .map_err(RuleError::write(approval::REQUEST_STAGE_ENTITY))?;
        }
        sink.trace(&format!("Successfully copied {} stage(s).", template_stages.len()));

        Ok(HandlerOutcome::StagesCopied {
            request: request_id,
            removed: existing.len(),
            created: template_stages.len(),
        })
    }
}
