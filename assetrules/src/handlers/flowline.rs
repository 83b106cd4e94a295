use super::{CREATE_OR_UPDATE, HandlerOutcome, RecordHandler, Registration};
use crate::context::{EventContext, Stage};
use crate::errors::{RuleError, RuleResult};
use crate::fields::asset;
use crate::normalizer::{NormalizationResult, clean_code, normalize, segments};
use crate::store::RecordStore;
use crate::trace::DiagnosticSink;
use crate::types::{AssetClass, ServiceClass};

/// Rectifies `rel_flowlineid` on pipeline flowline assets before they are saved.
pub struct FlowlineIdValidation;

impl FlowlineIdValidation {
    pub const NAME: &'static str = "flowline_id_validation";
}

impl RecordHandler for FlowlineIdValidation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn registration(&self) -> Registration {
        Registration::new(asset::ENTITY, CREATE_OR_UPDATE, Stage::PreOperation)
    }

    fn execute(
        &self,
        ctx: &mut EventContext,
        _store: &mut dyn RecordStore,
        sink: &dyn DiagnosticSink,
    ) -> RuleResult<HandlerOutcome> {
        if !ctx.target.contains(asset::FLOWLINE_ID) {
            return Err(RuleError::not_applicable("target does not carry rel_flowlineid"));
        }
        sink.trace("FlowlineIdValidation: Starting processing.");

        let asset_class = ctx.asset_class();
        let service_class = ctx.service_class();
        if asset_class != Some(AssetClass::Pipeline) || service_class != Some(ServiceClass::Flowline) {
            return Err(RuleError::not_applicable("asset is not a pipeline with flowline service"));
        }

        let Some(raw) = ctx.target.non_empty_text(asset::FLOWLINE_ID).map(str::to_string) else {
            sink.trace("FlowlineIdValidation: Flowline id is empty. Skipping.");
            return Ok(HandlerOutcome::no_change("flowline id is empty"));
        };

        match normalize(&raw, asset_class, service_class) {
            NormalizationResult::Unchanged => {
                sink.trace(&format!("FlowlineIdValidation: '{raw}' accepted unchanged."));
                Ok(HandlerOutcome::no_change(format!("'{raw}' already valid")))
            }
            NormalizationResult::Replace(code) => {
                let cleaned = clean_code(&raw);
                let parts = segments(&cleaned);
                sink.trace(&format!(
                    "RectifyFlowlineId: Input={cleaned}, First={}, Middle={}, Last={}, Result={code}",
                    parts.first, parts.middle, parts.last
                ));
                ctx.target.set(asset::FLOWLINE_ID, code.clone());
                sink.trace(&format!("FlowlineIdValidation: Rectified flowline id to {code}"));
                Ok(HandlerOutcome::TargetChanged {
                    field: asset::FLOWLINE_ID,
                    value: code,
                })
            }
        }
    }
}
