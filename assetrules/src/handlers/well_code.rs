use super::{CREATE_OR_UPDATE, HandlerOutcome, RecordHandler, Registration};
use crate::context::{EventContext, Stage};
use crate::errors::{RuleError, RuleResult};
use crate::fields::asset;
use crate::normalizer::{NormalizationResult, normalize_well_code};
use crate::store::RecordStore;
use crate::trace::DiagnosticSink;
use crate::types::AssetClass;

/// Normalizes `rel_wellcode` on well assets before they are saved.
pub struct WellCodeValidation;

impl WellCodeValidation {
    pub const NAME: &'static str = "well_code_validation";
}

impl RecordHandler for WellCodeValidation {
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
        if !ctx.target.contains(asset::WELL_CODE) {
            return Err(RuleError::not_applicable("target does not carry rel_wellcode"));
        }
        sink.trace("ValidateWellcode: Starting processing.");

        // Only the asset type gates this rule; service type is not consulted.
        if ctx.asset_class() != Some(AssetClass::Well) {
            return Err(RuleError::not_applicable("asset type is not well"));
        }

        let Some(raw) = ctx.target.non_empty_text(asset::WELL_CODE).map(str::to_string) else {
            sink.trace("ValidateWellcode: Wellcode is empty. Skipping.");
            return Ok(HandlerOutcome::no_change("well code is empty"));
        };

        match normalize_well_code(&raw) {
            NormalizationResult::Unchanged => {
                sink.trace(&format!("ValidateWellcode: '{raw}' left unchanged."));
                Ok(HandlerOutcome::no_change(format!("'{raw}' not normalized")))
            }
            NormalizationResult::Replace(code) => {
                sink.trace(&format!("ValidateWellcode: Normalized wellcode to {code}"));
                ctx.target.set(asset::WELL_CODE, code.clone());
                Ok(HandlerOutcome::TargetChanged {
                    field: asset::WELL_CODE,
                    value: code,
                })
            }
        }
    }
}
