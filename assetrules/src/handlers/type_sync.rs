use super::{CREATE_OR_UPDATE, HandlerOutcome, RecordHandler, Registration};
use crate::context::{EventContext, Stage};
use crate::errors::{RuleError, RuleResult};
use crate::fields::{asset, cycle};
use crate::record::{FieldValue, Record};
use crate::store::RecordStore;
use crate::trace::DiagnosticSink;
use crate::types::{AssetClass, IdentifierKind, ServiceClass};

/// Copies the parent asset's classification onto a yearly cycle as a single
/// `rel_assettype` option.
pub struct AssetTypeSync;

impl AssetTypeSync {
    pub const NAME: &'static str = "asset_type_sync";
}

fn option_text(value: Option<i32>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

impl RecordHandler for AssetTypeSync {
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
        let Some(asset_ref) = ctx.target.reference(cycle::ASSET) else {
            return Err(RuleError::not_applicable("no asset selected"));
        };
        let cycle_id = ctx.output_id.unwrap_or(ctx.target.id);

        let parent = store
            .retrieve(asset::ENTITY, asset_ref.id, &[asset::ASSET_TYPE, asset::SERVICE_TYPE])
            .map_err(RuleError::read(asset::ENTITY))?;
        let asset_type = parent.option_value(asset::ASSET_TYPE);
        let service_type = parent.option_value(asset::SERVICE_TYPE);
        sink.trace(&format!(
            "Parent: AssetType={}, ServiceType={}",
            option_text(asset_type),
            option_text(service_type)
        ));

        let kind = IdentifierKind::resolve(
            asset_type.and_then(AssetClass::from_option_value),
            service_type.and_then(ServiceClass::from_option_value),
        );
        let Some(kind) = kind else {
            return Ok(HandlerOutcome::no_change("parent asset has no known type"));
        };

        let value = kind.cycle_asset_type();
        let update = Record::new(cycle::ENTITY, cycle_id).with(cycle::ASSET_TYPE, FieldValue::OptionSet(value));
        store.update(&update).map_err(RuleError::write(cycle::ENTITY))?;
        sink.trace(&format!("Set {} = {value}", cycle::ASSET_TYPE));

        Ok(HandlerOutcome::RecordUpdated {
            entity: cycle::ENTITY,
            id: cycle_id,
            summary: format!("{} = {value}", cycle::ASSET_TYPE),
        })
    }
}
