use super::{CREATE_ONLY, HandlerOutcome, RecordHandler, Registration};
use crate::context::{EventContext, Stage};
use crate::errors::{RuleError, RuleResult};
use crate::fields::asset;
use crate::provisioning::{ProvisionResult, provision_identifier};
use crate::record::Record;
use crate::store::RecordStore;
use crate::trace::DiagnosticSink;
use crate::types::{AssetClass, IdentifierKind, ServiceClass};

const COLUMNS: &[&str] = &[
    asset::UNIQUE_IDENTIFIER,
    asset::ASSET_TYPE,
    asset::SERVICE_TYPE,
    asset::WELL_CODE,
    asset::PIPELINE_ID,
    asset::FACILITY_ID,
    asset::BURROWPIT_ID,
    asset::FLOWLINE_ID,
    asset::BULKLINE_ID,
    asset::MANIFOLD_ID,
    asset::ASSET_CODE,
    asset::NAME,
];

/// Derives identifier, asset code and name for a freshly created asset from
/// its sequence value.
pub struct UniqueIdPopulation;

impl UniqueIdPopulation {
    pub const NAME: &'static str = "unique_id_population";
}

impl RecordHandler for UniqueIdPopulation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn registration(&self) -> Registration {
        Registration::new(asset::ENTITY, CREATE_ONLY, Stage::PostOperation)
    }

    fn execute(
        &self,
        ctx: &mut EventContext,
        store: &mut dyn RecordStore,
        sink: &dyn DiagnosticSink,
    ) -> RuleResult<HandlerOutcome> {
        sink.trace("UniqueIdPopulation: Starting processing.");

        let asset_id = ctx.output_id.unwrap_or(ctx.target.id);
        let stored = store
            .retrieve(asset::ENTITY, asset_id, COLUMNS)
            .map_err(RuleError::read(asset::ENTITY))?;

        let sequence = stored.text(asset::UNIQUE_IDENTIFIER).unwrap_or_default();
        let asset_class = stored.option_value(asset::ASSET_TYPE).and_then(AssetClass::from_option_value);
        let service_class = stored
            .option_value(asset::SERVICE_TYPE)
            .and_then(ServiceClass::from_option_value);
        let existing = IdentifierKind::resolve(asset_class, service_class).and_then(|kind| stored.text(kind.field()));

        let provision = match provision_identifier(sequence, asset_class, service_class, existing) {
            ProvisionResult::Provisioned(provision) => provision,
            ProvisionResult::MissingSequence => {
                sink.trace("rel_uniqueidentifier is empty. Skipping.");
                return Ok(HandlerOutcome::no_change("sequence value is empty"));
            }
            ProvisionResult::NoApplicableClass => {
                sink.trace("No updates needed.");
                return Ok(HandlerOutcome::no_change("no asset or service type"));
            }
        };

        let label = provision.kind.label();
        let mut update = Record::new(asset::ENTITY, asset_id);
        match &provision.write {
            Some(value) => {
                update.set(provision.field, value.clone());
                sink.trace(&format!("{label}: Set {} = {value}", provision.field));
            }
            None => sink.trace(&format!(
                "{label}: {} already = {}",
                provision.field, provision.display_name
            )),
        }
        update.set(asset::ASSET_CODE, provision.composite_code.clone());
        update.set(asset::NAME, provision.display_name.clone());
        sink.trace(&format!(
            "FINAL: {} = {}, {} = {}",
            asset::ASSET_CODE,
            provision.composite_code,
            asset::NAME,
            provision.display_name
        ));

        store.update(&update).map_err(RuleError::write(asset::ENTITY))?;
        sink.trace("Update performed.");

        Ok(HandlerOutcome::RecordUpdated {
            entity: asset::ENTITY,
            id: asset_id,
            summary: format!("{} = {}", asset::ASSET_CODE, provision.composite_code),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Message;
    use crate::errors::StoreError;
    use crate::record::{FieldValue, RecordId};
    use crate::store::MemoryStore;
    use crate::trace::MemorySink;

    fn created(store: &mut MemoryStore, record: Record) -> EventContext {
        let id = record.id;
        store.insert(record.clone());
        EventContext::new(Message::Create, Stage::PostOperation, record).with_output_id(id)
    }

    #[test]
    fn fills_empty_flowline_id() {
        let mut store = MemoryStore::new();
        let record = Record::new(asset::ENTITY, RecordId::new())
            .with(asset::UNIQUE_IDENTIFIER, "7890")
            .with(asset::SERVICE_TYPE, FieldValue::OptionSet(1));
        let mut ctx = created(&mut store, record);

        UniqueIdPopulation
            .execute(&mut ctx, &mut store, &MemorySink::new())
            .unwrap();

        let stored = store.get(asset::ENTITY, ctx.target.id).unwrap();
        assert_eq!(stored.text(asset::FLOWLINE_ID), Some("FLID7890"));
        assert_eq!(stored.text(asset::ASSET_CODE), Some("FLID7890"));
        assert_eq!(stored.text(asset::NAME), Some("FLID7890"));
    }

    #[test]
    fn existing_identifier_is_kept_but_named() {
        let mut store = MemoryStore::new();
        let record = Record::new(asset::ENTITY, RecordId::new())
            .with(asset::UNIQUE_IDENTIFIER, "7890")
            .with(asset::SERVICE_TYPE, FieldValue::OptionSet(1))
            .with(asset::FLOWLINE_ID, "FLID1234");
        let mut ctx = created(&mut store, record);
        let sink = MemorySink::new();

        UniqueIdPopulation.execute(&mut ctx, &mut store, &sink).unwrap();

        let stored = store.get(asset::ENTITY, ctx.target.id).unwrap();
        assert_eq!(stored.text(asset::FLOWLINE_ID), Some("FLID1234"));
        assert_eq!(stored.text(asset::ASSET_CODE), Some("FLID7890"));
        assert_eq!(stored.text(asset::NAME), Some("FLID1234"));
        assert!(sink.contains("FLOWLINE: rel_flowlineid already = FLID1234"));
    }

    #[test]
    fn missing_sequence_writes_nothing() {
        let mut store = MemoryStore::new();
        let record = Record::new(asset::ENTITY, RecordId::new()).with(asset::ASSET_TYPE, FieldValue::OptionSet(1));
        let mut ctx = created(&mut store, record);

        let outcome = UniqueIdPopulation
            .execute(&mut ctx, &mut store, &MemorySink::new())
            .unwrap();

        assert!(matches!(outcome, HandlerOutcome::NoChange { .. }));
        assert!(!store.get(asset::ENTITY, ctx.target.id).unwrap().contains(asset::ASSET_CODE));
    }

    #[test]
    fn unknown_classes_write_nothing() {
        let mut store = MemoryStore::new();
        let record = Record::new(asset::ENTITY, RecordId::new())
            .with(asset::UNIQUE_IDENTIFIER, "1")
            .with(asset::SERVICE_TYPE, FieldValue::OptionSet(9));
        let mut ctx = created(&mut store, record);
        let outcome = UniqueIdPopulation
            .execute(&mut ctx, &mut store, &MemorySink::new())
            .unwrap();
        assert!(matches!(outcome, HandlerOutcome::NoChange { .. }));
    }

    #[test]
    fn write_failure_is_reported() {
        let mut store = MemoryStore::new();
        let record = Record::new(asset::ENTITY, RecordId::new())
            .with(asset::UNIQUE_IDENTIFIER, "1")
            .with(asset::ASSET_TYPE, FieldValue::OptionSet(2));
        let mut ctx = created(&mut store, record);
        store.fail_writes(asset::ENTITY);

        let err = UniqueIdPopulation
            .execute(&mut ctx, &mut store, &MemorySink::new())
            .unwrap_err();
        assert!(matches!(
            err,
            RuleError::UpstreamWriteFailed {
                source: StoreError::Unavailable { .. },
                ..
            }
        ));
    }
}
