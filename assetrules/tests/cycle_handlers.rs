//! Yearly cycle events: change tracking against the previous cycle and
//! asset type synchronization from the parent asset.

use chrono::{TimeZone, Utc};

use assetrules::fields::{asset, cycle};
use assetrules::handlers::{AssetTypeSync, ChangeTracker};
use assetrules::{
    Dispatcher, EntityRef, FieldValue, HandlerOutcome, MemorySink, MemoryStore, Message, Record, RecordId, RuleError,
};

// ============ Helpers ============

fn parent(store: &mut MemoryStore, readiness: Option<i32>) -> EntityRef {
    let mut record = Record::new(asset::ENTITY, RecordId::new())
        .with(asset::ASSET_TYPE, FieldValue::OptionSet(2))
        .with(asset::SERVICE_TYPE, FieldValue::OptionSet(1));
    if let Some(status) = readiness {
        record.set(asset::READINESS_STATUS, FieldValue::OptionSet(status));
    }
    let reference = EntityRef::new(asset::ENTITY, record.id);
    store.insert(record);
    reference
}

fn previous_cycle(store: &mut MemoryStore, parent: &EntityRef, year: i32, cost: f64) -> RecordId {
    let record = Record::new(cycle::ENTITY, RecordId::new())
        .with(cycle::ASSET, parent.clone())
        .with(cycle::P50_EDM_COST, FieldValue::Decimal(cost))
        .with(cycle::P50_MOD, FieldValue::Decimal(250.0))
        .with(cycle::DECOMMISSIONING_YEAR, FieldValue::OptionSet(7))
        .with(cycle::CREATED_ON, Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap());
    let id = record.id;
    store.insert(record);
    id
}

fn new_cycle(parent: &EntityRef, cost: f64) -> Record {
    Record::new(cycle::ENTITY, RecordId::new())
        .with(cycle::ASSET, parent.clone())
        .with(cycle::P50_EDM_COST, FieldValue::Decimal(cost))
        .with(cycle::P50_MOD, FieldValue::Decimal(250.0))
        .with(cycle::DECOMMISSIONING_YEAR, FieldValue::OptionSet(7))
}

fn tracker_text(store: &MemoryStore, id: RecordId) -> String {
    store
        .get(cycle::ENTITY, id)
        .and_then(|record| record.text(cycle::TRACKER))
        .unwrap_or_default()
        .to_string()
}

fn submit_create(store: &mut MemoryStore, target: Record, sink: &MemorySink) -> RecordId {
    let id = target.id;
    Dispatcher::with_all_handlers()
        .submit(Message::Create, target, store, sink)
        .unwrap();
    id
}

// ============ Change tracking ============

#[test]
fn first_cycle_is_reported() {
    let mut store = MemoryStore::new();
    let sink = MemorySink::new();
    let asset_ref = parent(&mut store, Some(3));

    let id = submit_create(&mut store, new_cycle(&asset_ref, 1000.0), &sink);

    assert_eq!(tracker_text(&store, id), "First cycle for this asset.");
    assert!(sink.contains("TRACKED: First cycle for this asset."));
}

#[test]
fn changes_are_compared_with_most_recent_cycle() {
    let mut store = MemoryStore::new();
    let asset_ref = parent(&mut store, Some(3));
    previous_cycle(&mut store, &asset_ref, 2023, 500.0);
    previous_cycle(&mut store, &asset_ref, 2024, 1_200_000.0);

    let id = submit_create(&mut store, new_cycle(&asset_ref, 1_350_000.4), &MemorySink::new());

    assert_eq!(
        tracker_text(&store, id),
        "Change detected: P50 EDM Cost (1,200,000 to 1,350,000)."
    );
}

#[test]
fn identical_figures_report_no_change() {
    let mut store = MemoryStore::new();
    let asset_ref = parent(&mut store, Some(3));
    previous_cycle(&mut store, &asset_ref, 2024, 900.0);

    let id = submit_create(&mut store, new_cycle(&asset_ref, 900.0), &MemorySink::new());

    assert_eq!(tracker_text(&store, id), "No change from previous cycle.");
}

#[test]
fn cycles_of_other_assets_are_ignored() {
    let mut store = MemoryStore::new();
    let asset_ref = parent(&mut store, Some(3));
    let other = parent(&mut store, Some(3));
    previous_cycle(&mut store, &other, 2024, 10.0);

    let id = submit_create(&mut store, new_cycle(&asset_ref, 900.0), &MemorySink::new());

    assert_eq!(tracker_text(&store, id), "First cycle for this asset.");
}

#[test]
fn update_excludes_the_cycle_itself() {
    let mut store = MemoryStore::new();
    let asset_ref = parent(&mut store, Some(3));
    previous_cycle(&mut store, &asset_ref, 2023, 100.0);
    let current = previous_cycle(&mut store, &asset_ref, 2024, 100.0);

    let change = Record::new(cycle::ENTITY, current)
        .with(cycle::ASSET, asset_ref.clone())
        .with(cycle::P50_EDM_COST, FieldValue::Decimal(150.0))
        .with(cycle::DECOMMISSIONING_YEAR, FieldValue::Null);
    Dispatcher::with_all_handlers()
        .submit(Message::Update, change, &mut store, &MemorySink::new())
        .unwrap();

    assert_eq!(
        tracker_text(&store, current),
        "Change detected: P50 EDM Cost (100 to 150), P50 MOD (250 to —), Decomm Year (7 to )."
    );
}

#[test]
fn blocked_readiness_states_stop_tracking() {
    let cases = [
        (Some(1), "Asset is Ready For Abandonment – changes not tracked.", Some("BLOCKED: Ready For Abandonment")),
        (Some(2), "Asset is Abandoned – changes not tracked.", Some("BLOCKED: Abandoned")),
        (None, "Readiness status unknown – changes not tracked.", None),
        (Some(9), "Readiness status unknown – changes not tracked.", None),
    ];

    for (readiness, expected, trace) in cases {
        let mut store = MemoryStore::new();
        let sink = MemorySink::new();
        let asset_ref = parent(&mut store, readiness);
        previous_cycle(&mut store, &asset_ref, 2024, 1.0);

        let id = submit_create(&mut store, new_cycle(&asset_ref, 2.0), &sink);

        assert_eq!(tracker_text(&store, id), expected, "readiness {readiness:?}");
        if let Some(trace) = trace {
            assert!(sink.contains(trace));
        }
    }
}

#[test]
fn cycle_without_asset_is_skipped_by_both_handlers() {
    let mut store = MemoryStore::new();
    let target = Record::new(cycle::ENTITY, RecordId::new()).with(cycle::P50_MOD, FieldValue::Decimal(1.0));
    let id = target.id;

    let report = Dispatcher::with_all_handlers()
        .submit(Message::Create, target, &mut store, &MemorySink::new())
        .unwrap();

    assert!(report.was_skipped(ChangeTracker::NAME));
    assert!(report.was_skipped(AssetTypeSync::NAME));
    assert!(!store.get(cycle::ENTITY, id).unwrap().contains(cycle::TRACKER));
}

#[test]
fn missing_parent_aborts_the_event() {
    let mut store = MemoryStore::new();
    let sink = MemorySink::new();
    let ghost = EntityRef::new(asset::ENTITY, RecordId::new());

    let err = Dispatcher::with_all_handlers()
        .submit(Message::Create, new_cycle(&ghost, 1.0), &mut store, &sink)
        .unwrap_err();

    assert_eq!(err.handler, ChangeTracker::NAME);
    assert!(matches!(err.source, RuleError::UpstreamReadFailed { .. }));
    assert!(sink.contains("ERROR: change_tracker"));
}

// ============ Asset type sync ============

#[test]
fn cycle_asset_type_follows_parent() {
    let mut store = MemoryStore::new();
    let sink = MemorySink::new();
    let asset_ref = parent(&mut store, Some(3));

    let target = new_cycle(&asset_ref, 1.0);
    let id = target.id;
    let report = Dispatcher::with_all_handlers()
        .submit(Message::Create, target, &mut store, &sink)
        .unwrap();

    assert!(matches!(
        report.outcome_of(AssetTypeSync::NAME),
        Some(HandlerOutcome::RecordUpdated { .. })
    ));
    assert_eq!(
        store.get(cycle::ENTITY, id).unwrap().option_value(cycle::ASSET_TYPE),
        Some(5)
    );
    assert!(sink.contains("Parent: AssetType=2, ServiceType=1"));
    assert!(sink.contains("Set rel_assettype = 5"));
}

#[test]
fn every_parent_classification_maps_to_a_cycle_type() {
    let cases = [
        (Some(1), None, 0),
        (Some(2), None, 1),
        (Some(3), None, 2),
        (Some(4), None, 3),
        (Some(1), Some(0), 4),
        (None, Some(1), 5),
        (Some(3), Some(2), 6),
    ];

    for (asset_type, service_type, expected) in cases {
        let mut store = MemoryStore::new();
        let mut record = Record::new(asset::ENTITY, RecordId::new());
        if let Some(value) = asset_type {
            record.set(asset::ASSET_TYPE, FieldValue::OptionSet(value));
        }
        if let Some(value) = service_type {
            record.set(asset::SERVICE_TYPE, FieldValue::OptionSet(value));
        }
        let asset_ref = EntityRef::new(asset::ENTITY, record.id);
        store.insert(record);

        let target = Record::new(cycle::ENTITY, RecordId::new()).with(cycle::ASSET, asset_ref);
        let id = target.id;
        Dispatcher::new()
            .with_handler(AssetTypeSync)
            .submit(Message::Create, target, &mut store, &MemorySink::new())
            .unwrap();

        assert_eq!(
            store.get(cycle::ENTITY, id).unwrap().option_value(cycle::ASSET_TYPE),
            Some(expected),
            "asset {asset_type:?} service {service_type:?}"
        );
    }
}
