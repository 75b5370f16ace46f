//! Detail screen entry gate.

use std::sync::Arc;

use deptgate::app::AppModel;
use deptgate::domain::IdentityRecord;
use deptgate::gate::GateState;
use deptgate::identity_store::{IdentityStore, MemoryIdentityStore};
use deptgate::item_source::StaticItemSource;
use deptgate::navigation::{IDENTITY_REQUIRED_MESSAGE, NavigationAdvisory, Route, Transition};
use deptgate_core::event::{Event, KeyCode};
use deptgate_runtime::ProgramSimulator;

fn start_on_detail(store: Arc<MemoryIdentityStore>, source: Arc<StaticItemSource>) -> ProgramSimulator<AppModel> {
    let model = AppModel::new(store, source).with_initial_route(Route::Detail);
    let mut sim = ProgramSimulator::new(model);
    sim.init();
    sim
}

#[test]
fn missing_identity_redirects_with_advisory() {
    let store = Arc::new(MemoryIdentityStore::new());
    let source = Arc::new(StaticItemSource::ok(vec![]));
    let sim = start_on_detail(store, source.clone());

    let transitions = sim.model().transitions();
    assert_eq!(transitions.len(), 2);
    assert_eq!(transitions[0], Transition::to(Route::Detail));
    assert_eq!(
        transitions[1],
        Transition::with_advisory(
            Route::IdentityCapture,
            NavigationAdvisory::new(IDENTITY_REQUIRED_MESSAGE)
        )
    );
    assert_eq!(sim.model().route(), Some(Route::IdentityCapture));
    assert_eq!(source.calls(), 0);
}

#[test]
fn advisory_shows_once_then_clears() {
    let store = Arc::new(MemoryIdentityStore::new());
    let mut sim = start_on_detail(store, Arc::new(StaticItemSource::ok(vec![])));

    let first = sim.capture_frame(80, 24).to_text();
    assert!(first.contains(IDENTITY_REQUIRED_MESSAGE));
    assert!(!first.contains("Posts Data"));

    sim.inject_event(Event::key(KeyCode::Tab));
    let later = sim.capture_frame(80, 24).to_text();
    assert!(!later.contains(IDENTITY_REQUIRED_MESSAGE));
}

#[test]
fn malformed_record_counts_as_absent() {
    let store = Arc::new(MemoryIdentityStore::new());
    store.put_raw(r#"{"name":"Ada","phone":"","email":"a@b"}"#);
    let sim = start_on_detail(store, Arc::new(StaticItemSource::ok(vec![])));
    assert_eq!(sim.model().route(), Some(Route::IdentityCapture));
}

#[test]
fn present_identity_renders_detail_without_navigation() {
    let record = IdentityRecord::new("Ada", "555", "ada@example.com").expect("valid");
    let store = Arc::new(MemoryIdentityStore::with_record(&record));
    let source = Arc::new(StaticItemSource::ok(vec![]));
    let mut sim = start_on_detail(store, source.clone());

    assert_eq!(sim.model().transitions(), &[Transition::to(Route::Detail)]);
    let detail = sim.model().detail_screen().expect("detail mounted");
    assert_eq!(detail.gate(), GateState::Authorized);
    assert_eq!(source.calls(), 1);
    let frame = sim.capture_frame(80, 24).to_text();
    assert!(frame.contains("Posts Data"));
    assert!(frame.contains("No rows"));
}

#[test]
fn gate_does_not_recheck_after_mount() {
    let record = IdentityRecord::new("Ada", "555", "ada@example.com").expect("valid");
    let store = Arc::new(MemoryIdentityStore::with_record(&record));
    let mut sim = start_on_detail(store.clone(), Arc::new(StaticItemSource::ok(vec![])));

    store.put_raw("not json");
    assert!(store.get().is_none());
    sim.inject_event(Event::key(KeyCode::Right));
    assert_eq!(sim.model().route(), Some(Route::Detail));
    assert!(sim.capture_frame(80, 24).to_text().contains("Posts Data"));
}
