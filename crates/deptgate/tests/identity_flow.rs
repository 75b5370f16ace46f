//! End-to-end identity capture flows driven through the simulator.

use std::sync::Arc;

use deptgate::app::AppModel;
use deptgate::domain::{IdentityField, IdentityRecord, RemoteItem};
use deptgate::identity_store::{FileIdentityStore, IdentityStore, MemoryIdentityStore};
use deptgate::item_source::StaticItemSource;
use deptgate::navigation::{Route, Transition};
use deptgate::screens::identity_capture::FormStatus;
use deptgate_core::event::{Event, KeyCode};
use deptgate_runtime::ProgramSimulator;

fn one_item() -> Vec<RemoteItem> {
    vec![RemoteItem {
        id: 1,
        title: "a".into(),
        body: "b".into(),
        owner_id: 9,
    }]
}

fn type_text(sim: &mut ProgramSimulator<AppModel>, text: &str) {
    let events: Vec<Event> = text.chars().map(|c| Event::key(KeyCode::Char(c))).collect();
    sim.inject_events(&events);
}

fn fill_form(sim: &mut ProgramSimulator<AppModel>, name: &str, phone: &str, email: &str) {
    type_text(sim, name);
    sim.inject_event(Event::key(KeyCode::Tab));
    type_text(sim, phone);
    sim.inject_event(Event::key(KeyCode::Tab));
    type_text(sim, email);
}

#[test]
fn complete_submit_writes_once_and_opens_detail() {
    let store = Arc::new(MemoryIdentityStore::new());
    let source = Arc::new(StaticItemSource::ok(one_item()));
    let mut sim = ProgramSimulator::new(AppModel::new(store.clone(), source.clone()));
    sim.init();
    assert_eq!(sim.model().route(), Some(Route::IdentityCapture));

    fill_form(&mut sim, "Ada", "555-0100", "ada@example.com");
    sim.inject_event(Event::key(KeyCode::Enter));

    assert_eq!(store.write_count(), 1);
    assert_eq!(
        store.get(),
        IdentityRecord::new("Ada", "555-0100", "ada@example.com").ok()
    );
    assert_eq!(sim.model().route(), Some(Route::Detail));
    assert_eq!(
        sim.model().transitions().last(),
        Some(&Transition::to(Route::Detail))
    );

    // The fetch ran once and its row is on screen.
    assert_eq!(source.calls(), 1);
    let detail = sim.model().detail_screen().expect("detail mounted");
    assert_eq!(detail.table().items(), one_item().as_slice());
    let frame = sim.capture_frame(80, 24).to_text();
    assert!(frame.contains("Posts Data"));
    assert!(frame.contains("Departments"));
    assert!(frame.contains("Page 1/1"));
}

#[test]
fn empty_field_blocks_write_and_navigation() {
    let store = Arc::new(MemoryIdentityStore::new());
    let source = Arc::new(StaticItemSource::ok(one_item()));
    let mut sim = ProgramSimulator::new(AppModel::new(store.clone(), source.clone()));
    sim.init();

    fill_form(&mut sim, "Ada", "", "ada@example.com");
    sim.inject_event(Event::key(KeyCode::Enter));

    assert_eq!(store.write_count(), 0);
    assert_eq!(sim.model().route(), Some(Route::IdentityCapture));
    assert_eq!(sim.model().transitions().len(), 1);
    assert_eq!(source.calls(), 0);
    let screen = sim.model().identity_screen().expect("still on the form");
    assert_eq!(screen.missing(), &[IdentityField::Phone]);
    assert!(sim.capture_frame(80, 24).to_text().contains("Phone number *"));
}

#[test]
fn failed_write_stays_on_form() {
    let store = Arc::new(MemoryIdentityStore::new());
    store.set_fail_writes(true);
    let source = Arc::new(StaticItemSource::ok(one_item()));
    let mut sim = ProgramSimulator::new(AppModel::new(store.clone(), source));
    sim.init();

    fill_form(&mut sim, "Ada", "555", "ada@example.com");
    sim.inject_event(Event::key(KeyCode::Enter));

    assert_eq!(sim.model().route(), Some(Route::IdentityCapture));
    let screen = sim.model().identity_screen().expect("still on the form");
    assert!(matches!(screen.status(), Some(FormStatus::SaveFailed(_))));
    assert_eq!(screen.value(IdentityField::Email), "ada@example.com");
    assert!(
        sim.capture_frame(80, 24)
            .to_text()
            .contains("could not be saved")
    );

    store.set_fail_writes(false);
    sim.inject_event(Event::key(KeyCode::Enter));
    assert_eq!(store.write_count(), 1);
    assert_eq!(sim.model().route(), Some(Route::Detail));
}

#[test]
fn form_is_prefilled_and_resubmit_overwrites() {
    let record = IdentityRecord::new("Ada", "555", "ada@example.com").expect("valid");
    let store = Arc::new(MemoryIdentityStore::with_record(&record));
    let mut sim = ProgramSimulator::new(AppModel::new(
        store.clone(),
        Arc::new(StaticItemSource::ok(vec![])),
    ));
    sim.init();
    let screen = sim.model().identity_screen().expect("form");
    assert_eq!(screen.value(IdentityField::Name), "Ada");

    // Cursor sits at the end of the prefilled name.
    sim.inject_event(Event::key(KeyCode::Backspace));
    type_text(&mut sim, "m");
    sim.inject_event(Event::key(KeyCode::Enter));
    assert_eq!(
        store.get(),
        IdentityRecord::new("Adm", "555", "ada@example.com").ok()
    );
}

#[test]
fn file_store_round_trip_through_app() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("deptgate").join("store.json");
    let store = Arc::new(FileIdentityStore::new(&path));
    let mut sim = ProgramSimulator::new(AppModel::new(
        store,
        Arc::new(StaticItemSource::ok(one_item())),
    ));
    sim.init();
    fill_form(&mut sim, "Ada", "555", "ada@example.com");
    sim.inject_event(Event::key(KeyCode::Enter));
    assert_eq!(sim.model().route(), Some(Route::Detail));

    let reopened = FileIdentityStore::new(&path);
    assert_eq!(
        reopened.get(),
        IdentityRecord::new("Ada", "555", "ada@example.com").ok()
    );
}

#[test]
fn escape_and_ctrl_c_quit() {
    let store = Arc::new(MemoryIdentityStore::new());
    let mut sim = ProgramSimulator::new(AppModel::new(
        store.clone(),
        Arc::new(StaticItemSource::ok(vec![])),
    ));
    sim.init();
    sim.inject_event(Event::key(KeyCode::Escape));
    assert!(!sim.is_running());

    let mut sim = ProgramSimulator::new(AppModel::new(
        store,
        Arc::new(StaticItemSource::ok(vec![])),
    ));
    sim.init();
    sim.inject_event(Event::Key(
        deptgate_core::event::KeyEvent::new(KeyCode::Char('c'))
            .with_modifiers(deptgate_core::event::Modifiers::CTRL),
    ));
    assert!(!sim.is_running());
}
