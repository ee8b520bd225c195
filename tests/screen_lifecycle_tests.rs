//! Screen lifecycle tests
//!
//! A screen starts loading, applies its outcome only on the main context,
//! ignores outcomes that arrive after disposal or a newer load, and can be
//! retried from an error.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{bridge_over, tankfuel_session, RecordingNavigator, Script, ScriptedChannel};
use serde_json::json;
use tankfuel_auto::bridge::{BridgeConfig, FallbackPolicy};
use tankfuel_auto::engine::MethodReply;
use tankfuel_auto::host::{QueuedHost, MAPS_PACKAGE};
use tankfuel_auto::screen::{
    Action, Completion, Loader, Route, ScreenController, ScreenEvent, ScreenId, ScreenState,
};
use tankfuel_auto::AppVariant;

/// Loader that keeps every completion for the test to finish.
#[derive(Default)]
struct HeldLoader {
    held: Mutex<Vec<Completion<u32>>>,
}

impl HeldLoader {
    fn take(&self) -> Completion<u32> {
        self.held.lock().unwrap().remove(0)
    }
}

impl Loader<u32> for HeldLoader {
    fn load(&self, completion: Completion<u32>) {
        self.held.lock().unwrap().push(completion);
    }
}

fn controller() -> (ScreenController<u32>, Arc<HeldLoader>, Arc<QueuedHost>) {
    let host = Arc::new(QueuedHost::new());
    let loader = Arc::new(HeldLoader::default());
    let controller = ScreenController::new(ScreenId(7), host.clone(), loader.clone());
    (controller, loader, host)
}

#[test]
fn outcome_applies_only_on_the_main_context() {
    let (controller, loader, host) = controller();
    controller.start();
    assert!(controller.state().is_loading());

    loader.take().succeed(42);
    assert!(controller.state().is_loading());
    assert_eq!(host.pending_tasks(), 1);

    assert_eq!(host.run_pending(), 1);
    assert_eq!(controller.state(), ScreenState::Ready(42));
    assert_eq!(host.take_invalidations(), vec![ScreenId(7)]);
}

#[test]
fn outcome_after_dispose_is_ignored() {
    let (controller, loader, host) = controller();
    controller.start();
    let completion = loader.take();

    controller.dispose();
    assert!(!completion.is_active());
    completion.succeed(1);
    host.run_pending();

    assert!(controller.state().is_loading());
    assert!(host.take_invalidations().is_empty());
}

#[test]
fn disposed_controller_does_not_load_again() {
    let (controller, loader, _host) = controller();
    controller.dispose();
    controller.start();
    assert!(loader.held.lock().unwrap().is_empty());
    assert!(controller.is_disposed());
}

#[test]
fn newer_load_makes_older_outcome_stale() {
    let (controller, loader, host) = controller();
    controller.start();
    controller.start();
    let first = loader.take();
    let second = loader.take();

    first.succeed(1);
    second.succeed(2);
    host.run_pending();

    assert_eq!(controller.state(), ScreenState::Ready(2));
    assert_eq!(host.take_invalidations(), vec![ScreenId(7)]);
}

#[test]
fn retry_restarts_from_error_and_requests_render() {
    let (controller, loader, host) = controller();
    controller.start();
    loader.take().fail("Remote error DB: locked");
    host.run_pending();
    assert_eq!(controller.state().error(), Some("Remote error DB: locked"));
    host.take_invalidations();

    assert!(controller.retry());
    assert!(controller.state().is_loading());
    assert_eq!(host.take_invalidations(), vec![ScreenId(7)]);

    loader.take().succeed(5);
    host.run_pending();
    assert_eq!(controller.state().payload(), Some(&5));
}

#[test]
fn retry_is_ignored_while_loading_or_ready() {
    let (controller, loader, host) = controller();
    controller.start();
    assert!(!controller.retry());

    loader.take().succeed(3);
    host.run_pending();
    assert!(!controller.retry());
    assert!(loader.held.lock().unwrap().is_empty());
}

#[test]
fn blank_failure_reason_reads_unknown_error() {
    let (controller, loader, host) = controller();
    controller.start();
    loader.take().fail("");
    host.run_pending();
    assert_eq!(controller.state().error(), Some("Unknown error"));
}

#[test]
fn redirect_asks_the_host_to_push() {
    let (controller, loader, host) = controller();
    controller.start();
    loader.take().redirect(Route::NoVehicles);
    host.run_pending();

    assert_eq!(controller.state(), ScreenState::Redirected);
    assert!(controller.state().can_retry());
    assert_eq!(host.take_actions(), vec![Action::Push(Route::NoVehicles)]);
}

#[test]
fn outcome_from_a_worker_thread_waits_for_the_main_context() {
    let (controller, loader, host) = controller();
    controller.start();
    let completion = loader.take();

    std::thread::spawn(move || completion.succeed(9))
        .join()
        .unwrap();
    assert!(controller.state().is_loading());

    assert_eq!(host.wait_and_run(Duration::from_secs(1)), 1);
    assert_eq!(controller.state(), ScreenState::Ready(9));
}

#[test]
fn stations_screen_shows_loading_then_rows() {
    let channel = ScriptedChannel::new()
        .with("getNearestStations", Script::Defer)
        .shared();
    let (mut session, _) = tankfuel_session(&channel);

    session.dispatch(ScreenEvent::Select(0));
    assert_eq!(session.depth(), 2);
    let loading = session.render().unwrap();
    assert_eq!(loading.title(), "Nearby stations");
    assert_eq!(loading.message_text(), Some("Loading stations..."));

    let reply = MethodReply::Success(json!([
        {"id": "1", "name": "Eni", "address": "Via X", "self": 1.8, "servito": 1.9, "lat": 45.0, "lon": 9.0}
    ]));
    channel.answer_from_thread("getNearestStations", reply).join().unwrap();
    session.settle(Duration::from_millis(50));

    let ready = session.render().unwrap();
    assert_eq!(ready.rows().len(), 1);
    assert_eq!(ready.rows()[0].title, "Eni");
    assert_eq!(
        ready.rows()[0].texts,
        vec!["Self: 1,80 € - Attended: 1,90 € Via X".to_string()]
    );
}

#[test]
fn leaving_a_loading_screen_drops_its_late_result() {
    let channel = ScriptedChannel::new()
        .with("getNearestStations", Script::Defer)
        .shared();
    let (mut session, _) = tankfuel_session(&channel);

    session.dispatch(ScreenEvent::Select(0));
    let stations = session.top_id().unwrap();
    session.dispatch(ScreenEvent::Back);
    assert_eq!(session.depth(), 1);
    session.take_invalidations();

    assert!(channel.answer("getNearestStations", MethodReply::Success(json!([]))));
    session.settle(Duration::from_millis(20));

    assert_eq!(session.depth(), 1);
    assert!(!session.take_invalidations().contains(&stations));
}

#[test]
fn error_screen_retries_into_data() {
    let strict = FallbackPolicy {
        substitute_on_empty: false,
        substitute_on_error: false,
        fail_without_channel: true,
    };
    let config = BridgeConfig {
        average_prices: strict,
        ..BridgeConfig::default()
    };
    let channel = ScriptedChannel::new()
        .with(
            "getAveragePrices",
            Script::Reply(MethodReply::error("DB", Some("locked"))),
        )
        .shared();
    let (mut session, _) = common::session(AppVariant::TankFuel, bridge_over(&channel, config));

    session.dispatch(ScreenEvent::Select(1));
    let error = session.render().unwrap();
    assert_eq!(error.title(), "Error");
    assert_eq!(error.message_text(), Some("An error occurred: Remote error DB: locked"));
    assert_eq!(error.actions()[0].event, ScreenEvent::Retry);

    channel.set(
        "getAveragePrices",
        Script::Reply(MethodReply::Success(json!([
            {"fuelType": "Benzina", "price": 1.812, "date": "2024-03-04", "region": "Lombardia"}
        ]))),
    );
    session.dispatch(ScreenEvent::Retry);

    let prices = session.render().unwrap();
    assert_eq!(prices.title(), "Average prices - Lombardia");
    assert_eq!(prices.rows()[0].texts[0], "1,81 € per liter");
    assert_eq!(channel.calls_to("getAveragePrices"), 2);
}

#[test]
fn missing_channel_fails_prices_screen() {
    let (mut session, _) = common::session(
        AppVariant::TankFuel,
        tankfuel_auto::CommandBridge::with_channel(None, BridgeConfig::default()),
    );

    session.dispatch(ScreenEvent::Select(1));
    assert_eq!(
        session.render().unwrap().message_text(),
        Some("An error occurred: Method channel not initialized")
    );
}

#[test]
fn station_detail_launches_navigation() {
    let channel = ScriptedChannel::new()
        .replying(
            "getNearestStations",
            json!([{"id": "1", "name": "Eni", "address": "Via X", "lat": 45.48, "lon": 9.19}]),
        )
        .shared();
    let (mut session, navigator) = tankfuel_session(&channel);

    session.dispatch(ScreenEvent::Select(0));
    session.dispatch(ScreenEvent::Select(0));
    let detail = session.render().unwrap();
    assert_eq!(detail.title(), "Station details");
    assert_eq!(detail.rows()[0].texts, vec!["Eni".to_string()]);

    session.dispatch(ScreenEvent::Navigate);
    let launched = navigator.launched.lock().unwrap().clone();
    assert_eq!(launched.len(), 1);
    assert_eq!(launched[0].uri, "google.navigation:q=45.48,9.19");
    assert_eq!(launched[0].package.as_deref(), Some(MAPS_PACKAGE));
    assert_eq!(session.depth(), 3);
}

#[test]
fn failed_navigation_launch_leaves_the_detail_pane_in_place() {
    let channel = ScriptedChannel::new()
        .replying(
            "getNearestStations",
            json!([{"id": "1", "name": "Eni", "address": "Via X", "lat": 45.48, "lon": 9.19}]),
        )
        .shared();
    let (mut session, navigator) = common::session_with(
        AppVariant::TankFuel,
        bridge_over(&channel, BridgeConfig::default()),
        RecordingNavigator::failing(),
    );

    session.dispatch(ScreenEvent::Select(0));
    session.dispatch(ScreenEvent::Select(0));
    let before = session.render().unwrap();
    let depth = session.depth();

    session.dispatch(ScreenEvent::Navigate);
    assert_eq!(navigator.launched.lock().unwrap().len(), 1);
    assert_eq!(session.depth(), depth);
    assert_eq!(session.render().unwrap(), before);

    session.dispatch(ScreenEvent::Back);
    assert_eq!(session.render().unwrap().title(), "Nearby stations");
}

#[test]
fn back_never_pops_the_main_menu() {
    let channel = ScriptedChannel::new().shared();
    let (mut session, _) = tankfuel_session(&channel);

    session.dispatch(ScreenEvent::Back);
    assert_eq!(session.depth(), 1);
    assert_eq!(session.render().unwrap().title(), "TankFuel");
}
