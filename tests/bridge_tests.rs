//! Command bridge tests
//!
//! Every request settles once with decoded records, a fallback dataset or an
//! error, depending on the reply and the operation's policy.

mod common;

use std::io::Write as _;

use common::{bridge_over, Script, ScriptedChannel};
use futures::executor::block_on;
use serde_json::json;
use tankfuel_auto::bridge::fallback::{self, NATIONAL_AVERAGE, NATIONAL_AVERAGE_FALLBACK};
use tankfuel_auto::bridge::{BridgeConfig, CommandBridge, FallbackCause, FallbackPolicy};
use tankfuel_auto::domain::{GasStation, TankFuelError, Vehicle};
use tankfuel_auto::engine::MethodReply;

fn strict() -> BridgeConfig {
    let policy = FallbackPolicy {
        substitute_on_empty: false,
        substitute_on_error: false,
        fail_without_channel: true,
    };
    BridgeConfig {
        average_prices: policy,
        nearest_stations: policy,
        vehicles: policy,
        refuelings: policy,
    }
}

#[test]
fn stations_are_decoded_in_reply_order() {
    let channel = ScriptedChannel::new()
        .replying(
            "getNearestStations",
            json!([
                {"id": "1", "name": "Eni", "address": "Via X", "self": 1.8, "servito": 1.9, "lat": 45.0, "lon": 9.0},
                {"id": "2", "name": "Q8"}
            ]),
        )
        .shared();
    let bridge = bridge_over(&channel, BridgeConfig::default());

    let stations = block_on(bridge.get_nearest_stations()).unwrap();

    assert_eq!(
        stations[0],
        GasStation::new("1", "Eni", "Via X", 1.8, 1.9, 45.0, 9.0)
    );
    assert_eq!(stations[1].name, "Q8");
    assert_eq!(stations[1].self_service_price, 0.0);
    assert_eq!(channel.calls(), vec!["getNearestStations"]);
}

#[test]
fn missing_price_decodes_as_zero() {
    let channel = ScriptedChannel::new()
        .replying("getAveragePrices", json!([{"fuelType": "Diesel"}]))
        .shared();
    let bridge = bridge_over(&channel, BridgeConfig::default());

    let prices = block_on(bridge.get_average_prices()).unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].fuel_type, "Diesel");
    assert_eq!(prices[0].price, 0.0);
}

#[test]
fn empty_stations_reply_is_replaced_by_fallback() {
    let channel = ScriptedChannel::new()
        .replying("getNearestStations", json!([]))
        .shared();
    let bridge = bridge_over(&channel, BridgeConfig::default());

    let stations = block_on(bridge.get_nearest_stations()).unwrap();
    assert_eq!(stations, fallback::stations());
    assert_eq!(stations.len(), 4);
}

#[test]
fn empty_vehicles_reply_stays_empty() {
    let channel = ScriptedChannel::new()
        .replying("getVehicles", json!([]))
        .shared();
    let bridge = bridge_over(&channel, BridgeConfig::default());

    assert!(block_on(bridge.get_vehicles()).unwrap().is_empty());
}

#[test]
fn price_fallbacks_are_labelled_by_cause() {
    let channel = ScriptedChannel::new()
        .replying("getAveragePrices", json!([]))
        .shared();
    let bridge = bridge_over(&channel, BridgeConfig::default());
    let empty = block_on(bridge.get_average_prices()).unwrap();
    assert!(empty.iter().all(|p| p.region == NATIONAL_AVERAGE));

    channel.set(
        "getAveragePrices",
        Script::Reply(MethodReply::error("DB", Some("locked"))),
    );
    let failed = block_on(bridge.get_average_prices()).unwrap();
    assert!(failed.iter().all(|p| p.region == NATIONAL_AVERAGE_FALLBACK));
    assert_eq!(failed, fallback::average_prices(FallbackCause::Failure));
}

#[test]
fn not_implemented_refuelings_use_fallback() {
    let channel = ScriptedChannel::new().shared();
    let bridge = bridge_over(&channel, BridgeConfig::default());

    let refuelings = block_on(bridge.get_refuelings()).unwrap();
    let ids: Vec<_> = refuelings.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[test]
fn strict_policy_surfaces_remote_errors() {
    let channel = ScriptedChannel::new()
        .with(
            "getVehicles",
            Script::Reply(MethodReply::error("DB", Some("locked"))),
        )
        .shared();
    let bridge = bridge_over(&channel, strict());

    let err = block_on(bridge.get_vehicles()).unwrap_err();
    assert_eq!(err.to_string(), "Remote error DB: locked");
}

#[test]
fn without_channel_prices_fail_and_others_fall_back() {
    let bridge = CommandBridge::with_channel(None, BridgeConfig::default());
    assert!(!bridge.has_channel());

    let err = block_on(bridge.get_average_prices()).unwrap_err();
    assert!(matches!(err, TankFuelError::ChannelUnavailable));
    assert_eq!(err.to_string(), "Method channel not initialized");

    assert_eq!(
        block_on(bridge.get_nearest_stations()).unwrap(),
        fallback::stations()
    );
    assert_eq!(block_on(bridge.get_vehicles()).unwrap(), fallback::vehicles());
}

#[test]
fn without_channel_settles_synchronously() {
    let bridge = CommandBridge::with_channel(None, BridgeConfig::default());
    let mut promise = bridge.get_nearest_stations();
    assert!(promise.try_take().unwrap().is_ok());
}

#[test]
fn dropped_reply_settles_through_the_error_policy() {
    let channel = ScriptedChannel::new()
        .with("getVehicles", Script::Drop)
        .shared();

    let lenient = bridge_over(&channel, BridgeConfig::default());
    assert_eq!(block_on(lenient.get_vehicles()).unwrap(), fallback::vehicles());

    let strict = bridge_over(&channel, strict());
    let err = block_on(strict.get_vehicles()).unwrap_err();
    assert!(matches!(err, TankFuelError::ReplyDropped(op) if op == "getVehicles"));
}

#[test]
fn send_failure_settles_through_the_error_policy() {
    let channel = ScriptedChannel::new()
        .with("getNearestStations", Script::SendError)
        .shared();

    let lenient = bridge_over(&channel, BridgeConfig::default());
    assert_eq!(
        block_on(lenient.get_nearest_stations()).unwrap(),
        fallback::stations()
    );

    let strict = bridge_over(&channel, strict());
    let err = block_on(strict.get_nearest_stations()).unwrap_err();
    assert!(matches!(err, TankFuelError::Engine(_)));
}

#[test]
fn reply_from_another_thread_resolves_the_promise() {
    let channel = ScriptedChannel::new()
        .with("getVehicles", Script::Defer)
        .shared();
    let bridge = bridge_over(&channel, BridgeConfig::default());

    let mut promise = bridge.get_vehicles();
    assert!(promise.try_take().is_none());
    assert_eq!(channel.deferred(), 1);

    let reply = MethodReply::Success(json!([{"id": "v-9", "name": "Van"}]));
    channel.answer_from_thread("getVehicles", reply).join().unwrap();

    let vehicles: Vec<Vehicle> = block_on(promise).unwrap();
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0].name, "Van");
}

#[test]
fn unanswered_request_stays_pending() {
    let channel = ScriptedChannel::new()
        .with("getRefuelings", Script::Never)
        .shared();
    let bridge = bridge_over(&channel, BridgeConfig::default());

    let mut promise = bridge.get_refuelings();
    assert!(promise.try_take().is_none());
    assert!(promise.try_take().is_none());
}

#[test]
fn non_list_payload_recovers_per_policy() {
    let channel = ScriptedChannel::new()
        .replying("getVehicles", json!({"id": "1"}))
        .shared();

    let lenient = bridge_over(&channel, BridgeConfig::default());
    assert_eq!(block_on(lenient.get_vehicles()).unwrap(), fallback::vehicles());

    let strict = bridge_over(&channel, strict());
    assert!(matches!(
        block_on(strict.get_vehicles()),
        Err(TankFuelError::Decode(_))
    ));
}

#[test]
fn request_callback_runs_once_per_request() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let channel = ScriptedChannel::new()
        .replying("getNearestStations", json!([{"id": "1"}]))
        .shared();
    let bridge = bridge_over(&channel, BridgeConfig::default());
    let settled = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let settled = Arc::clone(&settled);
        bridge.request::<GasStation, _>(move |result| {
            assert_eq!(result.unwrap().len(), 1);
            settled.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert_eq!(settled.load(Ordering::SeqCst), 3);
    assert_eq!(channel.calls_to("getNearestStations"), 3);
}

#[test]
fn policy_file_overrides_only_named_flags() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[vehicles]\nsubstitute_on_empty = true").unwrap();

    let config = BridgeConfig::from_file(file.path()).unwrap();
    assert!(config.vehicles.substitute_on_empty);
    assert!(config.vehicles.substitute_on_error);
    assert_eq!(config.average_prices, BridgeConfig::default().average_prices);

    let channel = ScriptedChannel::new()
        .replying("getVehicles", json!([]))
        .shared();
    let bridge = bridge_over(&channel, config);
    assert_eq!(block_on(bridge.get_vehicles()).unwrap(), fallback::vehicles());
}
