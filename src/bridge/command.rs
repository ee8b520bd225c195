//! The command bridge.
//!
//! [`CommandBridge`] turns one named engine operation into one settled
//! result. It owns the decision of when real data is replaced with local
//! fallback data, driven by the [`BridgeConfig`].
//!
//! # Settlement
//!
//! Every request settles exactly once, except when the engine keeps the reply
//! callback and never calls it. Settlement happens on the thread that
//! delivered the reply, or synchronously on the caller's thread when there is
//! no channel or the send itself fails.
//!
//! | situation                        | result                                   |
//! |----------------------------------|------------------------------------------|
//! | no channel                       | `ChannelUnavailable` or failure fallback |
//! | success, records                 | the decoded records                      |
//! | success, empty                   | empty list or empty-reply fallback       |
//! | remote error / not implemented   | failure fallback or the error            |
//! | payload not a list               | failure fallback or the error            |
//! | send failed / reply dropped      | failure fallback or the error            |

use super::decode::{decode_reply, RemoteEntity};
use super::fallback::FallbackCause;
use super::policy::{BridgeConfig, FallbackPolicy};
use super::promise::{Promise, RemoteResult, Settle};
use crate::domain::{FuelPrice, GasStation, Refueling, TankFuelError, Vehicle};
use crate::engine::{EngineRegistry, MethodReply, ProcessContext, ReplyCallback, SharedChannel};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

struct BridgeInner {
    channel: Option<SharedChannel>,
    config: BridgeConfig,
}

/// Client side of the engine's method channel.
///
/// Cheap to clone; clones share the channel and configuration.
#[derive(Clone)]
pub struct CommandBridge {
    inner: Arc<BridgeInner>,
}

impl CommandBridge {
    /// Acquires the shared channel from `registry`.
    ///
    /// When the registry cannot provide a channel, the bridge is still built
    /// and every request takes the "no channel" path.
    #[must_use]
    pub fn connect(registry: &EngineRegistry, context: &ProcessContext, config: BridgeConfig) -> Self {
        let channel = registry.acquire_channel(context);
        if channel.is_none() {
            tracing::warn!(
                engine_id = %registry.engine_id(),
                "bridge running without a method channel"
            );
        }
        Self::with_channel(channel, config)
    }

    #[must_use]
    pub fn with_channel(channel: Option<SharedChannel>, config: BridgeConfig) -> Self {
        Self {
            inner: Arc::new(BridgeInner { channel, config }),
        }
    }

    #[must_use]
    pub fn has_channel(&self) -> bool {
        self.inner.channel.is_some()
    }

    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// Sends the operation of `T` and calls `on_settled` with its result.
    pub fn request<T, F>(&self, on_settled: F)
    where
        T: RemoteEntity,
        F: FnOnce(RemoteResult<T>) + Send + 'static,
    {
        let operation = T::OPERATION;
        let policy = self.inner.config.policy(operation);
        let span = tracing::debug_span!("bridge_request", operation = %operation);
        let _guard = span.entered();

        let Some(channel) = &self.inner.channel else {
            on_settled(without_channel::<T>(policy));
            return;
        };

        let settle = Settle::new(on_settled);
        let phase = Arc::new(Mutex::new(SendPhase::Sending));
        let reply = ReplyGuard::<T> {
            settle: Some(settle.clone()),
            phase: Arc::clone(&phase),
            policy,
            _entity: PhantomData,
        };
        let callback: ReplyCallback = Box::new(move |answer| reply.answer(answer));

        tracing::debug!(channel = %channel.name(), "invoking remote method");
        let sent = channel.invoke_method(operation.method_name(), None, callback);
        let before = std::mem::replace(
            &mut *phase.lock().unwrap_or_else(PoisonError::into_inner),
            SendPhase::Sent,
        );
        match sent {
            Err(e) => {
                if settle.fire(recover::<T>(policy, e)) {
                    tracing::debug!("request settled after send failure");
                }
            }
            Ok(()) if before == SendPhase::DroppedWhileSending => {
                settle.fire(dropped::<T>(policy));
            }
            Ok(()) => {}
        }
    }

    /// Sends the operation of `T` and returns a promise of its result.
    pub fn invoke<T: RemoteEntity>(&self) -> Promise<T> {
        let (sender, promise) = Promise::channel(T::OPERATION);
        self.request::<T, _>(move |result| {
            let _ = sender.send(result);
        });
        promise
    }

    pub fn get_average_prices(&self) -> Promise<FuelPrice> {
        self.invoke()
    }

    pub fn get_nearest_stations(&self) -> Promise<GasStation> {
        self.invoke()
    }

    pub fn get_vehicles(&self) -> Promise<Vehicle> {
        self.invoke()
    }

    pub fn get_refuelings(&self) -> Promise<Refueling> {
        self.invoke()
    }
}

impl std::fmt::Debug for CommandBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBridge")
            .field("channel", &self.inner.channel.as_ref().map(|c| c.name().to_string()))
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Where the request stands relative to `invoke_method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendPhase {
    Sending,
    /// The callback was dropped before `invoke_method` returned.
    DroppedWhileSending,
    Sent,
}

/// Reply callback state. Settles through the error policy when dropped
/// without an answer once the send has returned. A drop during the send is
/// settled by [`CommandBridge::request`], which knows whether the send failed.
struct ReplyGuard<T: RemoteEntity> {
    settle: Option<Settle<T>>,
    phase: Arc<Mutex<SendPhase>>,
    policy: FallbackPolicy,
    _entity: PhantomData<fn() -> T>,
}

impl<T: RemoteEntity> ReplyGuard<T> {
    fn answer(mut self, reply: MethodReply) {
        if let Some(settle) = self.settle.take() {
            settle.fire(resolve::<T>(self.policy, reply));
        }
    }
}

impl<T: RemoteEntity> Drop for ReplyGuard<T> {
    fn drop(&mut self) {
        let Some(settle) = self.settle.take() else {
            return;
        };
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *phase == SendPhase::Sending {
            *phase = SendPhase::DroppedWhileSending;
            return;
        }
        drop(phase);
        settle.fire(dropped::<T>(self.policy));
    }
}

fn dropped<T: RemoteEntity>(policy: FallbackPolicy) -> RemoteResult<T> {
    tracing::warn!(operation = %T::OPERATION, "reply callback dropped without an answer");
    recover::<T>(policy, TankFuelError::ReplyDropped(T::OPERATION.to_string()))
}

fn without_channel<T: RemoteEntity>(policy: FallbackPolicy) -> RemoteResult<T> {
    if policy.fail_without_channel {
        tracing::error!(operation = %T::OPERATION, "method channel not initialized");
        Err(TankFuelError::ChannelUnavailable)
    } else {
        tracing::warn!(operation = %T::OPERATION, "no method channel, using fallback data");
        Ok(T::fallback(FallbackCause::Failure))
    }
}

/// Applies the policy to one engine reply.
fn resolve<T: RemoteEntity>(policy: FallbackPolicy, reply: MethodReply) -> RemoteResult<T> {
    match reply {
        MethodReply::Success(payload) => match decode_reply::<T>(&payload) {
            Ok(items) if items.is_empty() && policy.substitute_on_empty => {
                tracing::debug!(operation = %T::OPERATION, "empty reply, using fallback data");
                Ok(T::fallback(FallbackCause::EmptyReply))
            }
            Ok(items) => {
                tracing::debug!(operation = %T::OPERATION, count = items.len(), "reply decoded");
                Ok(items)
            }
            Err(e) => recover::<T>(policy, e),
        },
        MethodReply::Error { code, message, .. } => {
            recover::<T>(policy, TankFuelError::Remote { code, message })
        }
        MethodReply::NotImplemented => recover::<T>(
            policy,
            TankFuelError::NotImplemented(T::OPERATION.method_name().to_string()),
        ),
    }
}

fn recover<T: RemoteEntity>(policy: FallbackPolicy, error: TankFuelError) -> RemoteResult<T> {
    if policy.substitute_on_error {
        tracing::warn!(operation = %T::OPERATION, error = %error, "request failed, using fallback data");
        Ok(T::fallback(FallbackCause::Failure))
    } else {
        tracing::warn!(operation = %T::OPERATION, error = %error, "request failed");
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::fallback;
    use crate::engine::MethodChannel;
    use serde_json::{json, Value};

    /// Channel that drops every callback, then fails the send or not.
    struct DiscardingChannel {
        fail_send: bool,
    }

    impl MethodChannel for DiscardingChannel {
        fn name(&self) -> &str {
            "discarding"
        }

        fn invoke_method(
            &self,
            _method: &str,
            _arguments: Option<Value>,
            reply: ReplyCallback,
        ) -> crate::domain::Result<()> {
            drop(reply);
            if self.fail_send {
                Err(TankFuelError::Engine("worker stopped".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn strict_bridge(fail_send: bool) -> CommandBridge {
        let config = BridgeConfig {
            vehicles: strict(),
            ..BridgeConfig::default()
        };
        CommandBridge::with_channel(Some(Arc::new(DiscardingChannel { fail_send })), config)
    }

    fn settled_vehicles(bridge: &CommandBridge) -> Vec<RemoteResult<Vehicle>> {
        let results = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&results);
        bridge.request::<Vehicle, _>(move |result| sink.lock().unwrap().push(result));
        let mut results = results.lock().unwrap();
        std::mem::take(&mut *results)
    }

    fn strict() -> FallbackPolicy {
        FallbackPolicy {
            substitute_on_empty: false,
            substitute_on_error: false,
            fail_without_channel: true,
        }
    }

    #[test]
    fn not_implemented_surfaces_under_a_strict_policy() {
        let result = resolve::<Vehicle>(strict(), MethodReply::NotImplemented);
        assert!(matches!(result, Err(TankFuelError::NotImplemented(m)) if m == "getVehicles"));
    }

    #[test]
    fn remote_error_keeps_code_and_message() {
        let result = resolve::<Vehicle>(strict(), MethodReply::error("DB", Some("locked")));
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Remote error DB: locked");
    }

    #[test]
    fn empty_prices_use_the_empty_reply_region() {
        let policy = FallbackPolicy::default_for(FuelPrice::OPERATION);
        let prices = resolve::<FuelPrice>(policy, MethodReply::Success(json!([]))).unwrap();
        assert_eq!(prices, fallback::average_prices(FallbackCause::EmptyReply));
    }

    #[test]
    fn scalar_payload_recovers_with_failure_fallback() {
        let policy = FallbackPolicy::default_for(GasStation::OPERATION);
        let stations = resolve::<GasStation>(policy, MethodReply::Success(json!(7))).unwrap();
        assert_eq!(stations, fallback::stations());
    }

    #[test]
    fn send_failure_keeps_the_engine_error() {
        let results = settled_vehicles(&strict_bridge(true));
        assert_eq!(results.len(), 1);
        assert!(matches!(&results[0], Err(TankFuelError::Engine(m)) if m == "worker stopped"));
    }

    #[test]
    fn callback_dropped_during_a_successful_send_settles_once() {
        let results = settled_vehicles(&strict_bridge(false));
        assert_eq!(results.len(), 1);
        assert!(matches!(&results[0], Err(TankFuelError::ReplyDropped(op)) if op == "getVehicles"));
    }
}
