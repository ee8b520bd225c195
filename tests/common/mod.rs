//! Shared test doubles: a scripted method channel, a recording navigator and
//! session builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use serde_json::Value;
use tankfuel_auto::bridge::{BridgeConfig, CommandBridge};
use tankfuel_auto::domain::{Result, TankFuelError};
use tankfuel_auto::engine::{MethodChannel, MethodReply, ReplyCallback, SharedChannel};
use tankfuel_auto::host::{NavigationIntent, Navigator, QueuedHost};
use tankfuel_auto::{AppVariant, CarSession, ScreenFactory};

/// What the channel does with a call to one method.
#[derive(Debug, Clone)]
pub enum Script {
    /// Answer immediately on the caller's thread.
    Reply(MethodReply),
    /// Keep the callback until the test answers it.
    Defer,
    /// Keep the callback forever.
    Never,
    /// Drop the callback without answering.
    Drop,
    /// Fail the send itself.
    SendError,
}

/// Channel answering each method according to its script. Unscripted
/// methods answer `NotImplemented`.
#[derive(Default)]
pub struct ScriptedChannel {
    scripts: Mutex<HashMap<String, Script>>,
    deferred: Mutex<Vec<(String, ReplyCallback)>>,
    kept: Mutex<Vec<ReplyCallback>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, method: &str, script: Script) -> Self {
        self.set(method, script);
        self
    }

    pub fn replying(self, method: &str, payload: Value) -> Self {
        self.with(method, Script::Reply(MethodReply::Success(payload)))
    }

    pub fn set(&self, method: &str, script: Script) {
        self.scripts
            .lock()
            .unwrap()
            .insert(method.to_string(), script);
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Methods invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.calls().iter().filter(|m| *m == method).count()
    }

    /// Number of deferred callbacks still waiting.
    pub fn deferred(&self) -> usize {
        self.deferred.lock().unwrap().len()
    }

    fn take_deferred(&self, method: &str) -> Option<ReplyCallback> {
        let mut deferred = self.deferred.lock().unwrap();
        let index = deferred.iter().position(|(m, _)| m == method)?;
        Some(deferred.remove(index).1)
    }

    /// Answers the oldest deferred call to `method` on this thread.
    pub fn answer(&self, method: &str, reply: MethodReply) -> bool {
        match self.take_deferred(method) {
            Some(callback) => {
                callback(reply);
                true
            }
            None => false,
        }
    }

    /// Answers the oldest deferred call to `method` from a new thread.
    pub fn answer_from_thread(&self, method: &str, reply: MethodReply) -> JoinHandle<()> {
        let callback = self.take_deferred(method);
        std::thread::spawn(move || {
            if let Some(callback) = callback {
                callback(reply);
            }
        })
    }
}

impl MethodChannel for ScriptedChannel {
    fn name(&self) -> &str {
        "test/auto"
    }

    fn invoke_method(
        &self,
        method: &str,
        _arguments: Option<Value>,
        reply: ReplyCallback,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(method.to_string());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .unwrap_or(Script::Reply(MethodReply::NotImplemented));

        match script {
            Script::Reply(answer) => reply(answer),
            Script::Defer => self
                .deferred
                .lock()
                .unwrap()
                .push((method.to_string(), reply)),
            Script::Never => self.kept.lock().unwrap().push(reply),
            Script::Drop => drop(reply),
            Script::SendError => {
                return Err(TankFuelError::Engine("scripted send failure".to_string()))
            }
        }
        Ok(())
    }
}

/// Records every launched intent. A failing navigator records the attempt
/// and reports that no app can handle it.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    pub launched: Arc<Mutex<Vec<NavigationIntent>>>,
    pub failing: bool,
}

impl RecordingNavigator {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }
}

impl Navigator for RecordingNavigator {
    fn launch(&self, intent: &NavigationIntent) -> Result<()> {
        self.launched.lock().unwrap().push(intent.clone());
        if self.failing {
            return Err(TankFuelError::Navigation("no maps app installed".to_string()));
        }
        Ok(())
    }
}

pub fn bridge_over(channel: &Arc<ScriptedChannel>, config: BridgeConfig) -> CommandBridge {
    let shared: SharedChannel = channel.clone();
    CommandBridge::with_channel(Some(shared), config)
}

/// A session for `variant` over `bridge`, with its navigator.
pub fn session(variant: AppVariant, bridge: CommandBridge) -> (CarSession, RecordingNavigator) {
    session_with(variant, bridge, RecordingNavigator::default())
}

/// A session for `variant` over `bridge`, launching through `navigator`.
pub fn session_with(
    variant: AppVariant,
    bridge: CommandBridge,
    navigator: RecordingNavigator,
) -> (CarSession, RecordingNavigator) {
    let host = Arc::new(QueuedHost::new());
    let factory = ScreenFactory::new(variant, bridge, host.clone());
    let session = CarSession::new(factory, host, Box::new(navigator.clone()));
    (session, navigator)
}

/// A TankFuel session over `channel` with the default policies.
pub fn tankfuel_session(channel: &Arc<ScriptedChannel>) -> (CarSession, RecordingNavigator) {
    session(
        AppVariant::TankFuel,
        bridge_over(channel, BridgeConfig::default()),
    )
}
