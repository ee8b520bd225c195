//! In-process engine served by a background worker thread.
//!
//! [`LocalEngine`] stands in for the main application's runtime. Method calls
//! sent on any of its channels are queued to a single worker thread, which
//! asks a [`ReplySource`] for the answer and invokes the caller's reply
//! callback on the worker thread. Replies therefore never arrive on the
//! caller's thread, which is what the screen hand-off logic expects.
//!
//! ```text
//! LocalChannel::invoke_method ──mpsc──▶ worker thread
//!                                         │ ReplySource::reply
//!                                         ▼
//!                                   reply callback (worker thread)
//! ```

use super::channel::{MethodChannel, MethodReply, ReplyCallback, SharedChannel};
use super::messages::EngineRequest;
use super::registry::{Engine, EngineFactory, ProcessContext};
use crate::domain::{Result, TankFuelError};
use serde_json::Value;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

/// Produces the engine's answers.
pub trait ReplySource: Send {
    /// Answers one method call.
    fn reply(&mut self, method: &str, arguments: Option<&Value>) -> MethodReply;
}

struct Envelope {
    request: EngineRequest,
    reply: ReplyCallback,
}

/// Worker-side state: the reply source and the request loop.
struct EngineWorker {
    source: Box<dyn ReplySource>,
}

impl EngineWorker {
    /// Serves one request under a span linked to the caller's trace.
    fn handle_request(&mut self, request: &EngineRequest) -> MethodReply {
        let _context_guard = request.trace_context.as_ref().and_then(|ctx| ctx.attach());

        let span = tracing::debug_span!(
            "engine_handle_request",
            channel = %request.channel,
            method = %request.method
        );
        let _guard = span.entered();

        let reply = self.source.reply(&request.method, request.arguments.as_ref());
        match &reply {
            MethodReply::Success(payload) => {
                tracing::debug!(
                    items = payload.as_array().map_or(0, Vec::len),
                    "method answered"
                );
            }
            MethodReply::Error { code, .. } => {
                tracing::debug!(code = %code, "method failed");
            }
            MethodReply::NotImplemented => {
                tracing::debug!("method not implemented");
            }
        }
        reply
    }

    fn run(mut self, requests: &Receiver<Envelope>) {
        tracing::debug!("engine worker started");
        while let Ok(Envelope { request, reply }) = requests.recv() {
            let answer = self.handle_request(&request);
            reply(answer);
        }
        tracing::debug!("engine worker stopped");
    }
}

/// An engine whose entry point is a worker thread.
pub struct LocalEngine {
    sender: Mutex<Option<Sender<Envelope>>>,
    pending: Mutex<Option<(Receiver<Envelope>, EngineWorker)>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl LocalEngine {
    /// Creates a stopped engine answering from `source`.
    #[must_use]
    pub fn new(source: Box<dyn ReplySource>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender: Mutex::new(Some(sender)),
            pending: Mutex::new(Some((receiver, EngineWorker { source }))),
            worker: Mutex::new(None),
        }
    }

    /// Returns `true` once the worker thread has been spawned.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Engine for LocalEngine {
    fn run_default_entrypoint(&self) -> Result<()> {
        let Some((receiver, worker)) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            tracing::debug!("engine entry point already running");
            return Ok(());
        };

        let handle = std::thread::Builder::new()
            .name("tankfuel-engine".to_string())
            .spawn(move || worker.run(&receiver))?;

        *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    fn channel(&self, name: &str) -> Result<SharedChannel> {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| TankFuelError::Engine("engine is shut down".to_string()))?;

        Ok(Arc::new(LocalChannel {
            name: name.to_string(),
            sender: Mutex::new(sender),
        }))
    }
}

impl std::fmt::Debug for LocalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEngine")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

/// Channel half of a [`LocalEngine`].
struct LocalChannel {
    name: String,
    sender: Mutex<Sender<Envelope>>,
}

impl MethodChannel for LocalChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke_method(
        &self,
        method: &str,
        arguments: Option<Value>,
        reply: ReplyCallback,
    ) -> Result<()> {
        let request = EngineRequest::new(&self.name, method, arguments);
        tracing::debug!(method = %method, "posting request to engine");

        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send(Envelope { request, reply })
            .map_err(|_| TankFuelError::Engine("engine worker has stopped".to_string()))
    }
}

/// Builds [`LocalEngine`]s whose reply source comes from a constructor.
///
/// The constructor runs inside [`EngineFactory::create`], so a failing
/// source (say, an unreadable fixture file) makes engine creation fail.
pub struct LocalEngineFactory {
    source: Box<dyn Fn() -> Result<Box<dyn ReplySource>> + Send + Sync>,
}

impl LocalEngineFactory {
    pub fn new<F>(source: F) -> Self
    where
        F: Fn() -> Result<Box<dyn ReplySource>> + Send + Sync + 'static,
    {
        Self {
            source: Box::new(source),
        }
    }
}

impl EngineFactory for LocalEngineFactory {
    fn create(&self, context: &ProcessContext) -> Result<Arc<dyn Engine>> {
        tracing::debug!(package = %context.package, "building local engine");
        let source = (self.source)()?;
        Ok(Arc::new(LocalEngine::new(source)))
    }
}
