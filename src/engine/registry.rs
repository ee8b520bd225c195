//! Engine lifecycle management.
//!
//! The [`EngineRegistry`] owns the long-lived application engine of the process.
//! It is built once by the process entry point and passed explicitly to every
//! bridge; nothing reaches it through a static.
//!
//! # Lifecycle
//!
//! 1. The first [`EngineRegistry::acquire_channel`] creates the engine through
//!    the [`EngineFactory`], runs its default entry point and caches it under
//!    the configured engine id.
//! 2. Later calls reuse the cached engine and derive a fresh channel scoped to
//!    the configured channel name.
//! 3. There is no teardown: the engine lives as long as the registry.
//!
//! Initialization runs under the cache lock, so concurrent callers never
//! create two engines.

use super::channel::SharedChannel;
use crate::domain::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Default cache key of the shared engine.
pub const DEFAULT_ENGINE_ID: &str = "auto_engine";

/// Process-level information handed to engine factories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessContext {
    /// Application package name, e.g. `com.lorenzo.tankfuel`.
    pub package: String,
}

impl ProcessContext {
    #[must_use]
    pub fn new(package: &str) -> Self {
        Self {
            package: package.to_string(),
        }
    }
}

/// A running application engine able to hand out message channels.
pub trait Engine: Send + Sync {
    /// Starts the engine's default entry point.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry point cannot be started.
    fn run_default_entrypoint(&self) -> Result<()>;

    /// Derives a message channel scoped to `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot provide a channel.
    fn channel(&self, name: &str) -> Result<SharedChannel>;
}

/// Creates engines for the registry.
pub trait EngineFactory: Send + Sync {
    /// Builds a new, not yet started, engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be constructed.
    fn create(&self, context: &ProcessContext) -> Result<Arc<dyn Engine>>;
}

/// Creates, caches and shares the process engine.
pub struct EngineRegistry {
    factory: Box<dyn EngineFactory>,
    engine_id: String,
    channel_name: String,
    engines: Mutex<HashMap<String, Arc<dyn Engine>>>,
    creations: AtomicUsize,
}

impl EngineRegistry {
    /// Creates an empty registry. No engine is built until the first
    /// [`acquire_channel`](Self::acquire_channel).
    #[must_use]
    pub fn new(factory: Box<dyn EngineFactory>, engine_id: &str, channel_name: &str) -> Self {
        Self {
            factory,
            engine_id: engine_id.to_string(),
            channel_name: channel_name.to_string(),
            engines: Mutex::new(HashMap::new()),
            creations: AtomicUsize::new(0),
        }
    }

    /// Returns a channel to the shared engine, creating the engine on first use.
    ///
    /// Returns `None` when the engine cannot be created or started, or when
    /// it cannot provide a channel. Callers must treat `None` as "no channel"
    /// for the rest of their lifetime. A failed creation is not cached, so a
    /// later call tries again.
    pub fn acquire_channel(&self, context: &ProcessContext) -> Option<SharedChannel> {
        let span = tracing::debug_span!("acquire_channel", engine_id = %self.engine_id);
        let _guard = span.entered();

        let engine = {
            let mut engines = self.engines.lock().unwrap_or_else(PoisonError::into_inner);

            if let Some(engine) = engines.get(&self.engine_id) {
                tracing::debug!("reusing cached engine");
                Arc::clone(engine)
            } else {
                tracing::debug!(package = %context.package, "creating engine");
                let engine = match self.start_engine(context) {
                    Ok(engine) => engine,
                    Err(e) => {
                        tracing::error!(error = %e, "engine initialization failed");
                        return None;
                    }
                };
                engines.insert(self.engine_id.clone(), Arc::clone(&engine));
                engine
            }
        };

        match engine.channel(&self.channel_name) {
            Ok(channel) => {
                tracing::debug!(channel = %self.channel_name, "method channel ready");
                Some(channel)
            }
            Err(e) => {
                tracing::error!(channel = %self.channel_name, error = %e, "cannot derive method channel");
                None
            }
        }
    }

    fn start_engine(&self, context: &ProcessContext) -> Result<Arc<dyn Engine>> {
        let engine = self.factory.create(context)?;
        self.creations.fetch_add(1, Ordering::SeqCst);
        engine.run_default_entrypoint()?;
        Ok(engine)
    }

    /// Returns `true` once an engine is cached.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.engines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&self.engine_id)
    }

    /// Number of engines the factory has built so far.
    #[must_use]
    pub fn engines_created(&self) -> usize {
        self.creations.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn engine_id(&self) -> &str {
        &self.engine_id
    }

    #[must_use]
    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engine_id", &self.engine_id)
            .field("channel_name", &self.channel_name)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}
