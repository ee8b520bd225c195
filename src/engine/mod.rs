//! The application engine and the channel used to talk to it.

pub mod channel;
pub mod fixture;
pub mod local;
pub mod messages;
pub mod registry;

pub use channel::{MethodChannel, MethodReply, ReplyCallback, SharedChannel};
pub use fixture::FixtureSource;
pub use local::{LocalEngine, LocalEngineFactory, ReplySource};
pub use messages::EngineRequest;
pub use registry::{Engine, EngineFactory, EngineRegistry, ProcessContext, DEFAULT_ENGINE_ID};
