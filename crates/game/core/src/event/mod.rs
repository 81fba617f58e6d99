//! Named-event subscription bus.
//!
//! The engine and every item own an [`EventBus`]. Fixed event kinds are closed
//! enums ([`EngineEvent`], [`ItemEvent`]); the engine additionally accepts
//! custom names registered at runtime through [`EventKey::Custom`].

mod bus;
mod kinds;

pub use bus::{EventBus, Handler};
pub use kinds::{EngineEvent, EventKey, ItemEvent};
