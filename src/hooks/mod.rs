//! Callback and event notification.

mod bus;
mod callbacks;
mod events;
mod legacy;

pub use bus::EventBus;
pub use callbacks::{Callbacks, Listener};
pub use events::{
    AgentEvent, ChunkEvent, EventKind, RunErrorEvent, RunFinishEvent, RunStartEvent,
    StepFinishEvent, StepStartEvent, ToolCallFinishEvent, ToolCallStartEvent,
};
pub use legacy::LegacyHooks;
