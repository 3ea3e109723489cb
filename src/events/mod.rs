//! Replay event logging
//!
//! The ReplayEventBus collects every engine transition with a timestamp. A
//! logging system drains it each frame and prints the compact text form.

mod bus;
mod format;
mod types;

pub use bus::{BusEvent, ReplayEventBus, log_replay_events, update_event_bus_time};
pub use format::{parse_event, serialize_event};
pub use types::ReplayEvent;
