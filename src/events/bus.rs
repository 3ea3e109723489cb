//! Replay event bus
//!
//! The director and the command-applying systems emit events here; a logging
//! system drains them once per frame. Tests read the processed history to check
//! ordering.

use bevy::prelude::*;

use super::format::serialize_event;
use super::types::ReplayEvent;

/// Timestamped event for the event bus
#[derive(Debug, Clone, PartialEq)]
pub struct BusEvent {
    /// Virtual time in milliseconds
    pub time_ms: u32,
    /// The event data
    pub event: ReplayEvent,
}

#[derive(Resource, Default)]
pub struct ReplayEventBus {
    /// Events emitted since the last drain
    pending: Vec<BusEvent>,

    /// Events that have been drained
    processed: Vec<BusEvent>,

    /// Current elapsed time in milliseconds (for timestamping)
    elapsed_ms: u32,

    /// Whether the bus is enabled (for testing/simulation)
    enabled: bool,
}

impl ReplayEventBus {
    /// Create a new enabled event bus
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Create a disabled event bus (events are dropped)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Update the elapsed time (called each frame)
    pub fn update_time(&mut self, elapsed_secs: f64) {
        self.elapsed_ms = (elapsed_secs * 1000.0) as u32;
    }

    /// Emit an event to the bus
    pub fn emit(&mut self, event: ReplayEvent) {
        if !self.enabled {
            return;
        }
        self.pending.push(BusEvent {
            time_ms: self.elapsed_ms,
            event,
        });
    }

    /// Get pending events for consumption (does not drain)
    pub fn peek(&self) -> &[BusEvent] {
        &self.pending
    }

    /// Drain pending events, moving them to processed
    pub fn drain(&mut self) -> Vec<BusEvent> {
        let events = std::mem::take(&mut self.pending);
        self.processed.extend(events.iter().cloned());
        events
    }

    /// Get all processed events
    pub fn processed(&self) -> &[BusEvent] {
        &self.processed
    }

    pub fn clear_processed(&mut self) {
        self.processed.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }
}

/// System to update the event bus time each frame
pub fn update_event_bus_time(mut bus: ResMut<ReplayEventBus>, time: Res<Time<Virtual>>) {
    bus.update_time(time.elapsed_secs_f64());
}

/// Drain the bus and log each event in compact form
pub fn log_replay_events(mut bus: ResMut<ReplayEventBus>) {
    for event in bus.drain() {
        info!("{}", serialize_event(event.time_ms, &event.event));
    }
    bus.clear_processed();
}
