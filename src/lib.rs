//! Slowmo Replay - slow-motion multi-camera replays for Bevy
//!
//! This crate provides the replay engine (capture, trigger gate, playback
//! scheduling, camera sequencing) plus its event log and tuning.

pub mod constants;
pub mod events;
pub mod replay;
pub mod tuning;

// Re-export commonly used types for convenience
pub use constants::*;
pub use events::{BusEvent, ReplayEvent, ReplayEventBus, parse_event, serialize_event};
pub use replay::{
    CameraSequenceRegistry, PlaybackCommand, PlaybackPhase, PoseSample, PrimaryViewpoint,
    ReplayCameraFollow, ReplayConfigError, ReplayDirector, ReplayPlugin, ReplayRig,
    ReplaySystems, SimulationBody, TriggerZone, Velocity, ZoneRole, not_replay_active,
    replay_active,
};
pub use tuning::{REPLAY_TUNING_FILE, ReplayTuning};
