//! Replay event type definitions

use serde::{Deserialize, Serialize};

/// Every observable transition of the replay engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplayEvent {
    /// A new capture session began (previous samples discarded)
    RecordingStarted,
    /// Capture ended
    RecordingStopped { samples: usize, duration: f32 },
    /// Ball entered the arm zone while unarmed
    GateArmed,
    /// Ball entered the fire zone while armed
    GateFired,
    /// Playback began
    PlaybackStarted {
        samples: usize,
        cameras: usize,
        speed: f32,
    },
    /// Replay camera at this index became the only live viewpoint
    CameraActivated { index: usize },
    /// Physics resumed and the primary viewpoint is live again
    PlaybackFinished,
    /// Fire arrived with nothing captured
    PlaybackSkipped,
}

impl ReplayEvent {
    /// Short code used by the compact log format
    pub fn type_code(&self) -> &'static str {
        match self {
            ReplayEvent::RecordingStarted => "RS",
            ReplayEvent::RecordingStopped { .. } => "RE",
            ReplayEvent::GateArmed => "GA",
            ReplayEvent::GateFired => "GF",
            ReplayEvent::PlaybackStarted { .. } => "PS",
            ReplayEvent::CameraActivated { .. } => "CA",
            ReplayEvent::PlaybackFinished => "PF",
            ReplayEvent::PlaybackSkipped => "PK",
        }
    }
}
