//! Replay configuration errors

use bevy::prelude::Entity;

/// Fatal misconfiguration detected while building the camera sequence.
/// The replay engine refuses to start rather than run partially wired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayConfigError {
    /// No replay cameras were configured
    EmptyCameraSequence,
    /// Configured entity has no Camera component
    MissingViewpoint { index: usize, entity: Entity },
    /// Configured camera cannot follow the tracked object
    MissingFollower { index: usize, entity: Entity },
}

impl std::fmt::Display for ReplayConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayConfigError::EmptyCameraSequence => {
                write!(f, "replay camera sequence is empty")
            }
            ReplayConfigError::MissingViewpoint { index, entity } => {
                write!(f, "replay camera {} ({:?}) has no Camera component", index, entity)
            }
            ReplayConfigError::MissingFollower { index, entity } => {
                write!(
                    f,
                    "replay camera {} ({:?}) has no ReplayCameraFollow component",
                    index, entity
                )
            }
        }
    }
}

impl std::error::Error for ReplayConfigError {}
