//! Replay tuning loaded from config/replay_tuning.json

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::*;

fn default_playback_speed() -> f32 {
    DEFAULT_PLAYBACK_SPEED
}
fn default_follow_offset() -> [f32; 3] {
    DEFAULT_FOLLOW_OFFSET.to_array()
}
fn default_fixed_hz() -> f64 {
    DEFAULT_FIXED_HZ
}

/// Path to the replay tuning config
pub const REPLAY_TUNING_FILE: &str = "config/replay_tuning.json";

/// Serializable replay settings
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayTuning {
    /// Time dilation during playback (0.5 = half speed)
    #[serde(default = "default_playback_speed")]
    pub playback_speed: f32,
    /// Offset used by chase replay cameras
    #[serde(default = "default_follow_offset")]
    pub follow_offset: [f32; 3],
    /// Fixed simulation rate; poses are captured once per fixed tick
    #[serde(default = "default_fixed_hz")]
    pub fixed_hz: f64,
}

impl Default for ReplayTuning {
    fn default() -> Self {
        Self {
            playback_speed: default_playback_speed(),
            follow_offset: default_follow_offset(),
            fixed_hz: default_fixed_hz(),
        }
    }
}

impl ReplayTuning {
    pub fn follow_offset(&self) -> Vec3 {
        Vec3::from_array(self.follow_offset)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if !(self.playback_speed.is_finite() && self.playback_speed > 0.0) {
            return Err(format!(
                "playback_speed must be positive, got {}",
                self.playback_speed
            ));
        }
        if !(self.fixed_hz.is_finite() && self.fixed_hz > 0.0) {
            return Err(format!("fixed_hz must be positive, got {}", self.fixed_hz));
        }
        if !self.follow_offset.iter().all(|v| v.is_finite()) {
            return Err(format!("follow_offset must be finite, got {:?}", self.follow_offset));
        }
        Ok(())
    }

    /// Index of the preset nearest the current speed
    fn speed_index(&self) -> usize {
        PLAYBACK_SPEEDS
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (**a - self.playback_speed)
                    .abs()
                    .total_cmp(&(**b - self.playback_speed).abs())
            })
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Step to the next faster preset
    pub fn speed_up(&mut self) {
        let index = self.speed_index();
        if index < PLAYBACK_SPEEDS.len() - 1 {
            self.playback_speed = PLAYBACK_SPEEDS[index + 1];
        }
    }

    /// Step to the next slower preset
    pub fn speed_down(&mut self) {
        let index = self.speed_index();
        if index > 0 {
            self.playback_speed = PLAYBACK_SPEEDS[index - 1];
        }
    }

    /// Get formatted speed string for display
    pub fn speed_string(&self) -> String {
        format!("{:.2}x", self.playback_speed)
    }
}

pub fn parse_replay_tuning(contents: &str) -> Result<ReplayTuning, String> {
    let tuning: ReplayTuning =
        serde_json::from_str(contents).map_err(|e| format!("Failed to parse replay tuning: {}", e))?;
    tuning.validate()?;
    Ok(tuning)
}

pub fn load_replay_tuning_from_file(path: &str) -> Result<ReplayTuning, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    parse_replay_tuning(&contents).map_err(|e| format!("{}: {}", path, e))
}

/// Load tuning, falling back to defaults (with a warning) on any error
pub fn load_replay_tuning_or_default() -> ReplayTuning {
    match load_replay_tuning_from_file(REPLAY_TUNING_FILE) {
        Ok(tuning) => {
            info!("Loaded replay tuning from {}", REPLAY_TUNING_FILE);
            tuning
        }
        Err(err) => {
            warn!("{}, using defaults", err);
            ReplayTuning::default()
        }
    }
}
