//! Tunable constants for the replay engine and demo court
//!
//! Defaults used when config/replay_tuning.json is missing or invalid.

use bevy::prelude::*;

// =============================================================================
// REPLAY DEFAULTS
// =============================================================================

/// Slow-motion factor applied to frame time during playback
pub const DEFAULT_PLAYBACK_SPEED: f32 = 0.5;
/// Fixed simulation rate used for pose capture (0.02s step)
pub const DEFAULT_FIXED_HZ: f64 = 50.0;
/// Replay camera offset from the ball when it moves with its target
pub const DEFAULT_FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 2.0, -5.0);

/// Available playback speeds, slowest first
pub const PLAYBACK_SPEEDS: [f32; 5] = [0.1, 0.25, 0.5, 1.0, 2.0];

// =============================================================================
// DEMO COURT
// =============================================================================

pub const BALL_RADIUS: f32 = 0.35;
pub const BALL_GRAVITY: f32 = 40.0; // Stronger than earth gravity for snappier arcs
pub const BALL_BOUNCE: f32 = 0.6; // Coefficient of restitution against the floor
pub const BALL_SPAWN: Vec3 = Vec3::new(0.0, 1.5, -6.0);
pub const FLOOR_Y: f32 = 0.0;

pub const THROW_SPEED: f32 = 23.9;
pub const THROW_DIRECTION: Vec3 = Vec3::new(0.0, 1.2, 1.0); // Forward plus upward lift (normalized at use)
pub const THROW_SPEED_JITTER: f32 = 0.01; // +/- fraction applied to throw speed
pub const THROW_SPIN: Vec3 = Vec3::new(-8.0, 0.0, 0.0); // Backspin (rad/s)

pub const HOOP_POSITION: Vec3 = Vec3::new(0.0, 4.0, 6.0);
pub const HOOP_ZONE_HALF_EXTENTS: Vec3 = Vec3::new(1.2, 0.3, 1.2);
/// Fire zone sits just below the arm zone so a clean pass enters arm first
pub const HOOP_FIRE_DROP: f32 = 0.6;

pub const MAIN_CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 4.0, -12.0);
