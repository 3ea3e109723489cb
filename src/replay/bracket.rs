//! Simulation bracket - hands the tracked body between host physics and playback

use bevy::prelude::*;

/// Simulation flags for a host-driven body.
///
/// Host physics must skip integration when `simulated` is false, and collision
/// or trigger checks must skip the body when `collisions` is false.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationBody {
    simulated: bool,
    collisions: bool,
}

impl Default for SimulationBody {
    fn default() -> Self {
        Self {
            simulated: true,
            collisions: true,
        }
    }
}

impl SimulationBody {
    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    pub fn detects_collisions(&self) -> bool {
        self.collisions
    }
}

/// Linear and angular velocity integrated by the host
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
    /// Radians per second around each axis
    pub angular: Vec3,
}

impl Velocity {
    pub fn zero(&mut self) {
        self.linear = Vec3::ZERO;
        self.angular = Vec3::ZERO;
    }

    pub fn is_zero(&self) -> bool {
        self.linear == Vec3::ZERO && self.angular == Vec3::ZERO
    }
}

/// Enable or suspend physical simulation of a body.
///
/// Both directions zero the velocity: a suspended body is driven externally,
/// and a resumed body must not carry momentum from before the suspension.
/// Each disable must be matched by exactly one enable.
pub fn set_physics_enabled(body: &mut SimulationBody, velocity: &mut Velocity, enabled: bool) {
    debug_assert_ne!(
        body.simulated, enabled,
        "unmatched simulation bracket call (enabled = {enabled})"
    );
    body.simulated = enabled;
    body.collisions = enabled;
    velocity.zero();
}
