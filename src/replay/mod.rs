//! Slow-motion replay of a tracked body.
//!
//! Poses are captured every fixed tick while recording. When the body passes
//! through the arm zone and then the fire zone, capture stops, host physics is
//! suspended, and the shot is replayed once per replay camera at the tuned
//! speed. Afterwards the primary camera is restored and physics resumes.

mod bracket;
mod buffer;
mod cameras;
mod director;
mod error;
mod gate;
mod scheduler;
mod systems;
mod zones;

pub use bracket::{SimulationBody, Velocity, set_physics_enabled};
pub use buffer::{PoseSample, PoseSampleBuffer, Recording};
pub use cameras::{
    CameraEntry, CameraSequenceRegistry, LiveViewpoint, PrimaryViewpoint, ReplayCameraFollow,
    replay_camera_follow,
};
pub use director::ReplayDirector;
pub use error::ReplayConfigError;
pub use gate::{TriggerGate, ZoneRole};
pub use scheduler::{PlaybackCommand, PlaybackPhase, PlaybackRun, PlaybackScheduler, interpolate_pose};
pub use systems::{
    advance_playback, apply_playback_commands, capture_tracked_pose, sync_playback_speed,
};
pub use zones::{TriggerZone, detect_zone_entries};

use bevy::prelude::*;

use crate::events::{ReplayEventBus, log_replay_events, update_event_bus_time};
use crate::tuning::{ReplayTuning, load_replay_tuning_or_default};

/// Entities the host wants replayed. Insert during Startup; the director is
/// built from it in PostStartup.
#[derive(Resource, Debug, Clone)]
pub struct ReplayRig {
    /// Body whose pose is captured and replayed
    pub tracked: Entity,
    /// Replay cameras in play order
    pub viewpoints: Vec<Entity>,
}

/// Ordering for replay systems. Host physics belongs before `Capture`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplaySystems {
    /// FixedUpdate: record the tracked pose
    Capture,
    /// FixedUpdate: zone entry and gate handling
    Triggers,
    /// Update: advance the running replay
    Playback,
    /// Update: apply queued commands to the world
    Apply,
    /// Update: aim replay cameras
    Follow,
}

/// Run condition: returns true while a replay is playing
pub fn replay_active(director: Option<Res<ReplayDirector>>) -> bool {
    director.is_some_and(|d| d.is_replaying())
}

/// Run condition: returns true when no replay is playing (normal game)
pub fn not_replay_active(director: Option<Res<ReplayDirector>>) -> bool {
    !replay_active(director)
}

/// Validate the camera sequence and insert a [`ReplayDirector`].
pub fn install_replay_director(
    world: &mut World,
    tracked: Entity,
    viewpoints: &[Entity],
) -> Result<(), ReplayConfigError> {
    let registry = CameraSequenceRegistry::from_world(world, viewpoints)?;
    let speed = world
        .get_resource::<ReplayTuning>()
        .map(|t| t.playback_speed)
        .unwrap_or(crate::constants::DEFAULT_PLAYBACK_SPEED);

    info!(
        "Replay director tracking {:?} with {} cameras at {}x",
        tracked,
        registry.len(),
        speed
    );
    world.insert_resource(ReplayDirector::new(tracked, registry, speed));
    Ok(())
}

/// Build the director from the host's [`ReplayRig`].
///
/// A bad camera setup is a configuration error and stops the app here rather
/// than at the first shot.
pub fn init_replay_director(world: &mut World) {
    let Some(rig) = world.get_resource::<ReplayRig>().cloned() else {
        warn!("No ReplayRig inserted, replay disabled");
        return;
    };
    if let Err(err) = install_replay_director(world, rig.tracked, &rig.viewpoints) {
        error!("Replay setup failed: {}", err);
        panic!("Replay setup failed: {}", err);
    }
}

pub struct ReplayPlugin;

impl Plugin for ReplayPlugin {
    fn build(&self, app: &mut App) {
        let tuning = load_replay_tuning_or_default();

        app.insert_resource(Time::<Fixed>::from_hz(tuning.fixed_hz))
            .insert_resource(tuning)
            .insert_resource(ReplayEventBus::new())
            .configure_sets(
                FixedUpdate,
                (ReplaySystems::Capture, ReplaySystems::Triggers).chain(),
            )
            .configure_sets(
                Update,
                (
                    ReplaySystems::Playback,
                    ReplaySystems::Apply,
                    ReplaySystems::Follow,
                )
                    .chain(),
            )
            .add_systems(PostStartup, init_replay_director)
            .add_systems(First, update_event_bus_time)
            // Fixed tick: capture, then triggers so a fire suspends physics
            // before the next host physics step
            .add_systems(
                FixedUpdate,
                capture_tracked_pose
                    .in_set(ReplaySystems::Capture)
                    .run_if(resource_exists::<ReplayDirector>),
            )
            .add_systems(
                FixedUpdate,
                (detect_zone_entries, apply_playback_commands)
                    .chain()
                    .in_set(ReplaySystems::Triggers)
                    .run_if(resource_exists::<ReplayDirector>),
            )
            .add_systems(
                Update,
                (sync_playback_speed, advance_playback)
                    .chain()
                    .in_set(ReplaySystems::Playback)
                    .run_if(resource_exists::<ReplayDirector>),
            )
            .add_systems(
                Update,
                apply_playback_commands
                    .in_set(ReplaySystems::Apply)
                    .run_if(resource_exists::<ReplayDirector>),
            )
            .add_systems(Update, replay_camera_follow.in_set(ReplaySystems::Follow))
            .add_systems(Last, log_replay_events);
    }
}
