//! Replay director - owns the capture buffer, trigger gate and scheduler
//!
//! One director exists per tracked object. It is built with the tracked entity
//! and an already-validated camera sequence, and it never looks anything up on
//! its own. World effects come out as [`PlaybackCommand`]s queued for the apply
//! system.

use bevy::prelude::*;

use super::buffer::{PoseSample, PoseSampleBuffer};
use super::cameras::CameraSequenceRegistry;
use super::gate::{TriggerGate, ZoneRole};
use super::scheduler::{PlaybackCommand, PlaybackPhase, PlaybackScheduler};
use crate::events::{ReplayEvent, ReplayEventBus};

#[derive(Resource, Debug)]
pub struct ReplayDirector {
    tracked: Entity,
    registry: CameraSequenceRegistry,
    buffer: PoseSampleBuffer,
    gate: TriggerGate,
    scheduler: PlaybackScheduler,
    /// Speed used by the next playback; a running playback keeps its own
    playback_speed: f32,
    /// Commands waiting for the apply system
    pending: Vec<PlaybackCommand>,
}

impl ReplayDirector {
    pub fn new(tracked: Entity, registry: CameraSequenceRegistry, playback_speed: f32) -> Self {
        Self {
            tracked,
            registry,
            buffer: PoseSampleBuffer::default(),
            gate: TriggerGate::default(),
            scheduler: PlaybackScheduler::default(),
            playback_speed,
            pending: Vec::new(),
        }
    }

    pub fn tracked(&self) -> Entity {
        self.tracked
    }

    pub fn registry(&self) -> &CameraSequenceRegistry {
        &self.registry
    }

    pub fn buffer(&self) -> &PoseSampleBuffer {
        &self.buffer
    }

    pub fn gate(&self) -> &TriggerGate {
        &self.gate
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.scheduler.phase()
    }

    pub fn is_replaying(&self) -> bool {
        self.scheduler.is_playing()
    }

    pub fn is_recording(&self) -> bool {
        self.buffer.is_recording()
    }

    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    /// Takes effect on the next playback
    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed;
    }

    /// Begin capturing a new shot. Refused while a replay is still running,
    /// since the body is not under host physics yet.
    pub fn start_recording(&mut self, now: f64, bus: &mut ReplayEventBus) -> bool {
        if self.scheduler.is_playing() {
            warn!("Ignoring start_recording: replay still in progress");
            return false;
        }
        self.buffer.start_recording(now);
        bus.emit(ReplayEvent::RecordingStarted);
        true
    }

    /// Capture one fixed-tick pose. No-op unless recording.
    pub fn record_pose(&mut self, pose: PoseSample) {
        self.buffer.capture_tick(pose);
    }

    /// Route a spatial trigger from the host collision system
    pub fn on_zone_entered(&mut self, role: ZoneRole, now: f64, bus: &mut ReplayEventBus) {
        match role {
            ZoneRole::Arm => self.on_arm_event(bus),
            ZoneRole::Fire => self.on_fire_event(now, bus),
        }
    }

    pub fn on_arm_event(&mut self, bus: &mut ReplayEventBus) {
        if self.gate.on_arm() {
            bus.emit(ReplayEvent::GateArmed);
        }
    }

    pub fn on_fire_event(&mut self, now: f64, bus: &mut ReplayEventBus) {
        if !self.gate.on_fire() {
            debug!("Fire zone entered while unarmed, ignoring");
            return;
        }
        bus.emit(ReplayEvent::GateFired);
        self.stop_recording_and_play(now, bus);
    }

    /// Stop capturing and replay what was captured.
    ///
    /// Returns true when a playback started. Nothing captured means nothing
    /// happens: no camera switch and no bracket call.
    pub fn stop_recording_and_play(&mut self, now: f64, bus: &mut ReplayEventBus) -> bool {
        if self.scheduler.is_playing() {
            warn!("Ignoring stop_recording_and_play: replay already in progress");
            return false;
        }

        if self.buffer.is_recording() {
            self.buffer.stop_recording(now);
            bus.emit(ReplayEvent::RecordingStopped {
                samples: self.buffer.len(),
                duration: self.buffer.total_duration(),
            });
        }

        let Some(recording) = self.buffer.take_recording() else {
            bus.emit(ReplayEvent::PlaybackSkipped);
            return false;
        };
        let samples = recording.len();

        let started = self.scheduler.begin(
            recording,
            self.registry.len(),
            self.playback_speed,
            &mut self.pending,
        );
        if started {
            bus.emit(ReplayEvent::PlaybackStarted {
                samples,
                cameras: self.registry.len(),
                speed: self.playback_speed,
            });
        } else {
            warn!(
                "Replay not started (speed {}, {} cameras)",
                self.playback_speed,
                self.registry.len()
            );
        }
        started
    }

    /// Advance the running replay by one frame. No-op while idle.
    pub fn advance_frame(&mut self, delta_secs: f32) {
        self.scheduler.advance_frame(delta_secs, &mut self.pending);
    }

    pub fn pending_commands(&self) -> &[PlaybackCommand] {
        &self.pending
    }

    /// Take queued commands in emission order
    pub fn drain_commands(&mut self) -> Vec<PlaybackCommand> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::cameras::ReplayCameraFollow;

    fn director_with_cameras(count: usize, speed: f32) -> ReplayDirector {
        let mut world = World::new();
        let tracked = world.spawn_empty().id();
        let follow = ReplayCameraFollow::stationary();
        let cameras: Vec<Entity> = (0..count).map(|_| world.spawn_empty().id()).collect();
        let registry =
            CameraSequenceRegistry::new(cameras.iter().map(|&e| (e, Some(&follow)))).unwrap();
        ReplayDirector::new(tracked, registry, speed)
    }

    fn record_shot(director: &mut ReplayDirector, bus: &mut ReplayEventBus, samples: usize) {
        director.start_recording(0.0, bus);
        for i in 0..samples {
            director.record_pose(PoseSample::new(Vec3::X * i as f32, Quat::IDENTITY));
        }
    }

    fn events(bus: &mut ReplayEventBus) -> Vec<ReplayEvent> {
        bus.drain().into_iter().map(|e| e.event).collect()
    }

    #[test]
    fn test_fire_before_arm_produces_no_playback() {
        let mut director = director_with_cameras(2, 0.5);
        let mut bus = ReplayEventBus::new();
        record_shot(&mut director, &mut bus, 5);

        director.on_zone_entered(ZoneRole::Fire, 1.0, &mut bus);
        assert!(!director.is_replaying());
        assert!(director.is_recording());
        assert!(director.pending_commands().is_empty());
    }

    #[test]
    fn test_arm_fire_fire_plays_once() {
        let mut director = director_with_cameras(2, 0.5);
        let mut bus = ReplayEventBus::new();
        record_shot(&mut director, &mut bus, 5);

        director.on_zone_entered(ZoneRole::Arm, 0.5, &mut bus);
        director.on_zone_entered(ZoneRole::Fire, 1.0, &mut bus);
        assert!(director.is_replaying());
        director.on_zone_entered(ZoneRole::Fire, 1.1, &mut bus);

        let suspends = director
            .pending_commands()
            .iter()
            .filter(|c| **c == PlaybackCommand::SuspendPhysics)
            .count();
        assert_eq!(suspends, 1);

        assert_eq!(
            events(&mut bus),
            vec![
                ReplayEvent::RecordingStarted,
                ReplayEvent::GateArmed,
                ReplayEvent::GateFired,
                ReplayEvent::RecordingStopped {
                    samples: 5,
                    duration: 1.0
                },
                ReplayEvent::PlaybackStarted {
                    samples: 5,
                    cameras: 2,
                    speed: 0.5
                },
            ]
        );
    }

    #[test]
    fn test_empty_buffer_never_touches_cameras_or_bracket() {
        let mut director = director_with_cameras(2, 0.5);
        let mut bus = ReplayEventBus::new();
        director.start_recording(0.0, &mut bus);

        assert!(!director.stop_recording_and_play(1.0, &mut bus));
        assert!(!director.is_replaying());
        assert!(!director.is_recording());
        assert!(director.drain_commands().is_empty());
        assert_eq!(events(&mut bus).last(), Some(&ReplayEvent::PlaybackSkipped));
    }

    #[test]
    fn test_recording_refused_during_playback() {
        let mut director = director_with_cameras(1, 1.0);
        let mut bus = ReplayEventBus::new();
        record_shot(&mut director, &mut bus, 3);
        assert!(director.stop_recording_and_play(0.1, &mut bus));

        assert!(!director.start_recording(0.2, &mut bus));
        assert!(!director.is_recording());

        // Run the replay out, then recording is allowed again
        for _ in 0..100 {
            director.advance_frame(0.05);
        }
        assert!(!director.is_replaying());
        assert_eq!(director.drain_commands().last(), Some(&PlaybackCommand::Finish));
        assert!(director.start_recording(10.0, &mut bus));
    }

    #[test]
    fn test_speed_change_applies_to_next_run_only() {
        let mut director = director_with_cameras(1, 0.5);
        let mut bus = ReplayEventBus::new();
        record_shot(&mut director, &mut bus, 3);
        director.stop_recording_and_play(1.0, &mut bus);

        director.set_playback_speed(2.0);
        let run = director.scheduler().run().unwrap();
        assert_eq!(run.playback_speed(), 0.5);
        assert_eq!(director.playback_speed(), 2.0);
    }

    #[test]
    fn test_advance_while_idle_queues_nothing() {
        let mut director = director_with_cameras(1, 0.5);
        director.advance_frame(0.016);
        assert!(director.pending_commands().is_empty());
        assert_eq!(director.phase(), PlaybackPhase::Idle);
    }
}
