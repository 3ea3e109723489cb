//! Playback scheduler - replays a recording once per camera at a time dilation
//!
//! The scheduler is a resumable state machine driven one frame at a time. Each
//! call to [`PlaybackScheduler::advance_frame`] moves the segment clock forward by
//! `delta * playback_speed` and emits the commands the host must apply this
//! frame. Camera sequencing is an index cursor, so the number of cameras has no
//! effect on stack depth.

use bevy::prelude::*;

use super::buffer::{PoseSample, Recording};

/// Effect the host applies to the world, in emission order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackCommand {
    /// Hand the tracked body to playback (simulation bracket disable)
    SuspendPhysics,
    /// Make this replay camera the only live viewpoint
    ActivateCamera(usize),
    /// Drive the tracked body to this pose
    SetPose(PoseSample),
    /// Resume physics, deactivate every replay camera, restore the primary viewpoint
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Playing { camera: usize },
}

/// Interpolate between two poses: linear on position, shortest-arc spherical on
/// orientation. The fraction is clamped to [0, 1] and the endpoints are returned
/// exactly.
pub fn interpolate_pose(from: &PoseSample, to: &PoseSample, fraction: f32) -> PoseSample {
    if fraction <= 0.0 {
        return *from;
    }
    if fraction >= 1.0 {
        return *to;
    }
    // q and -q are the same rotation; pick the one on the near side
    let end = if from.orientation.dot(to.orientation) < 0.0 {
        -to.orientation
    } else {
        to.orientation
    };
    PoseSample {
        position: from.position.lerp(to.position, fraction),
        orientation: from.orientation.slerp(end, fraction).normalize(),
    }
}

/// State of one playback, alive from start until the last camera finishes.
#[derive(Debug, Clone)]
pub struct PlaybackRun {
    recording: Recording,
    camera_count: usize,
    camera_index: usize,
    sample_index: usize,
    /// Dilated seconds into the current segment
    segment_elapsed: f32,
    playback_speed: f32,
    time_per_sample: f32,
}

impl PlaybackRun {
    fn new(recording: Recording, camera_count: usize, playback_speed: f32) -> Self {
        // Spread the measured span evenly over the segments, so a camera's pass
        // lasts exactly total_duration / playback_speed regardless of tick jitter
        let segments = recording.segment_count();
        let time_per_sample = if segments > 0 {
            recording.total_duration() / segments as f32
        } else {
            0.0
        };
        Self {
            recording,
            camera_count,
            camera_index: 0,
            sample_index: 0,
            segment_elapsed: 0.0,
            playback_speed,
            time_per_sample,
        }
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn camera_index(&self) -> usize {
        self.camera_index
    }

    pub fn sample_index(&self) -> usize {
        self.sample_index
    }

    pub fn segment_elapsed(&self) -> f32 {
        self.segment_elapsed
    }

    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    pub fn time_per_sample(&self) -> f32 {
        self.time_per_sample
    }

    /// Real seconds one camera's pass takes
    pub fn pass_duration(&self) -> f32 {
        self.time_per_sample * self.recording.segment_count() as f32 / self.playback_speed
    }

    /// Advance by already-dilated seconds. Returns true once every camera is done.
    fn advance(&mut self, dilated_delta: f32, out: &mut Vec<PlaybackCommand>) -> bool {
        self.segment_elapsed += dilated_delta;
        let segments = self.recording.segment_count();
        loop {
            if self.camera_index >= self.camera_count {
                out.push(PlaybackCommand::Finish);
                return true;
            }

            // Fewer than two samples: nothing to move, run the cameras out
            if segments == 0 {
                self.next_camera(out);
                continue;
            }

            if self.segment_elapsed < self.time_per_sample {
                let fraction = self.segment_elapsed / self.time_per_sample;
                let i = self.sample_index;
                let samples = self.recording.samples();
                out.push(PlaybackCommand::SetPose(interpolate_pose(
                    &samples[i],
                    &samples[i + 1],
                    fraction,
                )));
                return false;
            }

            // Segment complete; carry the overshoot into the next one
            self.segment_elapsed -= self.time_per_sample;
            self.sample_index += 1;
            if self.sample_index >= segments {
                out.push(PlaybackCommand::SetPose(self.recording.samples()[segments]));
                self.next_camera(out);
            }
        }
    }

    fn next_camera(&mut self, out: &mut Vec<PlaybackCommand>) {
        self.camera_index += 1;
        self.sample_index = 0;
        if self.camera_index < self.camera_count {
            out.push(PlaybackCommand::ActivateCamera(self.camera_index));
        }
    }
}

/// Idle or running a single playback. Runs always complete; there is no cancel.
#[derive(Debug, Default)]
pub struct PlaybackScheduler {
    run: Option<PlaybackRun>,
}

impl PlaybackScheduler {
    pub fn phase(&self) -> PlaybackPhase {
        match &self.run {
            Some(run) => PlaybackPhase::Playing {
                camera: run.camera_index,
            },
            None => PlaybackPhase::Idle,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.run.is_some()
    }

    pub fn run(&self) -> Option<&PlaybackRun> {
        self.run.as_ref()
    }

    /// Start playing `recording` across `camera_count` cameras.
    ///
    /// Only starts from Idle with a non-empty recording, at least one camera
    /// and a positive finite speed; returns false and emits nothing otherwise.
    /// On success the first frame's commands (bracket, first camera, first
    /// pose) are emitted immediately.
    pub fn begin(
        &mut self,
        recording: Recording,
        camera_count: usize,
        playback_speed: f32,
        out: &mut Vec<PlaybackCommand>,
    ) -> bool {
        if self.run.is_some() || recording.is_empty() || camera_count == 0 {
            return false;
        }
        if !(playback_speed.is_finite() && playback_speed > 0.0) {
            return false;
        }

        out.push(PlaybackCommand::SuspendPhysics);
        out.push(PlaybackCommand::ActivateCamera(0));
        let mut run = PlaybackRun::new(recording, camera_count, playback_speed);
        if !run.advance(0.0, out) {
            self.run = Some(run);
        }
        true
    }

    /// Advance the running playback by one frame of `delta_secs` real time.
    /// No-op while Idle.
    pub fn advance_frame(&mut self, delta_secs: f32, out: &mut Vec<PlaybackCommand>) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let dilated = delta_secs.max(0.0) * run.playback_speed;
        if run.advance(dilated, out) {
            self.run = None;
        }
    }
}
