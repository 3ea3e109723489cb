//! Pose capture buffer
//!
//! Poses are appended once per fixed tick while recording. Stopping freezes the
//! samples and the measured wall-clock span into a [`Recording`] that a playback
//! run takes by value.

use bevy::prelude::*;

/// A captured placement of the tracked object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub position: Vec3,
    pub orientation: Quat,
}

impl PoseSample {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Capture the current placement from a transform
    pub fn from_transform(transform: &Transform) -> Self {
        Self::new(transform.translation, transform.rotation)
    }

    /// Write this pose into a transform (scale is left untouched)
    pub fn apply_to(&self, transform: &mut Transform) {
        transform.translation = self.position;
        transform.rotation = self.orientation;
    }
}

/// Frozen result of one recording session.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    samples: Vec<PoseSample>,
    /// Seconds between start and stop
    total_duration: f32,
}

impl Recording {
    pub fn new(samples: Vec<PoseSample>, total_duration: f32) -> Self {
        Self {
            samples,
            total_duration: total_duration.max(0.0),
        }
    }

    pub fn samples(&self) -> &[PoseSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    /// Number of interpolation segments (consecutive sample pairs)
    pub fn segment_count(&self) -> usize {
        self.samples.len().saturating_sub(1)
    }
}

/// Append-only pose buffer with recording state.
#[derive(Debug, Default)]
pub struct PoseSampleBuffer {
    samples: Vec<PoseSample>,
    recording: bool,
    /// Clock reading (seconds) when the current session started
    recording_start_time: f64,
    /// Seconds between the last start and stop
    total_duration: f32,
}

impl PoseSampleBuffer {
    /// Begin a new session, discarding anything captured before.
    /// Calling this while already recording restarts from empty.
    pub fn start_recording(&mut self, now: f64) {
        self.samples.clear();
        self.recording = true;
        self.recording_start_time = now;
        self.total_duration = 0.0;
    }

    /// Append one pose. Ignored unless a session is active.
    pub fn capture_tick(&mut self, pose: PoseSample) {
        if !self.recording {
            return;
        }
        self.samples.push(pose);
    }

    /// End the session and measure its span.
    /// Returns false when nothing was captured (no playback should follow).
    pub fn stop_recording(&mut self, now: f64) -> bool {
        if self.recording {
            self.total_duration = (now - self.recording_start_time).max(0.0) as f32;
            self.recording = false;
        }
        !self.samples.is_empty()
    }

    /// Hand the captured samples to a playback run, leaving the buffer empty.
    /// Returns None while recording or when nothing was captured.
    pub fn take_recording(&mut self) -> Option<Recording> {
        if self.recording || self.samples.is_empty() {
            return None;
        }
        let samples = std::mem::take(&mut self.samples);
        Some(Recording::new(samples, self.total_duration))
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PoseSample] {
        &self.samples
    }

    pub fn recording_start_time(&self) -> f64 {
        self.recording_start_time
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }
}
