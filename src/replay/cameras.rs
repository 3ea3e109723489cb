//! Replay camera sequence and follower behaviour

use bevy::prelude::*;

use super::error::ReplayConfigError;
use crate::constants::DEFAULT_FOLLOW_OFFSET;

/// Marker for the gameplay camera that replays take over from
#[derive(Component, Default)]
pub struct PrimaryViewpoint;

/// Lets a replay camera keep the tracked object in view.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ReplayCameraFollow {
    /// Travel with the target at `offset`; otherwise stay put and only turn
    pub moves_with_target: bool,
    pub offset: Vec3,
    target: Option<Entity>,
}

impl Default for ReplayCameraFollow {
    fn default() -> Self {
        Self {
            moves_with_target: false,
            offset: DEFAULT_FOLLOW_OFFSET,
            target: None,
        }
    }
}

impl ReplayCameraFollow {
    /// Fixed camera that only turns to face the target
    pub fn stationary() -> Self {
        Self::default()
    }

    /// Camera that rides along at a fixed offset from the target
    pub fn chase(offset: Vec3) -> Self {
        Self {
            moves_with_target: true,
            offset,
            target: None,
        }
    }

    pub fn start_following(&mut self, target: Entity) {
        self.target = Some(target);
    }

    pub fn stop_following(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn is_following(&self) -> bool {
        self.target.is_some()
    }

    /// Where the camera should sit and look this frame, given the target position
    pub fn placement(&self, current: &Transform, target: Vec3) -> Transform {
        let mut placed = *current;
        if self.moves_with_target {
            placed.translation = target + self.offset;
        }
        placed.look_at(target, Vec3::Y);
        placed
    }
}

/// One stop in the replay camera sequence. The follower lives on the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraEntry {
    pub viewpoint: Entity,
}

/// Which viewpoint is live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveViewpoint {
    /// Replay camera at this sequence index
    Replay(usize),
    /// The gameplay camera
    Primary,
}

/// Ordered, validated replay cameras. Fixed after construction.
#[derive(Debug, Clone)]
pub struct CameraSequenceRegistry {
    entries: Vec<CameraEntry>,
}

impl CameraSequenceRegistry {
    /// Build from (viewpoint, follower) pairs in play order.
    /// Fails when the list is empty or any viewpoint lacks a follower.
    pub fn new<'a>(
        configured: impl IntoIterator<Item = (Entity, Option<&'a ReplayCameraFollow>)>,
    ) -> Result<Self, ReplayConfigError> {
        let mut entries = Vec::new();
        for (index, (viewpoint, follower)) in configured.into_iter().enumerate() {
            if follower.is_none() {
                return Err(ReplayConfigError::MissingFollower {
                    index,
                    entity: viewpoint,
                });
            }
            entries.push(CameraEntry { viewpoint });
        }
        if entries.is_empty() {
            return Err(ReplayConfigError::EmptyCameraSequence);
        }
        Ok(Self { entries })
    }

    /// Build from spawned camera entities, checking each carries both a
    /// Camera and a ReplayCameraFollow.
    pub fn from_world(world: &World, viewpoints: &[Entity]) -> Result<Self, ReplayConfigError> {
        for (index, &entity) in viewpoints.iter().enumerate() {
            if world.get::<Camera>(entity).is_none() {
                return Err(ReplayConfigError::MissingViewpoint { index, entity });
            }
        }
        Self::new(
            viewpoints
                .iter()
                .map(|&entity| (entity, world.get::<ReplayCameraFollow>(entity))),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false once constructed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CameraEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&CameraEntry> {
        self.entries.get(index)
    }

    /// Sequence index of a viewpoint entity
    pub fn index_of(&self, viewpoint: Entity) -> Option<usize> {
        self.entries.iter().position(|e| e.viewpoint == viewpoint)
    }

    /// Whether `viewpoint` should be active when `live` is the live viewpoint
    pub fn is_live(&self, viewpoint: Entity, live: LiveViewpoint) -> bool {
        match live {
            LiveViewpoint::Replay(index) => self.index_of(viewpoint) == Some(index),
            LiveViewpoint::Primary => false,
        }
    }

    /// Activate exactly one viewpoint and deactivate every other, in one pass.
    ///
    /// The live replay camera starts following `target`; every other replay
    /// camera stops following.
    pub fn activate_exclusive(
        &self,
        live: LiveViewpoint,
        target: Entity,
        replay_cameras: &mut Query<
            (Entity, &mut Camera, &mut ReplayCameraFollow),
            Without<PrimaryViewpoint>,
        >,
        primary: &mut Query<&mut Camera, With<PrimaryViewpoint>>,
    ) {
        for (entity, mut camera, mut follow) in replay_cameras.iter_mut() {
            let is_live = self.is_live(entity, live);
            camera.is_active = is_live;
            if is_live {
                follow.start_following(target);
            } else if follow.is_following() {
                follow.stop_following();
            }
        }
        for mut camera in primary.iter_mut() {
            camera.is_active = live == LiveViewpoint::Primary;
        }
    }
}

/// Keep following replay cameras aimed at their target
pub fn replay_camera_follow(
    mut followers: Query<(&mut Transform, &ReplayCameraFollow)>,
    targets: Query<&Transform, Without<ReplayCameraFollow>>,
) {
    for (mut transform, follow) in &mut followers {
        let Some(target) = follow.target() else {
            continue;
        };
        let Ok(target_transform) = targets.get(target) else {
            continue;
        };
        *transform = follow.placement(&transform, target_transform.translation);
    }
}
