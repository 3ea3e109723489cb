//! Replay systems - capture, frame advance, and applying playback commands

use bevy::prelude::*;

use super::bracket::{SimulationBody, Velocity, set_physics_enabled};
use super::buffer::PoseSample;
use super::cameras::{LiveViewpoint, PrimaryViewpoint, ReplayCameraFollow};
use super::director::ReplayDirector;
use super::scheduler::PlaybackCommand;
use crate::events::{ReplayEvent, ReplayEventBus};
use crate::tuning::ReplayTuning;

/// Capture the tracked body's pose once per fixed tick while recording
pub fn capture_tracked_pose(mut director: ResMut<ReplayDirector>, bodies: Query<&Transform>) {
    if !director.is_recording() {
        return;
    }
    let Ok(transform) = bodies.get(director.tracked()) else {
        return;
    };
    director.record_pose(PoseSample::from_transform(transform));
}

/// Advance a running replay by this frame's time. No-op while idle.
pub fn advance_playback(time: Res<Time>, mut director: ResMut<ReplayDirector>) {
    director.advance_frame(time.delta_secs());
}

/// Apply queued playback commands to the tracked body and cameras.
///
/// Runs in FixedUpdate right after trigger detection, so physics is suspended
/// before the next fixed tick, and in Update after the frame advance.
pub fn apply_playback_commands(
    mut director: ResMut<ReplayDirector>,
    mut bus: ResMut<ReplayEventBus>,
    mut bodies: Query<(&mut Transform, &mut SimulationBody, &mut Velocity)>,
    mut replay_cameras: Query<
        (Entity, &mut Camera, &mut ReplayCameraFollow),
        Without<PrimaryViewpoint>,
    >,
    mut primary: Query<&mut Camera, With<PrimaryViewpoint>>,
) {
    let commands = director.drain_commands();
    if commands.is_empty() {
        return;
    }

    let tracked = director.tracked();
    let Ok((mut transform, mut body, mut velocity)) = bodies.get_mut(tracked) else {
        warn!(
            "Tracked entity {:?} lacks Transform/SimulationBody/Velocity; dropping {} replay commands",
            tracked,
            commands.len()
        );
        return;
    };
    let registry = director.registry();

    for command in commands {
        match command {
            PlaybackCommand::SuspendPhysics => {
                set_physics_enabled(&mut body, &mut velocity, false);
            }
            PlaybackCommand::ActivateCamera(index) => {
                registry.activate_exclusive(
                    LiveViewpoint::Replay(index),
                    tracked,
                    &mut replay_cameras,
                    &mut primary,
                );
                bus.emit(ReplayEvent::CameraActivated { index });
            }
            PlaybackCommand::SetPose(pose) => {
                pose.apply_to(&mut transform);
            }
            PlaybackCommand::Finish => {
                set_physics_enabled(&mut body, &mut velocity, true);
                registry.activate_exclusive(
                    LiveViewpoint::Primary,
                    tracked,
                    &mut replay_cameras,
                    &mut primary,
                );
                bus.emit(ReplayEvent::PlaybackFinished);
            }
        }
    }
}

/// Push tuning speed changes to the director (used by the next replay)
pub fn sync_playback_speed(tuning: Res<ReplayTuning>, mut director: ResMut<ReplayDirector>) {
    if tuning.is_changed() && director.playback_speed() != tuning.playback_speed {
        director.set_playback_speed(tuning.playback_speed);
        info!("Replay speed set to {}", tuning.speed_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::cameras::CameraSequenceRegistry;

    struct Rig {
        app: App,
        ball: Entity,
        main_camera: Entity,
        replay_cameras: Vec<Entity>,
    }

    fn rig(camera_count: usize) -> Rig {
        let mut app = App::new();
        app.insert_resource(ReplayEventBus::new());

        let world = app.world_mut();
        let ball = world
            .spawn((
                Transform::from_xyz(9.0, 9.0, 9.0),
                SimulationBody::default(),
                Velocity {
                    linear: Vec3::new(0.0, -3.0, 4.0),
                    angular: Vec3::X,
                },
            ))
            .id();
        let main_camera = world.spawn((Camera::default(), PrimaryViewpoint)).id();
        let replay_cameras: Vec<Entity> = (0..camera_count)
            .map(|i| {
                world
                    .spawn((
                        Camera {
                            is_active: false,
                            order: i as isize + 1,
                            ..default()
                        },
                        ReplayCameraFollow::stationary(),
                        Transform::from_xyz(i as f32 * 3.0, 5.0, 0.0),
                    ))
                    .id()
            })
            .collect();

        let registry = CameraSequenceRegistry::from_world(world, &replay_cameras).unwrap();
        world.insert_resource(ReplayDirector::new(ball, registry, 0.5));

        app.add_systems(Update, apply_playback_commands);
        Rig {
            app,
            ball,
            main_camera,
            replay_cameras,
        }
    }

    fn record_three_samples(app: &mut App) {
        let world = app.world_mut();
        world.resource_scope(|world, mut director: Mut<ReplayDirector>| {
            let mut bus = world.resource_mut::<ReplayEventBus>();
            director.start_recording(0.0, &mut bus);
            for x in [0.0, 1.0, 2.0] {
                director.record_pose(PoseSample::new(Vec3::new(x, 1.0, 0.0), Quat::IDENTITY));
            }
            assert!(director.stop_recording_and_play(1.0, &mut bus));
        });
    }

    fn active_cameras(rig: &Rig) -> Vec<Entity> {
        let world = rig.app.world();
        std::iter::once(rig.main_camera)
            .chain(rig.replay_cameras.iter().copied())
            .filter(|&e| world.get::<Camera>(e).is_some_and(|c| c.is_active))
            .collect()
    }

    #[test]
    fn test_full_replay_sequence() {
        let mut rig = rig(2);
        record_three_samples(&mut rig.app);

        // Start: bracket engaged, camera 0 live and following, first pose applied
        rig.app.update();
        assert_eq!(active_cameras(&rig), vec![rig.replay_cameras[0]]);
        {
            let world = rig.app.world();
            let body = world.get::<SimulationBody>(rig.ball).unwrap();
            assert!(!body.is_simulated());
            assert!(!body.detects_collisions());
            assert!(world.get::<Velocity>(rig.ball).unwrap().is_zero());
            assert_eq!(
                world.get::<Transform>(rig.ball).unwrap().translation,
                Vec3::new(0.0, 1.0, 0.0)
            );
            let follow = world.get::<ReplayCameraFollow>(rig.replay_cameras[0]).unwrap();
            assert_eq!(follow.target(), Some(rig.ball));
        }

        // 1s recording at half speed over 2 cameras: 4s of frames
        let mut frames = 0;
        while rig.app.world().resource::<ReplayDirector>().is_replaying() {
            rig.app
                .world_mut()
                .resource_mut::<ReplayDirector>()
                .advance_frame(0.125);
            rig.app.update();
            frames += 1;

            let body = rig.app.world().get::<SimulationBody>(rig.ball).unwrap();
            if rig.app.world().resource::<ReplayDirector>().is_replaying() {
                assert_eq!(active_cameras(&rig).len(), 1);
                assert!(!body.is_simulated());
            }
            assert!(frames < 1000, "replay never finished");
        }
        assert_eq!(frames, 32);

        // End: primary live, replay cameras idle, physics back with no momentum
        assert_eq!(active_cameras(&rig), vec![rig.main_camera]);
        let world = rig.app.world();
        for &camera in &rig.replay_cameras {
            assert!(!world.get::<ReplayCameraFollow>(camera).unwrap().is_following());
        }
        let body = world.get::<SimulationBody>(rig.ball).unwrap();
        assert!(body.is_simulated());
        assert!(body.detects_collisions());
        assert!(world.get::<Velocity>(rig.ball).unwrap().is_zero());
        assert_eq!(
            world.get::<Transform>(rig.ball).unwrap().translation,
            Vec3::new(2.0, 1.0, 0.0)
        );

        let events: Vec<ReplayEvent> = rig
            .app
            .world_mut()
            .resource_mut::<ReplayEventBus>()
            .drain()
            .into_iter()
            .map(|e| e.event)
            .filter(|e| {
                matches!(
                    e,
                    ReplayEvent::CameraActivated { .. } | ReplayEvent::PlaybackFinished
                )
            })
            .collect();
        assert_eq!(
            events,
            vec![
                ReplayEvent::CameraActivated { index: 0 },
                ReplayEvent::CameraActivated { index: 1 },
                ReplayEvent::PlaybackFinished,
            ]
        );
    }

    #[test]
    fn test_capture_only_while_recording() {
        let mut rig = rig(1);
        rig.app.add_systems(Update, capture_tracked_pose);

        rig.app.update();
        assert!(rig.app.world().resource::<ReplayDirector>().buffer().is_empty());

        rig.app
            .world_mut()
            .resource_scope(|world, mut director: Mut<ReplayDirector>| {
                let mut bus = world.resource_mut::<ReplayEventBus>();
                director.start_recording(0.0, &mut bus);
            });
        rig.app.update();
        rig.app.update();

        let director = rig.app.world().resource::<ReplayDirector>();
        assert_eq!(director.buffer().len(), 2);
        assert_eq!(
            director.buffer().samples()[0].position,
            Vec3::new(9.0, 9.0, 9.0)
        );
    }

    #[test]
    fn test_tuning_change_reaches_director() {
        let mut rig = rig(1);
        rig.app.insert_resource(ReplayTuning::default());
        rig.app.add_systems(Update, sync_playback_speed);

        rig.app.world_mut().resource_mut::<ReplayTuning>().speed_up();
        rig.app.update();
        assert_eq!(
            rig.app.world().resource::<ReplayDirector>().playback_speed(),
            1.0
        );
    }
}
