//! Slowmo Replay demo - throw a ball at the hoop and watch the replay
//!
//! Main entry point: scene setup, host physics, and key bindings.
//! Space throws, R respawns, Up/Down change replay speed.

use bevy::prelude::*;
use rand::Rng;
use slowmo_replay::constants::*;
use slowmo_replay::replay::{
    PrimaryViewpoint, ReplayCameraFollow, ReplayDirector, ReplayPlugin, ReplayRig, ReplaySystems,
    SimulationBody, TriggerZone, Velocity, ZoneRole, not_replay_active,
};
use slowmo_replay::{ReplayEventBus, ReplayTuning};

/// The thrown ball
#[derive(Component)]
struct Ball;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Slowmo Replay".into(),
                    ..default()
                }),
                ..default()
            }),
            ReplayPlugin,
        ))
        .add_systems(Startup, setup)
        // Host physics runs before capture so each sample is the post-step pose
        .add_systems(
            FixedUpdate,
            (ball_gravity, apply_velocity, floor_bounce)
                .chain()
                .before(ReplaySystems::Capture),
        )
        .add_systems(
            Update,
            (throw_ball, respawn_ball, follow_ball_with_main_camera)
                .run_if(not_replay_active)
                .before(ReplaySystems::Playback),
        )
        .add_systems(Update, change_replay_speed)
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    tuning: Res<ReplayTuning>,
) {
    // Court floor
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(30.0, 30.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.55, 0.4, 0.25))),
        Transform::from_xyz(0.0, FLOOR_Y, 0.0),
    ));

    // Hoop ring marker
    commands.spawn((
        Mesh3d(meshes.add(Torus::new(0.55, 0.65))),
        MeshMaterial3d(materials.add(Color::srgb(0.9, 0.35, 0.1))),
        Transform::from_translation(HOOP_POSITION),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, -4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let ball = commands
        .spawn((
            Ball,
            Mesh3d(meshes.add(Sphere::new(BALL_RADIUS))),
            MeshMaterial3d(materials.add(Color::srgb(0.95, 0.5, 0.15))),
            Transform::from_translation(BALL_SPAWN),
            SimulationBody::default(),
            Velocity::default(),
        ))
        .id();

    // Arm zone at the rim, fire zone just below it
    commands.spawn((
        Transform::from_translation(HOOP_POSITION),
        TriggerZone::new(ZoneRole::Arm, HOOP_ZONE_HALF_EXTENTS),
    ));
    commands.spawn((
        Transform::from_translation(HOOP_POSITION - Vec3::Y * HOOP_FIRE_DROP),
        TriggerZone::new(ZoneRole::Fire, HOOP_ZONE_HALF_EXTENTS),
    ));

    commands.spawn((
        Camera3d::default(),
        Camera {
            order: 0,
            ..default()
        },
        Transform::from_translation(BALL_SPAWN + MAIN_CAMERA_OFFSET)
            .looking_at(BALL_SPAWN, Vec3::Y),
        PrimaryViewpoint,
    ));

    // Replay cameras in play order: sideline, chase, under the hoop
    let replay_views = [
        (
            Transform::from_xyz(10.0, 3.0, 0.0),
            ReplayCameraFollow::stationary(),
        ),
        (
            Transform::from_translation(BALL_SPAWN + tuning.follow_offset()),
            ReplayCameraFollow::chase(tuning.follow_offset()),
        ),
        (
            Transform::from_xyz(1.5, 1.0, 9.0),
            ReplayCameraFollow::stationary(),
        ),
    ];
    let viewpoints: Vec<Entity> = replay_views
        .into_iter()
        .enumerate()
        .map(|(i, (transform, follow))| {
            commands
                .spawn((
                    Camera3d::default(),
                    Camera {
                        is_active: false,
                        order: i as isize + 1,
                        ..default()
                    },
                    transform.looking_at(HOOP_POSITION, Vec3::Y),
                    follow,
                ))
                .id()
        })
        .collect();

    commands.insert_resource(ReplayRig {
        tracked: ball,
        viewpoints,
    });
}

/// Apply gravity to simulated bodies
fn ball_gravity(mut query: Query<(&mut Velocity, &SimulationBody), With<Ball>>, time: Res<Time>) {
    let dt = time.delta_secs();
    for (mut velocity, body) in &mut query {
        if body.is_simulated() {
            velocity.linear.y -= BALL_GRAVITY * dt;
        }
    }
}

/// Integrate position and spin
fn apply_velocity(mut query: Query<(&mut Transform, &Velocity, &SimulationBody)>, time: Res<Time>) {
    let dt = time.delta_secs();
    for (mut transform, velocity, body) in &mut query {
        if !body.is_simulated() {
            continue;
        }
        transform.translation += velocity.linear * dt;
        transform.rotate(Quat::from_scaled_axis(velocity.angular * dt));
    }
}

/// Bounce off the floor, losing energy each time
fn floor_bounce(mut query: Query<(&mut Transform, &mut Velocity, &SimulationBody), With<Ball>>) {
    for (mut transform, mut velocity, body) in &mut query {
        if !body.detects_collisions() {
            continue;
        }
        let floor = FLOOR_Y + BALL_RADIUS;
        if transform.translation.y < floor {
            transform.translation.y = floor;
            if velocity.linear.y < 0.0 {
                velocity.linear.y = -velocity.linear.y * BALL_BOUNCE;
                velocity.linear.x *= BALL_BOUNCE;
                velocity.linear.z *= BALL_BOUNCE;
                velocity.angular *= BALL_BOUNCE;
            }
        }
    }
}

/// Space: launch the ball at the hoop and start recording the shot
fn throw_ball(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time<Virtual>>,
    mut director: ResMut<ReplayDirector>,
    mut bus: ResMut<ReplayEventBus>,
    mut query: Query<(&mut Transform, &mut Velocity), With<Ball>>,
) {
    if !keyboard.just_pressed(KeyCode::Space) {
        return;
    }
    let Ok((mut transform, mut velocity)) = query.single_mut() else {
        return;
    };

    let mut rng = rand::thread_rng();
    let jitter = rng.gen_range(-THROW_SPEED_JITTER..THROW_SPEED_JITTER);
    let speed = THROW_SPEED * (1.0 + jitter);

    transform.translation = BALL_SPAWN;
    transform.rotation = Quat::IDENTITY;
    velocity.linear = THROW_DIRECTION.normalize() * speed;
    velocity.angular = THROW_SPIN;

    if director.start_recording(time.elapsed_secs_f64(), &mut bus) {
        info!("Throw at {:.2} m/s", speed);
    }
}

/// R: put the ball back at the spawn point
fn respawn_ball(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&mut Transform, &mut Velocity), With<Ball>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyR) {
        return;
    }
    for (mut transform, mut velocity) in &mut query {
        transform.translation = BALL_SPAWN;
        transform.rotation = Quat::IDENTITY;
        velocity.zero();
    }
}

/// Up/Down: step through replay speed presets
fn change_replay_speed(keyboard: Res<ButtonInput<KeyCode>>, mut tuning: ResMut<ReplayTuning>) {
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        tuning.speed_up();
    } else if keyboard.just_pressed(KeyCode::ArrowDown) {
        tuning.speed_down();
    }
}

/// Keep the gameplay camera trailing the ball
fn follow_ball_with_main_camera(
    ball: Query<&Transform, With<Ball>>,
    mut camera: Query<&mut Transform, (With<PrimaryViewpoint>, Without<Ball>)>,
) {
    let Ok(ball) = ball.single() else {
        return;
    };
    for mut transform in &mut camera {
        *transform = Transform::from_translation(ball.translation + MAIN_CAMERA_OFFSET)
            .looking_at(ball.translation, Vec3::Y);
    }
}
