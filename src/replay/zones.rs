//! Box trigger zones around the hoop
//!
//! Entry is edge-detected per zone against the tracked body's position. A body
//! with collision detection suppressed never counts as inside, so the replayed
//! ball cannot re-trigger the gate it is replaying.

use bevy::prelude::*;

use super::bracket::SimulationBody;
use super::director::ReplayDirector;
use super::gate::ZoneRole;
use crate::events::ReplayEventBus;

#[derive(Component, Debug, Clone)]
pub struct TriggerZone {
    pub role: ZoneRole,
    pub half_extents: Vec3,
    occupied: bool,
}

impl TriggerZone {
    pub fn new(role: ZoneRole, half_extents: Vec3) -> Self {
        Self {
            role,
            half_extents,
            occupied: false,
        }
    }

    /// Axis-aligned containment test around the zone's center
    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        let d = (point - center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y && d.z <= self.half_extents.z
    }

    /// Record this tick's occupancy. Returns true only on entry.
    pub fn update_occupancy(&mut self, inside: bool) -> bool {
        let entered = inside && !self.occupied;
        self.occupied = inside;
        entered
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }
}

/// Detect zone entries for the tracked body and forward them to the director.
/// Arm entries are delivered before fire entries from the same tick.
pub fn detect_zone_entries(
    time: Res<Time<Virtual>>,
    mut director: ResMut<ReplayDirector>,
    mut bus: ResMut<ReplayEventBus>,
    bodies: Query<(&Transform, &SimulationBody)>,
    mut zones: Query<(&Transform, &mut TriggerZone), Without<SimulationBody>>,
) {
    let Ok((body_transform, body)) = bodies.get(director.tracked()) else {
        return;
    };
    let collides = body.detects_collisions();

    let mut entered: Vec<ZoneRole> = Vec::new();
    for (zone_transform, mut zone) in &mut zones {
        let inside = collides && zone.contains(zone_transform.translation, body_transform.translation);
        if zone.update_occupancy(inside) {
            debug!("Tracked body entered {} zone", zone.role);
            entered.push(zone.role);
        }
    }
    entered.sort_by_key(|role| *role == ZoneRole::Fire);

    let now = time.elapsed_secs_f64();
    for role in entered {
        director.on_zone_entered(role, now, &mut bus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::bracket::{Velocity, set_physics_enabled};
    use crate::replay::buffer::PoseSample;
    use crate::replay::cameras::{CameraSequenceRegistry, ReplayCameraFollow};
    use crate::replay::scheduler::PlaybackCommand;

    #[test]
    fn test_contains_is_inclusive_box() {
        let zone = TriggerZone::new(ZoneRole::Arm, Vec3::new(1.0, 0.5, 1.0));
        let center = Vec3::new(0.0, 4.0, 6.0);
        assert!(zone.contains(center, center));
        assert!(zone.contains(center, center + Vec3::new(1.0, -0.5, 1.0)));
        assert!(!zone.contains(center, center + Vec3::new(0.0, 0.51, 0.0)));
        assert!(!zone.contains(center, center + Vec3::new(-1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_occupancy_edge_detection() {
        let mut zone = TriggerZone::new(ZoneRole::Fire, Vec3::ONE);
        assert!(zone.update_occupancy(true));
        assert!(!zone.update_occupancy(true));
        assert!(zone.is_occupied());
        assert!(!zone.update_occupancy(false));
        assert!(zone.update_occupancy(true));
    }

    fn zone_app(ball_at: Vec3) -> (App, Entity) {
        let mut app = App::new();
        app.init_resource::<Time<Virtual>>();
        app.insert_resource(ReplayEventBus::new());

        let ball = app
            .world_mut()
            .spawn((Transform::from_translation(ball_at), SimulationBody::default(), Velocity::default()))
            .id();
        let camera = app.world_mut().spawn_empty().id();
        let follow = ReplayCameraFollow::stationary();
        let registry = CameraSequenceRegistry::new([(camera, Some(&follow))]).unwrap();
        app.insert_resource(ReplayDirector::new(ball, registry, 0.5));

        // Arm zone above the fire zone, both overlapping at y = 4.0
        app.world_mut().spawn((
            Transform::from_xyz(0.0, 4.2, 0.0),
            TriggerZone::new(ZoneRole::Arm, Vec3::new(1.0, 0.3, 1.0)),
        ));
        app.world_mut().spawn((
            Transform::from_xyz(0.0, 3.8, 0.0),
            TriggerZone::new(ZoneRole::Fire, Vec3::new(1.0, 0.3, 1.0)),
        ));
        app.add_systems(Update, detect_zone_entries);
        (app, ball)
    }

    #[test]
    fn test_same_tick_arm_and_fire_fires_once() {
        let (mut app, _ball) = zone_app(Vec3::new(0.0, 4.0, 0.0));
        {
            let world = app.world_mut();
            let mut bus = ReplayEventBus::new();
            let mut director = world.resource_mut::<ReplayDirector>();
            director.start_recording(0.0, &mut bus);
            director.record_pose(PoseSample::new(Vec3::ZERO, Quat::IDENTITY));
            director.record_pose(PoseSample::new(Vec3::Y, Quat::IDENTITY));
        }

        let suspends = |app: &App| {
            app.world()
                .resource::<ReplayDirector>()
                .pending_commands()
                .iter()
                .filter(|c| matches!(c, PlaybackCommand::SuspendPhysics))
                .count()
        };

        app.update();
        assert_eq!(suspends(&app), 1);
        assert!(!app.world().resource::<ReplayDirector>().gate().is_armed());

        // Staying inside does not fire again
        app.update();
        assert_eq!(suspends(&app), 1);
    }

    #[test]
    fn test_suppressed_body_does_not_trigger() {
        let (mut app, ball) = zone_app(Vec3::new(0.0, 4.3, 0.0));
        {
            let mut entity = app.world_mut().entity_mut(ball);
            let mut velocity = *entity.get::<Velocity>().unwrap();
            let mut body = entity.get_mut::<SimulationBody>().unwrap();
            set_physics_enabled(&mut body, &mut velocity, false);
        }

        app.update();
        let director = app.world().resource::<ReplayDirector>();
        assert!(!director.gate().is_armed());
    }

    #[test]
    fn test_arm_zone_arms_gate() {
        let (mut app, _ball) = zone_app(Vec3::new(0.0, 4.45, 0.0));
        app.update();
        assert!(app.world().resource::<ReplayDirector>().gate().is_armed());
        let events = app.world_mut().resource_mut::<ReplayEventBus>().drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, crate::events::ReplayEvent::GateArmed);
    }
}
