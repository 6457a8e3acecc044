use glam::{Quat, Vec3};
use physics::{BodyPose, ColliderDesc, PhysicsError, PhysicsWorld, RigidBodyDesc};

fn sphere_world() -> (PhysicsWorld, physics::BodyHandle, physics::ColliderHandle) {
    let mut world = PhysicsWorld::default();
    let body = world.create_rigid_body(&RigidBodyDesc::dynamic().with_translation(2.5, 5.0, 0.0));
    let collider = world
        .create_collider(
            &ColliderDesc::ball(1.01).with_density(1.5).with_restitution(1.5),
            Some(body),
        )
        .unwrap();
    (world, body, collider)
}

#[test]
fn new_world_reports_gravity_and_counts() {
    let world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
    assert_eq!(world.gravity(), Vec3::new(0.0, -9.81, 0.0));
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.collider_count(), 0);
    assert!(world.timestep() > 0.0);
}

#[test]
fn initial_pose_is_descriptor_pose() {
    let (world, body, collider) = sphere_world();
    assert_eq!(world.translation(body).unwrap(), Vec3::new(2.5, 5.0, 0.0));
    assert_eq!(world.rotation(body).unwrap(), Quat::IDENTITY);
    assert_eq!(world.collider_rotation(collider).unwrap(), Quat::IDENTITY);
    assert_eq!(world.collider_translation(collider).unwrap(), Vec3::new(2.5, 5.0, 0.0));
}

#[test]
fn static_collider_keeps_its_rotation() {
    let mut world = PhysicsWorld::default();
    let tilt = Quat::from_rotation_z(0.1);
    let ground = world
        .create_collider(&ColliderDesc::cuboid(3.0, 0.05, 3.0).with_rotation(tilt), None)
        .unwrap();
    world.step();
    assert!(world.collider_rotation(ground).unwrap().abs_diff_eq(tilt, 1e-6));
}

#[test]
fn reset_body_restores_pose_and_clears_velocity() {
    let (mut world, body, _) = sphere_world();
    world.set_angvel(body, Vec3::new(0.0, 0.0, 3.0)).unwrap();
    for _ in 0..50 {
        world.step();
    }
    assert!(world.linvel(body).unwrap().length() > 0.0);

    world
        .reset_body(body, &BodyPose::at_rest(Vec3::new(2.5, 5.0, 0.0)))
        .unwrap();

    assert_eq!(world.translation(body).unwrap(), Vec3::new(2.5, 5.0, 0.0));
    assert_eq!(world.rotation(body).unwrap(), Quat::IDENTITY);
    assert_eq!(world.linvel(body).unwrap(), Vec3::ZERO);
    assert_eq!(world.angvel(body).unwrap(), Vec3::ZERO);
}

#[test]
fn individual_setters_write_through() {
    let (mut world, body, _) = sphere_world();
    world.set_translation(body, Vec3::new(0.0, 1.0, 0.0)).unwrap();
    world.set_rotation(body, Quat::from_rotation_y(0.5)).unwrap();
    world.set_linvel(body, Vec3::new(1.0, 0.0, 0.0)).unwrap();

    assert_eq!(world.translation(body).unwrap(), Vec3::new(0.0, 1.0, 0.0));
    assert!(world
        .rotation(body)
        .unwrap()
        .abs_diff_eq(Quat::from_rotation_y(0.5), 1e-6));
    assert_eq!(world.linvel(body).unwrap(), Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn handles_from_another_world_are_rejected() {
    let (_, body, collider) = sphere_world();
    let mut empty = PhysicsWorld::default();

    assert_eq!(empty.translation(body), Err(PhysicsError::UnknownBody(body)));
    assert_eq!(
        empty.collider_rotation(collider),
        Err(PhysicsError::UnknownCollider(collider))
    );
    assert_eq!(
        empty.create_collider(&ColliderDesc::ball(1.0), Some(body)),
        Err(PhysicsError::UnknownBody(body))
    );
    assert_eq!(
        empty.reset_body(body, &BodyPose::at_rest(Vec3::ZERO)),
        Err(PhysicsError::UnknownBody(body))
    );
}
