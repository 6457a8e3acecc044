use criterion::{criterion_group, criterion_main, Criterion};
use glam::{Quat, Vec3};
use physics::{ColliderDesc, PhysicsWorld, RigidBodyDesc};

fn drop_scene() -> PhysicsWorld {
    let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
    world
        .create_collider(
            &ColliderDesc::cuboid(3.0, 0.05, 3.0).with_rotation(Quat::from_rotation_z(0.1)),
            None,
        )
        .unwrap();
    let body = world.create_rigid_body(&RigidBodyDesc::dynamic().with_translation(2.5, 5.0, 0.0));
    world
        .create_collider(&ColliderDesc::ball(1.01).with_restitution(0.5), Some(body))
        .unwrap();
    world
}

fn bench_step(c: &mut Criterion) {
    let mut world = drop_scene();
    c.bench_function("world_step", |b| b.iter(|| world.step()));
}

fn bench_debug_render(c: &mut Criterion) {
    let mut world = drop_scene();
    c.bench_function("debug_render", |b| b.iter(|| world.debug_render()));
}

criterion_group!(benches, bench_step, bench_debug_render);
criterion_main!(benches);
