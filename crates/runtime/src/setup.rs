//! One-time construction of the demo scene and physics world
//!
//! The visual meshes are created first. The physics shapes are then derived
//! from them by name, the way an imported asset would be turned into
//! colliders: the ground cuboid takes the ground mesh's bounding box and
//! rotation, the ball takes the sphere mesh's radius plus a small margin.

use anyhow::{Context, Result};
use glam::{Vec3, Vec4};
use physics::{BodyPose, ColliderDesc, PhysicsWorld, RigidBodyDesc};
use render::{ArcRotateCamera, BoxOptions, DirectionalLight, Scene, SphereOptions};

use crate::config::SceneConfig;
use crate::sync::DemoSynchronizer;

pub const SPHERE_NAME: &str = "Sphere";
pub const GROUND_NAME: &str = "Ground";

const SPHERE_COLOR: Vec4 = Vec4::new(0.85, 0.35, 0.25, 1.0);
const GROUND_COLOR: Vec4 = Vec4::new(0.55, 0.6, 0.55, 1.0);

/// Everything a driver needs to run the demo
pub struct Demo {
    pub world: PhysicsWorld,
    pub scene: Scene,
    pub synchronizer: DemoSynchronizer,
}

/// Camera, light, sphere and tilted ground
///
/// # Errors
///
/// Only fails if a freshly created mesh cannot be found again.
pub fn build_scene(config: &SceneConfig) -> Result<Scene> {
    let cam = &config.camera;
    let mut camera = ArcRotateCamera::new(cam.alpha, cam.beta, cam.radius, Vec3::from(cam.target));
    camera.set_target(Vec3::from(cam.target));
    let light = DirectionalLight::new(
        Vec3::from(config.light.direction),
        config.light.intensity,
    );
    let mut scene = Scene::new(camera, light);

    let sphere = scene.create_sphere(
        SPHERE_NAME,
        SphereOptions {
            diameter: config.sphere.diameter,
            segments: config.sphere.segments,
        },
    );
    scene.set_color(sphere, SPHERE_COLOR)?;

    let ground = scene.create_box(
        GROUND_NAME,
        BoxOptions {
            width: config.ground.width,
            height: config.ground.height,
            depth: config.ground.depth,
        },
    );
    scene.add_rotation(ground, 0.0, 0.0, config.ground.tilt)?;
    scene.set_color(ground, GROUND_COLOR)?;

    Ok(scene)
}

/// Build the scene, derive the physics bodies from its meshes and wire up
/// the synchronizer.
///
/// # Errors
///
/// Fails if the named meshes are missing or a collider cannot be attached.
pub fn build_demo(config: &SceneConfig) -> Result<Demo> {
    let scene = build_scene(config)?;
    let mut world = PhysicsWorld::new(config.gravity());

    let ground = scene
        .mesh_by_name(GROUND_NAME)
        .with_context(|| format!("scene has no mesh named {GROUND_NAME:?}"))?;
    let half_extents = scene.bounding_max(ground)?;
    let ground_rotation = scene.mesh(ground)?.transform.rotation;
    world
        .create_collider(
            &ColliderDesc::cuboid(half_extents.x, half_extents.y, half_extents.z)
                .with_rotation(ground_rotation),
            None,
        )
        .context("failed to create ground collider")?;

    let sphere = scene
        .mesh_by_name(SPHERE_NAME)
        .with_context(|| format!("scene has no mesh named {SPHERE_NAME:?}"))?;
    let bounding = scene.bounding_max(sphere)?;
    let spawn = config.spawn();
    let body = world.create_rigid_body(
        &RigidBodyDesc::dynamic().with_translation(spawn.x, spawn.y, spawn.z),
    );
    let collider = world
        .create_collider(
            &ColliderDesc::ball(bounding.y + config.sphere.collider_margin)
                .with_density(config.sphere.density)
                .with_restitution(config.sphere.restitution),
            Some(body),
        )
        .context("failed to attach sphere collider")?;

    tracing::info!(
        "Scene ready: {} meshes, {} bodies, {} colliders",
        scene.len(),
        world.body_count(),
        world.collider_count()
    );

    let synchronizer = DemoSynchronizer::new(
        body,
        collider,
        sphere,
        BodyPose::at_rest(spawn),
        config.reset.interval,
    );
    Ok(Demo {
        world,
        scene,
        synchronizer,
    })
}
