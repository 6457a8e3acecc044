//! # Render
//!
//! Scene graph and `wgpu` renderer for the ball-drop demo.
//!
//! The [`Scene`] is plain CPU data (meshes, camera, light) and can be built
//! and mutated without a GPU. [`run`] opens a window, draws the scene each
//! frame, and calls a user hook right before every draw.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod gpu_types;
pub mod light;
pub mod pipeline;
pub mod renderer;
pub mod run;
pub mod scene;

pub use camera::{ArcRotateCamera, CameraController};
pub use error::SceneError;
pub use light::DirectionalLight;
pub use renderer::Renderer;
pub use run::{run, WindowConfig};
pub use scene::{
    BoxOptions, LineSystem, LineSystemOptions, Mesh, MeshId, MeshKind, Scene, SphereOptions,
    Transform,
};
