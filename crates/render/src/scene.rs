//! CPU-side scene graph
//!
//! The [`Scene`] owns every visual object together with the camera and light.
//! It holds no GPU resources: the [`Renderer`](crate::renderer::Renderer)
//! reads it each frame and uploads whatever changed. That keeps all scene
//! manipulation testable without a device.

use glam::{EulerRot, Quat, Vec3, Vec4};

use crate::camera::ArcRotateCamera;
use crate::error::SceneError;
use crate::light::DirectionalLight;

/// Stable index of a mesh inside its [`Scene`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(usize);

/// Absolute pose of a mesh
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereOptions {
    pub diameter: f32,
    pub segments: u32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            diameter: 1.0,
            segments: 32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxOptions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }
}

/// A set of polylines; each inner vector of points is drawn as one strip
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineSystemOptions {
    pub lines: Vec<Vec<Vec3>>,
    pub colors: Vec<Vec<Vec4>>,
    pub updatable: bool,
}

/// Line geometry stored in the scene
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineSystem {
    pub lines: Vec<Vec<Vec3>>,
    pub colors: Vec<Vec<Vec4>>,
    pub updatable: bool,
    pub(crate) revision: u64,
}

impl LineSystem {
    /// Bumped on every in-place update so the renderer knows to re-upload
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn point_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MeshKind {
    Sphere(SphereOptions),
    Box(BoxOptions),
    Lines(LineSystem),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub kind: MeshKind,
    pub transform: Transform,
    /// Diffuse color, RGBA
    pub color: Vec4,
}

impl Mesh {
    /// Maximum corner of the local-space bounding box
    pub fn bounding_max(&self) -> Vec3 {
        match &self.kind {
            MeshKind::Sphere(o) => Vec3::splat(o.diameter / 2.0),
            MeshKind::Box(o) => Vec3::new(o.width, o.height, o.depth) / 2.0,
            MeshKind::Lines(l) => l
                .lines
                .iter()
                .flatten()
                .copied()
                .reduce(Vec3::max)
                .unwrap_or(Vec3::ZERO),
        }
    }

    pub fn as_line_system(&self) -> Option<&LineSystem> {
        match &self.kind {
            MeshKind::Lines(l) => Some(l),
            _ => None,
        }
    }
}

const DEFAULT_MESH_COLOR: Vec4 = Vec4::new(0.8, 0.8, 0.8, 1.0);

/// Scene graph: meshes, camera and light
pub struct Scene {
    meshes: Vec<Mesh>,
    pub camera: ArcRotateCamera,
    pub light: DirectionalLight,
    pub clear_color: Vec4,
}

impl Scene {
    pub fn new(camera: ArcRotateCamera, light: DirectionalLight) -> Self {
        Self {
            meshes: Vec::new(),
            camera,
            light,
            clear_color: Vec4::new(0.2, 0.2, 0.3, 1.0),
        }
    }

    fn push(&mut self, name: &str, kind: MeshKind) -> MeshId {
        let id = MeshId(self.meshes.len());
        self.meshes.push(Mesh {
            name: name.to_owned(),
            kind,
            transform: Transform::IDENTITY,
            color: DEFAULT_MESH_COLOR,
        });
        tracing::debug!(name, ?id, "mesh added to scene");
        id
    }

    pub fn create_sphere(&mut self, name: &str, options: SphereOptions) -> MeshId {
        self.push(name, MeshKind::Sphere(options))
    }

    pub fn create_box(&mut self, name: &str, options: BoxOptions) -> MeshId {
        self.push(name, MeshKind::Box(options))
    }

    /// Add a line system. Every line needs exactly one color per point.
    /// Points are in mesh-local space and follow the mesh transform like
    /// any other mesh.
    pub fn create_line_system(
        &mut self,
        name: &str,
        options: LineSystemOptions,
    ) -> Result<MeshId, SceneError> {
        validate_lines(&options.lines, &options.colors)?;
        Ok(self.push(
            name,
            MeshKind::Lines(LineSystem {
                lines: options.lines,
                colors: options.colors,
                updatable: options.updatable,
                revision: 0,
            }),
        ))
    }

    /// Replace the geometry of an updatable line system in place
    pub fn update_line_system(
        &mut self,
        id: MeshId,
        lines: Vec<Vec<Vec3>>,
        colors: Vec<Vec<Vec4>>,
    ) -> Result<(), SceneError> {
        let mesh = self.mesh_mut(id)?;
        let MeshKind::Lines(system) = &mut mesh.kind else {
            return Err(SceneError::NotALineSystem(id));
        };
        if !system.updatable {
            return Err(SceneError::NotUpdatable(id));
        }
        validate_lines(&lines, &colors)?;
        system.lines = lines;
        system.colors = colors;
        system.revision += 1;
        Ok(())
    }

    pub fn mesh(&self, id: MeshId) -> Result<&Mesh, SceneError> {
        self.meshes.get(id.0).ok_or(SceneError::UnknownMesh(id))
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Result<&mut Mesh, SceneError> {
        self.meshes.get_mut(id.0).ok_or(SceneError::UnknownMesh(id))
    }

    /// First mesh with the given name
    pub fn mesh_by_name(&self, name: &str) -> Option<MeshId> {
        self.meshes.iter().position(|m| m.name == name).map(MeshId)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().enumerate().map(|(i, m)| (MeshId(i), m))
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn set_absolute_position(&mut self, id: MeshId, position: Vec3) -> Result<(), SceneError> {
        self.mesh_mut(id)?.transform.position = position;
        Ok(())
    }

    pub fn set_rotation_quaternion(&mut self, id: MeshId, rotation: Quat) -> Result<(), SceneError> {
        self.mesh_mut(id)?.transform.rotation = rotation;
        Ok(())
    }

    /// Compose an extra yaw (`y`), pitch (`x`) and roll (`z`) rotation onto
    /// the mesh's current rotation, in local space
    pub fn add_rotation(&mut self, id: MeshId, x: f32, y: f32, z: f32) -> Result<(), SceneError> {
        let mesh = self.mesh_mut(id)?;
        let extra = Quat::from_euler(EulerRot::YXZ, y, x, z);
        mesh.transform.rotation = (mesh.transform.rotation * extra).normalize();
        Ok(())
    }

    pub fn set_color(&mut self, id: MeshId, color: Vec4) -> Result<(), SceneError> {
        self.mesh_mut(id)?.color = color;
        Ok(())
    }

    pub fn bounding_max(&self, id: MeshId) -> Result<Vec3, SceneError> {
        Ok(self.mesh(id)?.bounding_max())
    }
}

fn validate_lines(lines: &[Vec<Vec3>], colors: &[Vec<Vec4>]) -> Result<(), SceneError> {
    if lines.len() != colors.len() {
        return Err(SceneError::LineCountMismatch {
            lines: lines.len(),
            colors: colors.len(),
        });
    }
    for (line, (points, cols)) in lines.iter().zip(colors).enumerate() {
        if points.len() != cols.len() {
            return Err(SceneError::LineColorMismatch {
                line,
                points: points.len(),
                colors: cols.len(),
            });
        }
    }
    Ok(())
}
