//! GPU-compatible type definitions for rendering
//!
//! Buffer layouts shared with `mesh.wgsl` and `line.wgsl`. All types are
//! `Pod` so they can be uploaded with `bytemuck` without copies.

use bytemuck::{Pod, Zeroable};

use crate::camera::ArcRotateCamera;
use crate::light::DirectionalLight;
use crate::scene::Mesh;

/// Camera matrices and eye position, group 0 binding 0
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl From<&ArcRotateCamera> for CameraUniform {
    fn from(camera: &ArcRotateCamera) -> Self {
        Self {
            view_proj: camera.build_view_projection_matrix().to_cols_array_2d(),
            eye: camera.eye().extend(1.0).to_array(),
        }
    }
}

/// Directional light, group 0 binding 1
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct LightUniform {
    /// xyz direction the light travels, w intensity
    pub direction: [f32; 4],
    /// x ambient term, rest padding
    pub ambient: [f32; 4],
}

impl From<&DirectionalLight> for LightUniform {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: light.direction.extend(light.intensity).to_array(),
            ambient: [light.ambient, 0.0, 0.0, 0.0],
        }
    }
}

/// Per-mesh model matrix and diffuse color, group 1 binding 0
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl From<&Mesh> for ModelUniform {
    fn from(mesh: &Mesh) -> Self {
        Self {
            model: mesh.transform.matrix().to_cols_array_2d(),
            color: mesh.color.to_array(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
