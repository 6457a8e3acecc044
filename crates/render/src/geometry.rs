//! Tessellation of scene meshes into GPU vertex lists
//!
//! Everything is emitted as non-indexed lists: triangle lists for solid
//! meshes and line lists for line systems.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::gpu_types::{LineVertex, MeshVertex};
use crate::scene::{BoxOptions, LineSystem, SphereOptions};

fn vertex(position: Vec3, normal: Vec3) -> MeshVertex {
    MeshVertex {
        position: position.to_array(),
        normal: normal.to_array(),
    }
}

/// UV sphere with `segments` latitude bands and twice as many longitudes
pub fn sphere_vertices(options: &SphereOptions) -> Vec<MeshVertex> {
    let radius = options.diameter / 2.0;
    let bands = options.segments.max(3);
    let sectors = bands * 2;

    let point = |band: u32, sector: u32| {
        let theta = PI * band as f32 / bands as f32;
        let phi = TAU * sector as f32 / sectors as f32;
        let normal = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
        vertex(normal * radius, normal)
    };

    let mut vertices = Vec::with_capacity((bands * sectors * 6) as usize);
    for band in 0..bands {
        for sector in 0..sectors {
            let a = point(band, sector);
            let b = point(band + 1, sector);
            let c = point(band + 1, sector + 1);
            let d = point(band, sector + 1);
            vertices.extend_from_slice(&[a, d, c, a, c, b]);
        }
    }
    vertices
}

/// Axis-aligned box centered on the origin, flat-shaded
pub fn box_vertices(options: &BoxOptions) -> Vec<MeshVertex> {
    let h = Vec3::new(options.width, options.height, options.depth) / 2.0;
    // (normal, u axis, v axis) per face; u x v == normal
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let center = normal * h;
        let u = u * h;
        let v = v * h;
        let corners = [
            center - u - v,
            center + u - v,
            center + u + v,
            center - u + v,
        ];
        for i in [0, 1, 2, 0, 2, 3] {
            vertices.push(vertex(corners[i], normal));
        }
    }
    vertices
}

/// Expand every polyline into consecutive segment pairs
pub fn line_list_vertices(system: &LineSystem) -> Vec<LineVertex> {
    let mut vertices = Vec::new();
    for (points, colors) in system.lines.iter().zip(&system.colors) {
        let strip: Vec<LineVertex> = points
            .iter()
            .zip(colors)
            .map(|(p, c)| LineVertex {
                position: p.to_array(),
                color: c.to_array(),
            })
            .collect();
        for pair in strip.windows(2) {
            vertices.extend_from_slice(pair);
        }
    }
    vertices
}
