//! Sprite geometry drawn once per particle

use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 2],
}

impl MeshVertex {
    pub const fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: &[wgpu::VertexAttribute] = &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x2,
        }];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRIBUTES,
        }
    }
}

/// Indexed triangle list in particle-local space
#[derive(Clone, Debug)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Triangle fan: centre vertex followed by `segments` rim vertices
    pub fn circle(radius: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let dtheta = TAU / segments as f32;

        let mut vertices = Vec::with_capacity(segments as usize + 1);
        vertices.push(MeshVertex { position: [0.0, 0.0] });
        vertices.extend((0..segments).map(|i| {
            let theta = dtheta * i as f32 - 1.0;
            MeshVertex {
                position: [radius * theta.cos(), radius * theta.sin()],
            }
        }));

        let indices = (0..segments)
            .flat_map(|i| [0, i % segments + 1, (i + 1) % segments + 1])
            .collect();

        Self { vertices, indices }
    }

    /// Single triangle, the cheapest stand-in for a circle
    pub fn triangle() -> Self {
        Self {
            vertices: vec![
                MeshVertex { position: [-0.5, -0.5] },
                MeshVertex { position: [0.5, -0.5] },
                MeshVertex { position: [0.0, 0.5] },
            ],
            indices: vec![0, 1, 2],
        }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}
