//! Camera system for 2D visualization

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Camera uniform for GPU
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub position: [f32; 2],
    pub zoom: f32,
    pub aspect_ratio: f32,
}

/// Pannable, zoomable orthographic camera
///
/// Panning is expressed in screen-relative units: the world distance covered
/// per frame grows as the camera zooms out.
pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
    pub aspect: f32,
    pub move_speed: f32,
    pub zoom_step: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 0.05,
            aspect: aspect_ratio(width, height),
            move_speed: 0.04,
            zoom_step: 0.05,
        }
    }

    /// Move one frame's worth in `direction` (each component -1, 0 or 1)
    pub fn pan(&mut self, direction: Vec2) {
        self.position += direction * self.move_speed / self.zoom;
    }

    pub fn zoom_in(&mut self) {
        self.zoom *= 1.0 + self.zoom_step;
    }

    pub fn zoom_out(&mut self) {
        self.zoom *= 1.0 - self.zoom_step;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Same transform the vertex shader applies
    pub fn world_to_clip(&self, world: Vec2) -> Vec2 {
        let ndc = (world - self.position) * self.zoom;
        Vec2::new(ndc.x / self.aspect, ndc.y)
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            position: self.position.to_array(),
            zoom: self.zoom,
            aspect_ratio: self.aspect,
        }
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
