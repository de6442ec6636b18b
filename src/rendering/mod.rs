//! Rendering module for 3D graphics and visualization.
//!
//! Owns the perspective camera, orbit controls, procedural mesh builders and
//! the wgpu forward renderer that draws the assembled scene.

pub mod camera;
pub mod mesh;
pub mod renderer;

// Re-export commonly used items
pub use camera::{Camera, OrbitControls};
pub use mesh::MeshData;
pub use renderer::Renderer;

/// Common vertex type for 3D rendering.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Get the vertex buffer layout for wgpu
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-frame uniform data shared by every draw call. Layout mirrors the
/// `Globals` struct in `scene.wgsl`; all vec3 payloads are padded to vec4.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// rgb = fog color, a = exp2 fog density
    pub fog: [f32; 4],
    pub light0_dir: [f32; 4],
    pub light0_color: [f32; 4],
    pub light1_dir: [f32; 4],
    pub light1_color: [f32; 4],
    pub ambient: [f32; 4],
}

/// Per-object uniform data: model transform plus flat material color.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Locals {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Rendering error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("no compatible graphics adapter")]
    NoAdapter,
    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

pub type RenderResult<T> = Result<T, RenderError>;
