use bytemuck::{Pod, Zeroable};

/// Shader input locations shared by every program.
pub mod attrib {
    pub const POSITION: u32 = 0;
    pub const COLOR: u32 = 1;
    pub const UV0: u32 = 2;

    pub const ALL: [u32; 3] = [POSITION, COLOR, UV0];
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;

    pub const fn new(position: [f32; 3], color: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            color,
            uv,
        }
    }

    /// (location, components, byte offset) of each attribute.
    pub(crate) const LAYOUT: [(u32, i32, i32); 3] = [
        (attrib::POSITION, 3, 0),
        (attrib::COLOR, 3, 12),
        (attrib::UV0, 2, 24),
    ];
}
