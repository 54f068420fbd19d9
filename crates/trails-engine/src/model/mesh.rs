use crate::error::Result;
use crate::gl::{Gpu, RawId};
use crate::resource::guard::SlotGuard;
use crate::resource::{BufferObject, Handle, Slot};

use super::vertex::Vertex;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
    TriangleFan,
    Lines,
    LineStrip,
}

impl Primitive {
    pub fn gl(self) -> u32 {
        match self {
            Primitive::Triangles => glow::TRIANGLES,
            Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
            Primitive::TriangleFan => glow::TRIANGLE_FAN,
            Primitive::Lines => glow::LINES,
            Primitive::LineStrip => glow::LINE_STRIP,
        }
    }
}

/// How often the vertex data is expected to change.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Usage {
    Static,
    Dynamic,
    Stream,
}

impl Usage {
    pub fn gl(self) -> u32 {
        match self {
            Usage::Static => glow::STATIC_DRAW,
            Usage::Dynamic => glow::DYNAMIC_DRAW,
            Usage::Stream => glow::STREAM_DRAW,
        }
    }
}

/// CPU-side geometry ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub primitive: Primitive,
}

/// A vertex buffer plus what it takes to draw it.
#[derive(Debug)]
pub struct Model {
    buffer: Handle<BufferObject>,
    count: usize,
    primitive: Primitive,
    usage: Usage,
}

const ARRAY_BUFFER: Slot = Slot::buffer(glow::ARRAY_BUFFER);

impl Model {
    pub fn upload(
        gpu: &Gpu,
        vertices: &[Vertex],
        primitive: Primitive,
        usage: Usage,
    ) -> Result<Self> {
        let mut model = Self {
            buffer: Handle::create(gpu)?,
            count: 0,
            primitive,
            usage,
        };
        model.replace(vertices)?;
        Ok(model)
    }

    pub fn from_mesh(gpu: &Gpu, mesh: &Mesh, usage: Usage) -> Result<Self> {
        Self::upload(gpu, &mesh.vertices, mesh.primitive, usage)
    }

    /// Replaces the vertex data, keeping primitive and usage.
    pub fn replace(&mut self, vertices: &[Vertex]) -> Result<()> {
        let gpu = self.buffer.require()?;
        let _bound = SlotGuard::bind(gpu, ARRAY_BUFFER, self.buffer.raw())?;
        gpu.gl()
            .buffer_data(glow::ARRAY_BUFFER, bytemuck::cast_slice(vertices), self.usage.gl());
        self.count = vertices.len();
        Ok(())
    }

    pub fn raw(&self) -> RawId {
        self.buffer.raw()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    /// Binds the buffer and enables the vertex attributes.
    pub fn select(&self) -> Result<SelectModel<'_>> {
        let gpu = self.buffer.require()?;
        let guard = SlotGuard::bind(gpu, ARRAY_BUFFER, self.raw())?;
        let gl = gpu.gl();
        for (location, components, offset) in Vertex::LAYOUT {
            gl.enable_vertex_attrib_array(location);
            gl.vertex_attrib_pointer_f32(location, components, false, Vertex::STRIDE, offset);
        }
        Ok(SelectModel {
            guard,
            model: Some(self),
        })
    }
}

/// A model ready to draw.
#[derive(Debug, Default)]
pub struct SelectModel<'r> {
    guard: SlotGuard,
    model: Option<&'r Model>,
}

impl<'r> SelectModel<'r> {
    pub fn is_bound(&self) -> bool {
        !self.guard.is_empty()
    }

    pub fn resource(&self) -> Option<&'r Model> {
        self.model
    }

    pub fn draw(&self) -> Result<()> {
        let (gpu, _) = self.guard.live("model")?;
        if let Some(model) = self.model.filter(|m| !m.is_empty()) {
            gpu.gl()
                .draw_arrays(model.primitive.gl(), 0, model.count as i32);
        }
        Ok(())
    }

    /// Disables the attributes and unbinds. Idempotent.
    pub fn release(&mut self) {
        if let Ok((gpu, _)) = self.guard.live("model") {
            for location in Vertex::LAYOUT.map(|(l, _, _)| l) {
                gpu.gl().disable_vertex_attrib_array(location);
            }
        }
        self.guard.release();
        self.model = None;
    }

    pub fn take(&mut self) -> Self {
        Self {
            guard: self.guard.take(),
            model: self.model.take(),
        }
    }
}

impl Drop for SelectModel<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
