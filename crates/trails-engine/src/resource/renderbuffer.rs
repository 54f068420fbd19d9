use crate::error::Result;
use crate::gl::{Gpu, RawId};

use super::guard::{guard_common, SlotGuard};
use super::handle::{Handle, RenderbufferObject};
use super::slot::Slot;

/// Renderbuffer internal formats available on GLES2.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StorageFormat {
    Depth16,
    Stencil8,
    Rgba4,
    Rgb565,
    Rgb5A1,
}

impl StorageFormat {
    pub fn gl(self) -> u32 {
        match self {
            StorageFormat::Depth16 => glow::DEPTH_COMPONENT16,
            StorageFormat::Stencil8 => glow::STENCIL_INDEX8,
            StorageFormat::Rgba4 => glow::RGBA4,
            StorageFormat::Rgb565 => glow::RGB565,
            StorageFormat::Rgb5A1 => glow::RGB5_A1,
        }
    }
}

#[derive(Debug, Default)]
pub struct Renderbuffer {
    handle: Handle<RenderbufferObject>,
}

impl Renderbuffer {
    pub fn new(gpu: &Gpu) -> Result<Self> {
        Ok(Self {
            handle: Handle::create(gpu)?,
        })
    }

    pub fn raw(&self) -> RawId {
        self.handle.raw()
    }

    pub fn bind(&self) -> Result<BindRenderbuffer<'_>> {
        let gpu = self.handle.require()?;
        let guard = SlotGuard::bind(gpu, Slot::renderbuffer(glow::RENDERBUFFER), self.raw())?;
        Ok(BindRenderbuffer {
            guard,
            renderbuffer: Some(self),
        })
    }
}

#[derive(Debug)]
pub struct BindRenderbuffer<'r> {
    guard: SlotGuard,
    renderbuffer: Option<&'r Renderbuffer>,
}

guard_common!(BindRenderbuffer, Renderbuffer, renderbuffer, "renderbuffer");

impl BindRenderbuffer<'_> {
    /// (Re)allocates storage, discarding previous contents.
    pub fn allocate_storage(&self, format: StorageFormat, width: i32, height: i32) -> Result<()> {
        let (gpu, slot) = self.live()?;
        gpu.gl()
            .renderbuffer_storage(slot.index, format.gl(), width, height);
        Ok(())
    }
}
