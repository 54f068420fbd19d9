use crate::error::{Error, Result};
use crate::gl::{Gpu, RawId};

use super::guard::{guard_common, SlotGuard};
use super::handle::{FramebufferObject, Handle};
use super::renderbuffer::Renderbuffer;
use super::slot::Slot;
use super::texture::{Texture, TextureTarget};

/// Framebuffer attachment points available on GLES2.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Attachment {
    Color0,
    Depth,
    Stencil,
}

impl Attachment {
    pub fn gl(self) -> u32 {
        match self {
            Attachment::Color0 => glow::COLOR_ATTACHMENT0,
            Attachment::Depth => glow::DEPTH_ATTACHMENT,
            Attachment::Stencil => glow::STENCIL_ATTACHMENT,
        }
    }
}

#[derive(Debug, Default)]
pub struct Framebuffer {
    handle: Handle<FramebufferObject>,
}

impl Framebuffer {
    pub fn new(gpu: &Gpu) -> Result<Self> {
        Ok(Self {
            handle: Handle::create(gpu)?,
        })
    }

    pub fn raw(&self) -> RawId {
        self.handle.raw()
    }

    /// Makes this the render target until the guard is dropped.
    pub fn bind(&self) -> Result<BindFramebuffer<'_>> {
        let gpu = self.handle.require()?;
        let guard = SlotGuard::bind(gpu, Slot::framebuffer(glow::FRAMEBUFFER), self.raw())?;
        Ok(BindFramebuffer {
            guard,
            framebuffer: Some(self),
        })
    }
}

#[derive(Debug)]
pub struct BindFramebuffer<'r> {
    guard: SlotGuard,
    framebuffer: Option<&'r Framebuffer>,
}

guard_common!(BindFramebuffer, Framebuffer, framebuffer, "framebuffer");

impl BindFramebuffer<'_> {
    /// Attaches mip `level` of a 2D texture. `None` detaches.
    pub fn attach_texture(
        &self,
        attachment: Attachment,
        texture: Option<&Texture>,
        level: i32,
    ) -> Result<()> {
        let (gpu, slot) = self.live()?;
        gpu.gl().framebuffer_texture_2d(
            slot.index,
            attachment.gl(),
            TextureTarget::Texture2D.gl(),
            texture.map_or(0, Texture::raw),
            level,
        );
        Ok(())
    }

    /// Attaches a renderbuffer. `None` detaches.
    pub fn attach_renderbuffer(
        &self,
        attachment: Attachment,
        renderbuffer: Option<&Renderbuffer>,
    ) -> Result<()> {
        let (gpu, slot) = self.live()?;
        gpu.gl().framebuffer_renderbuffer(
            slot.index,
            attachment.gl(),
            glow::RENDERBUFFER,
            renderbuffer.map_or(0, Renderbuffer::raw),
        );
        Ok(())
    }

    pub fn status(&self) -> Result<u32> {
        let (gpu, slot) = self.live()?;
        Ok(gpu.gl().check_framebuffer_status(slot.index))
    }

    pub fn assert_complete(&self) -> Result<()> {
        match self.status()? {
            glow::FRAMEBUFFER_COMPLETE => Ok(()),
            status => Err(Error::IncompleteFramebuffer { status }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::headless::Attached;
    use crate::gl::Headless;
    use crate::resource::{PixelFormat, PixelType, StorageFormat};

    fn color_texture(gpu: &Gpu, w: i32, h: i32) -> Texture {
        let tex = Texture::new(gpu).unwrap();
        tex.bind(0, TextureTarget::Texture2D)
            .unwrap()
            .upload_image(0, w, h, PixelFormat::Rgba, PixelType::UnsignedByte, None)
            .unwrap();
        tex
    }

    fn depth_buffer(gpu: &Gpu, w: i32, h: i32) -> Renderbuffer {
        let rb = Renderbuffer::new(gpu).unwrap();
        rb.bind()
            .unwrap()
            .allocate_storage(StorageFormat::Depth16, w, h)
            .unwrap();
        rb
    }

    #[test]
    fn color_and_depth_of_equal_size_are_complete() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let fb = Framebuffer::new(&gpu).unwrap();
        let tex = color_texture(&gpu, 128, 64);
        let rb = depth_buffer(&gpu, 128, 64);

        let b = fb.bind().unwrap();
        b.attach_texture(Attachment::Color0, Some(&tex), 0).unwrap();
        b.attach_renderbuffer(Attachment::Depth, Some(&rb)).unwrap();
        b.assert_complete().unwrap();

        assert_eq!(
            gl.attachment(fb.raw(), glow::COLOR_ATTACHMENT0),
            Some(Attached::Texture {
                texture: tex.raw(),
                level: 0
            })
        );
    }

    #[test]
    fn empty_framebuffer_is_reported_incomplete() {
        let gpu = Gpu::new(Headless::new());
        let fb = Framebuffer::new(&gpu).unwrap();
        let err = fb.bind().unwrap().assert_complete().unwrap_err();
        assert!(matches!(
            err,
            Error::IncompleteFramebuffer {
                status: glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT
            }
        ));
    }

    #[test]
    fn detaching_leaves_no_attachment() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let fb = Framebuffer::new(&gpu).unwrap();
        let rb = depth_buffer(&gpu, 4, 4);

        let b = fb.bind().unwrap();
        b.attach_renderbuffer(Attachment::Depth, Some(&rb)).unwrap();
        b.attach_renderbuffer(Attachment::Depth, None).unwrap();
        assert_eq!(gl.attachment(fb.raw(), glow::DEPTH_ATTACHMENT), None);
    }

    #[test]
    fn guard_order_does_not_matter() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let fb = Framebuffer::new(&gpu).unwrap();
        let tex = color_texture(&gpu, 8, 8);

        let bf = fb.bind().unwrap();
        let bt = tex.bind(0, TextureTarget::Texture2D).unwrap();
        drop(bf);
        assert_eq!(gl.bound_framebuffer(), 0);
        assert_eq!(gl.bound_texture(0, glow::TEXTURE_2D), tex.raw());
        drop(bt);
        assert!(gpu.bound_slots().is_empty());
    }
}
