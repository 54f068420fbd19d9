use crate::error::Result;
use crate::gl::{gl_size, Gpu};
use crate::resource::{
    Attachment, BindFramebuffer, Filter, Framebuffer, PixelFormat, PixelType, Renderbuffer,
    StorageFormat, Texture, TextureTarget, TextureUnits, Wrap,
};

/// Off-screen framebuffer with an RGBA color texture and a 16-bit depth
/// renderbuffer.
///
/// The color texture sits on unit 0 of [`RenderTarget::sampler`] so later
/// passes can sample what was rendered here.
#[derive(Debug)]
pub struct RenderTarget {
    framebuffer: Framebuffer,
    color: TextureUnits,
    depth: Renderbuffer,
    size: (u32, u32),
}

impl RenderTarget {
    /// Allocates the GL objects. Storage comes with the first [`resize`](Self::resize).
    pub fn new(gpu: &Gpu) -> Result<Self> {
        let mut color = TextureUnits::new();
        color.add(0, TextureTarget::Texture2D, Texture::new(gpu)?);
        Ok(Self {
            framebuffer: Framebuffer::new(gpu)?,
            color,
            depth: Renderbuffer::new(gpu)?,
            size: (0, 0),
        })
    }

    /// Reallocates color and depth storage at `width` x `height` and checks
    /// completeness. Leaves nothing bound.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let (w, h) = gl_size(width, height)?;
        let fb = self.framebuffer.bind()?;

        if let Some(tex) = self.color.texture(0) {
            let bound = tex.bind(0, TextureTarget::Texture2D)?;
            bound.upload_image(0, w, h, PixelFormat::Rgba, PixelType::UnsignedByte, None)?;
            bound.set_filter(Filter::Linear, Filter::Linear)?;
            bound.set_wrap(Wrap::ClampToEdge, Wrap::ClampToEdge)?;
            fb.attach_texture(Attachment::Color0, Some(tex), 0)?;
        }

        {
            let rb = self.depth.bind()?;
            rb.allocate_storage(StorageFormat::Depth16, w, h)?;
        }
        fb.attach_renderbuffer(Attachment::Depth, Some(&self.depth))?;

        fb.assert_complete()?;
        self.size = (width, height);
        Ok(())
    }

    /// Makes this the render target and sets a matching viewport.
    pub fn bind(&self) -> Result<BindFramebuffer<'_>> {
        let fb = self.framebuffer.bind()?;
        fb.gpu()?.viewport(self.size.0, self.size.1)?;
        Ok(fb)
    }

    /// The color texture as a one-unit sampling set.
    pub fn sampler(&self) -> &TextureUnits {
        &self.color
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn color_texture(&self) -> Option<&Texture> {
        self.color.texture(0)
    }

    pub fn depth_buffer(&self) -> &Renderbuffer {
        &self.depth
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::headless::Attached;
    use crate::gl::Headless;

    #[test]
    fn resize_allocates_matching_storage_and_is_complete() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let mut target = RenderTarget::new(&gpu).unwrap();
        target.resize(320, 240).unwrap();

        let tex = target.color_texture().unwrap().raw();
        assert_eq!(gl.texture_size(tex, 0), Some((320, 240)));
        assert_eq!(gl.renderbuffer_size(target.depth_buffer().raw()), Some((320, 240)));
        assert_eq!(
            gl.texture_param(tex, glow::TEXTURE_WRAP_S),
            Some(vec![glow::CLAMP_TO_EDGE as f32])
        );
        assert_eq!(
            gl.attachment(target.framebuffer().raw(), glow::DEPTH_ATTACHMENT),
            Some(Attached::Renderbuffer {
                renderbuffer: target.depth_buffer().raw()
            })
        );
        assert!(gpu.bound_slots().is_empty());
    }

    #[test]
    fn bind_sets_viewport_to_target_size() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let mut target = RenderTarget::new(&gpu).unwrap();
        target.resize(64, 32).unwrap();

        let _fb = target.bind().unwrap();
        assert_eq!(gl.viewport_size(), (64, 32));
        assert_eq!(gl.bound_framebuffer(), target.framebuffer().raw());
    }

    #[test]
    fn resize_beyond_gl_range_is_an_error() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let mut target = RenderTarget::new(&gpu).unwrap();

        let err = target.resize(u32::MAX, 16).unwrap_err();
        assert!(matches!(err, crate::error::Error::SizeOutOfRange { .. }));
        assert_eq!(target.size(), (0, 0));
        assert!(gpu.bound_slots().is_empty());
    }
}
