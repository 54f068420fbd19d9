use std::path::Path;

use glam::Vec4;

use crate::asset::{self, DecodedImage};
use crate::error::{Error, Result};
use crate::gl::{consts, Gpu, RawId};

use super::guard::{guard_common, SlotGuard};
use super::handle::{Handle, TextureObject};
use super::slot::Slot;

/// Texture binding targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureTarget {
    Texture2D,
    CubeMap,
}

impl TextureTarget {
    pub fn gl(self) -> u32 {
        match self {
            TextureTarget::Texture2D => glow::TEXTURE_2D,
            TextureTarget::CubeMap => glow::TEXTURE_CUBE_MAP,
        }
    }
}

/// Client pixel layouts accepted by GLES2 `glTexImage2D`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelFormat {
    Luminance,
    LuminanceAlpha,
    Rgb,
    Rgba,
}

impl PixelFormat {
    /// Layout for tightly packed 8-bit channels.
    pub fn from_bytes_per_pixel(bytes_per_pixel: u8) -> Option<Self> {
        match bytes_per_pixel {
            1 => Some(PixelFormat::Luminance),
            2 => Some(PixelFormat::LuminanceAlpha),
            3 => Some(PixelFormat::Rgb),
            4 => Some(PixelFormat::Rgba),
            _ => None,
        }
    }

    pub fn components(self) -> usize {
        match self {
            PixelFormat::Luminance => 1,
            PixelFormat::LuminanceAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    pub fn gl(self) -> u32 {
        match self {
            PixelFormat::Luminance => consts::LUMINANCE,
            PixelFormat::LuminanceAlpha => consts::LUMINANCE_ALPHA,
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
        }
    }
}

/// Channel storage type of uploaded pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelType {
    UnsignedByte,
    Float,
}

impl PixelType {
    pub fn size(self) -> usize {
        match self {
            PixelType::UnsignedByte => 1,
            PixelType::Float => 4,
        }
    }

    pub fn gl(self) -> u32 {
        match self {
            PixelType::UnsignedByte => glow::UNSIGNED_BYTE,
            PixelType::Float => glow::FLOAT,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Filter {
    Nearest,
    Linear,
}

impl Filter {
    fn gl(self) -> i32 {
        match self {
            Filter::Nearest => glow::NEAREST as i32,
            Filter::Linear => glow::LINEAR as i32,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Wrap {
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

impl Wrap {
    fn gl(self) -> i32 {
        match self {
            Wrap::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
            Wrap::Repeat => glow::REPEAT as i32,
            Wrap::MirroredRepeat => glow::MIRRORED_REPEAT as i32,
        }
    }
}

/// A GL texture object.
#[derive(Debug, Default)]
pub struct Texture {
    handle: Handle<TextureObject>,
}

impl Texture {
    pub fn new(gpu: &Gpu) -> Result<Self> {
        Ok(Self {
            handle: Handle::create(gpu)?,
        })
    }

    pub fn raw(&self) -> RawId {
        self.handle.raw()
    }

    pub fn is_empty(&self) -> bool {
        self.handle.is_empty()
    }

    /// Binds to `target` on texture `unit` until the guard is dropped.
    pub fn bind(&self, unit: u32, target: TextureTarget) -> Result<BindTexture<'_>> {
        let gpu = self.handle.require()?;
        let guard = SlotGuard::bind(gpu, Slot::texture(unit, target.gl()), self.raw())?;
        Ok(BindTexture {
            guard,
            texture: Some(self),
        })
    }
}

/// A texture bound to a (unit, target) slot.
#[derive(Debug)]
pub struct BindTexture<'r> {
    guard: SlotGuard,
    texture: Option<&'r Texture>,
}

guard_common!(BindTexture, Texture, texture, "texture");

impl BindTexture<'_> {
    /// Selects this guard's unit and returns (context, target).
    fn select(&self) -> Result<(&Gpu, u32)> {
        let (gpu, slot) = self.live()?;
        let super::slot::BindingKind::Texture { target } = slot.kind else {
            unreachable!("texture guard holds a texture slot");
        };
        gpu.gl().active_texture(glow::TEXTURE0 + slot.index);
        Ok((gpu, target))
    }

    /// Replaces the image at mip `level`.
    ///
    /// `pixels = None` allocates storage with undefined contents, which is how
    /// render targets are sized. Rows are read tightly packed.
    pub fn upload_image(
        &self,
        level: i32,
        width: i32,
        height: i32,
        format: PixelFormat,
        ty: PixelType,
        pixels: Option<&[u8]>,
    ) -> Result<()> {
        if let Some(data) = pixels {
            let out_of_range = || Error::SizeOutOfRange {
                width: width.into(),
                height: height.into(),
            };
            let expected = usize::try_from(width.max(0))
                .ok()
                .zip(usize::try_from(height.max(0)).ok())
                .and_then(|(w, h)| w.checked_mul(h))
                .and_then(|n| n.checked_mul(format.components()))
                .and_then(|n| n.checked_mul(ty.size()))
                .ok_or_else(out_of_range)?;
            if data.len() < expected {
                return Err(Error::PixelDataTooShort {
                    width,
                    height,
                    expected,
                    len: data.len(),
                });
            }
        }

        let (gpu, target) = self.select()?;
        let gl = gpu.gl();
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(target, level, format.gl(), width, height, ty.gl(), pixels);
        Ok(())
    }

    /// Uploads a decoded image at `level`.
    pub fn upload_decoded(&self, level: i32, image: &DecodedImage) -> Result<()> {
        let format = PixelFormat::from_bytes_per_pixel(image.bytes_per_pixel).ok_or_else(|| {
            Error::UnsupportedPixelFormat {
                path: image.origin.clone(),
                bytes_per_pixel: image.bytes_per_pixel,
            }
        })?;

        log::info!(
            "{}: {}x{} {}-bit color",
            image.origin.display(),
            image.width,
            image.height,
            u32::from(image.bytes_per_pixel) * 8
        );

        self.upload_image(
            level,
            image.width as i32,
            image.height as i32,
            format,
            PixelType::UnsignedByte,
            Some(&image.pixels),
        )
    }

    /// Decodes the image at `path` and uploads it at `level`.
    pub fn load_file(&self, level: i32, path: &Path) -> Result<()> {
        let image = asset::decode_image(path)?;
        self.upload_decoded(level, &image)
    }

    /// Makes the texture a 1x1 image of a single color.
    pub fn fill_color(&self, color: Vec4) -> Result<()> {
        let rgba = color
            .clamp(Vec4::ZERO, Vec4::ONE)
            .to_array()
            .map(|c| (c * 255.0).round() as u8);
        self.upload_image(0, 1, 1, PixelFormat::Rgba, PixelType::UnsignedByte, Some(&rgba))
    }

    pub fn set_param_i32(&self, name: u32, value: i32) -> Result<()> {
        let (gpu, target) = self.select()?;
        gpu.gl().tex_parameter_i32(target, name, value);
        Ok(())
    }

    pub fn set_param_f32(&self, name: u32, value: f32) -> Result<()> {
        let (gpu, target) = self.select()?;
        gpu.gl().tex_parameter_f32(target, name, value);
        Ok(())
    }

    pub fn set_param_i32v(&self, name: u32, values: &[i32]) -> Result<()> {
        let (gpu, target) = self.select()?;
        gpu.gl().tex_parameter_i32_slice(target, name, values);
        Ok(())
    }

    pub fn set_param_f32v(&self, name: u32, values: &[f32]) -> Result<()> {
        let (gpu, target) = self.select()?;
        gpu.gl().tex_parameter_f32_slice(target, name, values);
        Ok(())
    }

    pub fn set_filter(&self, min: Filter, mag: Filter) -> Result<()> {
        self.set_param_i32(glow::TEXTURE_MIN_FILTER, min.gl())?;
        self.set_param_i32(glow::TEXTURE_MAG_FILTER, mag.gl())
    }

    pub fn set_wrap(&self, s: Wrap, t: Wrap) -> Result<()> {
        self.set_param_i32(glow::TEXTURE_WRAP_S, s.gl())?;
        self.set_param_i32(glow::TEXTURE_WRAP_T, t.gl())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::Headless;

    fn setup() -> (Headless, Gpu) {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        (gl, gpu)
    }

    #[test]
    fn bind_selects_unit_and_drop_unbinds() {
        let (gl, gpu) = setup();
        let tex = Texture::new(&gpu).unwrap();
        {
            let _b = tex.bind(3, TextureTarget::Texture2D).unwrap();
            assert_eq!(gl.bound_texture(3, glow::TEXTURE_2D), tex.raw());
        }
        assert_eq!(gl.bound_texture(3, glow::TEXTURE_2D), 0);
        assert!(gpu.bound_slots().is_empty());
    }

    #[test]
    fn two_textures_on_one_unit_and_target_is_fatal() {
        let (_gl, gpu) = setup();
        let a = Texture::new(&gpu).unwrap();
        let b = Texture::new(&gpu).unwrap();

        let _ba = a.bind(0, TextureTarget::Texture2D).unwrap();
        let err = b.bind(0, TextureTarget::Texture2D).unwrap_err();
        assert!(matches!(err, Error::SlotInUse { .. }));

        // A different target on the same unit is a different slot.
        let _bb = b.bind(0, TextureTarget::CubeMap).unwrap();
    }

    #[test]
    fn storage_only_upload_records_size() {
        let (gl, gpu) = setup();
        let tex = Texture::new(&gpu).unwrap();
        let b = tex.bind(0, TextureTarget::Texture2D).unwrap();
        b.upload_image(0, 320, 200, PixelFormat::Rgba, PixelType::UnsignedByte, None)
            .unwrap();
        assert_eq!(gl.texture_size(tex.raw(), 0), Some((320, 200)));
    }

    #[test]
    fn short_pixel_data_is_rejected() {
        let (gl, gpu) = setup();
        let tex = Texture::new(&gpu).unwrap();
        let b = tex.bind(0, TextureTarget::Texture2D).unwrap();
        let err = b
            .upload_image(0, 2, 2, PixelFormat::Rgb, PixelType::UnsignedByte, Some(&[0; 11]))
            .unwrap_err();
        assert!(matches!(err, Error::PixelDataTooShort { expected: 12, len: 11, .. }));
        assert_eq!(gl.texture_size(tex.raw(), 0), None);
    }

    #[test]
    fn oversized_upload_is_an_error_not_an_overflow() {
        let (gl, gpu) = setup();
        let tex = Texture::new(&gpu).unwrap();
        let b = tex.bind(0, TextureTarget::Texture2D).unwrap();
        let err = b
            .upload_image(
                0,
                i32::MAX,
                i32::MAX,
                PixelFormat::Rgba,
                PixelType::Float,
                Some(&[0; 4]),
            )
            .unwrap_err();
        assert!(matches!(err, Error::SizeOutOfRange { .. }));
        assert_eq!(gl.texture_size(tex.raw(), 0), None);
    }

    #[test]
    fn fill_color_makes_one_pixel_rgba() {
        let (gl, gpu) = setup();
        let white = Texture::new(&gpu).unwrap();
        white
            .bind(0, TextureTarget::Texture2D)
            .unwrap()
            .fill_color(Vec4::ONE)
            .unwrap();
        assert_eq!(gl.texture_size(white.raw(), 0), Some((1, 1)));
        assert_eq!(gl.texture_format(white.raw(), 0), Some(glow::RGBA));
    }

    #[test]
    fn sampling_parameters_reach_the_bound_texture() {
        let (gl, gpu) = setup();
        let tex = Texture::new(&gpu).unwrap();
        let b = tex.bind(1, TextureTarget::Texture2D).unwrap();
        b.set_filter(Filter::Nearest, Filter::Linear).unwrap();
        b.set_wrap(Wrap::ClampToEdge, Wrap::Repeat).unwrap();
        b.set_param_f32v(glow::TEXTURE_BORDER_COLOR, &[1.0, 0.0, 0.0, 1.0])
            .unwrap();

        assert_eq!(
            gl.texture_param(tex.raw(), glow::TEXTURE_MIN_FILTER),
            Some(vec![glow::NEAREST as f32])
        );
        assert_eq!(
            gl.texture_param(tex.raw(), glow::TEXTURE_WRAP_T),
            Some(vec![glow::REPEAT as f32])
        );
        assert_eq!(
            gl.texture_param(tex.raw(), glow::TEXTURE_BORDER_COLOR).map(|v| v.len()),
            Some(4)
        );
    }

    #[test]
    fn released_guard_rejects_operations() {
        let (_gl, gpu) = setup();
        let tex = Texture::new(&gpu).unwrap();
        let mut b = tex.bind(0, TextureTarget::Texture2D).unwrap();
        b.release();
        assert!(!b.is_bound());
        assert!(matches!(
            b.set_filter(Filter::Linear, Filter::Linear),
            Err(Error::ReleasedGuard { object: "texture" })
        ));
        // The slot is free again.
        let _again = tex.bind(0, TextureTarget::Texture2D).unwrap();
    }

    #[test]
    fn empty_texture_cannot_bind() {
        let tex = Texture::default();
        assert!(matches!(
            tex.bind(0, TextureTarget::Texture2D),
            Err(Error::EmptyHandle { object: "texture" })
        ));
    }

    #[test]
    fn decoded_rgb_image_uploads_with_its_size() {
        let (gl, gpu) = setup();
        let tex = Texture::new(&gpu).unwrap();
        let image = DecodedImage {
            origin: "memory".into(),
            width: 3,
            height: 1,
            bytes_per_pixel: 3,
            pixels: vec![0; 9],
        };
        tex.bind(0, TextureTarget::Texture2D)
            .unwrap()
            .upload_decoded(0, &image)
            .unwrap();
        assert_eq!(gl.texture_size(tex.raw(), 0), Some((3, 1)));
        assert_eq!(gl.texture_format(tex.raw(), 0), Some(glow::RGB));
    }

    #[test]
    fn unsupported_bytes_per_pixel_is_fatal() {
        let (_gl, gpu) = setup();
        let tex = Texture::new(&gpu).unwrap();
        let image = DecodedImage {
            origin: "odd.png".into(),
            width: 1,
            height: 1,
            bytes_per_pixel: 6,
            pixels: vec![0; 6],
        };
        let err = tex
            .bind(0, TextureTarget::Texture2D)
            .unwrap()
            .upload_decoded(0, &image)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedPixelFormat { bytes_per_pixel: 6, .. }));
    }
}
