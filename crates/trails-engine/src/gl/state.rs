//! Fixed-function state helpers used by the render passes.

use glam::Vec4;

use crate::error::{Error, Result};

use super::context::Gpu;

/// Blend configurations used by the demo passes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Blend {
    Disabled,
    /// Color `SRC_ALPHA + ONE`, alpha `ONE + ONE_MINUS_SRC_ALPHA`.
    ///
    /// Particles accumulate light while coverage still composes as "over".
    Additive,
    /// `ONE, ONE_MINUS_SRC_ALPHA` for layers whose color is already weighted
    /// by alpha (the particle layer after the additive pass).
    Premultiplied,
}

impl Gpu {
    pub fn viewport(&self, width: u32, height: u32) -> Result<()> {
        let (w, h) = gl_size(width, height)?;
        self.gl().viewport(0, 0, w, h);
        Ok(())
    }

    /// Clears color to `color` and depth to 1.
    pub fn clear(&self, color: Vec4) {
        let gl = self.gl();
        gl.clear_color(color.x, color.y, color.z, color.w);
        gl.clear_depth(1.0);
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
    }

    pub fn set_blend(&self, blend: Blend) {
        let gl = self.gl();
        match blend {
            Blend::Disabled => gl.disable(glow::BLEND),
            Blend::Additive => {
                gl.enable(glow::BLEND);
                gl.blend_equation(glow::FUNC_ADD);
                gl.blend_func_separate(
                    glow::SRC_ALPHA,
                    glow::ONE,
                    glow::ONE,
                    glow::ONE_MINUS_SRC_ALPHA,
                );
            }
            Blend::Premultiplied => {
                gl.enable(glow::BLEND);
                gl.blend_equation(glow::FUNC_ADD);
                gl.blend_func(glow::ONE, glow::ONE_MINUS_SRC_ALPHA);
            }
        }
    }

    pub fn set_depth_test(&self, enabled: bool) {
        self.toggle(glow::DEPTH_TEST, enabled);
    }

    /// Culls back faces when `enabled`.
    pub fn set_back_face_culling(&self, enabled: bool) {
        self.toggle(glow::CULL_FACE, enabled);
        if enabled {
            self.gl().cull_face(glow::BACK);
        }
    }

    fn toggle(&self, capability: u32, enabled: bool) {
        if enabled {
            self.gl().enable(capability);
        } else {
            self.gl().disable(capability);
        }
    }
}

/// Converts a pixel size to the signed dimensions GL calls take.
pub(crate) fn gl_size(width: u32, height: u32) -> Result<(i32, i32)> {
    match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(Error::SizeOutOfRange {
            width: width.into(),
            height: height.into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::Headless;

    #[test]
    fn sizes_beyond_i32_are_rejected() {
        assert_eq!(gl_size(1280, 720).unwrap(), (1280, 720));
        assert!(matches!(
            gl_size(u32::MAX, 1),
            Err(Error::SizeOutOfRange { width, height: 1 }) if width == i64::from(u32::MAX)
        ));
    }

    #[test]
    fn viewport_rejects_out_of_range_sizes() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        gpu.viewport(640, 480).unwrap();
        assert_eq!(gl.viewport_size(), (640, 480));

        assert!(gpu.viewport(u32::MAX, 480).is_err());
        assert_eq!(gl.viewport_size(), (640, 480));
    }
}
