use anyhow::Result;

use crate::time::FrameTime;

/// Something a finished frame can be shown on.
pub trait Present {
    /// Shows the default framebuffer (a buffer swap for windowed surfaces).
    fn present(&mut self) -> Result<()>;
}

/// Per-frame context passed to [`super::App::on_frame`].
pub struct FrameCtx<'a> {
    pub time: FrameTime,
    pub surface: &'a mut dyn Present,
}

impl FrameCtx<'_> {
    pub fn present(&mut self) -> Result<()> {
        self.surface.present()
    }
}
