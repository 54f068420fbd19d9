use anyhow::Result;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`crate::window::Runtime`].
///
/// An error from either callback is fatal: the runtime logs it, stops the
/// event loop and returns it from `run`.
pub trait App {
    /// Called with the new drawable size in physical pixels. Never called
    /// with a zero dimension.
    fn on_resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Called once per redraw. The app is expected to present.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> Result<AppControl>;
}
