//! Off-screen render targets and the feedback ring.

mod ring;
mod target;

pub use ring::FramebufferRing;
pub use target::RenderTarget;
