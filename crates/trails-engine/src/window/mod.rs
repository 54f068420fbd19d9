//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop, the window and its GLES context, and drives an
//! [`crate::core::App`] from window events.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
