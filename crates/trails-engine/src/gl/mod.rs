//! Native GL access.
//!
//! This module is responsible for:
//! - the [`Gl`] trait: the GLES2 calls the engine issues
//! - [`GlowBackend`]: the real implementation over `glow`
//! - [`Headless`]: an in-memory double for tests and display-less runs
//! - [`Gpu`]: the shared context handle that owns the slot registry

mod api;
pub mod consts;
mod context;
mod glow_backend;
pub mod headless;
mod state;

pub use api::{Gl, RawId};
pub use context::Gpu;
pub use glow_backend::GlowBackend;
pub use headless::Headless;
pub use state::Blend;
pub(crate) use state::gl_size;
