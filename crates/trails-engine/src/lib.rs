//! Trails engine.
//!
//! A GLES 2.0 particle demo: short-lived particles drift through a rotating
//! two-pole flow field and leave trails through a ring of off-screen
//! framebuffers that feed each frame back into the next.
//!
//! GL objects are owned by RAII handles in [`resource`], and binding them goes
//! through guards that claim a slot in the context's registry for their
//! lifetime. The [`gl::Headless`] backend records calls and state so passes
//! can be tested without a display.

pub mod asset;
pub mod config;
pub mod core;
pub mod error;
pub mod gl;
pub mod logging;
pub mod model;
pub mod particles;
pub mod pipeline;
pub mod resource;
pub mod scene;
pub mod time;
pub mod transform;
pub mod window;

pub use error::{Error, Result};
