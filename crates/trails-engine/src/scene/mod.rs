//! The particle-trails scene and its render passes.

mod driver;
mod materials;

pub use driver::{FrameStats, Scene};
pub use materials::{MaterialSources, Materials};
