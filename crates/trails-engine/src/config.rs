//! Engine configuration.
//!
//! The pipeline shape (ring depth, pool size, spawn budget) is fixed at compile
//! time. `SceneConfig` only carries presentation knobs.

use glam::Vec4;

/// Number of rotating off-screen framebuffers used for the feedback effect.
pub const RING_DEPTH: usize = 2;

/// Fixed capacity of the particle pool.
pub const PARTICLE_CAPACITY: usize = 1024;

/// Upper bound on particles spawned during a single frame.
pub const MAX_SPAWNS_PER_FRAME: usize = 16;

/// Largest time step fed into the simulation, in seconds.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Particles with less remaining life than this are dead.
pub const DEAD_EPSILON: f32 = 1e-3;

/// Presentation settings for [`crate::scene::Scene`].
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Fixed RNG seed. `None` seeds from the operating system.
    pub seed: Option<u64>,

    /// Draws the particle vector field as stroked lines under the particles.
    pub show_field_lines: bool,

    /// Clear color of the composite and present passes.
    pub background: Vec4,

    /// Size of the orthographic view volume along the window diagonal.
    pub view_scale: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            show_field_lines: false,
            background: Vec4::new(0.0, 0.5, 0.0, 1.0),
            view_scale: 4.0,
        }
    }
}
