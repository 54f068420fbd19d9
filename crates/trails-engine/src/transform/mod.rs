//! Matrix composition helpers over `glam`.

mod projection;
mod stack;

pub use projection::{aspect_ortho, unproject_xy};
pub use stack::TransformStack;
