//! Vertex buffers and the shapes the demo draws.

mod mesh;
pub mod shapes;
mod vertex;

pub use mesh::{Mesh, Model, Primitive, SelectModel, Usage};
pub use vertex::{attrib, Vertex};
