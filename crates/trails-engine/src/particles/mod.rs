//! Particle simulation: pool, spawn scheduling and the flow field.

pub mod field;
mod particle;
mod pool;
mod spawn;

pub use particle::Particle;
pub use pool::ParticlePool;
pub use spawn::{SpawnReport, Spawner};
