use glam::{FloatExt, Mat4, Vec2, Vec3, Vec4};

use crate::config::DEAD_EPSILON;

/// One simulated particle.
///
/// `remain` counts down from `life`; the particle is dead once it drops to
/// [`DEAD_EPSILON`] and its pool slot may be reused.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Particle {
    pub position: Vec2,
    pub color: Vec3,
    pub size: f32,
    pub life: f32,
    pub remain: f32,
}

impl Particle {
    pub fn new(position: Vec2, color: Vec3, size: f32, life: f32) -> Self {
        Self {
            position,
            color,
            size,
            life,
            remain: life,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.remain > DEAD_EPSILON
    }

    /// Consumes `dt` seconds of life, never going below zero.
    pub fn age(&mut self, dt: f32) {
        self.remain = (self.remain - dt).max(0.0);
    }

    /// Eases from 0 toward 1 over the first second of life.
    pub fn fade_in(&self) -> f32 {
        (self.life - self.remain).tanh()
    }

    /// Radius: shrinks with remaining life, grows in while fading in.
    pub fn scale(&self) -> f32 {
        if self.life <= 0.0 {
            return 0.0;
        }
        self.size * (self.remain / self.life) * 0.35_f32.lerp(1.0, self.fade_in())
    }

    /// Model matrix placing the unit circle at this particle.
    pub fn world(&self) -> Mat4 {
        Mat4::from_translation(self.position.extend(0.0))
            * Mat4::from_scale(Vec3::splat(self.scale()))
    }

    /// Color with the fade-in as alpha.
    pub fn rgba(&self) -> Vec4 {
        self.color.extend(self.fade_in())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_particle_is_alive_and_invisible() {
        let p = Particle::new(Vec2::ZERO, Vec3::ONE, 0.1, 1.0);
        assert!(p.is_alive());
        assert_eq!(p.fade_in(), 0.0);
        assert!((p.scale() - 0.1 * 0.35).abs() < 1e-6);
    }

    #[test]
    fn aging_clamps_at_zero_and_kills() {
        let mut p = Particle::new(Vec2::ZERO, Vec3::ONE, 0.1, 0.5);
        p.age(0.3);
        assert!((p.remain - 0.2).abs() < 1e-6);
        p.age(1.0);
        assert_eq!(p.remain, 0.0);
        assert!(!p.is_alive());
        assert_eq!(p.scale(), 0.0);
    }

    #[test]
    fn remain_at_threshold_counts_as_dead() {
        let mut p = Particle::new(Vec2::ZERO, Vec3::ONE, 0.1, 1.0);
        p.remain = DEAD_EPSILON;
        assert!(!p.is_alive());
    }

    #[test]
    fn world_matrix_places_and_scales() {
        let mut p = Particle::new(Vec2::new(1.0, -2.0), Vec3::ONE, 0.2, 2.0);
        p.age(1.0);
        let edge = p.world().transform_point3(Vec3::X);
        assert!((edge.x - (1.0 + p.scale())).abs() < 1e-6);
        assert!((edge.y + 2.0).abs() < 1e-6);
        assert!((p.rgba().w - 1.0_f32.tanh()).abs() < 1e-6);
    }

    #[test]
    fn default_particle_is_dead() {
        assert!(!Particle::default().is_alive());
    }
}
