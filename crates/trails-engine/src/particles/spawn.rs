use glam::{FloatExt, Mat4, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MAX_SPAWNS_PER_FRAME;
use crate::transform::unproject_xy;

use super::particle::Particle;
use super::pool::ParticlePool;

/// Black, off-white, caramel.
const PALETTE: [Vec3; 3] = [
    Vec3::new(0.1, 0.1, 0.1),
    Vec3::new(0.95, 0.95, 0.87),
    Vec3::new(0.75, 0.45, 0.12),
];

const COLOR_JITTER: f32 = 0.01;

/// Largest gap between scheduled spawns, in seconds.
const MAX_SPAWN_GAP: f64 = 0.01;

/// What one [`Spawner::spawn`] call did.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub spawned: usize,
    pub replaced_live: usize,
}

/// Schedules and generates particles.
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: StdRng,
    max_per_frame: usize,
}

impl Spawner {
    /// A fixed `seed` makes runs reproducible; `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            max_per_frame: MAX_SPAWNS_PER_FRAME,
        }
    }

    pub fn max_per_frame(&self) -> usize {
        self.max_per_frame
    }

    /// Spawns every particle due by `time`, up to the per-frame budget.
    ///
    /// Spawns are spaced by random gaps in `[0, 0.01)` s. When the budget runs
    /// out the schedule restarts from `time`, so a long stall does not turn
    /// into a burst over the following frames.
    pub fn spawn(
        &mut self,
        pool: &mut ParticlePool,
        time: f64,
        inverse_projection: &Mat4,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();
        let mut budget = self.max_per_frame;

        while budget > 0 && time > pool.next_spawn() {
            budget -= 1;

            let particle = self.particle(inverse_projection);
            if pool.insert(particle) {
                report.replaced_live += 1;
            }
            report.spawned += 1;

            let base = if budget > 0 { pool.next_spawn() } else { time };
            pool.set_next_spawn(base + self.rng.random_range(0.0..MAX_SPAWN_GAP));
        }

        report
    }

    /// A new particle somewhere in the visible area.
    pub fn particle(&mut self, inverse_projection: &Mat4) -> Particle {
        let ndc = Vec2::new(
            self.rng.random_range(-1.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
        );
        let position = unproject_xy(inverse_projection, ndc);

        let base = PALETTE[self.rng.random_range(0..PALETTE.len())];
        let jitter = Vec3::new(
            self.rng.random_range(-COLOR_JITTER..=COLOR_JITTER),
            self.rng.random_range(-COLOR_JITTER..=COLOR_JITTER),
            self.rng.random_range(-COLOR_JITTER..=COLOR_JITTER),
        );
        let brightness = 0.75_f32.lerp(1.0, self.rng.random::<f32>().powi(3));
        let color = (base + jitter) * brightness;

        let size = self.rng.random_range(0.05..0.13);
        let life = self.rng.random_range(0.45..2.0);

        Particle::new(position, color, size, life)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PARTICLE_CAPACITY;
    use crate::transform::aspect_ortho;

    fn inverse() -> Mat4 {
        aspect_ortho(1280, 720, 4.0, 100.0).inverse()
    }

    #[test]
    fn nothing_is_due_at_time_zero() {
        let mut pool = ParticlePool::new(PARTICLE_CAPACITY);
        let mut spawner = Spawner::new(Some(1));
        assert_eq!(spawner.spawn(&mut pool, 0.0, &inverse()).spawned, 0);
    }

    #[test]
    fn a_stall_spawns_at_most_the_budget_and_resyncs() {
        let mut pool = ParticlePool::new(PARTICLE_CAPACITY);
        let mut spawner = Spawner::new(Some(7));

        let report = spawner.spawn(&mut pool, 0.5, &inverse());
        assert_eq!(report.spawned, MAX_SPAWNS_PER_FRAME);
        assert!(pool.next_spawn() >= 0.5 && pool.next_spawn() < 0.5 + MAX_SPAWN_GAP);

        // Same time again: the schedule is already ahead.
        assert_eq!(spawner.spawn(&mut pool, 0.5, &inverse()).spawned, 0);
    }

    #[test]
    fn short_frames_spawn_only_what_is_due() {
        let mut pool = ParticlePool::new(PARTICLE_CAPACITY);
        let mut spawner = Spawner::new(Some(3));
        pool.set_next_spawn(1.0);

        let report = spawner.spawn(&mut pool, 1.001, &inverse());
        assert!(report.spawned >= 1 && report.spawned < MAX_SPAWNS_PER_FRAME);
        assert!(pool.next_spawn() >= 1.001);
    }

    #[test]
    fn generated_particles_respect_their_ranges() {
        let mut spawner = Spawner::new(Some(11));
        let inv = inverse();
        let visible = unproject_xy(&inv, Vec2::ONE);

        for _ in 0..500 {
            let p = spawner.particle(&inv);
            assert!((0.05..0.13).contains(&p.size));
            assert!((0.45..2.0).contains(&p.life));
            assert_eq!(p.remain, p.life);
            assert!(p.position.x.abs() <= visible.x + 1e-4);
            assert!(p.position.y.abs() <= visible.y + 1e-4);
            assert!(p.color.min_element() >= (0.1 - COLOR_JITTER) * 0.75 - 1e-6);
            assert!(p.color.max_element() <= 0.95 + COLOR_JITTER + 1e-6);
        }
    }

    #[test]
    fn same_seed_same_particles() {
        let inv = inverse();
        let a = Spawner::new(Some(42)).particle(&inv);
        let b = Spawner::new(Some(42)).particle(&inv);
        assert_eq!(a, b);
    }

    #[test]
    fn spawning_past_capacity_reports_replacements() {
        let mut pool = ParticlePool::new(8);
        let mut spawner = Spawner::new(Some(5));

        // Long-lived particles and frames far apart: every frame hits the cap.
        let mut replaced = 0;
        for frame in 1..=2 {
            replaced += spawner.spawn(&mut pool, frame as f64, &inverse()).replaced_live;
        }
        assert_eq!(pool.overwritten() as usize, replaced);
        assert!(replaced > 0);
    }
}
