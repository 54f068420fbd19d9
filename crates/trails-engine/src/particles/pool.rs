use glam::Vec2;

use super::particle::Particle;

/// Fixed-capacity ring of particles.
///
/// New particles go to the slot under the cursor, which then advances modulo
/// capacity. A slot is reused whether or not its particle is still alive;
/// replacing a live one is logged and counted.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    next: usize,
    next_spawn: f64,
    overwritten: u64,
}

impl ParticlePool {
    /// Creates `capacity` dead particles. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: vec![Particle::default(); capacity.max(1)],
            next: 0,
            next_spawn: 0.0,
            overwritten: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Slot the next insertion writes to.
    pub fn cursor(&self) -> usize {
        self.next
    }

    /// Simulation time at which the next particle is due.
    pub fn next_spawn(&self) -> f64 {
        self.next_spawn
    }

    pub fn set_next_spawn(&mut self, time: f64) {
        self.next_spawn = time;
    }

    /// Live particles replaced by an insertion so far.
    pub fn overwritten(&self) -> u64 {
        self.overwritten
    }

    pub fn live_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Writes `particle` at the cursor and advances it.
    ///
    /// Returns whether a live particle was replaced.
    pub fn insert(&mut self, particle: Particle) -> bool {
        let slot = self.next;
        let replaced = self.particles[slot].is_alive();
        if replaced {
            log::warn!("overwriting live particle {slot}");
            self.overwritten += 1;
        }

        self.particles[slot] = particle;
        self.next = (slot + 1) % self.particles.len();
        replaced
    }

    /// Advances every live particle by `dt` and hands it to `draw`.
    ///
    /// Per particle: age, draw with the aged state, then move along `field`
    /// sampled at the pre-move position. Dead particles are skipped. Stops at
    /// the first draw error. Returns how many particles were drawn.
    pub fn step<E>(
        &mut self,
        dt: f32,
        time: f64,
        field: impl Fn(Vec2, f64) -> Vec2,
        mut draw: impl FnMut(&Particle) -> Result<(), E>,
    ) -> Result<usize, E> {
        let mut drawn = 0;
        for p in self.particles.iter_mut().filter(|p| p.is_alive()) {
            p.age(dt);
            draw(p)?;
            drawn += 1;
            p.position += field(p.position, time) * dt;
        }
        Ok(drawn)
    }
}
