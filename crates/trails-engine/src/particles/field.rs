//! The rotating two-pole flow field particles drift along.

use std::f32::consts::TAU;

use glam::Vec2;

/// Seconds per revolution of the poles.
const PERIOD: f32 = 40.0;
const POLE: Vec2 = Vec2::new(0.75, 0.0);

/// Velocity of the field at `pos` and `time`.
///
/// A source-like pole on the left and a sink-like pole on the right, both
/// swirling, rotate around the origin. Each pole's contribution is
/// normalized then attenuated with distance.
pub fn velocity(pos: Vec2, time: f64) -> Vec2 {
    let rot = Vec2::from_angle(time as f32 * TAU / PERIOD);
    let a = pos - rot.rotate(-POLE);
    let b = pos - rot.rotate(POLE);

    let a_field =
        (0.25 * a.perp() + 0.35 * a).normalize_or_zero() / (1.0 + a.length_squared()).sqrt();

    let b_field = (-0.45 * b.perp() - 0.65 * b * b.length().sqrt().tanh()).normalize_or_zero()
        / (1.0 + b.length_squared()).sqrt();

    (a_field + b_field) * 0.5
}

/// Seed grid resolution per axis.
const SEEDS: usize = 11;
const STEPS: usize = 10;
const STEP: f32 = 0.02;

/// Short streamlines traced from an 11x11 grid over [-1, 1]^2.
pub fn field_lines(time: f64) -> Vec<Vec<Vec2>> {
    let mut lines = Vec::with_capacity(SEEDS * SEEDS);
    for r in 0..SEEDS {
        for c in 0..SEEDS {
            let t = |i: usize| -1.0 + 2.0 * i as f32 / (SEEDS - 1) as f32;
            let mut pos = Vec2::new(t(c), t(r));

            let mut line = Vec::with_capacity(STEPS + 1);
            line.push(pos);
            for _ in 0..STEPS {
                pos += velocity(pos, time) * STEP;
                line.push(pos);
            }
            lines.push(line);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_finite_and_bounded_everywhere() {
        for x in -20..=20 {
            for y in -20..=20 {
                let p = Vec2::new(x as f32 * 0.1, y as f32 * 0.1);
                let v = velocity(p, 3.7);
                assert!(v.is_finite());
                assert!(v.length() <= 1.0 + 1e-5);
            }
        }
    }

    #[test]
    fn field_stays_finite_at_a_pole() {
        // At the left pole only the right pole contributes.
        let v = velocity(Vec2::new(-0.75, 0.0), 0.0);
        assert!(v.is_finite());
        assert!(v.length() > 0.0);
    }

    #[test]
    fn field_rotates_with_time() {
        let p = Vec2::new(0.3, 0.2);
        let quarter = velocity(p, 10.0);
        let rotated = velocity(Vec2::from_angle(-TAU / 4.0).rotate(p), 0.0);
        let expected = Vec2::from_angle(TAU / 4.0).rotate(rotated);
        assert!((quarter - expected).length() < 1e-4);
    }

    #[test]
    fn field_lines_cover_the_seed_grid() {
        let lines = field_lines(0.0);
        assert_eq!(lines.len(), 121);
        assert!(lines.iter().all(|l| l.len() == 11));
        assert_eq!(lines[0][0], Vec2::new(-1.0, -1.0));
        assert_eq!(lines[120][0], Vec2::new(1.0, 1.0));
    }
}
