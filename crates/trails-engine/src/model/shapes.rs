//! Built-in geometry.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::mesh::{Mesh, Primitive};
use super::vertex::Vertex;

/// Full-viewport quad at NDC depth `depth`, UVs spanning [0, 1].
pub fn blit_quad(depth: f32, color: Vec3) -> Mesh {
    let c = color.to_array();
    let corner = |x: f32, y: f32| Vertex::new([x, y, depth], c, [(x + 1.0) * 0.5, (y + 1.0) * 0.5]);
    Mesh {
        vertices: vec![
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(-1.0, 1.0),
            corner(1.0, 1.0),
        ],
        primitive: Primitive::TriangleStrip,
    }
}

/// Filled unit circle around the origin as a fan of `segments` wedges.
pub fn circle_fan(segments: u32, color: Vec3) -> Mesh {
    let segments = segments.max(3);
    let c = color.to_array();

    let mut vertices = Vec::with_capacity(segments as usize + 2);
    vertices.push(Vertex::new([0.0, 0.0, 0.0], c, [0.5, 0.5]));
    for i in 0..=segments {
        // Last rim vertex repeats the first to close the fan.
        let theta = (i % segments) as f32 / segments as f32 * TAU;
        let (s, co) = theta.sin_cos();
        vertices.push(Vertex::new(
            [co, s, 0.0],
            c,
            [0.5 + 0.5 * co, 0.5 + 0.5 * s],
        ));
    }

    Mesh {
        vertices,
        primitive: Primitive::TriangleFan,
    }
}

/// Strokes each polyline into quads `width` wide, two triangles per segment.
///
/// Lines with fewer than two points, and zero-length segments, produce no
/// geometry.
pub fn stroke_polylines(lines: &[Vec<Vec2>], width: f32, color: Vec3) -> Mesh {
    let c = color.to_array();
    let half = width * 0.5;
    let mut vertices = Vec::new();

    for line in lines {
        for seg in line.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            let Some(dir) = (b - a).try_normalize() else {
                continue;
            };
            let n = dir.perp() * half;

            let v = |p: Vec2, u: f32, t: f32| Vertex::new([p.x, p.y, 0.0], c, [u, t]);
            let a0 = v(a - n, 0.0, 0.0);
            let a1 = v(a + n, 0.0, 1.0);
            let b0 = v(b - n, 1.0, 0.0);
            let b1 = v(b + n, 1.0, 1.0);
            vertices.extend_from_slice(&[a0, b0, a1, a1, b0, b1]);
        }
    }

    Mesh {
        vertices,
        primitive: Primitive::Triangles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_quad_spans_ndc_at_requested_depth() {
        let quad = blit_quad(1.0, Vec3::ZERO);
        assert_eq!(quad.vertices.len(), 4);
        assert!(quad.vertices.iter().all(|v| v.position[2] == 1.0));
        assert_eq!(quad.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(quad.vertices[3].uv, [1.0, 1.0]);
    }

    #[test]
    fn circle_fan_is_closed_and_on_the_unit_circle() {
        let fan = circle_fan(64, Vec3::ONE);
        assert_eq!(fan.vertices.len(), 66);
        assert_eq!(fan.vertices[1].position, fan.vertices[65].position);
        for v in &fan.vertices[1..] {
            let r = Vec2::new(v.position[0], v.position[1]).length();
            assert!((r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn stroke_emits_six_vertices_per_segment() {
        let lines = vec![
            vec![Vec2::ZERO, Vec2::X, Vec2::new(1.0, 1.0)],
            vec![Vec2::ZERO],
            vec![Vec2::ONE, Vec2::ONE],
        ];
        let mesh = stroke_polylines(&lines, 0.2, Vec3::X);
        assert_eq!(mesh.vertices.len(), 12);

        // First segment runs along +x, so the stroke spans y in [-0.1, 0.1].
        let ys: Vec<f32> = mesh.vertices[..6].iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|y| (y.abs() - 0.1).abs() < 1e-6));
    }
}
