use glam::{Mat4, Vec2};

/// Orthographic projection whose visible extent is `scale` times the
/// normalized `(width, height)` aspect vector, looking down -Z from the
/// origin to `far`.
///
/// Keeping the extent vector normalized makes the visible area independent
/// of window size while preserving its shape.
pub fn aspect_ortho(width: u32, height: u32, scale: f32, far: f32) -> Mat4 {
    let extent = Vec2::new(width.max(1) as f32, height.max(1) as f32).normalize() * scale;
    let half = extent * 0.5;
    Mat4::orthographic_rh_gl(-half.x, half.x, -half.y, half.y, 0.0, far)
}

/// Maps an NDC point on the `z = 0` NDC plane back into world XY.
pub fn unproject_xy(inverse_projection: &Mat4, ndc: Vec2) -> Vec2 {
    inverse_projection.project_point3(ndc.extend(0.0)).truncate()
}
