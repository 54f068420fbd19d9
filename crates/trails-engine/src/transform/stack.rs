use std::ops::Deref;

use glam::Mat4;

/// Save/restore stack of composed transforms.
///
/// `push` post-multiplies onto the current top, so transforms pushed later
/// apply first to vertices (translate, then scale, reads as "scale in local
/// space, then place").
#[derive(Debug, Clone)]
pub struct TransformStack {
    top: Mat4,
    saved: Vec<Mat4>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            top: Mat4::IDENTITY,
            saved: Vec::new(),
        }
    }

    /// Composes `m` onto the current transform.
    pub fn push(&mut self, m: Mat4) -> &mut Self {
        self.top *= m;
        self
    }

    /// Remembers the current transform for a later [`restore`](Self::restore).
    pub fn save(&mut self) -> &mut Self {
        self.saved.push(self.top);
        self
    }

    /// Returns to the most recently saved transform. Without a matching
    /// `save` the stack resets to identity.
    pub fn restore(&mut self) -> &mut Self {
        self.top = self.saved.pop().unwrap_or(Mat4::IDENTITY);
        self
    }

    /// Resets to identity and drops every saved level.
    pub fn clear(&mut self) -> &mut Self {
        self.top = Mat4::IDENTITY;
        self.saved.clear();
        self
    }

    pub fn current(&self) -> Mat4 {
        self.top
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TransformStack {
    type Target = Mat4;

    fn deref(&self) -> &Mat4 {
        &self.top
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;

    #[test]
    fn push_composes_with_later_pushes_applied_first() {
        let mut ts = TransformStack::new();
        ts.push(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)))
            .push(Mat4::from_scale(Vec3::splat(2.0)));

        let p = ts.current() * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert_eq!(p, Vec4::new(3.0, 2.0, 0.0, 1.0));
    }

    #[test]
    fn save_and_restore_nest() {
        let mut ts = TransformStack::new();
        let t = Mat4::from_translation(Vec3::Z);
        ts.push(t).save();
        ts.push(Mat4::from_scale(Vec3::splat(3.0))).save();
        ts.push(Mat4::from_rotation_z(1.0));

        ts.restore();
        assert_eq!(*ts, t * Mat4::from_scale(Vec3::splat(3.0)));
        ts.restore();
        assert_eq!(*ts, t);
        assert_eq!(ts.depth(), 0);
    }

    #[test]
    fn unmatched_restore_resets_to_identity() {
        let mut ts = TransformStack::new();
        ts.push(Mat4::from_scale(Vec3::splat(5.0)));
        ts.restore();
        assert_eq!(ts.current(), Mat4::IDENTITY);
    }

    #[test]
    fn clear_drops_saved_levels() {
        let mut ts = TransformStack::new();
        ts.save().push(Mat4::from_scale(Vec3::splat(2.0))).save();
        ts.clear();
        assert_eq!(ts.depth(), 0);
        assert_eq!(*ts, Mat4::IDENTITY);
    }
}
