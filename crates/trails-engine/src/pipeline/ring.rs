use glam::Vec4;

use crate::error::{Error, Result};
use crate::gl::{Blend, Gpu};

use super::target::RenderTarget;

/// Clear color of a freshly resized ring slot, before the baseline pass.
const BASELINE_CLEAR: Vec4 = Vec4::new(0.0, 0.5, 0.0, 0.0);

/// N render targets used round-robin for frame-to-frame feedback.
///
/// Each frame renders into [`current`](Self::current) while sampling
/// [`previous`](Self::previous), then calls [`advance`](Self::advance).
#[derive(Debug)]
pub struct FramebufferRing {
    targets: Vec<RenderTarget>,
    current: usize,
}

impl FramebufferRing {
    /// Allocates `depth` targets. Feedback needs at least two.
    pub fn new(gpu: &Gpu, depth: usize) -> Result<Self> {
        if depth < 2 {
            return Err(Error::RingTooShallow { depth });
        }
        let targets = (0..depth)
            .map(|_| RenderTarget::new(gpu))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            targets,
            current: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn previous_index(&self) -> usize {
        let n = self.targets.len();
        (self.current + n - 1) % n
    }

    pub fn current(&self) -> &RenderTarget {
        &self.targets[self.current]
    }

    pub fn previous(&self) -> &RenderTarget {
        &self.targets[self.previous_index()]
    }

    pub fn get(&self, index: usize) -> Option<&RenderTarget> {
        self.targets.get(index)
    }

    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.targets.len();
    }

    /// Resizes every target, then for each one binds it, clears it and runs
    /// `baseline(gpu, index)` with the target bound so the first frames have
    /// something sensible to feed back.
    pub fn resize(
        &mut self,
        gpu: &Gpu,
        width: u32,
        height: u32,
        mut baseline: impl FnMut(&Gpu, usize) -> Result<()>,
    ) -> Result<()> {
        for (index, target) in self.targets.iter_mut().enumerate() {
            target.resize(width, height)?;

            let _fb = target.bind()?;
            gpu.clear(BASELINE_CLEAR);
            gpu.set_back_face_culling(false);
            gpu.set_depth_test(false);
            gpu.set_blend(Blend::Disabled);
            baseline(gpu, index)?;
        }
        Ok(())
    }
}
