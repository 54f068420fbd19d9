use crate::error::Result;

use super::texture::{BindTexture, Texture, TextureTarget};

#[derive(Debug)]
struct UnitEntry {
    unit: u32,
    target: TextureTarget,
    texture: Texture,
}

/// Textures that are sampled together, each on its own (unit, target).
///
/// Owns its textures. [`TextureUnits::select`] binds all of them at once.
#[derive(Debug, Default)]
pub struct TextureUnits {
    entries: Vec<UnitEntry>,
}

impl TextureUnits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `texture` on `unit`/`target` and returns it for setup.
    pub fn add(&mut self, unit: u32, target: TextureTarget, texture: Texture) -> &Texture {
        self.entries.push(UnitEntry {
            unit,
            target,
            texture,
        });
        let last = self.entries.len() - 1;
        &self.entries[last].texture
    }

    pub fn texture(&self, index: usize) -> Option<&Texture> {
        self.entries.get(index).map(|e| &e.texture)
    }

    /// Replaces the texture at `index`, dropping the old one.
    pub fn replace(&mut self, index: usize, texture: Texture) -> Option<Texture> {
        self.entries
            .get_mut(index)
            .map(|e| std::mem::replace(&mut e.texture, texture))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binds every texture to its unit. Fails without binding anything if
    /// any slot is taken; bindings made before the failure are undone.
    pub fn select(&self) -> Result<SelectTextureUnits<'_>> {
        let mut binds = Vec::with_capacity(self.entries.len());
        for e in &self.entries {
            binds.push(e.texture.bind(e.unit, e.target)?);
        }
        Ok(SelectTextureUnits { binds })
    }
}

/// Bindings for a whole [`TextureUnits`] set.
#[derive(Debug, Default)]
pub struct SelectTextureUnits<'r> {
    binds: Vec<BindTexture<'r>>,
}

impl<'r> SelectTextureUnits<'r> {
    pub fn is_bound(&self) -> bool {
        !self.binds.is_empty()
    }

    /// Per-texture guards, in insertion order.
    pub fn binds(&self) -> &[BindTexture<'r>] {
        &self.binds
    }

    pub fn release(&mut self) {
        // Unbind in reverse order of binding.
        while let Some(mut b) = self.binds.pop() {
            b.release();
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl Drop for SelectTextureUnits<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;
    use crate::error::Error;
    use crate::gl::{Gpu, Headless};

    #[test]
    fn select_binds_all_units_and_drop_unbinds() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());

        let mut units = TextureUnits::new();
        let a = units.add(0, TextureTarget::Texture2D, Texture::new(&gpu).unwrap()).raw();
        let b = units.add(1, TextureTarget::Texture2D, Texture::new(&gpu).unwrap()).raw();

        {
            let sel = units.select().unwrap();
            assert!(sel.is_bound());
            assert_eq!(gl.bound_texture(0, glow::TEXTURE_2D), a);
            assert_eq!(gl.bound_texture(1, glow::TEXTURE_2D), b);
        }
        assert!(gpu.bound_slots().is_empty());
        assert_eq!(gl.bound_texture(1, glow::TEXTURE_2D), 0);
    }

    #[test]
    fn conflicting_selection_fails_and_undoes_partial_binds() {
        let gpu = Gpu::new(Headless::new());

        let mut first = TextureUnits::new();
        first.add(1, TextureTarget::Texture2D, Texture::new(&gpu).unwrap());

        let mut second = TextureUnits::new();
        second.add(0, TextureTarget::Texture2D, Texture::new(&gpu).unwrap());
        second.add(1, TextureTarget::Texture2D, Texture::new(&gpu).unwrap());

        let _held = first.select().unwrap();
        assert!(matches!(second.select(), Err(Error::SlotInUse { .. })));
        assert_eq!(gpu.bound_slots().len(), 1);
    }

    #[test]
    fn texture_can_be_set_up_through_the_set() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let mut white = TextureUnits::new();
        white
            .add(0, TextureTarget::Texture2D, Texture::new(&gpu).unwrap())
            .bind(0, TextureTarget::Texture2D)
            .unwrap()
            .fill_color(Vec4::ONE)
            .unwrap();

        let id = white.texture(0).unwrap().raw();
        assert_eq!(gl.texture_size(id, 0), Some((1, 1)));
    }

    #[test]
    fn replacing_a_texture_deletes_the_old_one_when_dropped() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());
        let mut units = TextureUnits::new();
        let old = units.add(0, TextureTarget::Texture2D, Texture::new(&gpu).unwrap()).raw();

        drop(units.replace(0, Texture::new(&gpu).unwrap()));
        assert!(!gl.is_live(old));
        assert!(gl.is_live(units.texture(0).unwrap().raw()));
    }
}
