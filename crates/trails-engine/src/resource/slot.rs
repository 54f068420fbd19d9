use std::collections::HashSet;
use std::fmt;

use crate::error::{Error, Result};

/// Object-kind namespace of a binding slot.
///
/// Kinds never collide with each other: texture unit 0 and framebuffer target
/// `FRAMEBUFFER` are distinct slots even if their indices compare equal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BindingKind {
    /// A texture target (`TEXTURE_2D`, ...) on the unit given by the slot index.
    Texture { target: u32 },
    Framebuffer,
    Renderbuffer,
    Buffer,
    Program,
}

/// A fixed-function attachment point a GL object can be bound to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Slot {
    /// Texture unit for textures, the GL target for framebuffers,
    /// renderbuffers and buffers, `0` for programs.
    pub index: u32,
    pub kind: BindingKind,
}

impl Slot {
    pub const fn texture(unit: u32, target: u32) -> Self {
        Self {
            index: unit,
            kind: BindingKind::Texture { target },
        }
    }

    pub const fn framebuffer(target: u32) -> Self {
        Self {
            index: target,
            kind: BindingKind::Framebuffer,
        }
    }

    pub const fn renderbuffer(target: u32) -> Self {
        Self {
            index: target,
            kind: BindingKind::Renderbuffer,
        }
    }

    pub const fn buffer(target: u32) -> Self {
        Self {
            index: target,
            kind: BindingKind::Buffer,
        }
    }

    pub const fn program() -> Self {
        Self {
            index: 0,
            kind: BindingKind::Program,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BindingKind::Texture { target } => {
                write!(f, "texture target 0x{target:04X} in unit {}", self.index)
            }
            BindingKind::Framebuffer => write!(f, "framebuffer target 0x{:04X}", self.index),
            BindingKind::Renderbuffer => write!(f, "renderbuffer target 0x{:04X}", self.index),
            BindingKind::Buffer => write!(f, "buffer target 0x{:04X}", self.index),
            BindingKind::Program => f.write_str("program slot"),
        }
    }
}

/// Set of slots currently claimed by live guards.
#[derive(Debug, Default)]
pub struct SlotRegistry {
    bound: HashSet<Slot>,
}

impl SlotRegistry {
    /// Records `slot` as bound. Claiming an already-bound slot is an error.
    pub fn claim(&mut self, slot: Slot) -> Result<()> {
        if !self.bound.insert(slot) {
            return Err(Error::SlotInUse { slot });
        }
        Ok(())
    }

    /// Forgets `slot`. Returns whether it was bound.
    pub fn release(&mut self, slot: Slot) -> bool {
        self.bound.remove(&slot)
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.bound.contains(&slot)
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Slot> + '_ {
        self.bound.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T2D: u32 = glow::TEXTURE_2D;
    const CUBE: u32 = glow::TEXTURE_CUBE_MAP;

    #[test]
    fn second_claim_of_same_slot_fails() {
        let mut reg = SlotRegistry::default();
        reg.claim(Slot::texture(0, T2D)).unwrap();

        let err = reg.claim(Slot::texture(0, T2D)).unwrap_err();
        assert!(matches!(err, Error::SlotInUse { slot } if slot == Slot::texture(0, T2D)));
        assert_eq!(err.to_string(), "texture target 0x0DE1 in unit 0 is already bound");
    }

    #[test]
    fn targets_and_units_are_independent() {
        let mut reg = SlotRegistry::default();
        reg.claim(Slot::texture(0, T2D)).unwrap();
        reg.claim(Slot::texture(0, CUBE)).unwrap();
        reg.claim(Slot::texture(1, T2D)).unwrap();
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn kinds_do_not_collide_on_equal_indices() {
        let mut reg = SlotRegistry::default();
        let fb = Slot::framebuffer(glow::FRAMEBUFFER);
        let tex = Slot::texture(glow::FRAMEBUFFER, T2D);
        let rb = Slot {
            index: glow::FRAMEBUFFER,
            kind: BindingKind::Renderbuffer,
        };
        reg.claim(fb).unwrap();
        reg.claim(tex).unwrap();
        reg.claim(rb).unwrap();
        assert!(reg.contains(fb) && reg.contains(tex) && reg.contains(rb));
    }

    #[test]
    fn release_allows_reclaim() {
        let mut reg = SlotRegistry::default();
        reg.claim(Slot::program()).unwrap();
        assert!(reg.release(Slot::program()));
        assert!(!reg.release(Slot::program()));
        reg.claim(Slot::program()).unwrap();
        assert!(!reg.is_empty());
    }
}
