use crate::error::{Error, Result};
use crate::gl::{Gl, Gpu, RawId};

use super::slot::{BindingKind, Slot};

/// Claims a [`Slot`] for as long as it lives.
///
/// Construction registers the slot and issues the native bind; release (drop,
/// or [`SlotGuard::release`]) issues the matching unbind and deregisters. An
/// empty guard owns nothing and releasing it does nothing.
#[derive(Debug, Default)]
pub(crate) struct SlotGuard {
    held: Option<(Gpu, Slot)>,
}

impl SlotGuard {
    pub(crate) fn bind(gpu: &Gpu, slot: Slot, id: RawId) -> Result<Self> {
        gpu.claim(slot)?;
        issue(gpu.gl(), slot, id);
        Ok(Self {
            held: Some((gpu.clone(), slot)),
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.held.is_none()
    }

    /// Context and slot of a live guard, or `ReleasedGuard` naming `object`.
    pub(crate) fn live(&self, object: &'static str) -> Result<(&Gpu, Slot)> {
        self.held
            .as_ref()
            .map(|(gpu, slot)| (gpu, *slot))
            .ok_or(Error::ReleasedGuard { object })
    }

    pub(crate) fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub(crate) fn release(&mut self) {
        if let Some((gpu, slot)) = self.held.take() {
            issue(gpu.gl(), slot, 0);
            gpu.release(slot);
        }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Binds `id` (or unbinds, for `0`) at `slot`.
fn issue(gl: &dyn Gl, slot: Slot, id: RawId) {
    match slot.kind {
        BindingKind::Texture { target } => {
            gl.active_texture(glow::TEXTURE0 + slot.index);
            gl.bind_texture(target, id);
        }
        BindingKind::Framebuffer => gl.bind_framebuffer(slot.index, id),
        BindingKind::Renderbuffer => gl.bind_renderbuffer(slot.index, id),
        BindingKind::Buffer => gl.bind_buffer(slot.index, id),
        BindingKind::Program => gl.use_program(id),
    }
}

/// Shared surface of the typed bind guards.
macro_rules! guard_common {
    ($guard:ident, $res:ty, $field:ident, $object:literal) => {
        impl<'r> $guard<'r> {
            /// Whether this guard still holds its slot.
            pub fn is_bound(&self) -> bool {
                !self.guard.is_empty()
            }

            /// Unbinds now instead of at scope exit. Idempotent.
            pub fn release(&mut self) {
                self.guard.release();
                self.$field = None;
            }

            /// Moves the binding out, leaving `self` empty.
            pub fn take(&mut self) -> Self {
                Self {
                    guard: self.guard.take(),
                    $field: self.$field.take(),
                }
            }

            /// The bound resource, if the guard is live.
            pub fn resource(&self) -> Option<&'r $res> {
                self.$field
            }

            /// Context of a live guard.
            #[allow(dead_code)]
            pub(crate) fn gpu(&self) -> crate::error::Result<&crate::gl::Gpu> {
                self.guard.live($object).map(|(gpu, _)| gpu)
            }

            #[allow(dead_code)]
            fn live(&self) -> crate::error::Result<(&crate::gl::Gpu, crate::resource::Slot)> {
                self.guard.live($object)
            }
        }

        impl Default for $guard<'_> {
            fn default() -> Self {
                Self {
                    guard: crate::resource::guard::SlotGuard::default(),
                    $field: None,
                }
            }
        }
    };
}

pub(crate) use guard_common;
