//! GPU objects and the guards that bind them.
//!
//! Every GL object is owned by exactly one [`Handle`]. Binding goes through a
//! guard (`BindTexture`, `BindFramebuffer`, `BindRenderbuffer`, `UseProgram`,
//! and `SelectModel` in [`crate::model`]) that claims a [`Slot`] in the
//! context's [`SlotRegistry`] and gives it back on drop. Binding to a slot
//! that another live guard holds is an error, not a silent rebind.

mod framebuffer;
pub(crate) mod guard;
mod handle;
mod program;
mod renderbuffer;
mod slot;
mod texture;
mod units;

pub use framebuffer::{Attachment, BindFramebuffer, Framebuffer};
pub use handle::{
    BufferObject, FramebufferObject, Handle, ObjectKind, ProgramObject, RenderbufferObject,
    TextureObject,
};
pub use program::{Program, ProgramSource, Stage, Uniform, UseProgram};
pub use renderbuffer::{BindRenderbuffer, Renderbuffer, StorageFormat};
pub use slot::{BindingKind, Slot, SlotRegistry};
pub use texture::{BindTexture, Filter, PixelFormat, PixelType, Texture, TextureTarget, Wrap};
pub use units::{SelectTextureUnits, TextureUnits};
