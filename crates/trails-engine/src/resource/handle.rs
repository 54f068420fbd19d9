use std::fmt;
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::gl::{Gl, Gpu, RawId};

/// Type of GL object a [`Handle`] owns.
pub trait ObjectKind {
    const NAME: &'static str;

    fn create(gl: &dyn Gl) -> std::result::Result<RawId, String>;
    fn delete(gl: &dyn Gl, id: RawId);
}

macro_rules! object_kind {
    ($(#[$meta:meta])* $ty:ident, $name:literal, $create:ident, $delete:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub enum $ty {}

        impl ObjectKind for $ty {
            const NAME: &'static str = $name;

            fn create(gl: &dyn Gl) -> std::result::Result<RawId, String> {
                gl.$create()
            }

            fn delete(gl: &dyn Gl, id: RawId) {
                gl.$delete(id)
            }
        }
    };
}

object_kind!(TextureObject, "texture", create_texture, delete_texture);
object_kind!(FramebufferObject, "framebuffer", create_framebuffer, delete_framebuffer);
object_kind!(RenderbufferObject, "renderbuffer", create_renderbuffer, delete_renderbuffer);
object_kind!(BufferObject, "buffer", create_buffer, delete_buffer);
object_kind!(ProgramObject, "program", create_program, delete_program);

/// Sole owner of a native GL object name.
///
/// Dropping (or overwriting) a non-empty handle deletes the object. `take`
/// moves ownership out and leaves an empty handle behind, so a name is never
/// deleted twice.
pub struct Handle<K: ObjectKind> {
    id: RawId,
    gpu: Option<Gpu>,
    _kind: PhantomData<K>,
}

impl<K: ObjectKind> Handle<K> {
    /// Allocates a fresh object.
    pub fn create(gpu: &Gpu) -> Result<Self> {
        let id = K::create(gpu.gl()).map_err(|reason| Error::Allocation {
            object: K::NAME,
            reason,
        })?;
        if id == 0 {
            return Err(Error::Allocation {
                object: K::NAME,
                reason: "driver returned name 0".to_string(),
            });
        }
        Ok(Self::adopt(gpu, id))
    }

    /// Takes ownership of an existing name.
    pub(crate) fn adopt(gpu: &Gpu, id: RawId) -> Self {
        Self {
            id,
            gpu: (id != 0).then(|| gpu.clone()),
            _kind: PhantomData,
        }
    }

    pub fn raw(&self) -> RawId {
        self.id
    }

    pub fn is_empty(&self) -> bool {
        self.id == 0
    }

    /// The context this handle belongs to, or `EmptyHandle`.
    pub(crate) fn require(&self) -> Result<&Gpu> {
        self.gpu.as_ref().ok_or(Error::EmptyHandle { object: K::NAME })
    }

    /// Moves ownership out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl<K: ObjectKind> Default for Handle<K> {
    fn default() -> Self {
        Self {
            id: 0,
            gpu: None,
            _kind: PhantomData,
        }
    }
}

impl<K: ObjectKind> Drop for Handle<K> {
    fn drop(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            K::delete(gpu.gl(), self.id);
        }
        self.id = 0;
    }
}

impl<K: ObjectKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", K::NAME, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::Headless;
    use crate::gl::headless::ObjectType;

    #[test]
    fn drop_deletes_exactly_once() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());

        let h = Handle::<TextureObject>::create(&gpu).unwrap();
        let id = h.raw();
        assert!(gl.is_live(id));

        drop(h);
        assert!(!gl.is_live(id));
        assert_eq!(gl.deletions(), vec![(ObjectType::Texture, id)]);
    }

    #[test]
    fn take_transfers_ownership_and_empties_source() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());

        let mut a = Handle::<FramebufferObject>::create(&gpu).unwrap();
        let id = a.raw();
        let b = a.take();

        assert!(a.is_empty());
        assert_eq!(b.raw(), id);

        drop(a);
        assert!(gl.is_live(id));
        drop(b);
        assert!(!gl.is_live(id));
        assert_eq!(gl.deletions().len(), 1);
    }

    #[test]
    fn reassignment_releases_previous_object() {
        let gl = Headless::new();
        let gpu = Gpu::new(gl.clone());

        let mut h = Handle::<RenderbufferObject>::create(&gpu).unwrap();
        let first = h.raw();
        h = Handle::create(&gpu).unwrap();

        assert!(!gl.is_live(first));
        assert!(gl.is_live(h.raw()));
    }

    #[test]
    fn default_handle_is_empty_and_inert() {
        let h = Handle::<BufferObject>::default();
        assert!(h.is_empty());
        assert!(matches!(h.require(), Err(Error::EmptyHandle { object: "buffer" })));
    }
}
