use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::resource::{Slot, SlotRegistry};

use super::api::Gl;

/// Handle to the GL context and its slot registry.
///
/// Every clone refers to the same context. `Gpu` is `!Send`; all GL work
/// happens on the thread that owns the context.
#[derive(Clone)]
pub struct Gpu {
    inner: Rc<Inner>,
}

struct Inner {
    gl: Box<dyn Gl>,
    slots: RefCell<SlotRegistry>,
}

impl Gpu {
    pub fn new(gl: impl Gl + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                gl: Box::new(gl),
                slots: RefCell::new(SlotRegistry::default()),
            }),
        }
    }

    /// Raw API access for calls that do not involve slot ownership.
    pub fn gl(&self) -> &dyn Gl {
        self.inner.gl.as_ref()
    }

    pub(crate) fn claim(&self, slot: Slot) -> Result<()> {
        self.inner.slots.borrow_mut().claim(slot)
    }

    pub(crate) fn release(&self, slot: Slot) {
        self.inner.slots.borrow_mut().release(slot);
    }

    pub fn is_bound(&self, slot: Slot) -> bool {
        self.inner.slots.borrow().contains(slot)
    }

    /// Slots currently held by live guards, in no particular order.
    pub fn bound_slots(&self) -> Vec<Slot> {
        self.inner.slots.borrow().iter().collect()
    }
}

impl fmt::Debug for Gpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gpu")
            .field("slots", &self.inner.slots.borrow())
            .finish_non_exhaustive()
    }
}
