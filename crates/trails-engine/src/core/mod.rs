//! Contracts between the runtime and the application.
//!
//! The runtime owns the window, the GL context and the clock; the app only
//! sees sizes, frame times and a [`Present`] target.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, Present};
