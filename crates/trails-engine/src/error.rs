use std::path::PathBuf;

use crate::resource::Slot;

/// Unrecoverable engine errors.
///
/// Every variant describes a static configuration or programming bug (double
/// binding, incomplete framebuffer, broken shader, missing asset). Callers are
/// expected to propagate these to the top level and stop; nothing in the engine
/// retries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{slot} is already bound")]
    SlotInUse { slot: Slot },

    #[error("cannot bind an empty {object} handle")]
    EmptyHandle { object: &'static str },

    #[error("{object} guard was already released")]
    ReleasedGuard { object: &'static str },

    #[error("failed to allocate {object}: {reason}")]
    Allocation { object: &'static str, reason: String },

    #[error("framebuffer incomplete (status 0x{status:04X})")]
    IncompleteFramebuffer { status: u32 },

    #[error("failed to compile {origin}:\n{log}")]
    ShaderCompile { origin: String, log: String },

    #[error("failed to link program:\n{log}")]
    ProgramLink { log: String },

    #[error("pixel data too short: {len} bytes for a {width}x{height} image needing {expected}")]
    PixelDataTooShort {
        width: i32,
        height: i32,
        expected: usize,
        len: usize,
    },

    #[error("size {width}x{height} is outside the range GL accepts")]
    SizeOutOfRange { width: i64, height: i64 },

    #[error("failed to read asset '{}'", path.display())]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image '{}'", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("bad bytes-per-pixel value {bytes_per_pixel} for image '{}'", path.display())]
    UnsupportedPixelFormat { path: PathBuf, bytes_per_pixel: u8 },

    #[error("framebuffer ring needs at least two targets, got {depth}")]
    RingTooShallow { depth: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
