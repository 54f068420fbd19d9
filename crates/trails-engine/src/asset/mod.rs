//! Asset lookup and image decoding.

mod decode;
mod root;

pub use decode::{decode_image, decode_image_bytes, DecodedImage};
pub use root::AssetRoot;
