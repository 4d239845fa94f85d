//! Image processing module
//!
//! Format dispatch (capability table), decode/encode, bounded resize and
//! EXIF orientation handling.

pub mod codec;
pub mod format;
pub mod orientation;
pub mod resize;

pub use codec::{CodecError, ImageCodec};
pub use format::PhotoFormat;
pub use orientation::ImageOrientation;
pub use resize::{bounded_dimensions, resize_to_fit};
