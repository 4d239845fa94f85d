//! Photo intake and derivative generation.
//!
//! The pipeline takes one uploaded file and an event configuration and
//! produces a validated, deduplicated, geotagged, correctly-oriented,
//! multi-resolution photo record:
//!
//! - [`validator`] — transport/size/type checks before any work
//! - [`dedup`] — SHA-256 content hashing and the per-event duplicate check
//! - [`convert`] — HEIC/HEIF → JPEG transcoding with a fallback strategy
//! - [`image`] — format table, codec, bounded resize, EXIF orientation
//! - [`derivatives`] — display resize and always-JPEG thumbnails
//! - [`pipeline`] — the intake state machine
//! - [`rotation`] — admin rotation of stored photos, in place

pub mod convert;
pub mod dedup;
pub mod derivatives;
pub mod image;
pub mod pipeline;
pub mod rotation;
pub mod validator;

pub use self::convert::HeicConverter;
pub use self::dedup::{content_hash, DuplicateDetector};
pub use self::derivatives::{DerivativeGenerator, DerivativeSet};
pub use self::image::{ImageCodec, ImageOrientation, PhotoFormat};
pub use self::pipeline::IntakePipeline;
pub use self::rotation::{RotationOutcome, RotationService};
pub use self::validator::{
    UploadValidator, ValidationError, ALLOWED_CONTENT_TYPES, ALLOWED_EXTENSIONS,
};
