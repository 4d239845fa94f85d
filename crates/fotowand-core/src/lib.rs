//! Fotowand core library
//!
//! Domain models, the unified error type and configuration shared across
//! all fotowand crates.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, ConverterConfig, ProcessingConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    EventConfig, GeoPoint, MaxUploadSize, Photo, TransportError, UploadReceipt, UploadedFile,
};
