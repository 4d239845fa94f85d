//! Upload validation.
//!
//! Everything that can be rejected before any processing work starts:
//! event state, transport errors, size against the event's limit, file
//! extension and content type (declared and sniffed).

use fotowand_core::{EventConfig, TransportError, UploadedFile};

/// Extensions accepted for upload. HEIC/HEIF are accepted and transcoded.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic", "heif"];

/// Content types accepted for upload.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/heic",
    "image/heif",
];

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("This event is no longer active")]
    EventInactive,

    #[error("Uploads are disabled for this event")]
    UploadsDisabled,

    #[error("Upload failed: {0}")]
    Transport(TransportError),

    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("File type not allowed: .{extension}")]
    InvalidExtension { extension: String },

    #[error("File has no usable extension: {0}")]
    InvalidFilename(String),

    #[error("Content type not allowed: {content_type}")]
    InvalidContentType { content_type: String },
}

impl From<ValidationError> for fotowand_core::AppError {
    fn from(err: ValidationError) -> Self {
        fotowand_core::AppError::Validation(err.to_string())
    }
}

/// Upload validator
pub struct UploadValidator;

impl UploadValidator {
    /// Run all checks in rejection-priority order.
    pub fn validate(upload: &UploadedFile, event: &EventConfig) -> Result<(), ValidationError> {
        if !event.is_active {
            return Err(ValidationError::EventInactive);
        }
        if !event.upload_enabled {
            return Err(ValidationError::UploadsDisabled);
        }
        if let Some(transport_error) = upload.transport_error {
            return Err(ValidationError::Transport(transport_error));
        }
        if upload.data.is_empty() {
            return Err(ValidationError::EmptyFile);
        }

        let max = event.max_upload_size.bytes();
        if upload.size > max {
            return Err(ValidationError::FileTooLarge {
                size: upload.size,
                max,
            });
        }

        let extension = upload
            .extension()
            .ok_or_else(|| ValidationError::InvalidFilename(upload.original_filename.clone()))?;
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ValidationError::InvalidExtension { extension });
        }

        let declared = upload.declared_mime.to_lowercase();
        if !declared.is_empty() && !ALLOWED_CONTENT_TYPES.contains(&declared.as_str()) {
            return Err(ValidationError::InvalidContentType {
                content_type: upload.declared_mime.clone(),
            });
        }

        // Sniffed type overrides a spoofed declaration. Unknown magic
        // bytes pass here (HEIC sniffing is unreliable); a corrupt raster
        // then degrades derivatives instead of failing the upload.
        if let Some(kind) = infer::get(&upload.data) {
            let sniffed = kind.mime_type();
            if !ALLOWED_CONTENT_TYPES.contains(&sniffed) {
                return Err(ValidationError::InvalidContentType {
                    content_type: sniffed.to_string(),
                });
            }
        }

        Ok(())
    }
}
