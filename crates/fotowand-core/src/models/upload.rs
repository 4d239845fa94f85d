//! Ephemeral upload input consumed once by the intake pipeline.

use serde::{Deserialize, Serialize};

/// Transport-level failure reported by the HTTP layer for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportError {
    /// Body exceeded the transport limit before reaching the pipeline
    TooLarge,
    /// Connection dropped mid-upload
    Partial,
    /// Form field present but no file attached
    Missing,
    /// Temp-file write failed on the receiving side
    Io,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            TransportError::TooLarge => "upload exceeded the transport size limit",
            TransportError::Partial => "upload was only partially received",
            TransportError::Missing => "no file was uploaded",
            TransportError::Io => "upload could not be written to disk",
        };
        f.write_str(msg)
    }
}

/// One received upload: bytes plus what the transport told us about them.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_filename: String,
    /// MIME type as declared by the client (the pipeline re-sniffs content)
    pub declared_mime: String,
    pub size: u64,
    pub data: Vec<u8>,
    pub transport_error: Option<TransportError>,
}

impl UploadedFile {
    pub fn new(
        original_filename: impl Into<String>,
        declared_mime: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            original_filename: original_filename.into(),
            declared_mime: declared_mime.into(),
            size: data.len() as u64,
            data,
            transport_error: None,
        }
    }

    /// An upload that already failed at the transport layer.
    pub fn failed(original_filename: impl Into<String>, error: TransportError) -> Self {
        Self {
            original_filename: original_filename.into(),
            declared_mime: String::new(),
            size: 0,
            data: Vec::new(),
            transport_error: Some(error),
        }
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}
