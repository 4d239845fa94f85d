//! HEIC/HEIF to JPEG conversion.
//!
//! iPhone uploads arrive as HEIC, which the raster codec cannot decode.
//! Conversion shells out to libheif's `heif-convert` first and falls
//! back to `ffmpeg`; both are asked for auto-orientation and
//! high-quality JPEG output. When both strategies fail the upload is
//! aborted with a conversion error — a placeholder image is never
//! substituted for the user's photo.

use anyhow::Context;
use fotowand_core::{AppError, ConverterConfig};
use fotowand_storage::naming::file_extension;
use std::io::Write;
use tempfile::Builder;
use tokio::process::Command;

pub struct HeicConverter {
    config: ConverterConfig,
}

impl HeicConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// MIME sniffing for HEIC is unreliable, so the file extension is an
    /// equally authoritative trigger.
    pub fn needs_conversion(declared_mime: &str, filename: &str) -> bool {
        let mime = declared_mime.to_lowercase();
        if mime == "image/heic" || mime == "image/heif" {
            return true;
        }
        matches!(
            file_extension(filename).as_deref(),
            Some("heic") | Some("heif")
        )
    }

    /// Transcode HEIC bytes to JPEG. The original bytes are discarded by
    /// the caller on success; all downstream processing uses the JPEG.
    pub async fn convert_to_jpeg(&self, data: &[u8]) -> Result<Vec<u8>, AppError> {
        let primary_error = match self.run_heif_convert(data).await {
            Ok(jpeg) => return Ok(jpeg),
            Err(e) => {
                tracing::warn!(error = %e, "heif-convert failed, falling back to ffmpeg");
                e
            }
        };

        match self.run_ffmpeg(data).await {
            Ok(jpeg) => Ok(jpeg),
            Err(fallback_error) => {
                tracing::error!(
                    primary = %primary_error,
                    fallback = %fallback_error,
                    "HEIC conversion failed with both strategies"
                );
                Err(AppError::Conversion(format!(
                    "heif-convert: {}; ffmpeg: {}",
                    primary_error, fallback_error
                )))
            }
        }
    }

    async fn run_heif_convert(&self, data: &[u8]) -> Result<Vec<u8>, anyhow::Error> {
        let (input_path, output_path) = write_input_tempfile(data)?;

        let result = Command::new(&self.config.heif_convert_path)
            .arg("-q")
            .arg(self.config.convert_quality.to_string())
            .arg(input_path.as_os_str())
            .arg(output_path.as_os_str())
            .output()
            .await
            .context("failed to spawn heif-convert")?;

        if !result.status.success() {
            anyhow::bail!(
                "heif-convert exited with {}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr)
            );
        }

        read_converted_jpeg(&output_path).await
    }

    async fn run_ffmpeg(&self, data: &[u8]) -> Result<Vec<u8>, anyhow::Error> {
        let (input_path, output_path) = write_input_tempfile(data)?;

        // -frames:v 1 picks the primary image; ffmpeg applies the
        // embedded rotation itself
        let result = Command::new(&self.config.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(input_path.as_os_str())
            .arg("-frames:v")
            .arg("1")
            .arg("-q:v")
            .arg("2")
            .arg(output_path.as_os_str())
            .output()
            .await
            .context("failed to spawn ffmpeg")?;

        if !result.status.success() {
            anyhow::bail!(
                "ffmpeg exited with {}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr)
            );
        }

        read_converted_jpeg(&output_path).await
    }
}

fn write_input_tempfile(
    data: &[u8],
) -> Result<(tempfile::TempPath, tempfile::TempPath), anyhow::Error> {
    let mut input = Builder::new()
        .suffix(".heic")
        .tempfile()
        .context("failed to create HEIC temp file")?;
    input.write_all(data).context("failed to write HEIC temp file")?;
    let input_path = input.into_temp_path();

    let output = Builder::new()
        .suffix(".jpg")
        .tempfile()
        .context("failed to create JPEG temp file")?;
    let output_path = output.into_temp_path();

    Ok((input_path, output_path))
}

async fn read_converted_jpeg(path: &tempfile::TempPath) -> Result<Vec<u8>, anyhow::Error> {
    let jpeg = tokio::fs::read(path)
        .await
        .context("failed to read converter output")?;
    anyhow::ensure!(!jpeg.is_empty(), "converter produced an empty file");

    // Guarantee the result is decodable before it replaces the upload
    image::load_from_memory(&jpeg).context("converter output is not a decodable image")?;

    Ok(jpeg)
}
