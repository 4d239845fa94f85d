//! Fotowand CLI — ops tool for the event photo pipeline.
//!
//! `fotowand ingest <event-slug> <file>` runs the full intake for a
//! local file and prints the JSON receipt; `fotowand rotate <photo-id>
//! <angle>` rotates a stored photo in place. Configuration comes from
//! the environment (a `.env` file is honored); DATABASE_URL and
//! FOTOWAND_STORAGE_ROOT are the ones you usually need.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use fotowand_core::{Config, ErrorMetadata, UploadedFile};
use fotowand_db::{EventRepository, PhotoRepository};
use fotowand_processing::{IntakePipeline, RotationService};
use fotowand_storage::EventStore;

#[derive(Parser)]
#[command(name = "fotowand", about = "Fotowand event photo pipeline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a photo file into an event
    Ingest {
        /// Event slug the photo belongs to
        event_slug: String,
        /// Path to the photo file
        file: PathBuf,
        /// Uploader name stored with the photo
        #[arg(long)]
        username: Option<String>,
        /// Content type; guessed from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Rotate a stored photo clockwise and regenerate its derivatives
    Rotate {
        /// Photo UUID
        photo_id: Uuid,
        /// Rotation angle: 90, 180 or 270
        angle: u16,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn guess_content_type(path: &Path) -> String {
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => "application/octet-stream",
    };
    mime.to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    let store = EventStore::new(config.storage_root.clone(), config.base_url.clone()).await?;

    match cli.command {
        Commands::Ingest {
            event_slug,
            file,
            username,
            content_type,
        } => {
            let events = EventRepository::new(pool.clone());
            let event = events
                .get_by_slug(&event_slug)
                .await?
                .with_context(|| format!("event '{}' not found", event_slug))?;

            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload.jpg")
                .to_string();
            let mime = content_type.unwrap_or_else(|| guess_content_type(&file));

            let pipeline = IntakePipeline::new(
                store,
                Arc::new(PhotoRepository::new(pool)),
                config.processing.clone(),
                config.converter.clone(),
            );

            match pipeline
                .ingest(&event, UploadedFile::new(filename, mime, data), username)
                .await
            {
                Ok(receipt) => println!("{}", serde_json::to_string_pretty(&receipt)?),
                Err(e) => {
                    eprintln!("upload rejected ({}): {}", e.error_code(), e.client_message());
                    std::process::exit(1);
                }
            }
        }
        Commands::Rotate { photo_id, angle } => {
            let photos = PhotoRepository::new(pool.clone());
            let photo = photos
                .get(photo_id)
                .await?
                .with_context(|| format!("photo {} not found", photo_id))?;

            let events = EventRepository::new(pool);
            let event = events
                .get_by_id(photo.event_id)
                .await?
                .with_context(|| format!("event {} not found", photo.event_id))?;

            let service = RotationService::new(store, config.processing.clone());
            let outcome = service.rotate(&event.slug, &photo, angle).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}
