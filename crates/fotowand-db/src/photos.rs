//! Photo repository.
//!
//! Inserts come from the intake pipeline; the activation flip comes from
//! the moderation flow; the listing queries feed the gallery and display
//! views.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fotowand_core::{AppError, Photo};
use sqlx::PgPool;
use uuid::Uuid;

use crate::index::PhotoIndex;

#[derive(Debug, sqlx::FromRow)]
struct PhotoRow {
    id: Uuid,
    event_id: Uuid,
    filename: String,
    original_filename: String,
    username: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    distance_meters: Option<f64>,
    file_size: i64,
    content_type: String,
    file_hash: String,
    resized_filename: Option<String>,
    thumbnail_filename: Option<String>,
    is_active: bool,
    uploaded_at: DateTime<Utc>,
}

impl PhotoRow {
    fn into_photo(self) -> Photo {
        Photo {
            id: self.id,
            event_id: self.event_id,
            filename: self.filename,
            original_filename: self.original_filename,
            username: self.username,
            latitude: self.latitude,
            longitude: self.longitude,
            distance_meters: self.distance_meters,
            file_size: self.file_size,
            content_type: self.content_type,
            file_hash: self.file_hash,
            resized_filename: self.resized_filename,
            thumbnail_filename: self.thumbnail_filename,
            is_active: self.is_active,
            uploaded_at: self.uploaded_at,
        }
    }
}

const PHOTO_COLUMNS: &str = "id, event_id, filename, original_filename, username, latitude, \
     longitude, distance_meters, file_size, content_type, file_hash, resized_filename, \
     thumbnail_filename, is_active, uploaded_at";

#[derive(Clone)]
pub struct PhotoRepository {
    pool: PgPool,
}

impl PhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Photo>, AppError> {
        let query = format!("SELECT {} FROM photos WHERE id = $1", PHOTO_COLUMNS);
        let row = sqlx::query_as::<_, PhotoRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        Ok(row.map(PhotoRow::into_photo))
    }

    /// Photos visible in gallery/display/API responses.
    pub async fn list_active(&self, event_id: Uuid) -> Result<Vec<Photo>, AppError> {
        let query = format!(
            "SELECT {} FROM photos WHERE event_id = $1 AND is_active ORDER BY uploaded_at DESC",
            PHOTO_COLUMNS
        );
        let rows = sqlx::query_as::<_, PhotoRow>(&query)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        Ok(rows.into_iter().map(PhotoRow::into_photo).collect())
    }

    /// All photos of an event, including ones held for moderation.
    pub async fn list_all(&self, event_id: Uuid) -> Result<Vec<Photo>, AppError> {
        let query = format!(
            "SELECT {} FROM photos WHERE event_id = $1 ORDER BY uploaded_at DESC",
            PHOTO_COLUMNS
        );
        let rows = sqlx::query_as::<_, PhotoRow>(&query)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        Ok(rows.into_iter().map(PhotoRow::into_photo).collect())
    }

    /// Moderation approval/rejection: the only legal record mutation
    /// besides deletion.
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE photos SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(is_active)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Photo {} not found", id)));
        }

        tracing::info!(photo_id = %id, is_active, "Photo activation changed");
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl PhotoIndex for PhotoRepository {
    async fn hash_exists(&self, event_id: Uuid, file_hash: &str) -> Result<bool, AppError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM photos WHERE event_id = $1 AND file_hash = $2)",
        )
        .bind(event_id)
        .bind(file_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Persistence(e.to_string()))?;

        Ok(exists.0)
    }

    async fn insert(&self, photo: &Photo) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO photos (id, event_id, filename, original_filename, username, latitude, \
             longitude, distance_meters, file_size, content_type, file_hash, resized_filename, \
             thumbnail_filename, is_active, uploaded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(photo.id)
        .bind(photo.event_id)
        .bind(&photo.filename)
        .bind(&photo.original_filename)
        .bind(&photo.username)
        .bind(photo.latitude)
        .bind(photo.longitude)
        .bind(photo.distance_meters)
        .bind(photo.file_size)
        .bind(&photo.content_type)
        .bind(&photo.file_hash)
        .bind(&photo.resized_filename)
        .bind(&photo.thumbnail_filename)
        .bind(photo.is_active)
        .bind(photo.uploaded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            // The (event_id, file_hash) unique constraint is the race
            // backstop behind the pipeline's fast-path duplicate check
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Duplicate,
            _ => AppError::Persistence(e.to_string()),
        })?;

        Ok(())
    }
}
