//! Event repository (read side).
//!
//! Events are created and edited by the admin CRUD layer; the pipeline
//! only ever reads them.

use fotowand_core::{AppError, EventConfig, MaxUploadSize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    slug: String,
    name: String,
    center_latitude: Option<f64>,
    center_longitude: Option<f64>,
    radius_meters: i32,
    gps_validation_required: bool,
    moderation_required: bool,
    max_upload_size_bytes: i64,
    upload_enabled: bool,
    is_active: bool,
}

impl EventRow {
    fn into_config(self) -> EventConfig {
        EventConfig {
            id: self.id,
            slug: self.slug,
            name: self.name,
            center_latitude: self.center_latitude,
            center_longitude: self.center_longitude,
            radius_meters: self.radius_meters.max(0) as u32,
            gps_validation_required: self.gps_validation_required,
            moderation_required: self.moderation_required,
            max_upload_size: MaxUploadSize::from_bytes(self.max_upload_size_bytes),
            upload_enabled: self.upload_enabled,
            is_active: self.is_active,
        }
    }
}

const EVENT_COLUMNS: &str = "id, slug, name, center_latitude, center_longitude, radius_meters, \
     gps_validation_required, moderation_required, max_upload_size_bytes, upload_enabled, is_active";

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<EventConfig>, AppError> {
        let query = format!("SELECT {} FROM events WHERE slug = $1", EVENT_COLUMNS);
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        Ok(row.map(EventRow::into_config))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<EventConfig>, AppError> {
        let query = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let row = sqlx::query_as::<_, EventRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;

        Ok(row.map(EventRow::into_config))
    }
}
