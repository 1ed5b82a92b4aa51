use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::EventStore;
use crate::models::event::{Event, Visibility};
use crate::utils::error::AppError;

const SELECT_COLUMNS: &str = "SELECT id, title, description, starts_at, ends_at, location, \
     visibility, created_by, created_at, updated_at FROM events";

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    location: String,
    visibility: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let visibility = row.visibility.parse::<Visibility>().map_err(|e| {
            AppError::InternalServerError(format!(
                "event {} has unknown visibility '{}'",
                row.id, e.0
            ))
        })?;

        Ok(Event {
            id: row.id,
            title: row.title,
            description: row.description,
            start: row.starts_at,
            end: row.ends_at,
            location: row.location,
            visibility,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Postgres-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn insert(&self, event: &Event) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO events (id, title, description, starts_at, ends_at, location, \
             visibility, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start)
        .bind(event.end)
        .bind(&event.location)
        .bind(event.visibility.as_str())
        .bind(event.created_by)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        let row = sqlx::query_as::<_, EventRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Event::try_from).transpose()
    }

    async fn update(&self, event: &Event) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE events SET title = $3, description = $4, starts_at = $5, ends_at = $6, \
             location = $7, visibility = $8, updated_at = $9 \
             WHERE id = $1 AND created_by = $2",
        )
        .bind(event.id)
        .bind(event.created_by)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start)
        .bind(event.end)
        .bind(&event.location)
        .bind(event.visibility.as_str())
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn overlapping(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "{SELECT_COLUMNS} WHERE starts_at <= $2 AND ends_at >= $1 ORDER BY starts_at, id"
        ))
        .bind(range_start)
        .bind(range_end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Event::try_from).collect()
    }
}
