//! Event persistence.
//!
//! Writes are single-record and conditional on ownership, so a concurrent
//! update and delete of the same event each either fully apply or report that
//! the row is gone.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::event::Event;
use crate::utils::error::AppError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert(&self, event: &Event) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Event>, AppError>;

    /// Replaces the stored row for `event.id` if it is still owned by
    /// `event.created_by`. Returns `false` when no such row exists.
    async fn update(&self, event: &Event) -> Result<bool, AppError>;

    /// Removes the event if it exists and belongs to `owner`.
    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError>;

    /// Events with `start <= range_end` and `end >= range_start`, ordered by
    /// `start`.
    async fn overlapping(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Event>, AppError>;
}
