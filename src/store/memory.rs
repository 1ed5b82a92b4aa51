use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::EventStore;
use crate::models::event::Event;
use crate::utils::error::AppError;

/// Process-local store, used when no database is configured and in tests.
#[derive(Clone, Default)]
pub struct MemoryEventStore {
    events: Arc<RwLock<Vec<Event>>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn insert(&self, event: &Event) -> Result<(), AppError> {
        let mut events = self.events.write().await;
        if events.iter().any(|e| e.id == event.id) {
            return Err(AppError::InternalServerError(format!(
                "duplicate event id {}",
                event.id
            )));
        }
        events.push(event.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    async fn update(&self, event: &Event) -> Result<bool, AppError> {
        let mut events = self.events.write().await;
        match events
            .iter_mut()
            .find(|e| e.id == event.id && e.created_by == event.created_by)
        {
            Some(existing) => {
                *existing = event.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| !(e.id == id && e.created_by == owner));
        Ok(events.len() != before)
    }

    async fn overlapping(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<Event>, AppError> {
        let events = self.events.read().await;
        let mut matched: Vec<Event> = events
            .iter()
            .filter(|e| e.overlaps(range_start, range_end))
            .cloned()
            .collect();
        matched.sort_by_key(|e| e.start);
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::Visibility;
    use chrono::TimeZone;

    fn event_at(owner: Uuid, start_hour: u32, end_hour: u32) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, start_hour, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 10, end_hour, 0, 0).unwrap();
        Event {
            id: Uuid::new_v4(),
            title: format!("{start_hour}-{end_hour}"),
            description: String::new(),
            start,
            end,
            location: String::new(),
            visibility: Visibility::Public,
            created_by: owner,
            created_at: start,
            updated_at: start,
        }
    }

    #[tokio::test]
    async fn test_overlapping_orders_by_start() {
        let store = MemoryEventStore::new();
        let owner = Uuid::new_v4();
        let late = event_at(owner, 14, 15);
        let early = event_at(owner, 9, 10);
        let outside = event_at(owner, 20, 21);
        for e in [&late, &early, &outside] {
            store.insert(e).await.unwrap();
        }

        let range_start = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        let range_end = Utc.with_ymd_and_hms(2024, 1, 10, 16, 0, 0).unwrap();
        let found = store.overlapping(range_start, range_end).await.unwrap();

        let ids: Vec<Uuid> = found.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![early.id, late.id]);
    }

    #[tokio::test]
    async fn test_writes_are_conditional_on_owner() {
        let store = MemoryEventStore::new();
        let owner = Uuid::new_v4();
        let event = event_at(owner, 9, 10);
        store.insert(&event).await.unwrap();

        let mut hijacked = event.clone();
        hijacked.created_by = Uuid::new_v4();
        hijacked.title = "mine now".into();
        assert!(!store.update(&hijacked).await.unwrap());
        assert!(!store.delete(event.id, hijacked.created_by).await.unwrap());

        let stored = store.get(event.id).await.unwrap().unwrap();
        assert_eq!(stored.title, event.title);

        assert!(store.delete(event.id, owner).await.unwrap());
        assert!(store.get(event.id).await.unwrap().is_none());
        assert!(!store.delete(event.id, owner).await.unwrap());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_rejects_duplicate_ids() {
        let store = MemoryEventStore::new();
        let event = event_at(Uuid::new_v4(), 9, 10);
        store.insert(&event).await.unwrap();
        assert!(store.insert(&event).await.is_err());
    }
}
