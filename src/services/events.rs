use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::event::{Event, EventInput, EventView, FeedQuery, Visibility};
use crate::services::friends::{EveryoneIsFriend, FriendsResolver};
use crate::store::EventStore;
use crate::utils::error::AppError;

/// Create, update, delete and feed queries over the event store.
///
/// Every operation takes the acting user explicitly; the service holds no
/// per-request state.
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
    friends: Arc<dyn FriendsResolver>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>, friends: Arc<dyn FriendsResolver>) -> Self {
        Self { store, friends }
    }

    pub fn with_store(store: Arc<dyn EventStore>) -> Self {
        Self::new(store, Arc::new(EveryoneIsFriend))
    }

    pub async fn create(&self, user_id: Uuid, input: EventInput) -> Result<Event, AppError> {
        let fields = input.into_new_event()?;
        let now = Utc::now();

        let event = Event {
            id: Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            start: fields.start,
            end: fields.end,
            location: fields.location,
            visibility: fields.visibility,
            created_by: user_id,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&event).await?;
        info!(event_id = %event.id, user_id = %user_id, "Event created");
        Ok(event)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        input: EventInput,
    ) -> Result<Event, AppError> {
        let mut event = self.owned_event(user_id, event_id).await?;
        let changes = input.into_changes()?;

        event.apply(changes);
        event.updated_at = Utc::now();

        if !self.store.update(&event).await? {
            return Err(not_found(event_id));
        }

        info!(event_id = %event_id, user_id = %user_id, "Event updated");
        Ok(event)
    }

    pub async fn delete(&self, user_id: Uuid, event_id: Uuid) -> Result<(), AppError> {
        self.owned_event(user_id, event_id).await?;

        if !self.store.delete(event_id, user_id).await? {
            return Err(not_found(event_id));
        }

        info!(event_id = %event_id, user_id = %user_id, "Event deleted");
        Ok(())
    }

    /// Events overlapping the queried range that `user_id` may see, ordered
    /// by start.
    pub async fn query_feed(
        &self,
        user_id: Uuid,
        query: &FeedQuery,
    ) -> Result<Vec<EventView>, AppError> {
        let (range_start, range_end) = query.parse_range()?;
        let candidates = self.store.overlapping(range_start, range_end).await?;
        let total = candidates.len();

        let mut visible = Vec::with_capacity(total);
        for event in candidates {
            if self.is_visible_to(&event, user_id).await {
                visible.push(EventView::for_viewer(event, user_id));
            }
        }

        debug!(
            user_id = %user_id,
            %range_start,
            %range_end,
            candidates = total,
            visible = visible.len(),
            "Feed queried"
        );
        Ok(visible)
    }

    async fn is_visible_to(&self, event: &Event, user_id: Uuid) -> bool {
        match event.visibility {
            Visibility::Public => true,
            Visibility::Private => event.is_owned_by(user_id),
            Visibility::Friends => {
                event.is_owned_by(user_id)
                    || self.friends.is_friend(user_id, event.created_by).await
            }
        }
    }

    async fn owned_event(&self, user_id: Uuid, event_id: Uuid) -> Result<Event, AppError> {
        let event = self
            .store
            .get(event_id)
            .await?
            .ok_or_else(|| not_found(event_id))?;

        if !event.is_owned_by(user_id) {
            return Err(AppError::Forbidden("not yours".to_string()));
        }
        Ok(event)
    }
}

fn not_found(event_id: Uuid) -> AppError {
    AppError::NotFound(format!("Event with id '{}' was not found", event_id))
}
