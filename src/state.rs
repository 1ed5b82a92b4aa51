use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::services::events::EventService;

/// Shared state for handlers and middleware
#[derive(Clone)]
pub struct AppState {
    pub events: EventService,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    pub fn new(events: EventService, jwt: JwtKeys) -> Self {
        Self {
            events,
            jwt: Arc::new(jwt),
        }
    }
}
