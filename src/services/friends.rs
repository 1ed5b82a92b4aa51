use async_trait::async_trait;
use uuid::Uuid;

/// Answers whether `viewer` may see `owner`'s friends-only events.
#[async_trait]
pub trait FriendsResolver: Send + Sync {
    async fn is_friend(&self, viewer: Uuid, owner: Uuid) -> bool;
}

/// Placeholder until a social graph exists: every user counts as a friend,
/// so friends-only events are visible like public ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct EveryoneIsFriend;

#[async_trait]
impl FriendsResolver for EveryoneIsFriend {
    async fn is_friend(&self, _viewer: Uuid, _owner: Uuid) -> bool {
        true
    }
}
