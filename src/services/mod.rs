pub mod events;
pub mod friends;

pub use events::EventService;
pub use friends::{EveryoneIsFriend, FriendsResolver};
