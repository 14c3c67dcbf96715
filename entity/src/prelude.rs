pub use super::tracked_channel::Entity as TrackedChannel;
pub use super::user_token::Entity as UserToken;
