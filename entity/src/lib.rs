//! SeaORM entity models for the interlink database.

pub mod prelude;

pub mod tracked_channel;
pub mod user_token;
