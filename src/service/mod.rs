//! Service layer for business logic and orchestration.
//!
//! Services sit between the bot/web surfaces and the data layer. They work with domain
//! models and coordinate repositories, credential backends and Discord calls.

pub mod auth;
pub mod channel_tracker;
pub mod deployment;
pub mod membership;
pub mod storage;
pub mod token_resolver;

#[cfg(test)]
pub mod fake;
