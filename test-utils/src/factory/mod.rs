//! Factory methods for creating test data.
//!
//! This module provides factory methods for inserting test rows with sensible defaults,
//! reducing boilerplate in tests.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     let token = factory::user_token::create_user_token(&db).await?;
//!     let channel = factory::tracked_channel::create_tracked_channel(&db).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let token = factory::user_token::UserTokenFactory::new(&db)
//!     .user_id("987654321")
//!     .access_token("custom-token")
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `user_token` - Create stored OAuth credentials
//! - `tracked_channel` - Create tracked channel rows
//! - `helpers` - Unique id generation shared by all factories

pub mod helpers;
pub mod tracked_channel;
pub mod user_token;

pub use tracked_channel::create_tracked_channel;
pub use user_token::create_user_token;
