//! Interlink Test Utils
//!
//! Provides shared testing utilities for building unit and integration tests for the interlink
//! bot. This crate offers a builder pattern for creating test contexts with in-memory SQLite
//! databases and factories for seeding credential and tracked channel rows.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Insert rows with sensible defaults
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::UserToken;
//!
//! #[tokio::test]
//! async fn test_token_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(UserToken)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
