//! Persistence layer.
//!
//! Repositories wrap SeaORM entities and return domain models. The `credential`
//! module builds the three interchangeable credential backends on top of them.

pub mod credential;
pub mod tracked_channel;
pub mod user_token;

#[cfg(test)]
mod test;
