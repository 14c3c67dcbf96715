//! HTTP request handlers for the OAuth web surface.

pub mod auth;
pub mod health;
