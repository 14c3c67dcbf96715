use axum::{routing::get, Router};

use crate::{
    controller::{
        auth::{callback, index, login},
        health::health,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/health", get(health))
}
