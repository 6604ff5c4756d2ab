use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::with_store;
use crate::http::error::{ok, ApiError};
use crate::http::types::{AppState, Envelope};

#[derive(Debug, Serialize)]
pub struct Health {
    pub version: &'static str,
    pub students: usize,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<Envelope<Health>>, ApiError> {
    let students = with_store(&state, |store| store.count()).await?;
    Ok(ok(
        "ok",
        Health {
            version: env!("CARGO_PKG_VERSION"),
            students,
        },
    ))
}
