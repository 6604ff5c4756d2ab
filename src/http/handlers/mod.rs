pub mod core;
pub mod students;

use super::error::ApiError;
use super::types::AppState;
use crate::error::{Error, Result};
use crate::store::StudentStore;

/// Run one store operation off the async executor.
pub(crate) async fn with_store<T, F>(state: &AppState, op: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce(&StudentStore) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| ApiError::from(Error::internal(format!("store task failed: {e}"))))?
        .map_err(ApiError::from)
}
