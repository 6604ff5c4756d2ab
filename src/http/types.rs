use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::store::StudentStore;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<StudentStore>,
}

impl AppState {
    pub fn new(store: StudentStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Success body: `{ "message": ..., "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub data: T,
}

/// Failure body: `{ "error": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
