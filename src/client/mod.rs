//! Client side: API access plus the cached record list the view runs over.

mod api;
mod cache;

pub use api::{HttpStudentsApi, LocalStudentsApi, StudentsApi};
pub use cache::StudentCache;
