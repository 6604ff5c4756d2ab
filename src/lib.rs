//! `rosterd` - student records service and client
//!
//! A SQLite-backed store exposed as a JSON CRUD API under `/api/students`,
//! a client cache over that API, and the derived view (search, class filter,
//! sort and dashboard statistics) computed from the cached records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod store;
pub mod view;

pub use client::{HttpStudentsApi, LocalStudentsApi, StudentCache, StudentsApi};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Gender, NewStudent, Numeric, StudentForm, StudentRecord};
pub use store::StudentStore;
pub use view::{DerivedView, QueryState, SortDir, SortKey, ViewStats};
