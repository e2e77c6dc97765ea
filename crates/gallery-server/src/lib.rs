//! Gallery Server - REST API for the artwork catalog
//!
//! This crate serves the catalog synchronization contract over HTTP, backed
//! by either a PostgreSQL document table or a flat JSON file.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod migrate;
pub mod routes;
pub mod store;

pub use error::AppError;
pub use routes::{create_router, AppState};
