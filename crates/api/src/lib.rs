//! HTTP API layer for agora.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: CRUD handlers per collection
//! - **Extractors**: Authentication
//! - **Middleware**: Bearer-token resolution, application state
//! - **Response**: JSON envelope shared by every endpoint
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
