//! HTTP API layer for vidtube.
//!
//! - **Endpoints**: videos, comments, likes, tweets, subscriptions, playlists,
//!   dashboard and healthcheck
//! - **Extractors**: authenticated user, pagination, envelope-aware JSON and query
//! - **Middleware**: bearer token resolution and shared application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::{API_PREFIX, route_not_found, router};
pub use middleware::{AppState, auth_middleware};
