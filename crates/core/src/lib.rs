//! Core business logic for vidtube.
//!
//! Services sit between the HTTP handlers and the repositories. They parse
//! request-supplied IDs, enforce ownership, and run the like/subscription
//! toggle.

pub mod services;

pub use services::*;
