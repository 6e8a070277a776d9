//! Common utilities and shared types for vidtube.
//!
//! This crate provides foundational components used across all vidtube crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based identifiers via [`IdGenerator`]
//! - **Pagination**: Page requests and result pages via [`PageRequest`] and [`Page`]
//! - **Storage**: Media stores for uploaded videos and thumbnails
//!
//! # Example
//!
//! ```no_run
//! use vidtube_common::{AppResult, Config, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id = IdGenerator::new().generate();
//!     println!("{}:{} issued {id}", config.server.host, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod pagination;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorEnvelope};
pub use id::{IdGenerator, parse_id};
pub use pagination::{Page, PageRequest, SortDirection};
pub use storage::{
    LocalMediaStore, MediaStore, MediaStoreHandle, NoOpMediaStore, UploadedMedia, media_key,
};
