//! Database repositories.
//!
//! One repository per table. Each holds a shared connection and maps
//! `DbErr` into `AppError::Database`.

pub mod comment;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

pub use comment::{CommentParent, CommentRepository};
pub use like::{LikeRepository, LikesByKind};
pub use playlist::{PlaylistRepository, PlaylistTotals};
pub use subscription::SubscriptionRepository;
pub use tweet::TweetRepository;
pub use user::UserRepository;
pub use video::{VideoFilter, VideoRepository, VideoSortKey, VideoTotals};
