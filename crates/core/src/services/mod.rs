//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod dashboard;
pub mod health;
pub mod like;
pub mod ownership;
pub mod playlist;
pub mod subscription;
pub mod toggle;
pub mod tweet;
pub mod user;
pub mod validation;
pub mod video;

pub use comment::{CommentInput, CommentService, CommentTarget, CommentView};
pub use dashboard::{ChannelStats, DashboardService};
pub use health::{CheckResult, HealthReport, HealthService};
pub use like::{LikeService, LikedVideo};
pub use ownership::{Owned, require_owner};
pub use playlist::{
    CreatePlaylistInput, PlaylistDetail, PlaylistService, PlaylistSummary, UpdatePlaylistInput,
};
pub use subscription::{ChannelEntry, SubscriberEntry, SubscriptionService};
pub use toggle::{AssociationStore, ToggleAction, ToggleOutcome, toggle};
pub use tweet::{TweetInput, TweetService};
pub use user::{PublicProfile, UserService};
pub use video::{
    MediaUpload, PublishVideoInput, UpdateVideoInput, VideoListQuery, VideoService,
};
