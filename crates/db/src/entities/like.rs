//! Like entity. One row per (user, target) pair; the target is polymorphic.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of record a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum LikeTarget {
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "tweet")]
    Tweet,
    #[sea_orm(string_value = "comment")]
    Comment,
}

impl LikeTarget {
    /// Human-readable name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Tweet => "tweet",
            Self::Comment => "comment",
        }
    }

    /// Capitalized name for messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Tweet => "Tweet",
            Self::Comment => "Comment",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "like")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who liked
    pub user_id: String,

    pub target_kind: LikeTarget,

    /// Id of the liked video, tweet or comment
    pub target_id: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    // No foreign key in the schema: only meaningful when target_kind = video.
    #[sea_orm(
        belongs_to = "super::video::Entity",
        from = "Column::TargetId",
        to = "super::video::Column::Id"
    )]
    Video,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Video.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
