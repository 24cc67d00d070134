//! Comment entity.
//!
//! Comments attach to one of the three content collections through a
//! (`content_type`, `content_id`) pair and support one level of replies
//! via `parent_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The kind of content item a comment attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    #[sea_orm(string_value = "event")]
    Event,
    #[sea_orm(string_value = "news")]
    News,
    #[sea_orm(string_value = "directory")]
    Directory,
}

/// Moderation status of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "hidden")]
    Hidden,
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Author user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Which collection the target content item lives in
    pub content_type: ContentKind,

    /// Target content item ID
    #[sea_orm(indexed)]
    pub content_id: String,

    /// Parent comment ID; NULL = top-level comment
    #[sea_orm(nullable, indexed)]
    pub parent_id: Option<String>,

    pub status: CommentStatus,

    /// Reply count (denormalized)
    #[sea_orm(default_value = 0)]
    pub reply_count: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id"
    )]
    Parent,

    #[sea_orm(has_many = "super::comment_flag::Entity")]
    Flags,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment_flag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
