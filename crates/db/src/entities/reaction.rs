//! Reaction entity (like/dislike marks on content items and comments).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::comment::ContentKind;

/// What a reaction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    #[sea_orm(string_value = "event")]
    Event,
    #[sea_orm(string_value = "news")]
    News,
    #[sea_orm(string_value = "directory")]
    Directory,
    #[sea_orm(string_value = "comment")]
    Comment,
}

impl From<ContentKind> for TargetType {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Event => Self::Event,
            ContentKind::News => Self::News,
            ContentKind::Directory => Self::Directory,
        }
    }
}

/// The kind of reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    #[sea_orm(string_value = "like")]
    Like,
    #[sea_orm(string_value = "dislike")]
    Dislike,
}

impl ReactionKind {
    /// The opposite reaction kind.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who reacted; at most one row per (user, target)
    pub user_id: String,

    pub target_type: TargetType,

    pub target_id: String,

    pub kind: ReactionKind,

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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_kind() {
        assert_eq!(ReactionKind::Like.opposite(), ReactionKind::Dislike);
        assert_eq!(ReactionKind::Dislike.opposite(), ReactionKind::Like);
    }

    #[test]
    fn test_target_type_from_content_kind() {
        assert_eq!(TargetType::from(ContentKind::Event), TargetType::Event);
        assert_eq!(TargetType::from(ContentKind::News), TargetType::News);
        assert_eq!(
            TargetType::from(ContentKind::Directory),
            TargetType::Directory
        );
    }
}
