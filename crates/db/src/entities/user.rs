//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    pub username_lower: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Display name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    /// Argon2 password hash, never exposed through the API
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Access token
    #[serde(skip_serializing)]
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Avatar URL
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Profile bio
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    /// Is this user an admin?
    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::event::Entity")]
    Events,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
