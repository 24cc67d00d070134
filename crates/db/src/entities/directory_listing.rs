//! Business directory listing entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "directory_listing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(indexed)]
    pub category: String,

    #[sea_orm(nullable)]
    pub website: Option<String>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    #[sea_orm(nullable)]
    pub address: Option<String>,

    /// Comment count (denormalized)
    #[sea_orm(default_value = 0)]
    pub comment_count: i32,

    /// View count (denormalized)
    #[sea_orm(default_value = 0)]
    pub view_count: i32,

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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
