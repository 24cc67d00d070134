//! News article entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "news_article")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Author user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    #[sea_orm(nullable)]
    pub summary: Option<String>,

    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    /// Drafts are only visible to their author and admins
    #[sea_orm(default_value = false, indexed)]
    pub is_published: bool,

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
