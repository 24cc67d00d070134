//! Event entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(nullable)]
    pub location: Option<String>,

    /// Calendar date of the event; the event runs until 23:59:59.999 on it
    #[sea_orm(indexed)]
    pub date: Date,

    /// Derived from `date` on creation and date changes; admins may override
    #[sea_orm(default_value = true, indexed)]
    pub is_active: bool,

    /// Ticket price in cents; NULL = free event
    #[sea_orm(nullable)]
    pub ticket_price_cents: Option<i32>,

    /// Maximum number of "going" attendees; NULL = unlimited
    #[sea_orm(nullable)]
    pub capacity: Option<i32>,

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

    #[sea_orm(has_many = "super::event_attendee::Entity")]
    Attendees,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::event_attendee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
