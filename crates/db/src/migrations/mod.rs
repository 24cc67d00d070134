//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_event_table;
mod m20250601_000003_create_news_article_table;
mod m20250601_000004_create_directory_listing_table;
mod m20250601_000005_create_comment_table;
mod m20250601_000006_create_reaction_table;
mod m20250601_000007_create_event_attendee_table;
mod m20250601_000008_create_comment_flag_table;
mod m20250601_000009_create_team_member_table;
mod m20250601_000010_create_enrollment_table;
mod m20250601_000011_create_upload_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_event_table::Migration),
            Box::new(m20250601_000003_create_news_article_table::Migration),
            Box::new(m20250601_000004_create_directory_listing_table::Migration),
            Box::new(m20250601_000005_create_comment_table::Migration),
            Box::new(m20250601_000006_create_reaction_table::Migration),
            Box::new(m20250601_000007_create_event_attendee_table::Migration),
            Box::new(m20250601_000008_create_comment_flag_table::Migration),
            Box::new(m20250601_000009_create_team_member_table::Migration),
            Box::new(m20250601_000010_create_enrollment_table::Migration),
            Box::new(m20250601_000011_create_upload_table::Migration),
        ]
    }
}
