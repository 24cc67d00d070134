//! Create event table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Event::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Event::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Event::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Event::Description).text().not_null())
                    .col(ColumnDef::new(Event::Location).string_len(512).null())
                    .col(ColumnDef::new(Event::Date).date().not_null())
                    .col(
                        ColumnDef::new(Event::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Event::TicketPriceCents).integer().null())
                    .col(ColumnDef::new(Event::Capacity).integer().null())
                    .col(
                        ColumnDef::new(Event::CommentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Event::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Event::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Event::UpdatedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_user")
                            .from(Event::Table, Event::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's events)
        manager
            .create_index(
                Index::create()
                    .name("idx_event_user_id")
                    .table(Event::Table)
                    .col(Event::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: (date, is_active) - the batch status sweep scans these
        manager
            .create_index(
                Index::create()
                    .name("idx_event_date_active")
                    .table(Event::Table)
                    .col(Event::Date)
                    .col(Event::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Event {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Location,
    Date,
    IsActive,
    TicketPriceCents,
    Capacity,
    CommentCount,
    ViewCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
