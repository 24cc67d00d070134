//! Create event attendee table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventAttendee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventAttendee::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventAttendee::EventId).string_len(32).not_null())
                    .col(ColumnDef::new(EventAttendee::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(EventAttendee::RsvpStatus)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventAttendee::PaymentStatus)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(EventAttendee::TicketType).string_len(64).null())
                    .col(
                        ColumnDef::new(EventAttendee::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(EventAttendee::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_attendee_event")
                            .from(EventAttendee::Table, EventAttendee::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_attendee_user")
                            .from(EventAttendee::Table, EventAttendee::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (event_id, user_id) - re-RSVP replaces the prior record
        manager
            .create_index(
                Index::create()
                    .name("idx_event_attendee_event_user")
                    .table(EventAttendee::Table)
                    .col(EventAttendee::EventId)
                    .col(EventAttendee::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventAttendee::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EventAttendee {
    Table,
    Id,
    EventId,
    UserId,
    RsvpStatus,
    PaymentStatus,
    TicketType,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Event {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
