//! Create enrollment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollment::CourseName).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Enrollment::ApplicantName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollment::Email).string_len(256).not_null())
                    .col(ColumnDef::new(Enrollment::Phone).string_len(64).null())
                    .col(ColumnDef::new(Enrollment::Message).text().null())
                    .col(
                        ColumnDef::new(Enrollment::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Enrollment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Enrollment::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (the admin queue filters on it)
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_status")
                    .table(Enrollment::Table)
                    .col(Enrollment::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enrollment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Enrollment {
    Table,
    Id,
    CourseName,
    ApplicantName,
    Email,
    Phone,
    Message,
    Status,
    CreatedAt,
    UpdatedAt,
}
