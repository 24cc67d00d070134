//! Create team member table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TeamMember::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamMember::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamMember::Name).string_len(256).not_null())
                    .col(ColumnDef::new(TeamMember::Role).string_len(128).not_null())
                    .col(ColumnDef::new(TeamMember::Bio).text().null())
                    .col(ColumnDef::new(TeamMember::PhotoUrl).string_len(512).null())
                    .col(
                        ColumnDef::new(TeamMember::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TeamMember::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TeamMember::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TeamMember::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeamMember::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TeamMember {
    Table,
    Id,
    Name,
    Role,
    Bio,
    PhotoUrl,
    DisplayOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
