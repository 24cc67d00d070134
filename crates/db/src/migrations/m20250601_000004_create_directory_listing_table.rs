//! Create directory listing table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DirectoryListing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DirectoryListing::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DirectoryListing::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DirectoryListing::Name)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DirectoryListing::Description).text().not_null())
                    .col(
                        ColumnDef::new(DirectoryListing::Category)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DirectoryListing::Website).string_len(512).null())
                    .col(ColumnDef::new(DirectoryListing::Phone).string_len(64).null())
                    .col(ColumnDef::new(DirectoryListing::Address).string_len(512).null())
                    .col(
                        ColumnDef::new(DirectoryListing::CommentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DirectoryListing::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DirectoryListing::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DirectoryListing::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_directory_listing_user")
                            .from(DirectoryListing::Table, DirectoryListing::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: category (for filtered listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_directory_listing_category")
                    .table(DirectoryListing::Table)
                    .col(DirectoryListing::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DirectoryListing::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DirectoryListing {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Category,
    Website,
    Phone,
    Address,
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
