//! Create news article table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NewsArticle::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NewsArticle::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NewsArticle::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(NewsArticle::Title).string_len(256).not_null())
                    .col(ColumnDef::new(NewsArticle::Body).text().not_null())
                    .col(ColumnDef::new(NewsArticle::Summary).string_len(512).null())
                    .col(ColumnDef::new(NewsArticle::ImageUrl).string_len(512).null())
                    .col(
                        ColumnDef::new(NewsArticle::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(NewsArticle::CommentCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(NewsArticle::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(NewsArticle::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(NewsArticle::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_news_article_user")
                            .from(NewsArticle::Table, NewsArticle::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (is_published, id) - the public feed filters and sorts on these
        manager
            .create_index(
                Index::create()
                    .name("idx_news_article_published")
                    .table(NewsArticle::Table)
                    .col(NewsArticle::IsPublished)
                    .col(NewsArticle::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NewsArticle::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum NewsArticle {
    Table,
    Id,
    UserId,
    Title,
    Body,
    Summary,
    ImageUrl,
    IsPublished,
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
