//! Create comment flag table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommentFlag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommentFlag::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CommentFlag::CommentId).string_len(32).not_null())
                    .col(ColumnDef::new(CommentFlag::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(CommentFlag::Reason).string_len(512).not_null())
                    .col(
                        ColumnDef::new(CommentFlag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_flag_comment")
                            .from(CommentFlag::Table, CommentFlag::CommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_flag_user")
                            .from(CommentFlag::Table, CommentFlag::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (comment_id, user_id) - flagging is idempotent per user
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_flag_comment_user")
                    .table(CommentFlag::Table)
                    .col(CommentFlag::CommentId)
                    .col(CommentFlag::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommentFlag::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CommentFlag {
    Table,
    Id,
    CommentId,
    UserId,
    Reason,
    CreatedAt,
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
