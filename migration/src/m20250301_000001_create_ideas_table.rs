use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::Expr;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ideas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ideas::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ideas::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Ideas::Description).text().not_null())
                    .col(ColumnDef::new(Ideas::Author).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Ideas::Votes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Ideas::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Ideas::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Backs the popularity ordering of the idea list
        manager
            .create_index(
                Index::create()
                    .name("idx_ideas_votes_created_at")
                    .table(Ideas::Table)
                    .col(Ideas::Votes)
                    .col(Ideas::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ideas::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Ideas {
    Table,
    Id,
    Title,
    Description,
    Author,
    Votes,
    Status,
    CreatedAt,
}
