use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserToken::Table)
                    .if_not_exists()
                    .col(string_len(UserToken::UserId, 50).primary_key())
                    .col(text(UserToken::AccessToken))
                    .col(string_len_null(UserToken::Username, 100))
                    .col(string_null(UserToken::AvatarHash))
                    .col(
                        timestamp_with_time_zone(UserToken::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(UserToken::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserToken::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserToken {
    Table,
    UserId,
    AccessToken,
    Username,
    AvatarHash,
    CreatedAt,
    UpdatedAt,
}
