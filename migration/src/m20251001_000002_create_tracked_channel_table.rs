use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TrackedChannel::Table)
                    .if_not_exists()
                    .col(string_len(TrackedChannel::ChannelId, 32).primary_key())
                    .col(string_len(TrackedChannel::GuildId, 32))
                    .col(string_len(TrackedChannel::UserId, 32))
                    .col(string_len(TrackedChannel::NotificationChannelId, 32))
                    .col(
                        timestamp_with_time_zone(TrackedChannel::AddedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(boolean(TrackedChannel::IsInactive).default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tracked_channel_guild_id")
                    .table(TrackedChannel::Table)
                    .col(TrackedChannel::GuildId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TrackedChannel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TrackedChannel {
    Table,
    ChannelId,
    GuildId,
    UserId,
    NotificationChannelId,
    AddedAt,
    IsInactive,
}
