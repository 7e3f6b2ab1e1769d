use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PasscodeChallenges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PasscodeChallenges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PasscodeChallenges::Email).string().not_null())
                    .col(ColumnDef::new(PasscodeChallenges::Phone).string())
                    .col(ColumnDef::new(PasscodeChallenges::Code).string_len(6).not_null())
                    .col(
                        ColumnDef::new(PasscodeChallenges::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PasscodeChallenges::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PasscodeChallenges::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PasscodeChallenges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Cooldown, verify and freshness lookups all filter by email, newest first.
        manager
            .create_index(
                Index::create()
                    .table(PasscodeChallenges::Table)
                    .col(PasscodeChallenges::Email)
                    .col(PasscodeChallenges::CreatedAt)
                    .name("idx_passcode_challenges_email_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PasscodeChallenges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PasscodeChallenges {
    Table,
    Id,
    Email,
    Phone,
    Code,
    Attempts,
    Verified,
    ExpiresAt,
    CreatedAt,
}
