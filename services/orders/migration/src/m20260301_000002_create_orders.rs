use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Orders::TrackingId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Orders::CheckoutKey).string())
                    .col(ColumnDef::new(Orders::LineNo).integer().not_null())
                    .col(ColumnDef::new(Orders::CustomerName).string().not_null())
                    .col(ColumnDef::new(Orders::CustomerEmail).string().not_null())
                    .col(ColumnDef::new(Orders::CustomerPhone).string().not_null())
                    .col(ColumnDef::new(Orders::CustomerAddress).text())
                    .col(ColumnDef::new(Orders::ProductId).string().not_null())
                    .col(ColumnDef::new(Orders::ProductName).string().not_null())
                    .col(
                        ColumnDef::new(Orders::ProductPrice)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Orders::ProductImageUrl).text())
                    .col(ColumnDef::new(Orders::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(Orders::TotalAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Orders::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Orders::PaymentStatus).string().not_null())
                    .col(ColumnDef::new(Orders::Notes).text())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Duplicate submissions of one checkout collide here (NULL keys never do).
        manager
            .create_index(
                Index::create()
                    .table(Orders::Table)
                    .col(Orders::CheckoutKey)
                    .col(Orders::LineNo)
                    .unique()
                    .name("uq_orders_checkout_key_line_no")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Orders::Table)
                    .col(Orders::CustomerEmail)
                    .name("idx_orders_customer_email")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    TrackingId,
    CheckoutKey,
    LineNo,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    CustomerAddress,
    ProductId,
    ProductName,
    ProductPrice,
    ProductImageUrl,
    Quantity,
    TotalAmount,
    Status,
    PaymentMethod,
    PaymentStatus,
    Notes,
    CreatedAt,
    UpdatedAt,
}
