use sea_orm::entity::prelude::*;

/// One persisted order line. A checkout with N cart lines produces N rows
/// sharing `checkout_key`, ordered by `line_no`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub tracking_id: String,
    pub checkout_key: Option<String>,
    pub line_no: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub product_id: String,
    pub product_name: String,
    /// Unit price snapshot at order time.
    pub product_price: Decimal,
    pub product_image_url: Option<String>,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub status: String,
    pub payment_method: String,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
