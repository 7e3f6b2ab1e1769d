use sea_orm::entity::prelude::*;

/// One-time passcode issued to a customer email before checkout.
/// Rows are never deleted; they expire by time and flip `verified` once.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "passcode_challenges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Normalized (trimmed, lowercased) email.
    pub email: String,
    pub phone: Option<String>,
    pub code: String,
    /// Failed verify attempts counted against this challenge.
    pub attempts: i32,
    pub verified: bool,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
