use std::time::Duration;

use rust_decimal::Decimal;

use storefront_domain::order::{OrderStatus, PaymentMethod};

/// A transactional message to render and deliver. Never persisted.
#[derive(Debug, Clone)]
pub enum Notification {
    Passcode {
        code: String,
        expires_in_minutes: i64,
    },
    Confirmation(OrderConfirmation),
    StatusUpdate(StatusUpdate),
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Passcode { .. } => "passcode",
            Self::Confirmation(_) => "confirmation",
            Self::StatusUpdate(_) => "status_update",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    pub customer_name: String,
    pub customer_address: Option<String>,
    pub payment_method: PaymentMethod,
    pub lines: Vec<ConfirmationLine>,
}

impl OrderConfirmation {
    /// `None` when any subtotal or the sum leaves the `Decimal` range.
    pub fn total(&self) -> Option<Decimal> {
        self.lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.subtotal()?))
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmationLine {
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub tracking_id: Option<String>,
}

impl ConfirmationLine {
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub tracking_id: String,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub total_amount: Option<Decimal>,
}

/// Rendered output of the pure template step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub html: String,
}

/// What a mail channel is handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("mail channel rejected message: {0}")]
    Channel(String),
    #[error("mail channel did not answer within {0:?}")]
    Timeout(Duration),
    #[error("failed to render message: {0}")]
    Render(String),
}
