//! Order workflow enums.
//!
//! Wire and storage format is `snake_case` text for all three enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fulfilment status of one order line.
///
/// The happy path is pending → confirmed → shipped → delivered; `Cancelled`
/// is a terminal override. Transitions are admin-controlled and not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label used in customer-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Declared payment method. No gateway integration; recorded only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    MobileWalletA,
    MobileWalletB,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cash_on_delivery",
            Self::MobileWalletA => "mobile_wallet_a",
            Self::MobileWalletB => "mobile_wallet_b",
            Self::BankTransfer => "bank_transfer",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
            Self::MobileWalletA => "Mobile Wallet A",
            Self::MobileWalletB => "Mobile Wallet B",
            Self::BankTransfer => "Bank Transfer",
        }
    }

    /// Payment status a freshly created order starts in.
    ///
    /// Cash on delivery is settled at the door, so it starts `Pending`;
    /// every prepaid method starts `AwaitingPayment` until manually confirmed.
    pub fn initial_payment_status(self) -> PaymentStatus {
        match self {
            Self::CashOnDelivery => PaymentStatus::Pending,
            Self::MobileWalletA | Self::MobileWalletB | Self::BankTransfer => {
                PaymentStatus::AwaitingPayment
            }
        }
    }
}

/// Manual payment-confirmation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    AwaitingPayment,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AwaitingPayment => "awaiting_payment",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

/// Returned when a stored or submitted value names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($ty:ident, $kind:literal, [$($variant:ident),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s == Self::$variant.as_str() {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownVariant {
                    kind: $kind,
                    value: s.to_owned(),
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(
    OrderStatus,
    "order status",
    [Pending, Confirmed, Shipped, Delivered, Cancelled]
);
text_enum!(
    PaymentMethod,
    "payment method",
    [CashOnDelivery, MobileWalletA, MobileWalletB, BankTransfer]
);
text_enum!(
    PaymentStatus,
    "payment status",
    [Pending, AwaitingPayment, Paid, Failed]
);
