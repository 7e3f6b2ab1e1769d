use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use storefront_domain::email::Email;
use storefront_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};

/// Number of digits in a passcode.
pub const PASSCODE_LEN: usize = 6;
/// Passcode lifetime.
pub const PASSCODE_TTL_SECS: i64 = 600;
/// Minimum interval between two issuances for the same email.
pub const ISSUE_COOLDOWN_SECS: i64 = 60;
/// How long a verified passcode stays valid as proof for checkout.
pub const VERIFIED_FRESHNESS_SECS: i64 = 1800;
/// Failed verify attempts after which a challenge is dead.
pub const MAX_VERIFY_ATTEMPTS: i32 = 5;
/// Random suffix length of a tracking ID.
pub const TRACKING_SUFFIX_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct PasscodeChallenge {
    pub id: Uuid,
    pub email: Email,
    pub phone: Option<String>,
    pub code: String,
    pub attempts: i32,
    pub verified: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PasscodeChallenge {
    /// Unverified, unexpired and not locked out by failed attempts.
    pub fn is_actionable(&self, now: DateTime<Utc>) -> bool {
        !self.verified && self.expires_at > now && self.attempts < MAX_VERIFY_ATTEMPTS
    }
}

/// Outcome of an atomic cooldown-check-then-insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueSlot {
    Issued,
    CoolingDown { last_created_at: DateTime<Utc> },
}

/// Whole seconds until a new passcode may be issued, rounded up so the
/// client never retries a moment too early.
pub fn cooldown_remaining(last_created_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let left = Duration::seconds(ISSUE_COOLDOWN_SECS) - (now - last_created_at);
    let millis = left.num_milliseconds().clamp(0, ISSUE_COOLDOWN_SECS * 1000);
    let secs = (millis + 999) / 1000;
    secs.clamp(1, ISSUE_COOLDOWN_SECS) as u64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: Option<String>,
}

/// Catalog data captured at checkout time. Later catalog edits never reach
/// an order through this snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub product_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LineItem {
    pub product: ProductSnapshot,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct OrderLine {
    pub id: Uuid,
    pub tracking_id: String,
    pub checkout_key: Option<String>,
    pub line_no: i32,
    pub customer: Customer,
    pub product: ProductSnapshot,
    pub quantity: i32,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin edit of an order line. `None` leaves the field untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusChange {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl StatusChange {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.payment_status.is_none()
    }
}

pub const SETTING_STORE_NAME: &str = "store_name";
pub const SETTING_TRACKING_PREFIX: &str = "tracking_prefix";
pub const SETTING_CURRENCY: &str = "currency";
pub const SETTING_SUPPORT_EMAIL: &str = "support_email";

/// Immutable per-request view of the `site_settings` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub store_name: String,
    pub tracking_prefix: String,
    pub currency: String,
    pub support_email: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            store_name: "Storefront".to_owned(),
            tracking_prefix: "ORD".to_owned(),
            currency: "PKR".to_owned(),
            support_email: None,
        }
    }
}

impl SiteSettings {
    /// Build a snapshot from raw key/value rows. Unknown keys are ignored,
    /// blank values fall back to the defaults.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut settings = Self::default();
        for (key, value) in entries {
            let value: String = value.into();
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                SETTING_STORE_NAME => settings.store_name = value.to_owned(),
                SETTING_TRACKING_PREFIX => settings.tracking_prefix = value.to_owned(),
                SETTING_CURRENCY => settings.currency = value.to_owned(),
                SETTING_SUPPORT_EMAIL => settings.support_email = Some(value.to_owned()),
                _ => {}
            }
        }
        settings
    }
}
