#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use storefront_domain::email::Email;

use crate::domain::notification::{DispatchError, OutgoingMail};
use crate::domain::types::{IssueSlot, OrderLine, PasscodeChallenge, SiteSettings, StatusChange};
use crate::error::OrdersServiceError;

/// Repository for issued passcode challenges. Rows are never deleted.
pub trait PasscodeRepository: Send + Sync {
    /// Insert `challenge` unless another challenge for the same email was
    /// created after `window_start`. Check and insert are serialized per email.
    async fn insert_unless_recent(
        &self,
        challenge: &PasscodeChallenge,
        window_start: DateTime<Utc>,
    ) -> Result<IssueSlot, OrdersServiceError>;

    /// Most recent challenge for `email` with this exact code that is still
    /// actionable at `now`.
    async fn find_active(
        &self,
        email: &Email,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PasscodeChallenge>, OrdersServiceError>;

    /// Count a failed verify against every actionable challenge for `email`.
    ///
    /// Anyone who knows an address can burn its live codes this way. The
    /// lockout only lasts until the next issuance: a fresh challenge starts
    /// at zero attempts once the cooldown has passed.
    async fn record_failed_attempt(
        &self,
        email: &Email,
        now: DateTime<Utc>,
    ) -> Result<(), OrdersServiceError>;

    /// Flip `verified` to true. Returns `false` if the row was already verified.
    async fn mark_verified(&self, id: Uuid) -> Result<bool, OrdersServiceError>;

    /// Whether a challenge for `email` created after `since` has been verified.
    async fn has_verified_since(
        &self,
        email: &Email,
        since: DateTime<Utc>,
    ) -> Result<bool, OrdersServiceError>;
}

/// Repository for materialized order lines.
pub trait OrderRepository: Send + Sync {
    /// Insert all lines of one checkout atomically.
    async fn insert_batch(&self, lines: &[OrderLine]) -> Result<(), OrdersServiceError>;

    /// Exact, case-sensitive match.
    async fn find_by_tracking_id(
        &self,
        tracking_id: &str,
    ) -> Result<Option<OrderLine>, OrdersServiceError>;

    /// All lines for a customer, newest first.
    async fn list_by_email(&self, email: &Email) -> Result<Vec<OrderLine>, OrdersServiceError>;

    /// Lines created by an earlier call with the same idempotency key,
    /// ordered by line number.
    async fn list_by_checkout_key(
        &self,
        email: &Email,
        checkout_key: &str,
    ) -> Result<Vec<OrderLine>, OrdersServiceError>;

    /// Apply an admin edit and bump `updated_at`. `None` if no such order.
    async fn update_status(
        &self,
        id: Uuid,
        change: StatusChange,
        now: DateTime<Utc>,
    ) -> Result<Option<OrderLine>, OrdersServiceError>;

    /// Hard delete. Returns `false` if no such order.
    async fn delete(&self, id: Uuid) -> Result<bool, OrdersServiceError>;
}

/// Port for reading the `site_settings` key/value rows as one snapshot.
pub trait SettingsProvider: Send + Sync {
    async fn snapshot(&self) -> Result<SiteSettings, OrdersServiceError>;
}

/// Port for the external transactional-email channel.
pub trait MailChannel: Send + Sync {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), DispatchError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
