use chrono::Duration;

use storefront_domain::email::Email;

use crate::domain::repository::{Clock, OrderRepository, PasscodeRepository};
use crate::domain::types::{OrderLine, VERIFIED_FRESHNESS_SECS};
use crate::error::OrdersServiceError;

pub struct TrackOrderUseCase<O>
where
    O: OrderRepository,
{
    pub orders: O,
}

impl<O> TrackOrderUseCase<O>
where
    O: OrderRepository,
{
    /// Tracking IDs are matched exactly, case included.
    pub async fn execute(&self, tracking_id: &str) -> Result<Option<OrderLine>, OrdersServiceError> {
        if tracking_id.is_empty() {
            return Err(OrdersServiceError::validation("tracking id is required"));
        }
        self.orders.find_by_tracking_id(tracking_id).await
    }
}

pub struct OrderHistoryUseCase<O, P, C>
where
    O: OrderRepository,
    P: PasscodeRepository,
    C: Clock,
{
    pub orders: O,
    pub challenges: P,
    pub clock: C,
    /// When set, history requires the same fresh verified passcode as checkout.
    pub require_verification: bool,
}

impl<O, P, C> OrderHistoryUseCase<O, P, C>
where
    O: OrderRepository,
    P: PasscodeRepository,
    C: Clock,
{
    pub async fn execute(&self, email: &str) -> Result<Vec<OrderLine>, OrdersServiceError> {
        let email = Email::parse(email)?;

        if self.require_verification {
            let since = self.clock.now() - Duration::seconds(VERIFIED_FRESHNESS_SECS);
            if !self.challenges.has_verified_since(&email, since).await? {
                return Err(OrdersServiceError::NotVerified);
            }
        }

        let mut orders = self.orders.list_by_email(&email).await?;
        // Newest first regardless of what the store hands back; line order
        // breaks ties within one checkout.
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(a.line_no.cmp(&b.line_no))
        });
        Ok(orders)
    }
}
