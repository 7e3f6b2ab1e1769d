use uuid::Uuid;

use crate::domain::notification::{Notification, StatusUpdate};
use crate::domain::repository::{Clock, MailChannel, OrderRepository, SettingsProvider};
use crate::domain::types::{OrderLine, StatusChange};
use crate::error::OrdersServiceError;
use crate::usecase::notify::Notifier;

pub struct UpdateOrderStatusUseCase<O, S, M, C>
where
    O: OrderRepository,
    S: SettingsProvider,
    M: MailChannel,
    C: Clock,
{
    pub orders: O,
    pub settings: S,
    pub notifier: Notifier<M>,
    pub clock: C,
}

impl<O, S, M, C> UpdateOrderStatusUseCase<O, S, M, C>
where
    O: OrderRepository,
    S: SettingsProvider,
    M: MailChannel,
    C: Clock,
{
    /// Last write wins. The customer is told about fulfilment status changes
    /// only, on a best-effort basis.
    pub async fn execute(
        &self,
        id: Uuid,
        change: StatusChange,
    ) -> Result<OrderLine, OrdersServiceError> {
        if change.is_empty() {
            return Err(OrdersServiceError::validation(
                "status or paymentStatus is required",
            ));
        }

        let order = self
            .orders
            .update_status(id, change, self.clock.now())
            .await?
            .ok_or(OrdersServiceError::OrderNotFound)?;

        if change.status.is_some() {
            self.notify(&order).await;
        }
        Ok(order)
    }

    async fn notify(&self, order: &OrderLine) {
        let notification = Notification::StatusUpdate(StatusUpdate {
            tracking_id: order.tracking_id.clone(),
            status: order.status,
            customer_name: Some(order.customer.name.clone()),
            product_name: Some(order.product.name.clone()),
            quantity: Some(order.quantity),
            total_amount: Some(order.total_amount),
        });
        let sent = match self.settings.snapshot().await {
            Ok(settings) => self
                .notifier
                .send(&order.customer.email, &notification, &settings)
                .await
                .map_err(OrdersServiceError::from),
            Err(e) => Err(e),
        };
        if let Err(e) = sent {
            tracing::warn!(
                error = %e,
                to = %order.customer.email,
                tracking_id = %order.tracking_id,
                "status update not delivered"
            );
        }
    }
}

pub struct DeleteOrderUseCase<O>
where
    O: OrderRepository,
{
    pub orders: O,
}

impl<O> DeleteOrderUseCase<O>
where
    O: OrderRepository,
{
    pub async fn execute(&self, id: Uuid) -> Result<(), OrdersServiceError> {
        if !self.orders.delete(id).await? {
            return Err(OrdersServiceError::OrderNotFound);
        }
        Ok(())
    }
}
