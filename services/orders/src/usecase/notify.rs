use std::time::Duration;

use rust_decimal::Decimal;

use storefront_domain::email::Email;
use storefront_domain::order::{OrderStatus, PaymentMethod};

use crate::domain::notification::{
    ConfirmationLine, DispatchError, Notification, OrderConfirmation, OutgoingMail, StatusUpdate,
};
use crate::domain::repository::{MailChannel, SettingsProvider};
use crate::domain::types::SiteSettings;
use crate::error::OrdersServiceError;
use crate::render::render;
use crate::usecase::order::{cart_total, priced_line_total};

/// Renders a notification and hands it to the mail channel.
pub struct Notifier<M>
where
    M: MailChannel,
{
    pub channel: M,
    pub from_address: String,
    /// Upper bound on one delivery, so a stalled channel cannot hold a
    /// request open.
    pub timeout: Duration,
}

impl<M> Notifier<M>
where
    M: MailChannel,
{
    pub async fn send(
        &self,
        to: &Email,
        notification: &Notification,
        settings: &SiteSettings,
    ) -> Result<(), DispatchError> {
        let rendered = render(notification, settings)?;
        let mail = OutgoingMail {
            from: self.sender(settings),
            to: to.to_string(),
            subject: rendered.subject,
            html: rendered.html,
        };
        tokio::time::timeout(self.timeout, self.channel.deliver(&mail))
            .await
            .map_err(|_| DispatchError::Timeout(self.timeout))??;
        tracing::info!(to = %to, kind = notification.kind(), "notification sent");
        Ok(())
    }

    fn sender(&self, settings: &SiteSettings) -> String {
        let name: String = settings
            .store_name
            .chars()
            .filter(|c| !matches!(c, '"' | '<' | '>'))
            .collect();
        format!("\"{name}\" <{}>", self.from_address)
    }
}

pub struct ConfirmationItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

pub struct SendConfirmationInput {
    pub email: String,
    pub items: Vec<ConfirmationItem>,
    pub tracking_ids: Vec<String>,
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    pub customer_address: Option<String>,
}

pub struct SendConfirmationUseCase<S, M>
where
    S: SettingsProvider,
    M: MailChannel,
{
    pub settings: S,
    pub notifier: Notifier<M>,
}

impl<S, M> SendConfirmationUseCase<S, M>
where
    S: SettingsProvider,
    M: MailChannel,
{
    pub async fn execute(&self, input: SendConfirmationInput) -> Result<(), OrdersServiceError> {
        let email = Email::parse(&input.email)?;
        if input.items.is_empty() {
            return Err(OrdersServiceError::validation(
                "at least one order item is required",
            ));
        }
        let totals = input
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| priced_line_total(i + 1, &item.name, item.price, item.quantity))
            .collect::<Result<Vec<_>, _>>()?;
        cart_total(totals)?;

        // Items and tracking IDs pair up by position; a short ID list leaves
        // the trailing lines without one.
        let mut tracking_ids = input.tracking_ids.into_iter();
        let lines = input
            .items
            .into_iter()
            .map(|item| ConfirmationLine {
                product_name: item.name,
                unit_price: item.price,
                quantity: item.quantity,
                tracking_id: tracking_ids.next(),
            })
            .collect();

        let notification = Notification::Confirmation(OrderConfirmation {
            customer_name: input.customer_name,
            customer_address: input.customer_address,
            payment_method: input.payment_method,
            lines,
        });
        let settings = self.settings.snapshot().await?;
        self.notifier.send(&email, &notification, &settings).await?;
        Ok(())
    }
}

pub struct SendStatusUpdateInput {
    pub email: String,
    pub tracking_id: String,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub total_amount: Option<Decimal>,
}

pub struct SendStatusUpdateUseCase<S, M>
where
    S: SettingsProvider,
    M: MailChannel,
{
    pub settings: S,
    pub notifier: Notifier<M>,
}

impl<S, M> SendStatusUpdateUseCase<S, M>
where
    S: SettingsProvider,
    M: MailChannel,
{
    pub async fn execute(&self, input: SendStatusUpdateInput) -> Result<(), OrdersServiceError> {
        let email = Email::parse(&input.email)?;
        let tracking_id = input.tracking_id.trim();
        if tracking_id.is_empty() {
            return Err(OrdersServiceError::validation("tracking id is required"));
        }

        let notification = Notification::StatusUpdate(StatusUpdate {
            tracking_id: tracking_id.to_owned(),
            status: input.status,
            customer_name: input.customer_name,
            product_name: input.product_name,
            quantity: input.quantity,
            total_amount: input.total_amount,
        });
        let settings = self.settings.snapshot().await?;
        self.notifier.send(&email, &notification, &settings).await?;
        Ok(())
    }
}
