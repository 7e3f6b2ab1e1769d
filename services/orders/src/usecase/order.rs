use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use rust_decimal::Decimal;
use uuid::Uuid;

use storefront_domain::email::Email;
use storefront_domain::order::{OrderStatus, PaymentMethod};

use crate::domain::notification::{ConfirmationLine, Notification, OrderConfirmation};
use crate::domain::repository::{
    Clock, MailChannel, OrderRepository, PasscodeRepository, SettingsProvider,
};
use crate::domain::types::{
    Customer, LineItem, OrderLine, ProductSnapshot, TRACKING_SUFFIX_LEN, VERIFIED_FRESHNESS_SECS,
};
use crate::error::OrdersServiceError;
use crate::usecase::notify::Notifier;

/// Charset for the random part of a tracking ID (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const MAX_IDEMPOTENCY_KEY_LEN: usize = 128;

/// `{prefix}-{YYYYMMDD}-{8 chars}` with the UTC date of `now`.
pub fn generate_tracking_id(prefix: &str, now: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..TRACKING_SUFFIX_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    format!("{prefix}-{}-{suffix}", now.format("%Y%m%d"))
}

pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

pub struct OrderItemInput {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub quantity: i32,
}

pub struct CreateOrderInput {
    pub email: String,
    pub customer: CustomerDetails,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub items: Vec<OrderItemInput>,
    pub idempotency_key: Option<String>,
}

#[derive(Debug)]
pub struct CreateOrderOutput {
    /// In submitted line-item order.
    pub tracking_ids: Vec<String>,
    /// True when an earlier call with the same idempotency key already
    /// created these lines.
    pub replayed: bool,
}

pub struct CreateOrderUseCase<O, P, S, M, C>
where
    O: OrderRepository,
    P: PasscodeRepository,
    S: SettingsProvider,
    M: MailChannel,
    C: Clock,
{
    pub orders: O,
    pub challenges: P,
    pub settings: S,
    pub notifier: Notifier<M>,
    pub clock: C,
}

impl<O, P, S, M, C> CreateOrderUseCase<O, P, S, M, C>
where
    O: OrderRepository,
    P: PasscodeRepository,
    S: SettingsProvider,
    M: MailChannel,
    C: Clock,
{
    pub async fn execute(
        &self,
        input: CreateOrderInput,
    ) -> Result<CreateOrderOutput, OrdersServiceError> {
        // 1. Validate everything before touching storage → 400
        let customer = validate_customer(&input.email, input.customer)?;
        let items = validate_items(input.items)?;
        let checkout_key = validate_idempotency_key(input.idempotency_key)?;
        let notes = input
            .notes
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());

        // 2. Require a fresh verified passcode → 403
        let now = self.clock.now();
        let since = now - Duration::seconds(VERIFIED_FRESHNESS_SECS);
        if !self
            .challenges
            .has_verified_since(&customer.email, since)
            .await?
        {
            return Err(OrdersServiceError::NotVerified);
        }

        // 3. Replay of an already-materialized checkout
        if let Some(key) = checkout_key.as_deref() {
            if let Some(output) = self.replay(&customer.email, key).await? {
                return Ok(output);
            }
        }

        // 4. Materialize one line per item
        let settings = self.settings.snapshot().await?;
        let lines = materialize(
            &customer,
            &items,
            input.payment_method,
            notes,
            checkout_key.as_deref(),
            &settings.tracking_prefix,
            now,
        );

        // 5. All-or-nothing insert
        if let Err(e) = self.orders.insert_batch(&lines).await {
            // A concurrent duplicate may have won the unique index race.
            if let Some(key) = checkout_key.as_deref() {
                if let Some(output) = self.replay(&customer.email, key).await? {
                    return Ok(output);
                }
            }
            return Err(e);
        }
        let tracking_ids: Vec<String> = lines.iter().map(|l| l.tracking_id.clone()).collect();

        // 6. Confirmation is best-effort; the order stands either way
        let notification = Notification::Confirmation(OrderConfirmation {
            customer_name: customer.name.clone(),
            customer_address: customer.address.clone(),
            payment_method: input.payment_method,
            lines: lines
                .iter()
                .map(|line| ConfirmationLine {
                    product_name: line.product.name.clone(),
                    unit_price: line.product.unit_price,
                    quantity: line.quantity,
                    tracking_id: Some(line.tracking_id.clone()),
                })
                .collect(),
        });
        if let Err(e) = self
            .notifier
            .send(&customer.email, &notification, &settings)
            .await
        {
            tracing::warn!(
                error = %e,
                to = %customer.email,
                tracking_ids = ?tracking_ids,
                "order confirmation not delivered"
            );
        }

        Ok(CreateOrderOutput {
            tracking_ids,
            replayed: false,
        })
    }

    async fn replay(
        &self,
        email: &Email,
        key: &str,
    ) -> Result<Option<CreateOrderOutput>, OrdersServiceError> {
        let existing = self.orders.list_by_checkout_key(email, key).await?;
        if existing.is_empty() {
            return Ok(None);
        }
        Ok(Some(CreateOrderOutput {
            tracking_ids: existing.into_iter().map(|l| l.tracking_id).collect(),
            replayed: true,
        }))
    }
}

fn validate_customer(
    email: &str,
    details: CustomerDetails,
) -> Result<Customer, OrdersServiceError> {
    let email = Email::parse(email)?;
    let name = details.name.trim();
    if name.is_empty() {
        return Err(OrdersServiceError::validation("customer name is required"));
    }
    let phone = details.phone.trim();
    if phone.is_empty() {
        return Err(OrdersServiceError::validation("customer phone is required"));
    }
    let address = details
        .address
        .map(|a| a.trim().to_owned())
        .filter(|a| !a.is_empty());
    Ok(Customer {
        name: name.to_owned(),
        email,
        phone: phone.to_owned(),
        address,
    })
}

/// Validated items paired with their line totals.
fn validate_items(
    items: Vec<OrderItemInput>,
) -> Result<Vec<(LineItem, Decimal)>, OrdersServiceError> {
    if items.is_empty() {
        return Err(OrdersServiceError::validation(
            "at least one order item is required",
        ));
    }
    let lines = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let line = i + 1;
            let product_id = item.product_id.trim();
            if product_id.is_empty() {
                return Err(OrdersServiceError::validation(format!(
                    "item {line}: product id is required"
                )));
            }
            let name = item.name.trim();
            let total = priced_line_total(line, name, item.price, item.quantity)?;
            let image_url = item
                .image_url
                .map(|u| u.trim().to_owned())
                .filter(|u| !u.is_empty());
            Ok((
                LineItem {
                    product: ProductSnapshot {
                        product_id: product_id.to_owned(),
                        name: name.to_owned(),
                        unit_price: item.price,
                        image_url,
                    },
                    quantity: item.quantity,
                },
                total,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;
    cart_total(lines.iter().map(|(_, total)| *total))?;
    Ok(lines)
}

/// Checks one priced line (1-based `line`) and returns `price × quantity`.
pub(crate) fn priced_line_total(
    line: usize,
    name: &str,
    price: Decimal,
    quantity: i32,
) -> Result<Decimal, OrdersServiceError> {
    if name.trim().is_empty() {
        return Err(OrdersServiceError::validation(format!(
            "item {line}: product name is required"
        )));
    }
    if quantity < 1 {
        return Err(OrdersServiceError::validation(format!(
            "item {line}: quantity must be at least 1"
        )));
    }
    if price.is_sign_negative() {
        return Err(OrdersServiceError::validation(format!(
            "item {line}: price must not be negative"
        )));
    }
    price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| OrdersServiceError::validation(format!("item {line}: total is out of range")))
}

pub(crate) fn cart_total(
    totals: impl IntoIterator<Item = Decimal>,
) -> Result<Decimal, OrdersServiceError> {
    totals
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .ok_or_else(|| OrdersServiceError::validation("order total is out of range"))
}

fn validate_idempotency_key(key: Option<String>) -> Result<Option<String>, OrdersServiceError> {
    let Some(key) = key.map(|k| k.trim().to_owned()).filter(|k| !k.is_empty()) else {
        return Ok(None);
    };
    if key.len() > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(OrdersServiceError::validation(format!(
            "idempotency key must be at most {MAX_IDEMPOTENCY_KEY_LEN} characters"
        )));
    }
    Ok(Some(key))
}

fn materialize(
    customer: &Customer,
    items: &[(LineItem, Decimal)],
    payment_method: PaymentMethod,
    notes: Option<String>,
    checkout_key: Option<&str>,
    tracking_prefix: &str,
    now: DateTime<Utc>,
) -> Vec<OrderLine> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .enumerate()
        .map(|(i, (item, total))| {
            let tracking_id = loop {
                let candidate = generate_tracking_id(tracking_prefix, now);
                if seen.insert(candidate.clone()) {
                    break candidate;
                }
            };
            OrderLine {
                id: Uuid::now_v7(),
                tracking_id,
                checkout_key: checkout_key.map(str::to_owned),
                line_no: i as i32,
                customer: customer.clone(),
                product: item.product.clone(),
                quantity: item.quantity,
                total_amount: *total,
                status: OrderStatus::Pending,
                payment_method,
                payment_status: payment_method.initial_payment_status(),
                notes: notes.clone(),
                created_at: now,
                updated_at: now,
            }
        })
        .collect()
}
