//! Pure rendering of notifications into subject + HTML.
//!
//! Nothing here touches the network, so every template can be exercised in
//! unit tests. Optional payload fields render as a placeholder.

use askama::Template;
use rust_decimal::Decimal;

use crate::domain::notification::{
    DispatchError, Notification, OrderConfirmation, RenderedMessage, StatusUpdate,
};
use crate::domain::types::SiteSettings;

const PLACEHOLDER: &str = "\u{2014}";

#[derive(Template)]
#[template(path = "passcode.html")]
struct PasscodeEmail<'a> {
    store_name: &'a str,
    support_email: &'a str,
    code: &'a str,
    expires_in_minutes: i64,
}

struct LineRow {
    product_name: String,
    quantity: i32,
    unit_price: String,
    subtotal: String,
    tracking_id: String,
}

#[derive(Template)]
#[template(path = "confirmation.html")]
struct ConfirmationEmail<'a> {
    store_name: &'a str,
    support_email: &'a str,
    customer_name: &'a str,
    customer_address: &'a str,
    payment_method: &'a str,
    lines: Vec<LineRow>,
    total: String,
}

#[derive(Template)]
#[template(path = "status_update.html")]
struct StatusUpdateEmail<'a> {
    store_name: &'a str,
    support_email: &'a str,
    customer_name: &'a str,
    tracking_id: &'a str,
    status_label: &'a str,
    product_name: &'a str,
    quantity: String,
    total: String,
}

pub fn render(
    notification: &Notification,
    settings: &SiteSettings,
) -> Result<RenderedMessage, DispatchError> {
    match notification {
        Notification::Passcode {
            code,
            expires_in_minutes,
        } => render_passcode(code, *expires_in_minutes, settings),
        Notification::Confirmation(confirmation) => render_confirmation(confirmation, settings),
        Notification::StatusUpdate(update) => render_status_update(update, settings),
    }
}

fn render_passcode(
    code: &str,
    expires_in_minutes: i64,
    settings: &SiteSettings,
) -> Result<RenderedMessage, DispatchError> {
    let html = PasscodeEmail {
        store_name: &settings.store_name,
        support_email: support_email(settings),
        code,
        expires_in_minutes,
    }
    .render()
    .map_err(render_error)?;
    Ok(RenderedMessage {
        subject: format!("Your {} verification code", settings.store_name),
        html,
    })
}

fn render_confirmation(
    confirmation: &OrderConfirmation,
    settings: &SiteSettings,
) -> Result<RenderedMessage, DispatchError> {
    let lines = confirmation
        .lines
        .iter()
        .map(|line| LineRow {
            product_name: or_placeholder(Some(&line.product_name)).to_owned(),
            quantity: line.quantity,
            unit_price: money(&settings.currency, line.unit_price),
            subtotal: optional_money(&settings.currency, line.subtotal()),
            tracking_id: or_placeholder(line.tracking_id.as_deref()).to_owned(),
        })
        .collect();
    let html = ConfirmationEmail {
        store_name: &settings.store_name,
        support_email: support_email(settings),
        customer_name: or_placeholder(Some(&confirmation.customer_name)),
        customer_address: or_placeholder(confirmation.customer_address.as_deref()),
        payment_method: confirmation.payment_method.label(),
        lines,
        total: optional_money(&settings.currency, confirmation.total()),
    }
    .render()
    .map_err(render_error)?;

    let subject = match confirmation.lines.as_slice() {
        [only] => match &only.tracking_id {
            Some(tracking_id) => format!("{} order confirmed: {tracking_id}", settings.store_name),
            None => format!("Your {} order is confirmed", settings.store_name),
        },
        _ => format!("Your {} order is confirmed", settings.store_name),
    };
    Ok(RenderedMessage { subject, html })
}

fn render_status_update(
    update: &StatusUpdate,
    settings: &SiteSettings,
) -> Result<RenderedMessage, DispatchError> {
    let html = StatusUpdateEmail {
        store_name: &settings.store_name,
        support_email: support_email(settings),
        customer_name: or_placeholder(update.customer_name.as_deref()),
        tracking_id: &update.tracking_id,
        status_label: update.status.label(),
        product_name: or_placeholder(update.product_name.as_deref()),
        quantity: update
            .quantity
            .map_or_else(|| PLACEHOLDER.to_owned(), |q| q.to_string()),
        total: optional_money(&settings.currency, update.total_amount),
    }
    .render()
    .map_err(render_error)?;
    Ok(RenderedMessage {
        subject: format!(
            "{} order {}: {}",
            settings.store_name,
            update.tracking_id,
            update.status.label()
        ),
        html,
    })
}

fn money(currency: &str, amount: Decimal) -> String {
    format!("{currency} {:.2}", amount.round_dp(2))
}

fn optional_money(currency: &str, amount: Option<Decimal>) -> String {
    amount.map_or_else(|| PLACEHOLDER.to_owned(), |a| money(currency, a))
}

fn or_placeholder(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

fn support_email(settings: &SiteSettings) -> &str {
    or_placeholder(settings.support_email.as_deref())
}

fn render_error(e: askama::Error) -> DispatchError {
    DispatchError::Render(e.to_string())
}
