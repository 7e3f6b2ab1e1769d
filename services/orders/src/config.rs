use serde::Deserialize;

use storefront_core::config::Config;

/// Orders service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct OrdersConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port to listen on (default 3120). Env var: `ORDERS_PORT`.
    #[serde(default = "default_orders_port")]
    pub orders_port: u16,
    /// Transactional email endpoint. Env var: `MAIL_API_URL`.
    #[serde(default = "default_mail_api_url")]
    pub mail_api_url: String,
    /// Bearer key for the email endpoint. Env var: `MAIL_API_KEY`.
    pub mail_api_key: String,
    /// Sender address, e.g. "orders@example.com". Env var: `MAIL_FROM`.
    pub mail_from: String,
    /// Per-delivery timeout for the email endpoint (default 10).
    /// Env var: `MAIL_TIMEOUT_SECS`.
    #[serde(default = "default_mail_timeout_secs")]
    pub mail_timeout_secs: u64,
    /// Gate order history behind a fresh verified passcode.
    /// Env var: `HISTORY_REQUIRES_VERIFICATION`.
    #[serde(default)]
    pub history_requires_verification: bool,
}

fn default_orders_port() -> u16 {
    3120
}

fn default_mail_api_url() -> String {
    "https://api.resend.com/emails".to_owned()
}

fn default_mail_timeout_secs() -> u64 {
    10
}

impl Config for OrdersConfig {}
