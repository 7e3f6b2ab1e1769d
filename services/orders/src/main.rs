use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use storefront_core::config::Config;
use storefront_core::tracing::init_tracing;
use storefront_orders::config::OrdersConfig;
use storefront_orders::infra::mail::HttpMailChannel;
use storefront_orders::router::build_router;
use storefront_orders::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = OrdersConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mail_timeout = Duration::from_secs(config.mail_timeout_secs);
    let mail = HttpMailChannel::new(config.mail_api_url, config.mail_api_key, mail_timeout)
        .expect("failed to build mail client");

    let state = AppState {
        db,
        mail,
        mail_from: config.mail_from,
        mail_timeout,
        history_requires_verification: config.history_requires_verification,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.orders_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(
        history_requires_verification = config.history_requires_verification,
        "orders service listening on {addr}"
    );
    axum::serve(listener, router).await.expect("server error");
}
