use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::infra::clock::SystemClock;
use crate::infra::db::{DbOrderRepository, DbPasscodeRepository, DbSettingsProvider};
use crate::infra::mail::HttpMailChannel;
use crate::usecase::notify::Notifier;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mail: HttpMailChannel,
    pub mail_from: String,
    pub mail_timeout: Duration,
    pub history_requires_verification: bool,
}

impl AppState {
    pub fn passcode_repo(&self) -> DbPasscodeRepository {
        DbPasscodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    /// Settings are re-read per request; the provider holds no cache.
    pub fn settings(&self) -> DbSettingsProvider {
        DbSettingsProvider {
            db: self.db.clone(),
        }
    }

    pub fn notifier(&self) -> Notifier<HttpMailChannel> {
        Notifier {
            channel: self.mail.clone(),
            from_address: self.mail_from.clone(),
            timeout: self.mail_timeout,
        }
    }

    pub fn clock(&self) -> SystemClock {
        SystemClock
    }
}
