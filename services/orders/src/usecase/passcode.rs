use chrono::Duration;
use rand::RngExt;
use uuid::Uuid;

use storefront_domain::email::Email;

use crate::domain::notification::Notification;
use crate::domain::repository::{Clock, MailChannel, PasscodeRepository, SettingsProvider};
use crate::domain::types::{
    ISSUE_COOLDOWN_SECS, IssueSlot, PASSCODE_LEN, PASSCODE_TTL_SECS, PasscodeChallenge,
    cooldown_remaining,
};
use crate::error::OrdersServiceError;
use crate::usecase::notify::Notifier;

/// Uniform over `000000..=999999`, zero-padded.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    format!("{:0width$}", rng.random_range(0..1_000_000u32), width = PASSCODE_LEN)
}

pub struct IssuePasscodeInput {
    pub email: String,
    pub phone: Option<String>,
}

pub struct IssuePasscodeUseCase<P, S, M, C>
where
    P: PasscodeRepository,
    S: SettingsProvider,
    M: MailChannel,
    C: Clock,
{
    pub challenges: P,
    pub settings: S,
    pub notifier: Notifier<M>,
    pub clock: C,
}

impl<P, S, M, C> IssuePasscodeUseCase<P, S, M, C>
where
    P: PasscodeRepository,
    S: SettingsProvider,
    M: MailChannel,
    C: Clock,
{
    pub async fn execute(&self, input: IssuePasscodeInput) -> Result<(), OrdersServiceError> {
        // 1. Normalize identity → 400 if malformed
        let email = Email::parse(&input.email)?;
        let phone = input
            .phone
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());

        // 2. Build the challenge
        let now = self.clock.now();
        let code = generate_code();
        let challenge = PasscodeChallenge {
            id: Uuid::now_v7(),
            email: email.clone(),
            phone,
            code: code.clone(),
            attempts: 0,
            verified: false,
            expires_at: now + Duration::seconds(PASSCODE_TTL_SECS),
            created_at: now,
        };

        // 3. Cooldown check + insert, serialized per email → 429 if too soon
        let window_start = now - Duration::seconds(ISSUE_COOLDOWN_SECS);
        match self
            .challenges
            .insert_unless_recent(&challenge, window_start)
            .await?
        {
            IssueSlot::Issued => {}
            IssueSlot::CoolingDown { last_created_at } => {
                return Err(OrdersServiceError::CooldownActive {
                    seconds_remaining: cooldown_remaining(last_created_at, now),
                });
            }
        }

        // 4. Deliver. A failure leaves the row in place; the caller retries
        // through re-issuance under the same cooldown.
        let settings = self.settings.snapshot().await?;
        let notification = Notification::Passcode {
            code,
            expires_in_minutes: PASSCODE_TTL_SECS / 60,
        };
        self.notifier.send(&email, &notification, &settings).await?;
        Ok(())
    }
}

pub struct VerifyPasscodeInput {
    pub email: String,
    pub code: String,
}

pub struct VerifyPasscodeUseCase<P, C>
where
    P: PasscodeRepository,
    C: Clock,
{
    pub challenges: P,
    pub clock: C,
}

impl<P, C> VerifyPasscodeUseCase<P, C>
where
    P: PasscodeRepository,
    C: Clock,
{
    pub async fn execute(&self, input: VerifyPasscodeInput) -> Result<(), OrdersServiceError> {
        let email = Email::parse(&input.email)?;
        let code = input.code.trim();
        if code.len() != PASSCODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrdersServiceError::validation(format!(
                "passcode must be {PASSCODE_LEN} digits"
            )));
        }

        let now = self.clock.now();
        let Some(challenge) = self.challenges.find_active(&email, code, now).await? else {
            self.challenges.record_failed_attempt(&email, now).await?;
            return Err(OrdersServiceError::InvalidOrExpired);
        };

        // Lost a race against a concurrent verify of the same row.
        if !self.challenges.mark_verified(challenge.id).await? {
            return Err(OrdersServiceError::InvalidOrExpired);
        }
        Ok(())
    }
}
