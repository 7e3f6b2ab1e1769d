use chrono::Duration;

use storefront_orders::domain::types::{MAX_VERIFY_ATTEMPTS, PASSCODE_TTL_SECS};
use storefront_orders::error::OrdersServiceError;
use storefront_orders::usecase::passcode::{
    IssuePasscodeInput, IssuePasscodeUseCase, VerifyPasscodeInput, VerifyPasscodeUseCase,
};

use crate::helpers::{
    FROM_ADDRESS, ManualClock, MockPasscodeRepo, MockSettings, RecordingMailChannel, challenge,
    start,
};

fn issuer(
    repo: &MockPasscodeRepo,
    mail: &RecordingMailChannel,
    clock: &ManualClock,
) -> IssuePasscodeUseCase<MockPasscodeRepo, MockSettings, RecordingMailChannel, ManualClock> {
    IssuePasscodeUseCase {
        challenges: repo.clone(),
        settings: MockSettings::default(),
        notifier: mail.notifier(),
        clock: clock.clone(),
    }
}

fn verifier(
    repo: &MockPasscodeRepo,
    clock: &ManualClock,
) -> VerifyPasscodeUseCase<MockPasscodeRepo, ManualClock> {
    VerifyPasscodeUseCase {
        challenges: repo.clone(),
        clock: clock.clone(),
    }
}

fn issue_input(email: &str) -> IssuePasscodeInput {
    IssuePasscodeInput {
        email: email.to_owned(),
        phone: None,
    }
}

fn verify_input(email: &str, code: &str) -> VerifyPasscodeInput {
    VerifyPasscodeInput {
        email: email.to_owned(),
        code: code.to_owned(),
    }
}

// ── Issue ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_challenge_and_mail_code() {
    let repo = MockPasscodeRepo::empty();
    let mail = RecordingMailChannel::new();
    let clock = ManualClock::new(start());

    issuer(&repo, &mail, &clock)
        .execute(IssuePasscodeInput {
            email: "  Ayesha@Example.COM ".to_owned(),
            phone: Some(" +92 300 1234567 ".to_owned()),
        })
        .await
        .unwrap();

    let challenges = repo.challenges_handle();
    let challenges = challenges.lock().unwrap();
    assert_eq!(challenges.len(), 1, "expected exactly one challenge");
    let created = &challenges[0];
    assert_eq!(created.email.as_str(), "ayesha@example.com");
    assert_eq!(created.phone.as_deref(), Some("+92 300 1234567"));
    assert_eq!(created.code.len(), 6);
    assert!(!created.verified, "new challenge should not be verified");
    assert_eq!(created.created_at, start());
    assert_eq!(
        created.expires_at,
        start() + Duration::seconds(PASSCODE_TTL_SECS)
    );

    let sent = mail.sent_handle();
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1, "expected one passcode mail");
    assert_eq!(sent[0].to, "ayesha@example.com");
    assert_eq!(sent[0].from, format!("\"Storefront\" <{FROM_ADDRESS}>"));
    assert!(sent[0].html.contains(&created.code));
}

#[tokio::test]
async fn should_reject_second_issue_within_cooldown() {
    let repo = MockPasscodeRepo::empty();
    let mail = RecordingMailChannel::new();
    let clock = ManualClock::new(start());
    let uc = issuer(&repo, &mail, &clock);

    uc.execute(issue_input("a@x.com")).await.unwrap();
    let result = uc.execute(issue_input("A@X.com")).await;

    assert!(
        matches!(
            result,
            Err(OrdersServiceError::CooldownActive {
                seconds_remaining: 60
            })
        ),
        "expected CooldownActive(60), got {result:?}"
    );
    assert_eq!(repo.challenges_handle().lock().unwrap().len(), 1);
    assert_eq!(mail.sent_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_count_cooldown_down_as_time_advances() {
    let repo = MockPasscodeRepo::empty();
    let mail = RecordingMailChannel::new();
    let clock = ManualClock::new(start());
    let uc = issuer(&repo, &mail, &clock);
    uc.execute(issue_input("a@x.com")).await.unwrap();

    let mut previous = u64::MAX;
    for _ in 0..5 {
        clock.advance(Duration::seconds(11));
        let Err(OrdersServiceError::CooldownActive { seconds_remaining }) =
            uc.execute(issue_input("a@x.com")).await
        else {
            panic!("expected CooldownActive");
        };
        assert!(
            seconds_remaining < previous,
            "{seconds_remaining} should be below {previous}"
        );
        previous = seconds_remaining;
    }
    assert_eq!(previous, 5);
}

#[tokio::test]
async fn should_allow_reissue_after_cooldown() {
    let repo = MockPasscodeRepo::empty();
    let mail = RecordingMailChannel::new();
    let clock = ManualClock::new(start());
    let uc = issuer(&repo, &mail, &clock);

    uc.execute(issue_input("a@x.com")).await.unwrap();
    clock.advance(Duration::seconds(60));
    uc.execute(issue_input("a@x.com")).await.unwrap();

    assert_eq!(repo.challenges_handle().lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_keep_cooldown_per_email() {
    let repo = MockPasscodeRepo::empty();
    let mail = RecordingMailChannel::new();
    let clock = ManualClock::new(start());
    let uc = issuer(&repo, &mail, &clock);

    uc.execute(issue_input("a@x.com")).await.unwrap();
    uc.execute(issue_input("b@x.com")).await.unwrap();

    assert_eq!(mail.sent_handle().lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_reject_malformed_email_before_storing() {
    let repo = MockPasscodeRepo::empty();
    let mail = RecordingMailChannel::new();
    let clock = ManualClock::new(start());

    let result = issuer(&repo, &mail, &clock)
        .execute(issue_input("not-an-email"))
        .await;

    assert!(
        matches!(result, Err(OrdersServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
    assert!(repo.challenges_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_surface_dispatch_failure_and_keep_challenge() {
    let repo = MockPasscodeRepo::empty();
    let mail = RecordingMailChannel::failing();
    let clock = ManualClock::new(start());
    let uc = issuer(&repo, &mail, &clock);

    let result = uc.execute(issue_input("a@x.com")).await;
    assert!(
        matches!(result, Err(OrdersServiceError::Dispatch(_))),
        "expected Dispatch, got {result:?}"
    );
    assert_eq!(repo.challenges_handle().lock().unwrap().len(), 1);

    // Retry goes through the same cooldown.
    let retry = uc.execute(issue_input("a@x.com")).await;
    assert!(
        matches!(retry, Err(OrdersServiceError::CooldownActive { .. })),
        "expected CooldownActive, got {retry:?}"
    );
}

// ── Verify ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_verify_exactly_once() {
    let repo = MockPasscodeRepo::new(vec![challenge("a@x.com", "482913", start())]);
    let clock = ManualClock::new(start() + Duration::seconds(30));
    let uc = verifier(&repo, &clock);

    uc.execute(verify_input("a@x.com", "482913")).await.unwrap();
    assert!(repo.challenges_handle().lock().unwrap()[0].verified);

    let again = uc.execute(verify_input("a@x.com", "482913")).await;
    assert!(
        matches!(again, Err(OrdersServiceError::InvalidOrExpired)),
        "expected InvalidOrExpired, got {again:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_code() {
    let repo = MockPasscodeRepo::new(vec![challenge("a@x.com", "482913", start())]);
    let clock = ManualClock::new(start() + Duration::seconds(PASSCODE_TTL_SECS));

    let result = verifier(&repo, &clock)
        .execute(verify_input("a@x.com", "482913"))
        .await;

    assert!(
        matches!(result, Err(OrdersServiceError::InvalidOrExpired)),
        "expected InvalidOrExpired, got {result:?}"
    );
    assert!(!repo.challenges_handle().lock().unwrap()[0].verified);
}

#[tokio::test]
async fn should_match_email_case_insensitively() {
    let repo = MockPasscodeRepo::new(vec![challenge("a@x.com", "000417", start())]);
    let clock = ManualClock::new(start());

    verifier(&repo, &clock)
        .execute(verify_input(" A@X.COM", "000417"))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_not_verify_another_identity_code() {
    let repo = MockPasscodeRepo::new(vec![challenge("a@x.com", "482913", start())]);
    let clock = ManualClock::new(start());

    let result = verifier(&repo, &clock)
        .execute(verify_input("b@x.com", "482913"))
        .await;

    assert!(
        matches!(result, Err(OrdersServiceError::InvalidOrExpired)),
        "expected InvalidOrExpired, got {result:?}"
    );
}

#[tokio::test]
async fn should_count_wrong_code_against_active_challenges() {
    let repo = MockPasscodeRepo::new(vec![challenge("a@x.com", "482913", start())]);
    let clock = ManualClock::new(start());

    let result = verifier(&repo, &clock)
        .execute(verify_input("a@x.com", "111111"))
        .await;

    assert!(
        matches!(result, Err(OrdersServiceError::InvalidOrExpired)),
        "expected InvalidOrExpired, got {result:?}"
    );
    assert_eq!(repo.challenges_handle().lock().unwrap()[0].attempts, 1);
}

#[tokio::test]
async fn should_lock_out_challenge_after_max_attempts() {
    let repo = MockPasscodeRepo::new(vec![challenge("a@x.com", "482913", start())]);
    let clock = ManualClock::new(start());
    let uc = verifier(&repo, &clock);

    for _ in 0..MAX_VERIFY_ATTEMPTS {
        let _ = uc.execute(verify_input("a@x.com", "000000")).await;
    }
    let result = uc.execute(verify_input("a@x.com", "482913")).await;

    assert!(
        matches!(result, Err(OrdersServiceError::InvalidOrExpired)),
        "expected InvalidOrExpired after lockout, got {result:?}"
    );
}

#[tokio::test]
async fn should_recover_from_lockout_with_reissued_code() {
    let repo = MockPasscodeRepo::empty();
    let mail = RecordingMailChannel::new();
    let clock = ManualClock::new(start());
    let issue = issuer(&repo, &mail, &clock);
    let verify = verifier(&repo, &clock);

    issue.execute(issue_input("a@x.com")).await.unwrap();
    let locked = repo.last_code();
    let wrong = if locked == "000000" { "111111" } else { "000000" };
    for _ in 0..MAX_VERIFY_ATTEMPTS {
        let _ = verify.execute(verify_input("a@x.com", wrong)).await;
    }
    let result = verify.execute(verify_input("a@x.com", &locked)).await;
    assert!(
        matches!(result, Err(OrdersServiceError::InvalidOrExpired)),
        "expected InvalidOrExpired while locked out, got {result:?}"
    );

    clock.advance(Duration::seconds(60));
    issue.execute(issue_input("a@x.com")).await.unwrap();
    let fresh = repo.last_code();

    verify
        .execute(verify_input("a@x.com", &fresh))
        .await
        .unwrap();

    let challenges = repo.challenges_handle();
    let challenges = challenges.lock().unwrap();
    assert!(challenges[0].attempts >= MAX_VERIFY_ATTEMPTS);
    assert!(challenges[1].verified, "reissued challenge should be verified");
}

#[tokio::test]
async fn should_reject_non_numeric_code_as_validation() {
    let repo = MockPasscodeRepo::new(vec![challenge("a@x.com", "482913", start())]);
    let clock = ManualClock::new(start());

    for code in ["12345", "1234567", "12a456", ""] {
        let result = verifier(&repo, &clock)
            .execute(verify_input("a@x.com", code))
            .await;
        assert!(
            matches!(result, Err(OrdersServiceError::Validation(_))),
            "expected Validation for {code:?}, got {result:?}"
        );
    }
    assert_eq!(
        repo.challenges_handle().lock().unwrap()[0].attempts,
        0,
        "malformed codes are rejected before counting attempts"
    );
}

#[tokio::test]
async fn should_verify_latest_reissued_code() {
    let repo = MockPasscodeRepo::empty();
    let mail = RecordingMailChannel::new();
    let clock = ManualClock::new(start());
    let issue = issuer(&repo, &mail, &clock);

    issue.execute(issue_input("a@x.com")).await.unwrap();
    clock.advance(Duration::seconds(90));
    issue.execute(issue_input("a@x.com")).await.unwrap();
    let latest = repo.last_code();

    verifier(&repo, &clock)
        .execute(verify_input("a@x.com", &latest))
        .await
        .unwrap();

    let challenges = repo.challenges_handle();
    let challenges = challenges.lock().unwrap();
    assert!(challenges[1].verified, "latest challenge should be verified");
}
