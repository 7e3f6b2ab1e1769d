use chrono::Duration;

use storefront_orders::error::OrdersServiceError;
use storefront_orders::usecase::lookup::{OrderHistoryUseCase, TrackOrderUseCase};

use crate::helpers::{ManualClock, MockOrderRepo, MockPasscodeRepo, order_line, start};

fn seeded() -> MockOrderRepo {
    MockOrderRepo::new(vec![
        order_line("ORD-20260301-AAAA1111", "foo@bar.com", start()),
        order_line(
            "ORD-20260302-BBBB2222",
            "foo@bar.com",
            start() + Duration::days(1),
        ),
        order_line("ORD-20260301-CCCC3333", "other@bar.com", start()),
    ])
}

fn history(
    orders: MockOrderRepo,
    challenges: MockPasscodeRepo,
    require_verification: bool,
) -> OrderHistoryUseCase<MockOrderRepo, MockPasscodeRepo, ManualClock> {
    OrderHistoryUseCase {
        orders,
        challenges,
        clock: ManualClock::new(start() + Duration::days(2)),
        require_verification,
    }
}

#[tokio::test]
async fn should_find_order_by_exact_tracking_id() {
    let uc = TrackOrderUseCase { orders: seeded() };

    let order = uc.execute("ORD-20260302-BBBB2222").await.unwrap();

    let order = order.expect("order should be found");
    assert_eq!(order.tracking_id, "ORD-20260302-BBBB2222");
}

#[tokio::test]
async fn should_match_tracking_id_case_sensitively() {
    let uc = TrackOrderUseCase { orders: seeded() };

    let lower = uc.execute("ord-20260302-bbbb2222").await.unwrap();
    let partial = uc.execute("ORD-20260302").await.unwrap();

    assert!(lower.is_none(), "lowercase id must not match");
    assert!(partial.is_none(), "partial id must not match");
}

#[tokio::test]
async fn should_return_none_for_unknown_tracking_id() {
    let uc = TrackOrderUseCase {
        orders: MockOrderRepo::empty(),
    };

    let result = uc.execute("ORD-20260301-ZZZZ9999").await;

    assert!(
        matches!(result, Ok(None)),
        "expected Ok(None), got {result:?}"
    );
}

#[tokio::test]
async fn should_list_history_newest_first_regardless_of_case() {
    let uc = history(seeded(), MockPasscodeRepo::empty(), false);

    let upper = uc.execute("Foo@Bar.com").await.unwrap();
    let lower = uc.execute("foo@bar.com").await.unwrap();

    let upper_ids: Vec<&str> = upper.iter().map(|o| o.tracking_id.as_str()).collect();
    let lower_ids: Vec<&str> = lower.iter().map(|o| o.tracking_id.as_str()).collect();
    assert_eq!(upper_ids, vec!["ORD-20260302-BBBB2222", "ORD-20260301-AAAA1111"]);
    assert_eq!(upper_ids, lower_ids);
}

#[tokio::test]
async fn should_return_empty_history_for_unknown_email() {
    let uc = history(seeded(), MockPasscodeRepo::empty(), false);

    let orders = uc.execute("nobody@bar.com").await.unwrap();

    assert!(orders.is_empty());
}

#[tokio::test]
async fn should_reject_malformed_history_email() {
    let uc = history(seeded(), MockPasscodeRepo::empty(), false);

    let result = uc.execute("foo").await;

    assert!(
        matches!(result, Err(OrdersServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_gate_history_when_verification_required() {
    let uc = history(seeded(), MockPasscodeRepo::empty(), true);

    let result = uc.execute("foo@bar.com").await;

    assert!(
        matches!(result, Err(OrdersServiceError::NotVerified)),
        "expected NotVerified, got {result:?}"
    );
}

#[tokio::test]
async fn should_allow_gated_history_with_fresh_verification() {
    let verified_at = start() + Duration::days(2) - Duration::minutes(10);
    let uc = history(
        seeded(),
        MockPasscodeRepo::verified("foo@bar.com", verified_at),
        true,
    );

    let orders = uc.execute("FOO@bar.com").await.unwrap();

    assert_eq!(orders.len(), 2);
}
