use rust_decimal::Decimal;

use storefront_domain::order::{OrderStatus, PaymentMethod};
use storefront_orders::domain::notification::{DispatchError, Notification};
use storefront_orders::domain::types::SiteSettings;
use storefront_orders::error::OrdersServiceError;
use storefront_orders::usecase::notify::{
    ConfirmationItem, SendConfirmationInput, SendConfirmationUseCase, SendStatusUpdateInput,
    SendStatusUpdateUseCase,
};

use crate::helpers::{
    FROM_ADDRESS, HangingMailChannel, MockSettings, RecordingMailChannel, email,
};

fn confirmation_input(
    items: Vec<ConfirmationItem>,
    tracking_ids: Vec<&str>,
) -> SendConfirmationInput {
    SendConfirmationInput {
        email: "Ayesha@Example.com".to_owned(),
        items,
        tracking_ids: tracking_ids.into_iter().map(str::to_owned).collect(),
        payment_method: PaymentMethod::MobileWalletA,
        customer_name: "Ayesha Khan".to_owned(),
        customer_address: None,
    }
}

fn watch(quantity: i32) -> ConfirmationItem {
    ConfirmationItem {
        name: "Chrono Classic".to_owned(),
        price: Decimal::new(1000, 0),
        quantity,
    }
}

#[tokio::test]
async fn should_send_from_store_name_and_configured_address() {
    let mail = RecordingMailChannel::new();
    let settings = SiteSettings {
        store_name: "Mughal \"Brand\" <Watches>".to_owned(),
        ..SiteSettings::default()
    };

    mail.notifier()
        .send(
            &email("a@x.com"),
            &Notification::Passcode {
                code: "123456".to_owned(),
                expires_in_minutes: 10,
            },
            &settings,
        )
        .await
        .unwrap();

    let sent = mail.sent_handle();
    let sent = sent.lock().unwrap();
    assert_eq!(sent[0].from, format!("\"Mughal Brand Watches\" <{FROM_ADDRESS}>"));
    assert_eq!(sent[0].subject, "Your Mughal \"Brand\" <Watches> verification code");
}

#[tokio::test]
async fn should_send_confirmation_pairing_items_with_tracking_ids() {
    let mail = RecordingMailChannel::new();
    let uc = SendConfirmationUseCase {
        settings: MockSettings::default(),
        notifier: mail.notifier(),
    };

    uc.execute(confirmation_input(
        vec![watch(1), watch(2)],
        vec!["ORD-20260301-AAAA1111", "ORD-20260301-BBBB2222"],
    ))
    .await
    .unwrap();

    let sent = mail.sent_handle();
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ayesha@example.com");
    assert!(sent[0].html.contains("ORD-20260301-AAAA1111"));
    assert!(sent[0].html.contains("ORD-20260301-BBBB2222"));
    assert!(sent[0].html.contains("PKR 3000.00"));
    assert!(sent[0].html.contains("Mobile Wallet A"));
}

#[tokio::test]
async fn should_render_confirmation_without_tracking_ids() {
    let mail = RecordingMailChannel::new();
    let uc = SendConfirmationUseCase {
        settings: MockSettings::default(),
        notifier: mail.notifier(),
    };

    uc.execute(confirmation_input(vec![watch(1)], vec![]))
        .await
        .unwrap();

    assert_eq!(mail.sent_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_confirmation_without_items() {
    let mail = RecordingMailChannel::new();
    let uc = SendConfirmationUseCase {
        settings: MockSettings::default(),
        notifier: mail.notifier(),
    };

    let result = uc.execute(confirmation_input(vec![], vec![])).await;

    assert!(
        matches!(result, Err(OrdersServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
    assert!(mail.sent_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_wrap_channel_error_as_dispatch() {
    let mail = RecordingMailChannel::failing();
    let uc = SendConfirmationUseCase {
        settings: MockSettings::default(),
        notifier: mail.notifier(),
    };

    let result = uc.execute(confirmation_input(vec![watch(1)], vec![])).await;

    let Err(OrdersServiceError::Dispatch(e)) = result else {
        panic!("expected Dispatch");
    };
    assert!(e.to_string().contains("503: service unavailable"), "{e}");
}

#[tokio::test]
async fn should_send_status_update() {
    let mail = RecordingMailChannel::new();
    let uc = SendStatusUpdateUseCase {
        settings: MockSettings::default(),
        notifier: mail.notifier(),
    };

    uc.execute(SendStatusUpdateInput {
        email: "a@x.com".to_owned(),
        tracking_id: " ORD-20260301-AAAA1111 ".to_owned(),
        status: OrderStatus::Delivered,
        customer_name: Some("Ayesha".to_owned()),
        product_name: Some("Chrono Classic".to_owned()),
        quantity: Some(1),
        total_amount: Some(Decimal::new(1000, 0)),
    })
    .await
    .unwrap();

    let sent = mail.sent_handle();
    let sent = sent.lock().unwrap();
    assert_eq!(
        sent[0].subject,
        "Storefront order ORD-20260301-AAAA1111: Delivered"
    );
    assert!(sent[0].html.contains("Chrono Classic"));
}

#[tokio::test]
async fn should_reject_status_update_without_tracking_id() {
    let mail = RecordingMailChannel::new();
    let uc = SendStatusUpdateUseCase {
        settings: MockSettings::default(),
        notifier: mail.notifier(),
    };

    let result = uc
        .execute(SendStatusUpdateInput {
            email: "a@x.com".to_owned(),
            tracking_id: "  ".to_owned(),
            status: OrderStatus::Shipped,
            customer_name: None,
            product_name: None,
            quantity: None,
            total_amount: None,
        })
        .await;

    assert!(
        matches!(result, Err(OrdersServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_confirmation_with_non_positive_quantity() {
    let mail = RecordingMailChannel::new();
    let uc = SendConfirmationUseCase {
        settings: MockSettings::default(),
        notifier: mail.notifier(),
    };

    for quantity in [0, -3] {
        let result = uc
            .execute(confirmation_input(vec![watch(1), watch(quantity)], vec![]))
            .await;
        assert!(
            matches!(result, Err(OrdersServiceError::Validation(ref m)) if m.starts_with("item 2:")),
            "expected Validation for item 2, got {result:?}"
        );
    }
    assert!(mail.sent_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_confirmation_with_negative_price_or_blank_name() {
    let mail = RecordingMailChannel::new();
    let uc = SendConfirmationUseCase {
        settings: MockSettings::default(),
        notifier: mail.notifier(),
    };
    let negative = ConfirmationItem {
        price: Decimal::new(-5, 0),
        ..watch(1)
    };
    let blank = ConfirmationItem {
        name: "  ".to_owned(),
        ..watch(1)
    };

    for item in [negative, blank] {
        let result = uc.execute(confirmation_input(vec![item], vec![])).await;
        assert!(
            matches!(result, Err(OrdersServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );
    }
    assert!(mail.sent_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_confirmation_totals_out_of_range() {
    let mail = RecordingMailChannel::new();
    let uc = SendConfirmationUseCase {
        settings: MockSettings::default(),
        notifier: mail.notifier(),
    };
    let line_overflow = ConfirmationItem {
        price: Decimal::MAX,
        ..watch(2)
    };
    let half = Decimal::MAX / Decimal::TWO + Decimal::ONE;
    let sum_overflow = vec![
        ConfirmationItem {
            price: half,
            ..watch(1)
        },
        ConfirmationItem {
            price: half,
            ..watch(1)
        },
    ];

    for items in [vec![line_overflow], sum_overflow] {
        let result = uc.execute(confirmation_input(items, vec![])).await;
        assert!(
            matches!(result, Err(OrdersServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );
    }
    assert!(mail.sent_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_time_out_stalled_delivery_as_dispatch() {
    let mail = HangingMailChannel::default();
    let uc = SendConfirmationUseCase {
        settings: MockSettings::default(),
        notifier: mail.notifier(std::time::Duration::from_millis(50)),
    };

    let result = uc.execute(confirmation_input(vec![watch(1)], vec![])).await;

    assert!(
        matches!(
            result,
            Err(OrdersServiceError::Dispatch(DispatchError::Timeout(_)))
        ),
        "expected Dispatch(Timeout), got {result:?}"
    );
}
