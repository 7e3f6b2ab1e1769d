//! Golden request/expectation pairs from `contracts/http/orders/`.

use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use serde_json::Value;

use storefront_testing::fixture::Fixture;

use crate::helpers::offline_server;

const FIXTURES: &[&str] = &[
    "healthz",
    "issue_passcode_invalid_email",
    "verify_passcode_short_code",
    "create_order_zero_quantity",
    "action_create_order_missing_items",
    "send_confirmation_no_items",
    "admin_delete_without_identity",
    "admin_update_as_customer",
];

async fn check(id: &str) {
    let fixture = Fixture::load(&format!("contracts/http/orders/{id}.json"));
    assert_eq!(fixture["id"], id, "fixture id must match its file name");

    let request = &fixture["request"];
    let expect = &fixture["expect"];
    let method: Method = request["method"].as_str().unwrap().parse().unwrap();
    let path = request["path"].as_str().unwrap();

    let server = offline_server();
    let mut call = server.method(method, path);
    if let Some(headers) = request["headers"].as_object() {
        for (name, value) in headers {
            call = call.add_header(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value.as_str().unwrap()).unwrap(),
            );
        }
    }
    if let Some(body) = request.get("body") {
        call = call.json(body);
    }
    let response = call.await;

    let status = StatusCode::from_u16(expect["status"].as_u64().unwrap() as u16).unwrap();
    assert_eq!(response.status_code(), status, "{id}: status");

    if let Some(kind) = expect["kind"].as_str() {
        let body = response.json::<Value>();
        assert_eq!(body["success"], false, "{id}: {body}");
        assert_eq!(body["kind"], kind, "{id}: {body}");
    }
    if let Some(headers) = expect["headers"].as_object() {
        for (name, value) in headers {
            let actual = response.header(name.as_str());
            if value != "*" {
                assert_eq!(actual.to_str().unwrap(), value.as_str().unwrap(), "{id}: {name}");
            }
        }
    }
}

#[tokio::test]
async fn should_satisfy_every_orders_contract() {
    for id in FIXTURES {
        check(id).await;
    }
}
