use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::{open_account, register_and_login, send, test_app};

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn create_account_starts_at_zero() {
    // ---
    let app = test_app();
    let token = register_and_login(&app, "acct@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/account/create",
        Some(json!({ "currency": "USD" })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["balance"], 0.0);
    assert!(body["user_id"].as_i64().is_some());
}

#[tokio::test]
async fn one_account_per_currency() {
    // ---
    let app = test_app();
    let token = register_and_login(&app, "once@example.com").await;
    open_account(&app, &token, "USD").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/account/create",
        Some(json!({ "currency": "USD" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Account already exists");

    // A different currency, or a different user, is fine.
    open_account(&app, &token, "NGN").await;
    let other = register_and_login(&app, "other@example.com").await;
    open_account(&app, &other, "USD").await;
}

#[tokio::test]
async fn unsupported_currency_is_rejected() {
    // ---
    let app = test_app();
    let token = register_and_login(&app, "xyz@example.com").await;

    for currency in ["XYZ", "usd", ""] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/account/create",
            Some(json!({ "currency": currency })),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "currency {currency:?}");
        assert!(body["error"].as_str().unwrap().starts_with("currency:"));
    }
}

#[tokio::test]
async fn accounts_require_token() {
    // ---
    let app = test_app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/account/create",
        Some(json!({ "currency": "USD" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/account", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_accounts_only_shows_callers_accounts() {
    // ---
    let app = test_app();
    let alice = register_and_login(&app, "alice@example.com").await;
    let bob = register_and_login(&app, "bob@example.com").await;

    open_account(&app, &alice, "USD").await;
    open_account(&app, &alice, "ZAR").await;
    open_account(&app, &bob, "NGN").await;

    let (status, body) = send(&app, Method::GET, "/account", None, Some(&alice)).await;

    assert_eq!(status, StatusCode::OK);
    let currencies: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["currency"].as_str().unwrap())
        .collect();
    assert_eq!(currencies, ["USD", "ZAR"]);
}

// ============================================================================
// Transfers
// ============================================================================

#[tokio::test]
async fn transfer_is_recorded_without_moving_balances() {
    // ---
    let app = test_app();
    let alice = register_and_login(&app, "payer@example.com").await;
    let bob = register_and_login(&app, "payee@example.com").await;
    let from = open_account(&app, &alice, "USD").await;
    let to = open_account(&app, &bob, "NGN").await;

    let (status, transfer) = send(
        &app,
        Method::POST,
        "/transfer/create",
        Some(json!({ "from_account_id": from, "to_account_id": to, "amount": 25.5 })),
        Some(&alice),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(transfer["from_account_id"], from);
    assert_eq!(transfer["to_account_id"], to);
    assert_eq!(transfer["amount"], 25.5);

    let (_, accounts) = send(&app, Method::GET, "/account", None, Some(&alice)).await;
    assert_eq!(accounts[0]["balance"], 0.0);

    // Both sides can read it back, a stranger cannot.
    let path = format!("/transfer/{}", transfer["id"]);
    let (status, body) = send(&app, Method::GET, &path, None, Some(&bob)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, transfer);

    let stranger = register_and_login(&app, "stranger@example.com").await;
    let (status, body) = send(&app, Method::GET, &path, None, Some(&stranger)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Transfer not found");
}

#[tokio::test]
async fn transfer_from_foreign_account_is_not_found() {
    // ---
    let app = test_app();
    let alice = register_and_login(&app, "victim@example.com").await;
    let mallory = register_and_login(&app, "mallory@example.com").await;
    let alices = open_account(&app, &alice, "USD").await;
    let mallorys = open_account(&app, &mallory, "USD").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/transfer/create",
        Some(json!({ "from_account_id": alices, "to_account_id": mallorys, "amount": 10.0 })),
        Some(&mallory),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Account not found");

    let (status, _) = send(
        &app,
        Method::POST,
        "/transfer/create",
        Some(json!({ "from_account_id": mallorys, "to_account_id": 9999, "amount": 10.0 })),
        Some(&mallory),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_transfers_are_rejected() {
    // ---
    let app = test_app();
    let token = register_and_login(&app, "bad@example.com").await;
    let usd = open_account(&app, &token, "USD").await;
    let zar = open_account(&app, &token, "ZAR").await;

    let cases = [
        json!({ "from_account_id": usd, "to_account_id": zar, "amount": 0.0 }),
        json!({ "from_account_id": usd, "to_account_id": zar, "amount": -3.0 }),
        json!({ "from_account_id": usd, "to_account_id": usd, "amount": 3.0 }),
        json!({ "from_account_id": usd, "amount": 3.0 }),
        json!({ "from_account_id": "one", "to_account_id": zar, "amount": 3.0 }),
    ];

    for case in cases {
        let (status, body) = send(
            &app,
            Method::POST,
            "/transfer/create",
            Some(case.clone()),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {case}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn non_numeric_transfer_id_is_a_json_400() {
    // ---
    let app = test_app();
    let token = register_and_login(&app, "path@example.com").await;

    let (status, body) = send(&app, Method::GET, "/transfer/abc", None, Some(&token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("abc"));
}
