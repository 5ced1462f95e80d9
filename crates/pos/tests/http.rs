mod support;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use pos::{di::DependenciesInjectDeps, handler::AppRouter};
use serde_json::{Value, json};
use std::sync::Arc;
use support::{
    BrokenStores, InMemoryProducts, InMemoryStores, access_token, account, app_state, deps,
    memory_cache, product, store, unit,
};
use tower::ServiceExt;

fn router(products: Arc<InMemoryProducts>, stores: Arc<InMemoryStores>) -> Router {
    AppRouter::build(app_state(deps(products, stores, memory_cache())))
}

fn seeded(end: Option<chrono::DateTime<Utc>>) -> (Arc<InMemoryStores>, Router) {
    let products = InMemoryProducts::with(vec![product(
        "s1",
        "MAIN001",
        vec![unit("Box", "SUB001", 12.0)],
    )]);
    let stores = InMemoryStores::new();
    stores.insert_store(store("s1", true, end));
    stores.insert_account(account("s1", 12_000.0, 10_000.0, false));

    (stores.clone(), router(products, stores))
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (_, app) = seeded(None);

    let response = app.oneshot(get("/api/products/barcode/MAIN001", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cashier_scans_unit_barcode() {
    let (_, app) = seeded(Some(Utc::now() + Duration::days(5)));
    let token = access_token("u-1", Some("S1"), "Cashier");

    let response = app
        .oneshot(get("/api/products/barcode/SUB001", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"]["barcode"], "MAIN001");
}

#[tokio::test]
async fn expired_subscription_blocks_store_users() {
    let (stores, app) = seeded(Some(Utc::now() - Duration::days(1)));
    let token = access_token("u-1", Some("s1"), "Cashier");

    let response = app
        .oneshot(get("/api/products/barcode/MAIN001", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = read_json(response).await;
    assert_eq!(body["code"], "SUBSCRIPTION_EXPIRED");
    assert!(!stores.store("s1").unwrap().is_active);
}

#[tokio::test]
async fn admin_bypasses_subscription_gate() {
    let (_, app) = seeded(Some(Utc::now() - Duration::days(1)));
    let token = access_token("admin-1", Some("s1"), "Admin");

    let response = app
        .oneshot(get("/api/products/barcode/MAIN001", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn paused_store_is_blocked_until_payment() {
    let (stores, app) = seeded(None);
    let admin = access_token("admin-1", None, "Admin");
    let cashier = access_token("u-1", Some("s1"), "Cashier");

    let paused = app
        .clone()
        .oneshot(send_json(
            "PUT",
            "/api/admin/store-accounts/s1/pause",
            &admin,
            json!({ "is_paused": true }),
        ))
        .await
        .unwrap();
    assert_eq!(paused.status(), StatusCode::OK);

    let blocked = app
        .clone()
        .oneshot(get("/api/products/barcode/MAIN001", Some(&cashier)))
        .await
        .unwrap();
    assert_eq!(blocked.status(), StatusCode::FORBIDDEN);

    let paid = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/admin/store-accounts/s1/payments",
            &admin,
            json!({ "amount": 5_000.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(paid.status(), StatusCode::OK);
    let body = read_json(paid).await;
    assert_eq!(body["data"]["applied"], 5_000.0);
    assert_eq!(body["data"]["account"]["is_paused"], false);
    assert!(stores.store("s1").unwrap().is_active);

    let allowed = app
        .oneshot(get("/api/products/barcode/MAIN001", Some(&cashier)))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
}

#[tokio::test]
async fn failed_subscription_check_lets_request_through() {
    let products = InMemoryProducts::with(vec![product("s1", "MAIN001", vec![])]);
    let app = AppRouter::build(app_state(DependenciesInjectDeps {
        store_repo: Arc::new(BrokenStores),
        ..deps(products, InMemoryStores::new(), memory_cache())
    }));
    let token = access_token("u-1", Some("s1"), "Cashier");

    let response = app
        .oneshot(get("/api/products/barcode/MAIN001", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn store_account_routes_are_admin_only() {
    let (_, app) = seeded(None);
    let token = access_token("u-1", Some("s1"), "Cashier");

    let response = app
        .oneshot(get("/api/admin/store-accounts/s1", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn store_can_read_its_own_expired_subscription() {
    let (_, app) = seeded(Some(Utc::now() - Duration::days(1)));
    let token = access_token("u-1", Some("s1"), "Cashier");

    let own = app
        .clone()
        .oneshot(get("/api/stores/s1/subscription", Some(&token)))
        .await
        .unwrap();
    assert_eq!(own.status(), StatusCode::OK);
    let body = read_json(own).await;
    assert_eq!(body["data"]["subscription_expired"], true);

    let other = app
        .oneshot(get("/api/stores/s2/subscription", Some(&token)))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unit_calculation_returns_breakdown() {
    let (_, app) = seeded(None);
    let token = access_token("u-1", Some("s1"), "Cashier");

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/units/calculate",
            &token,
            json!({
                "initial_quantity": 10.0,
                "total_purchase_price": 100.0,
                "units": [
                    { "unit_name": "Box", "sub_units_per_this_unit": 12 },
                    { "unit_name": "Piece", "sub_units_per_this_unit": 0 }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["data"][1]["unit_name"], "Piece");
    assert_eq!(body["data"][1]["total_quantity"], 120.0);
}

#[tokio::test]
async fn invalid_product_lists_field_errors() {
    let (_, app) = seeded(None);
    let token = access_token("u-1", Some("s1"), "Cashier");

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/products",
            &token,
            json!({
                "name": "Tea",
                "barcode": "TEA001",
                "price": 3.0,
                "units": [{ "unit_name": "Box", "barcode": "", "selling_price": 30.0, "conversion_factor": 10.0 }]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    let details: Vec<String> = serde_json::from_value(body["details"].clone()).unwrap();
    assert!(details.iter().any(|d| d.starts_with("units[0].barcode")));
}

#[tokio::test]
async fn metrics_are_exposed() {
    let (_, app) = seeded(None);

    let response = app.oneshot(get("/metrics", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("barcode_cache_hits"));
}
