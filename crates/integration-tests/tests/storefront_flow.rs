//! Integration tests for the storefront shopping flow.
//!
//! These tests require a running storefront server
//! (cargo run -p spicejar-storefront).
//!
//! Run with: cargo test -p spicejar-integration-tests -- --ignored

use reqwest::{Client, StatusCode, redirect::Policy};
use uuid::Uuid;

/// Base URL for the storefront (configurable via environment).
fn base_url() -> String {
    std::env::var("SPICEJAR_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create a client that holds session cookies and follows redirects,
/// i.e. behaves like one browser.
fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Create a client that does NOT follow redirects, for asserting on
/// redirect-after-write behavior directly.
fn non_following_browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a fresh account and log it in, returning the username.
async fn register_and_login(client: &Client) -> String {
    let username = format!("it-{}", Uuid::new_v4());
    let base = base_url();

    let resp = client
        .post(format!("{base}/auth/register"))
        .form(&[("username", username.as_str()), ("password", "pickles123")])
        .send()
        .await
        .expect("register request failed");
    assert!(resp.status().is_success());

    let resp = client
        .post(format!("{base}/auth/login"))
        .form(&[("username", username.as_str()), ("password", "pickles123")])
        .send()
        .await
        .expect("login request failed");
    assert!(resp.status().is_success());

    username
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health() {
    let resp = browser()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("health request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_products_page_requires_login() {
    let client = non_following_browser();
    let resp = client
        .get(base_url())
        .send()
        .await
        .expect("products request failed");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(location.starts_with("/auth/login"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_register_login_and_browse() {
    let client = browser();
    let username = register_and_login(&client).await;

    let resp = client
        .get(base_url())
        .send()
        .await
        .expect("products request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("body");
    assert!(body.contains(&username));
    assert!(body.contains("Mango Pickle"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_duplicate_registration_is_rejected() {
    let client = non_following_browser();
    let username = format!("it-{}", Uuid::new_v4());
    let base = base_url();

    for _ in 0..2 {
        client
            .post(format!("{base}/auth/register"))
            .form(&[("username", username.as_str()), ("password", "pickles123")])
            .send()
            .await
            .expect("register request failed");
    }

    // The second attempt bounces back to the register page with an error.
    let resp = client
        .post(format!("{base}/auth/register"))
        .form(&[("username", username.as_str()), ("password", "pickles123")])
        .send()
        .await
        .expect("register request failed");
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(location.starts_with("/auth/register?error="));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_cart_flow_and_order_placement() {
    let client = browser();
    register_and_login(&client).await;
    let base = base_url();

    // Two jars of mango pickle (id=5, Rs.280)
    for _ in 0..2 {
        let resp = client
            .post(format!("{base}/cart/add"))
            .form(&[("product_id", "5")])
            .send()
            .await
            .expect("add request failed");
        assert!(resp.status().is_success());
    }

    let cart_page = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart request failed")
        .text()
        .await
        .expect("body");
    assert!(cart_page.contains("Mango Pickle (x2)"));
    assert!(cart_page.contains("₹560"));
    assert!(cart_page.contains("₹610"));

    // Place the order
    let resp = client
        .post(format!("{base}/checkout/place"))
        .form(&[
            ("name", "Integration Test"),
            ("address", "12 MG Road, Vijayawada"),
            ("email", "it@example.com"),
            ("phone", "+911234567890"),
        ])
        .send()
        .await
        .expect("place request failed");
    assert!(resp.status().is_success());

    // The cart is empty afterwards
    let cart_page = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart request failed")
        .text()
        .await
        .expect("body");
    assert!(cart_page.contains("Your cart is empty."));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_decrement_removes_line() {
    let client = browser();
    register_and_login(&client).await;
    let base = base_url();

    client
        .post(format!("{base}/cart/add"))
        .form(&[("product_id", "8")])
        .send()
        .await
        .expect("add request failed");

    client
        .post(format!("{base}/cart/update"))
        .form(&[("product_id", "8"), ("delta", "-1")])
        .send()
        .await
        .expect("update request failed");

    let cart_page = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("cart request failed")
        .text()
        .await
        .expect("body");
    assert!(cart_page.contains("Your cart is empty."));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_invalid_quantity_delta_is_bad_request() {
    let client = browser();
    register_and_login(&client).await;
    let base = base_url();

    client
        .post(format!("{base}/cart/add"))
        .form(&[("product_id", "5")])
        .send()
        .await
        .expect("add request failed");

    let resp = client
        .post(format!("{base}/cart/update"))
        .form(&[("product_id", "5"), ("delta", "3")])
        .send()
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_guest_review_submission() {
    let client = browser();
    let base = base_url();
    let marker = format!("integration review {}", Uuid::new_v4());

    let resp = client
        .post(format!("{base}/reviews"))
        .form(&[("review", marker.as_str())])
        .send()
        .await
        .expect("review request failed");
    assert!(resp.status().is_success());

    let page = client
        .get(format!("{base}/reviews"))
        .send()
        .await
        .expect("reviews request failed")
        .text()
        .await
        .expect("body");
    assert!(page.contains("Guest"));
    assert!(page.contains(&marker));
}
