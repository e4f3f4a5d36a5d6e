use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use cinebook_api::{app, auth::issue_token, AppState};
use cinebook_store::app_config::Config;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: AppState,
    _bills: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let bills = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.auth.jwt_secret = "integration-secret".to_string();
        config.invoices.directory = bills.path().join("bills");

        let state = AppState::from_config(&config).await.unwrap();
        Self {
            router: app(state.clone()),
            state,
            _bills: bills,
        }
    }

    fn token(&self) -> String {
        issue_token(&self.state.auth, "a@x.com").unwrap()
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

fn post_json(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_owned())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap()
}

fn booking_payload() -> Value {
    json!({
        "name": "A", "email": "a@x.com", "phone": "1", "city": "C", "state": "S", "zip": "1",
        "movie": "M", "theater": "T", "date": "2024-01-01", "time": "18:00",
        "seats": ["A1", "A2"], "total_price": 500
    })
}

#[tokio::test]
async fn test_confirm_view_and_download_flow() {
    let app = TestApp::new().await;
    let token = app.token();

    let response = app
        .send(post_json("/confirm-payment", Some(&token), &booking_payload().to_string()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let receipt = body_json(response).await;
    assert_eq!(receipt["message"], "Payment successful!");
    assert_eq!(receipt["redirect_url"], "/payment-confirmation");
    let booking_id = receipt["booking_id"].as_str().unwrap().to_string();
    assert!(booking_id.starts_with("BK"));
    assert_eq!(booking_id.len(), "BK".len() + 14);
    let bill_url = receipt["bill_url"].as_str().unwrap().to_string();
    assert!(bill_url.starts_with("/download-bill/bill_"));
    assert!(bill_url.ends_with(".pdf"));

    // First view shows the confirmation
    let response = app.send(get("/payment-confirmation", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let pending = body_json(response).await;
    assert_eq!(pending["booking_id"], booking_id.as_str());
    assert_eq!(pending["movie_name"], "M");
    assert_eq!(pending["show_time"], "18:00");
    assert_eq!(pending["seats"], "A1, A2");
    assert_eq!(pending["booking_date"], "2024-01-01");
    assert_eq!(pending["total_amount"], json!(500.0));

    // Second view finds nothing staged
    let response = app.send(get("/payment-confirmation", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // The invoice stays downloadable
    let response = app.send(get(&bill_url, Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment;"));
    let pdf = body_bytes(response).await;
    assert!(pdf.starts_with(b"%PDF"));
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains(&booking_id));
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let response = app
        .send(post_json("/confirm-payment", None, &booking_payload().to_string()))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(get("/payment-confirmation", Some("not-a-jwt"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_field_is_rejected_and_nothing_staged() {
    let app = TestApp::new().await;
    let token = app.token();

    let mut payload = booking_payload();
    payload.as_object_mut().unwrap().remove("total_price");

    let response = app
        .send(post_json("/confirm-payment", Some(&token), &payload.to_string()))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["error"], "Missing required field: total_price");

    let response = app.send(get("/payment-confirmation", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_malformed_bodies_are_rejected() {
    let app = TestApp::new().await;
    let token = app.token();

    for body in ["", "{not json", "{}", "[1, 2]"] {
        let response = app.send(post_json("/confirm-payment", Some(&token), body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {:?}", body);
    }
}

#[tokio::test]
async fn test_unknown_bill_redirects_to_confirmation() {
    let app = TestApp::new().await;
    let token = app.token();

    let response = app
        .send(get("/download-bill/bill_19990101000000.pdf", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/payment-confirmation");

    let response = app
        .send(get("/download-bill/..%2F..%2Fetc%2Fpasswd", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_generate_ticket_preview() {
    let app = TestApp::new().await;

    let body = json!({
        "movie": "M", "theater": "T", "date": "2024-01-01", "time": "18:00",
        "seats": ["A1"], "name": "A", "email": "a@x.com", "address": "1 Road",
        "city": "C", "state": "S", "zipcode": "1"
    });
    let response = app
        .send(post_json("/generate-ticket", None, &body.to_string()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Ticket generated successfully");
    assert_eq!(json["ticket"]["movie"], "M");
    assert_eq!(json["ticket"]["zipcode"], "1");

    let response = app.send(post_json("/generate-ticket", None, "{}")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_signin_and_conflict() {
    let app = TestApp::new().await;
    let account = json!({"email": "b@x.com", "username": "bee", "password": "hunter2"});

    let response = app
        .send(post_json("/signup", None, &account.to_string()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "bee");
    assert!(json["token"].as_str().is_some());

    let response = app
        .send(post_json("/signup", None, &account.to_string()))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .send(post_json(
            "/signin",
            None,
            &json!({"email": "b@x.com", "password": "wrong"}).to_string(),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(post_json(
            "/signin",
            None,
            &json!({"email": "b@x.com", "password": "hunter2"}).to_string(),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"].as_str().unwrap().to_string();

    let response = app
        .send(post_json("/confirm-payment", Some(&token), &booking_payload().to_string()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signout_clears_staged_confirmation() {
    let app = TestApp::new().await;
    let token = app.token();

    let response = app
        .send(post_json("/confirm-payment", Some(&token), &booking_payload().to_string()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(post_json("/signout", Some(&token), "")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.send(get("/payment-confirmation", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_sessions_do_not_share_confirmations() {
    let app = TestApp::new().await;
    let first = app.token();
    let second = app.token();

    let response = app
        .send(post_json("/confirm-payment", Some(&first), &booking_payload().to_string()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(get("/payment-confirmation", Some(&second))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.send(get("/payment-confirmation", Some(&first))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = TestApp::new().await;

    let response = app.send(get("/no-such-page", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let json = body_json(response).await;
    assert_eq!(json["error"], "Page not found");
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = TestApp::new().await;

    let response = app.send(get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
    assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block");
    assert_eq!(
        headers.get("strict-transport-security").unwrap(),
        "max-age=31536000; includeSubDomains"
    );
}
