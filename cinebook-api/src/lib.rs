use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod error;
pub mod invoices;
pub mod middleware;
pub mod state;

pub use state::AppState;

use middleware::customer_auth_middleware;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::USER_AGENT]);

    let protected = Router::new()
        .route("/confirm-payment", post(bookings::confirm_payment))
        .route("/payment-confirmation", get(bookings::payment_confirmation))
        .route("/download-bill/{handle}", get(invoices::download_bill))
        .route("/signout", post(auth::sign_out))
        .route_layer(from_fn_with_state(state.clone(), customer_auth_middleware));

    Router::new()
        .route("/", get(index))
        .merge(auth::routes())
        .merge(bookings::routes())
        .merge(protected)
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Default view visitors are redirected to.
async fn index() -> Json<Value> {
    Json(json!({
        "service": "cinebook",
        "status": "ok",
    }))
}

async fn not_found() -> AppError {
    AppError::NotFoundError("Page not found".to_string())
}
