//! REST surface for the customer directory.
//!
//! Endpoints:
//! - `GET    /api/customers`                 filtered, paginated customer listing
//! - `POST   /api/customers`                 create a customer
//! - `GET    /api/customers/{id}`            fetch one customer
//! - `PUT    /api/customers/{id}`            replace a customer's fields
//! - `DELETE /api/customers/{id}`            delete a customer and its addresses
//! - `GET    /api/customers/{id}/addresses`  list a customer's addresses
//! - `POST   /api/customers/{id}/addresses`  add an address to a customer
//! - `PUT    /api/addresses/{id}`            replace an address's fields
//! - `DELETE /api/addresses/{id}`            delete an address

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, put},
    Router,
};
use rolodex_core::config::ServerConfig;
use rolodex_db::repositories::{
    AddressRepository, CustomerRepository, SqlAddressRepository, SqlCustomerRepository,
};
use rolodex_db::DbPool;
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::{warn, Level, Span};

use crate::{addresses, customers, health};

#[derive(Clone)]
pub struct ApiState {
    pub customers: Arc<dyn CustomerRepository>,
    pub addresses: Arc<dyn AddressRepository>,
}

impl ApiState {
    pub fn from_pool(db_pool: DbPool) -> Self {
        Self {
            customers: Arc::new(SqlCustomerRepository::new(db_pool.clone())),
            addresses: Arc::new(SqlAddressRepository::new(db_pool)),
        }
    }
}

/// Acknowledgement returned by update and delete endpoints.
#[derive(Debug, Serialize)]
pub struct ChangeSummary {
    pub message: &'static str,
    pub changes: u64,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/api/customers/{id}",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route(
            "/api/customers/{id}/addresses",
            get(addresses::list_addresses).post(addresses::create_address),
        )
        .route(
            "/api/addresses/{id}",
            put(addresses::update_address).delete(addresses::delete_address),
        )
        .with_state(state)
}

/// Full HTTP application: API, health probe, CORS, request tracing, and the optional
/// static UI bundle.
pub fn app(config: &ServerConfig, db_pool: DbPool) -> Router {
    let mut app = Router::new()
        .route("/", get(index))
        .merge(router(ApiState::from_pool(db_pool.clone())))
        .merge(health::router(db_pool));

    if let Some(static_dir) = &config.static_dir {
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    app.layer(cors_layer(&config.allowed_origins)).layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    status = tracing::field::Empty,
                    latency_ms = tracing::field::Empty,
                )
            })
            .on_response(
                |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record("latency_ms", latency.as_millis() as u64);
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .on_response(response, latency, span);
                },
            ),
    )
}

async fn index() -> &'static str {
    "API is working!"
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(origin = %origin, error = %error, "ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}
