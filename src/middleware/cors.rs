//! CORS policy for the browser front end.
//!
//! Clients authenticate with a bearer token in the `Authorization` header, never with
//! cookies, so credentials stay disabled in every environment.
//!
//! Policy:
//! - Allow-Origin: exact match against `CORS_ALLOWED_ORIGINS` (default `http://localhost:3000`).
//! - An empty allowlist emits no CORS headers at all.
//! - `APP_ENV` does not widen the policy; a wildcard origin is never used.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

pub fn apply(router: Router, config: &Config) -> Router {
    let allowed: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(false)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}
