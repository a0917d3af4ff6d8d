//! HTTP routes and middleware
//!
//! Public storefront API, no authentication:
//!
//! - [`health`] - liveness
//! - [`shipping`] - shipping recalculation and cart-page quote
//! - [`checkout`] - checkout session creation

pub mod checkout;
pub mod convert;
pub mod health;
pub mod shipping;

use axum::Router;
use http::{HeaderName, HeaderValue, Method, header};
use shared::error::AppError;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator (uuid v4)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(shipping::router())
        .merge(checkout::router())
        .fallback(not_found)
}

async fn not_found(uri: http::Uri) -> AppError {
    AppError::not_found(format!("Route {}", uri.path()))
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let origin = allow_origin.and_then(|o| match HeaderValue::from_str(o) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(origin = o, "Ignoring unparsable CORS_ALLOW_ORIGIN");
            None
        }
    });
    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

/// Build the application with middleware and state applied
///
/// Used by the HTTP server and by oneshot tests
pub fn build_app(state: &ServerState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        .layer(cors_layer(state.config.cors_allow_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        .with_state(state.clone())
}
