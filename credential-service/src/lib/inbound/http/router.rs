use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::BoxError;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::session::session;
use super::handlers::ApiError;
use super::middleware::require_bearer_token;
use crate::domain::identity::ports::CredentialServicePort;

pub struct AppState<S: CredentialServicePort> {
    pub credential_service: Arc<S>,
}

impl<S: CredentialServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            credential_service: Arc::clone(&self.credential_service),
        }
    }
}

pub fn create_router<S: CredentialServicePort>(
    credential_service: Arc<S>,
    request_timeout: Duration,
) -> Router {
    let state = AppState { credential_service };

    let public_routes = Router::new()
        .route("/register", post(register::<S>).fallback(method_not_allowed))
        .route("/login", post(login::<S>).fallback(method_not_allowed));

    let protected_routes = Router::new()
        .route("/session", get(session).fallback(method_not_allowed))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token::<S>,
        ));

    // Headers are not recorded: they carry bearer tokens
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let deadline_layer = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .timeout(request_timeout);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(deadline_layer)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request deadline exceeded");
        ApiError::RequestTimeout("Request timed out".to_string())
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::internal()
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed".to_string())
}
