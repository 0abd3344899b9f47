use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::current_user::current_user;
use super::handlers::follow_user::follow_user;
use super::handlers::get_profile::get_profile;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::unfollow_user::unfollow_user;
use super::handlers::update_user::update_user;
use crate::domain::profile::ports::ProfileServicePort;
use crate::user::ports::UserServicePort;

pub struct AppState<US, PS>
where
    US: UserServicePort,
    PS: ProfileServicePort,
{
    pub user_service: Arc<US>,
    pub profile_service: Arc<PS>,
}

impl<US, PS> Clone for AppState<US, PS>
where
    US: UserServicePort,
    PS: ProfileServicePort,
{
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            profile_service: Arc::clone(&self.profile_service),
        }
    }
}

pub fn create_router<US, PS>(user_service: Arc<US>, profile_service: Arc<PS>) -> Router
where
    US: UserServicePort,
    PS: ProfileServicePort,
{
    let state = AppState {
        user_service,
        profile_service,
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers stay out of the span: they carry session tokens.
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

    Router::new()
        .route("/api/users", post(register::<US, PS>))
        .route("/api/users/login", post(login::<US, PS>))
        .route(
            "/api/user",
            get(current_user::<US, PS>).put(update_user::<US, PS>),
        )
        .route("/api/profiles/:username", get(get_profile::<US, PS>))
        .route(
            "/api/profiles/:username/follow",
            post(follow_user::<US, PS>).delete(unfollow_user::<US, PS>),
        )
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
