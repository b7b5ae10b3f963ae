use axum::{Router, middleware::map_response, routing::get};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{AppState, handlers, middleware};

pub fn build(state: AppState) -> Router {
    Router::new()
        .route(
            "/register",
            get(handlers::auth::register).post(handlers::auth::register_post),
        )
        .route("/logout", get(handlers::auth::logout))
        .route(
            "/login",
            get(handlers::auth::login).post(handlers::auth::login_post),
        )
        .route("/", get(handlers::index))
        .fallback(handlers::handle_404)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(map_response(middleware::security_headers))
                .into_inner(),
        )
        .with_state(state)
}
