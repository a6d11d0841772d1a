use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{self, companies, jobs};
use crate::middleware::{authenticate_jwt, ensure_admin};
use crate::state::AppState;

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health))
        .merge(company_routes())
        .merge(job_routes())
        .fallback(handlers::root::not_found)
        .with_state(state);

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.layer(
        ServiceBuilder::new()
            .layer(cors_layer(&config.security))
            .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
            .layer(middleware::from_fn(authenticate_jwt)),
    )
}

fn company_routes() -> Router<AppState> {
    use axum::handler::Handler;

    Router::new()
        .route(
            "/companies",
            get(companies::list).post(companies::create.layer(middleware::from_fn(ensure_admin))),
        )
        .route(
            "/companies/:handle",
            get(companies::get)
                .patch(companies::update.layer(middleware::from_fn(ensure_admin)))
                .delete(companies::remove.layer(middleware::from_fn(ensure_admin))),
        )
}

fn job_routes() -> Router<AppState> {
    use axum::handler::Handler;

    Router::new()
        .route(
            "/jobs",
            get(jobs::list).post(jobs::create.layer(middleware::from_fn(ensure_admin))),
        )
        .route(
            "/jobs/:id",
            get(jobs::get)
                .patch(jobs::update.layer(middleware::from_fn(ensure_admin)))
                .delete(jobs::remove.layer(middleware::from_fn(ensure_admin))),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
