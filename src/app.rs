use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

/// Build the full router: JSON API, HTML pages and health check
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health::health))
        .merge(page_routes())
        .merge(category_routes())
        .merge(post_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

fn page_routes() -> Router<AppState> {
    use handlers::pages;

    Router::new()
        .route("/", get(pages::index))
        .route("/posts/:id", get(pages::post_detail))
}

fn category_routes() -> Router<AppState> {
    use handlers::categories;

    Router::new()
        .route(
            "/api/categories",
            get(categories::list)
                .post(categories::create)
                .fallback(categories::collection_fallback),
        )
        .route(
            "/api/categories/:id",
            get(categories::get)
                .put(categories::put)
                .delete(categories::delete)
                .fallback(categories::item_fallback),
        )
}

fn post_routes() -> Router<AppState> {
    use handlers::posts;

    Router::new()
        .route(
            "/api/posts",
            get(posts::list)
                .post(posts::create)
                .fallback(posts::collection_fallback),
        )
        .route(
            "/api/posts/:id",
            get(posts::get)
                .put(posts::put)
                .delete(posts::delete)
                .fallback(posts::item_fallback),
        )
}
