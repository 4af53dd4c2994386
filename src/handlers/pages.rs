// handlers/pages.rs - HTML pages at / and /posts/:id

use axum::{extract::State, http::StatusCode, response::Html};

use crate::state::AppState;
use crate::views;

use super::utils::{path_id, IdParam};

/// GET / - Post list
pub async fn index(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    match state.store().list_posts().await {
        Ok(posts) => (StatusCode::OK, Html(views::post_list(&posts))),
        Err(e) => {
            tracing::error!("Failed to load posts for index page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(views::load_error("Posts", "posts", &e.to_string())))
        }
    }
}

/// GET /posts/:id - Post detail; malformed and unknown ids both render 404
pub async fn post_detail(
    State(state): State<AppState>,
    id: IdParam,
) -> (StatusCode, Html<String>) {
    let Ok(id) = path_id(id) else {
        return not_found();
    };

    match state.store().get_post(id).await {
        Ok(Some(post)) => (StatusCode::OK, Html(views::post_detail(&post))),
        Ok(None) => not_found(),
        Err(e) => {
            tracing::error!("Failed to load post {}: {}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(views::load_error("Post", "post", &e.to_string())))
        }
    }
}

fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(views::not_found()))
}
