// handlers/posts.rs - /api/posts and /api/posts/:id

use axum::{extract::State, http::StatusCode, Json};

use crate::database::models::{NewPost, Post, PostChanges, PostWithCategory};
use crate::error::{ApiError, ApiResult, Entity};
use crate::state::AppState;

use super::utils::{path_id, Body, IdParam, Payload};

pub const COLLECTION_ALLOW: &str = "GET, POST";
pub const ITEM_ALLOW: &str = "GET, PUT, DELETE";

const TITLE_REQUIRED: &str = "Title is required";

fn store_error(err: crate::database::StoreError) -> ApiError {
    ApiError::from_store(Entity::Post, err)
}

/// GET /api/posts - All posts, each with its category embedded
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<PostWithCategory>>> {
    let posts = state.store().list_posts().await.map_err(store_error)?;
    Ok(Json(posts))
}

/// POST /api/posts - Create a post
///
/// `published` defaults to false and `categoryId` to null. A `categoryId`
/// pointing at no category is rejected with 400 and nothing is stored.
pub async fn create(
    State(state): State<AppState>,
    body: Body,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let payload = Payload::from_body(body)?;
    let input = NewPost {
        title: payload.required_string("title", TITLE_REQUIRED)?,
        content: payload.string("content")?.flatten(),
        published: payload.flag("published").unwrap_or(false),
        category_id: payload.category_id()?,
    };

    let post = state.store().create_post(input).await.map_err(store_error)?;
    tracing::info!("Created post {}", post.id);
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/posts/:id
pub async fn get(
    State(state): State<AppState>,
    id: IdParam,
) -> ApiResult<Json<PostWithCategory>> {
    let id = path_id(id)?;
    state
        .store()
        .get_post(id)
        .await
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Post not found"))
}

/// PUT /api/posts/:id
///
/// Omitted fields keep their values, except `categoryId`: leaving it out
/// detaches the post from its category.
pub async fn put(
    State(state): State<AppState>,
    id: IdParam,
    body: Body,
) -> ApiResult<Json<Post>> {
    let id = path_id(id)?;
    let payload = Payload::from_body(body)?;
    let changes = PostChanges {
        title: payload.required_string_change("title", TITLE_REQUIRED)?,
        content: payload.string("content")?,
        published: payload.flag("published"),
        category_id: payload.category_id()?,
    };

    let post = state.store().update_post(id, changes).await.map_err(store_error)?;
    Ok(Json(post))
}

/// DELETE /api/posts/:id
pub async fn delete(State(state): State<AppState>, id: IdParam) -> ApiResult<StatusCode> {
    let id = path_id(id)?;
    state.store().delete_post(id).await.map_err(store_error)?;
    tracing::info!("Deleted post {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn collection_fallback() -> ApiError {
    ApiError::method_not_allowed(COLLECTION_ALLOW)
}

pub async fn item_fallback(id: IdParam) -> ApiError {
    match path_id(id) {
        Ok(_) => ApiError::method_not_allowed(ITEM_ALLOW),
        Err(err) => err,
    }
}
