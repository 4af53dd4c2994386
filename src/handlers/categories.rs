// handlers/categories.rs - /api/categories and /api/categories/:id

use axum::{extract::State, http::StatusCode, Json};

use crate::database::models::{Category, CategoryChanges, CategoryWithCount, CategoryWithPosts, NewCategory};
use crate::error::{ApiError, ApiResult, Entity};
use crate::state::AppState;

use super::utils::{path_id, Body, IdParam, Payload};

pub const COLLECTION_ALLOW: &str = "GET, POST";
pub const ITEM_ALLOW: &str = "GET, PUT, DELETE";

const NAME_REQUIRED: &str = "Name is required";

fn store_error(err: crate::database::StoreError) -> ApiError {
    ApiError::from_store(Entity::Category, err)
}

/// GET /api/categories - All categories with their post counts
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryWithCount>>> {
    let categories = state.store().list_categories().await.map_err(store_error)?;
    Ok(Json(categories))
}

/// POST /api/categories - Create a category
pub async fn create(
    State(state): State<AppState>,
    body: Body,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let payload = Payload::from_body(body)?;
    let input = NewCategory {
        name: payload.required_string("name", NAME_REQUIRED)?,
        description: payload.string("description")?.flatten(),
    };

    let category = state.store().create_category(input).await.map_err(store_error)?;
    tracing::info!("Created category {} ({})", category.id, category.name);
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/categories/:id - One category with its posts
pub async fn get(
    State(state): State<AppState>,
    id: IdParam,
) -> ApiResult<Json<CategoryWithPosts>> {
    let id = path_id(id)?;
    state
        .store()
        .get_category(id)
        .await
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category not found"))
}

/// PUT /api/categories/:id - Update name and/or description
pub async fn put(
    State(state): State<AppState>,
    id: IdParam,
    body: Body,
) -> ApiResult<Json<Category>> {
    let id = path_id(id)?;
    let payload = Payload::from_body(body)?;
    let changes = CategoryChanges {
        name: payload.required_string_change("name", NAME_REQUIRED)?,
        description: payload.string("description")?,
    };

    let category = state.store().update_category(id, changes).await.map_err(store_error)?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id
pub async fn delete(State(state): State<AppState>, id: IdParam) -> ApiResult<StatusCode> {
    let id = path_id(id)?;
    state.store().delete_category(id).await.map_err(store_error)?;
    tracing::info!("Deleted category {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn collection_fallback() -> ApiError {
    ApiError::method_not_allowed(COLLECTION_ALLOW)
}

/// Unsupported verbs on an item still report a malformed id first
pub async fn item_fallback(id: IdParam) -> ApiError {
    match path_id(id) {
        Ok(_) => ApiError::method_not_allowed(ITEM_ALLOW),
        Err(err) => err,
    }
}
