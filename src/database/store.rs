use async_trait::async_trait;
use thiserror::Error;

use super::models::{
    Category, CategoryChanges, CategoryWithCount, CategoryWithPosts, NewCategory, NewPost, Post,
    PostChanges, PostWithCategory,
};

/// Outcome of a failed store call, classified where the store client sees the error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Unique constraint failed on the field: {field}")]
    UniqueViolation { field: String },

    #[error("Foreign key constraint failed")]
    ForeignKeyViolation,

    #[error("{0}")]
    Other(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => StoreError::UniqueViolation {
                    field: db_err.constraint().unwrap_or("name").to_string(),
                },
                // foreign_key_violation
                Some("23503") => StoreError::ForeignKeyViolation,
                _ => StoreError::Other(db_err.message().to_string()),
            },
            other => StoreError::Other(other.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Typed data-access client shared by every handler
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn list_categories(&self) -> StoreResult<Vec<CategoryWithCount>>;
    async fn create_category(&self, input: NewCategory) -> StoreResult<Category>;
    /// `Ok(None)` when no category has this id
    async fn get_category(&self, id: i32) -> StoreResult<Option<CategoryWithPosts>>;
    async fn update_category(&self, id: i32, changes: CategoryChanges) -> StoreResult<Category>;
    async fn delete_category(&self, id: i32) -> StoreResult<()>;

    async fn list_posts(&self) -> StoreResult<Vec<PostWithCategory>>;
    async fn create_post(&self, input: NewPost) -> StoreResult<Post>;
    async fn get_post(&self, id: i32) -> StoreResult<Option<PostWithCategory>>;
    async fn update_post(&self, id: i32, changes: PostChanges) -> StoreResult<Post>;
    async fn delete_post(&self, id: i32) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
}
