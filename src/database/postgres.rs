use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::{PgPoolOptions, PgRow}, PgPool, Row};
use tracing::info;

use crate::config::DatabaseConfig;

use super::models::{
    Category, CategoryChanges, CategoryWithCount, CategoryWithPosts, NewCategory, NewPost, Post,
    PostChanges, PostCount, PostWithCategory,
};
use super::store::{BlogStore, StoreError, StoreResult};

const POST_COLUMNS: &str = "id, title, content, published, created_at, category_id";

const POST_WITH_CATEGORY_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, p.published, p.created_at, p.category_id,
           c.name AS category_name, c.description AS category_description
    FROM posts p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Postgres-backed store. Holds one connection pool for the life of the process.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open the pool described by `config` and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Other("DATABASE_URL is not set".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;
        info!("Created database pool (max {} connections)", config.max_connections);

        let store = Self::from_pool(pool);
        if config.run_migrations {
            store.migrate().await?;
        }
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Other(format!("migration failed: {}", e)))?;
        info!("Database schema is up to date");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn post_with_category(row: &PgRow) -> Result<PostWithCategory, sqlx::Error> {
    let post = Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        published: row.try_get("published")?,
        created_at: row.try_get("created_at")?,
        category_id: row.try_get("category_id")?,
    };

    let category = match (post.category_id, row.try_get::<Option<String>, _>("category_name")?) {
        (Some(id), Some(name)) => Some(Category {
            id,
            name,
            description: row.try_get("category_description")?,
        }),
        _ => None,
    };

    Ok(PostWithCategory { post, category })
}

#[async_trait]
impl BlogStore for PgStore {
    async fn list_categories(&self) -> StoreResult<Vec<CategoryWithCount>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name, c.description, COUNT(p.id) AS post_count
            FROM categories c
            LEFT JOIN posts p ON p.category_id = c.id
            GROUP BY c.id, c.name, c.description
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<CategoryWithCount, sqlx::Error> {
                Ok(CategoryWithCount {
                    category: Category {
                        id: row.try_get("id")?,
                        name: row.try_get("name")?,
                        description: row.try_get("description")?,
                    },
                    count: PostCount { posts: row.try_get("post_count")? },
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    async fn create_category(&self, input: NewCategory) -> StoreResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id, name, description",
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    async fn get_category(&self, id: i32) -> StoreResult<Option<CategoryWithPosts>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(category) = category else {
            return Ok(None);
        };

        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {} FROM posts WHERE category_id = $1 ORDER BY id",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(CategoryWithPosts { category, posts }))
    }

    async fn update_category(&self, id: i32, changes: CategoryChanges) -> StoreResult<Category> {
        let (set_description, description) = match changes.description {
            Some(value) => (true, value),
            None => (false, None),
        };

        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END
            WHERE id = $1
            RETURNING id, name, description
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(set_description)
        .bind(&description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_category(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_posts(&self) -> StoreResult<Vec<PostWithCategory>> {
        let rows = sqlx::query(&format!("{} ORDER BY p.id", POST_WITH_CATEGORY_SELECT))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(post_with_category)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    async fn create_post(&self, input: NewPost) -> StoreResult<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts (title, content, published, category_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            POST_COLUMNS
        ))
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.published)
        .bind(input.category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    async fn get_post(&self, id: i32) -> StoreResult<Option<PostWithCategory>> {
        let row = sqlx::query(&format!("{} WHERE p.id = $1", POST_WITH_CATEGORY_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(post_with_category(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_post(&self, id: i32, changes: PostChanges) -> StoreResult<Post> {
        let (set_content, content) = match changes.content {
            Some(value) => (true, value),
            None => (false, None),
        };

        sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = CASE WHEN $3 THEN $4 ELSE content END,
                published = COALESCE($5, published),
                category_id = $6
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(id)
        .bind(&changes.title)
        .bind(set_content)
        .bind(&content)
        .bind(changes.published)
        .bind(changes.category_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_post(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
