use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::models::{
    Category, CategoryChanges, CategoryWithCount, CategoryWithPosts, NewCategory, NewPost, Post,
    PostChanges, PostCount, PostWithCategory,
};
use super::store::{BlogStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i32, Category>,
    posts: BTreeMap<i32, Post>,
    category_seq: i32,
    post_seq: i32,
}

impl Tables {
    fn name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }

    fn check_category_ref(&self, category_id: Option<i32>) -> StoreResult<()> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(StoreError::ForeignKeyViolation),
            _ => Ok(()),
        }
    }

    fn with_category(&self, post: &Post) -> PostWithCategory {
        PostWithCategory {
            post: post.clone(),
            category: post.category_id.and_then(|id| self.categories.get(&id).cloned()),
        }
    }
}

/// In-process store with the same constraints as the Postgres schema.
/// Ids come from per-table sequences and are never handed out twice.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn list_categories(&self) -> StoreResult<Vec<CategoryWithCount>> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .map(|category| CategoryWithCount {
                category: category.clone(),
                count: PostCount {
                    posts: tables
                        .posts
                        .values()
                        .filter(|p| p.category_id == Some(category.id))
                        .count() as i64,
                },
            })
            .collect())
    }

    async fn create_category(&self, input: NewCategory) -> StoreResult<Category> {
        let mut tables = self.tables.write().await;
        if tables.name_taken(&input.name, None) {
            return Err(StoreError::UniqueViolation { field: "name".to_string() });
        }

        tables.category_seq += 1;
        let category = Category {
            id: tables.category_seq,
            name: input.name,
            description: input.description,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: i32) -> StoreResult<Option<CategoryWithPosts>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.get(&id).map(|category| CategoryWithPosts {
            category: category.clone(),
            posts: tables
                .posts
                .values()
                .filter(|p| p.category_id == Some(id))
                .cloned()
                .collect(),
        }))
    }

    async fn update_category(&self, id: i32, changes: CategoryChanges) -> StoreResult<Category> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(name) = &changes.name {
            if tables.name_taken(name, Some(id)) {
                return Err(StoreError::UniqueViolation { field: "name".to_string() });
            }
        }

        let category = tables.categories.get_mut(&id).ok_or(StoreError::NotFound)?;
        changes.apply(category);
        Ok(category.clone())
    }

    async fn delete_category(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.categories.remove(&id).ok_or(StoreError::NotFound)?;
        // ON DELETE SET NULL
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }

    async fn list_posts(&self) -> StoreResult<Vec<PostWithCategory>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().map(|p| tables.with_category(p)).collect())
    }

    async fn create_post(&self, input: NewPost) -> StoreResult<Post> {
        let mut tables = self.tables.write().await;
        tables.check_category_ref(input.category_id)?;

        tables.post_seq += 1;
        let post = Post {
            id: tables.post_seq,
            title: input.title,
            content: input.content,
            published: input.published,
            created_at: Utc::now(),
            category_id: input.category_id,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i32) -> StoreResult<Option<PostWithCategory>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).map(|p| tables.with_category(p)))
    }

    async fn update_post(&self, id: i32, changes: PostChanges) -> StoreResult<Post> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        tables.check_category_ref(changes.category_id)?;

        let post = tables.posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        changes.apply(post);
        Ok(post.clone())
    }

    async fn delete_post(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
