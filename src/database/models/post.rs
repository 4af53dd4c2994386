use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::category::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub category_id: Option<i32>,
}

/// Post with its category embedded, as returned by list and detail routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWithCategory {
    #[serde(flatten)]
    pub post: Post,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: Option<String>,
    pub published: bool,
    pub category_id: Option<i32>,
}

/// Partial update. `category_id` is always written: `None` detaches the post.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<Option<String>>,
    pub published: Option<bool>,
    pub category_id: Option<i32>,
}

impl PostChanges {
    pub fn apply(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(published) = self.published {
            post.published = published;
        }
        post.category_id = self.category_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post {
            id: 1,
            title: "Hello".into(),
            content: None,
            published: false,
            created_at: Utc::now(),
            category_id: Some(4),
        }
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["categoryId"], 4);
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn embedded_category_is_flattened_alongside_post_fields() {
        let item = PostWithCategory { post: sample(), category: None };
        let value = serde_json::to_value(item).unwrap();
        assert_eq!(value["title"], "Hello");
        assert!(value["category"].is_null());
    }

    #[test]
    fn changes_always_rewrite_category() {
        let mut post = sample();
        PostChanges { title: Some("New".into()), ..Default::default() }.apply(&mut post);
        assert_eq!(post.title, "New");
        assert_eq!(post.category_id, None);
        assert!(!post.published);
    }
}
