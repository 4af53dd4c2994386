pub mod category;
pub mod post;

pub use category::{Category, CategoryChanges, CategoryWithCount, CategoryWithPosts, NewCategory, PostCount};
pub use post::{NewPost, Post, PostChanges, PostWithCategory};
