// handlers/mod.rs - Route handlers
//
// api/*   JSON resources (categories, posts)
// pages   Server-rendered HTML over the same store calls
pub mod categories;
pub mod health;
pub mod pages;
pub mod posts;
pub mod utils;
