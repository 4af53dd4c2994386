#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Response;
use serde_json::Value;

use blog_api::config::AppConfig;
use blog_api::database::MemoryStore;
use blog_api::AppState;

/// Router served on a free local port, backed by a fresh in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        Self::start_with(config).await
    }

    pub async fn start_with(config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let app = blog_api::app(AppState::new(Arc::new(MemoryStore::new())), &config);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });

        Ok(Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(&body).send().await?)
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Response> {
        Ok(self.client.put(self.url(path)).json(&body).send().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).send().await?)
    }

    pub async fn request(&self, method: reqwest::Method, path: &str) -> Result<Response> {
        Ok(self.client.request(method, self.url(path)).send().await?)
    }

    /// Create a category and return its id
    pub async fn create_category(&self, name: &str) -> Result<i64> {
        let res = self.post("/api/categories", serde_json::json!({ "name": name })).await?;
        anyhow::ensure!(res.status() == 201, "category create failed: {}", res.status());
        let body: Value = res.json().await?;
        body["id"].as_i64().context("missing id")
    }

    /// Create a post and return its JSON
    pub async fn create_post(&self, body: Value) -> Result<Value> {
        let res = self.post("/api/posts", body).await?;
        anyhow::ensure!(res.status() == 201, "post create failed: {}", res.status());
        Ok(res.json().await?)
    }
}
