//! In-process server backed by the in-memory store.
#![allow(dead_code)]

use jewelry_catalog_api::{transport, AppState, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let app_state = AppState::from_store(Arc::new(MemoryStore::new()));
        let router = transport::http::create_router(app_state);

        // Bind to an ephemeral port so tests can run in parallel.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        read(resp).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        let resp = self.client.post(self.url(path)).json(body).send().await.unwrap();
        read(resp).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> (u16, Value) {
        let resp = self.client.put(self.url(path)).json(body).send().await.unwrap();
        read(resp).await
    }

    pub async fn patch(&self, path: &str) -> (u16, Value) {
        let resp = self.client.patch(self.url(path)).send().await.unwrap();
        read(resp).await
    }

    pub async fn delete(&self, path: &str) -> (u16, Value) {
        let resp = self.client.delete(self.url(path)).send().await.unwrap();
        read(resp).await
    }

    /// Creates a jewelry type and returns its id.
    pub async fn create_type(&self, kind: &str, description: &str) -> String {
        let (status, body) = self
            .post(
                "/api/jewelry-types",
                &json!({
                    "type": kind,
                    "description": description,
                    "image": format!("https://img.example/{}.png", kind.to_lowercase())
                }),
            )
            .await;
        assert_eq!(status, 201, "create {} failed: {}", kind, body);
        body["data"]["_id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn read(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}
