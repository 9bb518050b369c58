//! Shared helpers for unit tests
//!
//! Stand-ins for the two third-party services: a throwaway HTTP server on a
//! random local port, and text generators with canned replies.

use crate::ai::TextGenerator;
use crate::error::{Error, Result};
use async_trait::async_trait;
use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::net::TcpListener;

/// Serve `router` on 127.0.0.1 and return its base URL
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A Nominatim look-alike that knows a single place: Toronto
pub async fn spawn_nominatim() -> String {
    let router = Router::new().route(
        "/search",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            let query = params.get("q").map(|q| q.to_lowercase()).unwrap_or_default();
            let body: Value = if query.contains("toronto") {
                json!([{
                    "lat": "43.6534817",
                    "lon": "-79.3839347",
                    "display_name": "Toronto, Golden Horseshoe, Ontario, Canada"
                }])
            } else {
                json!([])
            };
            Json(body)
        }),
    );
    spawn_server(router).await
}

/// Generator that always answers with the same text
pub struct CannedGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl CannedGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    fn name(&self) -> &str {
        "canned"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Generator whose every call fails
pub struct FailingGenerator {
    pub calls: AtomicUsize,
}

impl FailingGenerator {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Upstream("Gemini API error 503: overloaded".to_string()))
    }
}

/// A well-formed model reply with one suggestion at (0, 0)
pub fn zeroed_suggestion_reply() -> String {
    "```json\n{\n  \"analysis\": \"A lively neighbourhood with plenty to see.\",\n  \"suggestedLocations\": [\n    {\"name\": \"Lawrence Park\", \"lat\": 0, \"lng\": 0, \"attractionType\": \"Park\"}\n  ]\n}\n```".to_string()
}
