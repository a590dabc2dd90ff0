//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wrapping the router with a seeded workspace
//! - A local stand-in for the hosted model's `/responses` endpoint
//! - Helpers for driving a quiz round to completion

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{http::StatusCode, routing::post, Json, Router};
use axum_test::TestServer;
use serde_json::{json, Value};

use medterm_quiz_backend::config::{Config, LlmConfig};
use medterm_quiz_backend::{app, AppState};

/// Seed used by every test workspace.
pub const TEST_SEED: u64 = 7;

/// Test context holding the application state and its test server.
pub struct TestContext {
    pub state: AppState,
    pub server: TestServer,
}

impl TestContext {
    /// Context without a hosted model configured.
    pub fn new() -> Self {
        Self::with_llm(LlmConfig::default())
    }

    /// Context whose hosted model lives at `base_url`.
    pub fn with_model(base_url: &str) -> Self {
        Self::with_llm(LlmConfig {
            api_key: Some("test-key".to_string()),
            base_url: base_url.to_string(),
            ..LlmConfig::default()
        })
    }

    fn with_llm(llm: LlmConfig) -> Self {
        let config = Config {
            quiz_seed: Some(TEST_SEED),
            llm,
            ..Config::default()
        };
        let state = AppState::new(config).expect("Failed to build app state");
        let server = TestServer::new(app(state.clone())).expect("Failed to start test server");
        Self { state, server }
    }

    /// Upload a CSV source and return the response body.
    pub async fn upload(&self, name: &str, content: &str) -> Value {
        let response = self
            .server
            .post("/api/sources")
            .json(&json!({ "name": name, "content": content }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    /// Start a round and return the response body.
    pub async fn start(&self, question_count: usize) -> Value {
        let response = self
            .server
            .post("/api/quiz/start")
            .json(&json!({ "question_count": question_count }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    /// Answer every question of the current round, starting from `question`.
    ///
    /// Terms listed in `wrong` get a wrong answer; the rest are answered
    /// correctly from the fixture table. Returns the finished round's report.
    pub async fn play(&self, mut question: Value, wrong: &[&str]) -> Value {
        loop {
            let prompt = question["prompt_text"].as_str().expect("question without prompt");
            let en = fixtures::answer_for(prompt);
            let answer = if wrong.contains(&en) {
                "i do not know".to_string()
            } else {
                en.to_uppercase()
            };

            let response = self
                .server
                .post("/api/quiz/answer")
                .json(&json!({ "answer": answer }))
                .await;
            response.assert_status_ok();
            let body: Value = response.json();

            if body["finished"] == true {
                return body["report"].clone();
            }
            question = body["next"].clone();
        }
    }
}

/// Local stand-in for the hosted model.
pub struct ModelStub {
    pub base_url: String,
    calls: Arc<AtomicUsize>,
}

impl ModelStub {
    /// Serve `output_text` for every request.
    pub async fn replying(output_text: &str) -> Self {
        Self::spawn(StatusCode::OK, json!({ "output_text": output_text })).await
    }

    /// Answer every request with `status` and an error body.
    pub async fn failing(status: StatusCode) -> Self {
        Self::spawn(status, json!({ "error": { "message": "stub failure" } })).await
    }

    async fn spawn(status: StatusCode, body: Value) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let body = Arc::new(body);

        let router = Router::new().route(
            "/responses",
            post(move |Json(_request): Json<Value>| {
                let counter = counter.clone();
                let body = body.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (status, Json(body.as_ref().clone()))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind model stub");
        let addr = listener.local_addr().expect("Failed to read stub address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            calls,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
