//! Mock Gemini server
//!
//! Wraps a wiremock server that answers `POST /v1beta/models/{model}:generateContent`.

use photo_studio::core::providers::gemini::{GeminiClient, GeminiConfig};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-gemini-key";
pub const TEST_MODEL: &str = "gemini-2.5-flash-image-preview";

pub struct MockGemini {
    pub server: MockServer,
}

impl MockGemini {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn endpoint_path() -> String {
        format!("/v1beta/models/{}:generateContent", TEST_MODEL)
    }

    pub fn config(&self) -> GeminiConfig {
        GeminiConfig::builder(TEST_API_KEY)
            .with_base_url(self.server.uri())
            .with_model(TEST_MODEL)
            .with_timeout(10)
            .with_connect_timeout(2)
            .build()
            .expect("valid test config")
    }

    pub fn client(&self) -> GeminiClient {
        GeminiClient::new(self.config()).expect("client builds")
    }

    /// Answer every authenticated request with `status` and `body`
    pub async fn respond_with(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint_path()))
            .and(header("x-goog-api-key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request the server received
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| serde_json::from_slice(&request.body).expect("JSON request body"))
            .collect()
    }
}

/// Response with the given parts in the first candidate
pub fn candidate_response(parts: Vec<Value>) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": parts},
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 1290,
            "candidatesTokenCount": 1290,
            "totalTokenCount": 2580
        },
        "modelVersion": TEST_MODEL
    })
}

pub fn image_part(mime_type: &str, data: &str) -> Value {
    json!({"inlineData": {"mimeType": mime_type, "data": data}})
}

pub fn text_part(text: &str) -> Value {
    json!({"text": text})
}

pub fn error_body(code: u16, message: &str, status: &str) -> Value {
    json!({"error": {"code": code, "message": message, "status": status}})
}
