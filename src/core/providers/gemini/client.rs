//! Gemini client
//!
//! HTTP client for `generateContent` against Google AI Studio. The key is sent
//! in the `x-goog-api-key` header, never in the URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;
use tokio::time::timeout;
use tracing::debug;

use super::config::GeminiConfig;
use super::error::{GeminiErrorMapper, gemini_network_error, gemini_parse_error};
use super::models::{GenerateContentRequest, GenerateContentResponse, Part, is_image_model};
use crate::core::providers::ImageBackend;
use crate::utils::error::{Result, StudioError};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http_client: Client,
    headers: HeaderMap,
}

impl GeminiClient {
    /// Create a client. Fails with a configuration error when the key is
    /// missing or empty.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        config.validate()?;

        if !is_image_model(&config.model) {
            tracing::warn!(
                "Model {} is not known to return images; responses may be text only",
                config.model
            );
        }

        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| StudioError::configuration(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let http_client = builder
            .build()
            .map_err(|e| gemini_network_error(format!("Failed to create HTTP client: {}", e)))?;

        let headers = Self::build_headers(&config)?;

        Ok(Self {
            config,
            http_client,
            headers,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn build_headers(config: &GeminiConfig) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut key = HeaderValue::from_str(config.require_api_key()?)
            .map_err(|e| StudioError::configuration(format!("Invalid API key format: {}", e)))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        for (name, value) in &config.custom_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| StudioError::configuration(format!("Invalid header name: {}", e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| StudioError::configuration(format!("Invalid header value: {}", e)))?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    /// Send one `generateContent` request asking for image and text output
    pub async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let url = self.config.get_endpoint("generateContent");

        if self.config.debug {
            debug!("Gemini request URL: {}", url);
            debug!(
                "Gemini request carries {} part(s)",
                request.contents.iter().map(|c| c.parts.len()).sum::<usize>()
            );
        }

        let response = timeout(
            self.config.timeout(),
            self.http_client
                .post(&url)
                .headers(self.headers.clone())
                .json(request)
                .send(),
        )
        .await
        .map_err(|_| gemini_network_error("Request timed out"))?
        .map_err(|e| {
            if e.is_timeout() {
                gemini_network_error("Request timed out")
            } else {
                gemini_network_error(format!("Network error: {}", e))
            }
        })?;

        self.handle_response(response).await
    }

    async fn handle_response(&self, response: Response) -> Result<GenerateContentResponse> {
        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| gemini_network_error(format!("Failed to read response: {}", e)))?;

        if self.config.debug {
            debug!("Gemini response status: {}", status);
            debug!("Gemini response body: {} bytes", response_text.len());
        }

        if !status.is_success() {
            return Err(GeminiErrorMapper::from_http_status(
                status.as_u16(),
                &response_text,
            ));
        }

        let json_response: Value = serde_json::from_str(&response_text)
            .map_err(|e| gemini_parse_error(format!("Failed to parse response JSON: {}", e)))?;

        if json_response.get("error").is_some() {
            return Err(GeminiErrorMapper::from_api_response(&json_response));
        }

        serde_json::from_value(json_response)
            .map_err(|e| gemini_parse_error(format!("Unexpected response shape: {}", e)))
    }
}

#[async_trait]
impl ImageBackend for GeminiClient {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest::from_parts(parts);
        self.generate(&request).await
    }
}
