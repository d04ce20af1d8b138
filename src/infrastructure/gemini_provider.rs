// Gemini generateContent client implementing the forecast capability
use crate::application::forecast_provider::ForecastProvider;
use crate::domain::error::ForecastError;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(base_url: String, api_key: String, model: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            urlencoding::encode(&self.model)
        )
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ForecastError {
        if e.is_timeout() {
            ForecastError::external(format!("Gemini request timed out: {}", e))
        } else if e.is_connect() {
            ForecastError::external(format!("Cannot reach Gemini at {}: {}", self.base_url, e))
        } else {
            ForecastError::external(format!("Gemini request failed: {}", e))
        }
    }
}

/// Concatenated text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> Result<String, ForecastError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ForecastError::external("Gemini returned no candidate text"));
    }
    Ok(text)
}

#[async_trait]
impl ForecastProvider for GeminiProvider {
    async fn generate(
        &self,
        prompt: &str,
        response_schema: &serde_json::Value,
    ) -> Result<String, ForecastError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ForecastError::external(format!(
                "Gemini request failed with status {}: {}",
                status, body
            )));
        }

        let data = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ForecastError::external(format!("Failed to parse Gemini response: {}", e)))?;

        let text = extract_text(data)?;
        tracing::debug!(model = %self.model, response_len = text.len(), "Gemini response received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    async fn spawn_fake_gemini(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn provider(base_url: String) -> GeminiProvider {
        GeminiProvider::new(
            base_url,
            "test-key".to_string(),
            "gemini-3-flash-preview".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint() {
        let p = provider("https://example.test/".to_string());
        assert_eq!(
            p.endpoint(),
            "https://example.test/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "{\"a\":" }, { "text": "1}" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_text_rejects_empty() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(matches!(
            extract_text(response),
            Err(ForecastError::ExternalService(_))
        ));

        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [ { "finishReason": "SAFETY" } ] })).unwrap();
        assert!(extract_text(response).is_err());
    }

    #[tokio::test]
    async fn test_generate_sends_schema_and_key() {
        let router = Router::new().route(
            "/v1beta/models/:model",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let key = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let config = &body["generationConfig"];
                let echo = json!({
                    "key": key,
                    "mime": config["responseMimeType"],
                    "required": config["responseSchema"]["required"],
                    "prompt": body["contents"][0]["parts"][0]["text"],
                });
                Json(json!({
                    "candidates": [ { "content": { "parts": [ { "text": echo.to_string() } ] } } ]
                }))
            }),
        );
        let base_url = spawn_fake_gemini(router).await;

        let schema = json!({ "type": "OBJECT", "required": ["forecasts"] });
        let text = provider(base_url).generate("forecast please", &schema).await.unwrap();
        let echo: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(echo["key"], "test-key");
        assert_eq!(echo["mime"], "application/json");
        assert_eq!(echo["required"], json!(["forecasts"]));
        assert_eq!(echo["prompt"], "forecast please");
    }

    #[tokio::test]
    async fn test_non_success_status_is_external_error() {
        let router = Router::new().route(
            "/v1beta/models/:model",
            post(|| async { (StatusCode::FORBIDDEN, "API key not valid") }),
        );
        let base_url = spawn_fake_gemini(router).await;

        let err = provider(base_url).generate("p", &json!({})).await.unwrap_err();
        match err {
            ForecastError::ExternalService(msg) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_external_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(format!("http://{}", addr))
            .generate("p", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::ExternalService(_)));
    }
}
