use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::topics::BriefingConfig;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("API returned no content")]
    EmptyResponse,
}

/// How recent search results must be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recency {
    Day,
    Week,
    Month,
}

/// One system + user prompt pair with optional search filters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub system: String,
    pub user: String,
    pub domains: Vec<String>,
    pub recency: Option<Recency>,
}

/// Anything that can answer a [`SearchRequest`] with text.
#[async_trait]
pub trait SummaryService {
    async fn complete(&self, request: &SearchRequest) -> Result<String, ServiceError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "no_domains")]
    search_domain_filter: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    search_recency_filter: Option<Recency>,
}

fn no_domains(domains: &&[String]) -> bool {
    domains.is_empty()
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Perplexity's OpenAI-compatible chat completions endpoint.
pub struct PerplexityClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl PerplexityClient {
    pub fn new(api_key: String, config: &BriefingConfig) -> anyhow::Result<Self> {
        // Search-backed completions are slow; sections routinely take 20-40s
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn build_request<'a>(&'a self, request: &'a SearchRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &request.system,
                },
                Message {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: self.temperature,
            search_domain_filter: &request.domains,
            search_recency_filter: request.recency,
        }
    }
}

#[async_trait]
impl SummaryService for PerplexityClient {
    async fn complete(&self, request: &SearchRequest) -> Result<String, ServiceError> {
        tracing::debug!(
            model = %self.model,
            domains = request.domains.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat = response.json::<ChatResponse>().await?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ServiceError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PerplexityClient {
        let mut config = BriefingConfig::food_industry();
        config.base_url = "https://api.example.test/".to_string();
        PerplexityClient::new("key".to_string(), &config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(client().endpoint, "https://api.example.test/chat/completions");
    }

    #[test]
    fn test_request_body_with_filters() {
        let client = client();
        let request = SearchRequest {
            system: "sys".to_string(),
            user: "usr".to_string(),
            domains: vec!["ft.com".to_string(), "fda.gov".to_string()],
            recency: Some(Recency::Week),
        };

        let body = serde_json::to_value(client.build_request(&request)).unwrap();
        assert_eq!(body["model"], "sonar-pro");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "sys");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["search_domain_filter"][1], "fda.gov");
        assert_eq!(body["search_recency_filter"], "week");
    }

    #[test]
    fn test_request_body_without_filters() {
        let client = client();
        let request = SearchRequest {
            system: "sys".to_string(),
            user: "usr".to_string(),
            domains: Vec::new(),
            recency: None,
        };

        let body = serde_json::to_value(client.build_request(&request)).unwrap();
        assert!(body.get("search_domain_filter").is_none());
        assert!(body.get("search_recency_filter").is_none());
    }

    #[test]
    fn test_parse_chat_response() {
        let json = r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "- **A** b"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("- **A** b"));
    }

    #[test]
    fn test_service_error_messages() {
        let err = ServiceError::Api {
            status: 401,
            body: "invalid key".to_string(),
        };
        assert_eq!(err.to_string(), "API error (401): invalid key");
        assert_eq!(ServiceError::EmptyResponse.to_string(), "API returned no content");
    }
}
