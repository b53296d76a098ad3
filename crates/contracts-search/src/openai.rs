//! Embedding and chat completion over an OpenAI-compatible HTTP API.

use std::time::Duration;

use async_trait::async_trait;

use contracts_core::config::LlmSettings;

use crate::capability::{CapabilityError, Embedder, LanguageModel};

/// Client for any endpoint speaking the OpenAI `/embeddings` and
/// `/chat/completions` wire format.
pub struct OpenAiCompatClient {
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, CapabilityError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            chat_model: settings.chat_model.clone(),
            embedding_model: settings.embedding_model.clone(),
            temperature: settings.temperature,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, CapabilityError> {
        let mut request = self.client.post(self.endpoint(path)).json(body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Embedder for OpenAiCompatClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CapabilityError> {
        let body = serde_json::json!({
            "model": self.embedding_model,
            "input": text,
        });
        let response = self.post("embeddings", &body).await?;
        parse_embedding(&response)
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatClient {
    async fn complete(&self, prompt: &str) -> Result<String, CapabilityError> {
        let body = serde_json::json!({
            "model": self.chat_model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
        });
        let response = self.post("chat/completions", &body).await?;
        parse_completion(&response)
    }
}

fn parse_embedding(response: &serde_json::Value) -> Result<Vec<f32>, CapabilityError> {
    let values = response["data"][0]["embedding"]
        .as_array()
        .ok_or_else(|| CapabilityError::InvalidResponse("Missing embedding".to_string()))?;

    let embedding: Vec<f32> = values
        .iter()
        .filter_map(|v| v.as_f64())
        .map(|v| v as f32)
        .collect();

    if embedding.is_empty() || embedding.len() != values.len() {
        return Err(CapabilityError::InvalidResponse(
            "Embedding contains non-numeric or no values".to_string(),
        ));
    }
    Ok(embedding)
}

fn parse_completion(response: &serde_json::Value) -> Result<String, CapabilityError> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CapabilityError::InvalidResponse("Missing content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let settings = LlmSettings {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        let client = OpenAiCompatClient::from_settings(&settings).unwrap();
        assert_eq!(client.endpoint("embeddings"), "http://localhost:8080/v1/embeddings");
    }

    #[test]
    fn test_parse_embedding() {
        let response = json!({"data": [{"embedding": [0.25, -0.5, 1.0]}]});
        assert_eq!(parse_embedding(&response).unwrap(), vec![0.25, -0.5, 1.0]);
    }

    #[test]
    fn test_parse_embedding_rejects_missing_data() {
        let err = parse_embedding(&json!({"data": []})).unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidResponse(_)));

        let err = parse_embedding(&json!({"data": [{"embedding": [0.1, "x"]}]})).unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_completion() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "MATCH (a) RETURN a"}}]
        });
        assert_eq!(parse_completion(&response).unwrap(), "MATCH (a) RETURN a");
        assert!(parse_completion(&json!({"choices": []})).is_err());
    }
}
