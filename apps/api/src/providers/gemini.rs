//! Gemini adapter: generateContent with JSON response MIME type.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{strip_json_fences, ModelProvider, ProviderError, ProviderRequest};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const PROVIDER_NAME: &str = "gemini";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn call_once(&self, req: &ProviderRequest) -> Result<Value, ProviderError> {
        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);
        let body = json!({
            "systemInstruction": {"parts": [{"text": req.system_prompt}]},
            "contents": [{"role": "user", "parts": [{"text": req.user_prompt}]}],
            "generationConfig": {
                "temperature": req.temperature,
                "responseMimeType": "application/json",
            },
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            if status.as_u16() == 401
                || status.as_u16() == 403
                || message.contains("API key not valid")
            {
                return Err(ProviderError::Auth(PROVIDER_NAME));
            }
            if status.as_u16() == 404 {
                return Err(ProviderError::UnknownModel {
                    provider: PROVIDER_NAME,
                    model: self.model.clone(),
                });
            }
            return Err(ProviderError::Api {
                provider: PROVIDER_NAME,
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateResponse = response.json().await?;
        let text = generated
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.as_deref())
            .ok_or(ProviderError::EmptyContent(PROVIDER_NAME))?;

        Ok(serde_json::from_str(strip_json_fences(text))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_response_deserializes() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"score\": 75}"}]}}
            ]
        }"#;
        let resp: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.candidates[0].content.parts[0].text.as_deref(),
            Some("{\"score\": 75}")
        );
    }

    #[test]
    fn test_empty_candidates_tolerated() {
        let resp: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.candidates.is_empty());
    }

    #[test]
    fn test_api_error_body() {
        let json = r#"{"error": {"message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert!(body.error.message.contains("API key not valid"));
    }
}
