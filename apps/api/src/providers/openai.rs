//! OpenAI adapter: chat completions with JSON-object response format.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{strip_json_fences, ModelProvider, ProviderError, ProviderRequest};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const PROVIDER_NAME: &str = "openai";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn call_once(&self, req: &ProviderRequest) -> Result<Value, ProviderError> {
        let body = json!({
            "model": self.model,
            "temperature": req.temperature,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": req.system_prompt},
                {"role": "user", "content": req.user_prompt},
            ],
        });

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&text).ok();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ProviderError::Auth(PROVIDER_NAME));
            }
            if status.as_u16() == 404
                || detail
                    .as_ref()
                    .and_then(|d| d.error.code.as_deref())
                    .is_some_and(|c| c == "model_not_found")
            {
                return Err(ProviderError::UnknownModel {
                    provider: PROVIDER_NAME,
                    model: self.model.clone(),
                });
            }
            return Err(ProviderError::Api {
                provider: PROVIDER_NAME,
                status: status.as_u16(),
                message: detail.map(|d| d.error.message).unwrap_or(text),
            });
        }

        let chat: ChatResponse = response.json().await?;
        let text = chat
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or(ProviderError::EmptyContent(PROVIDER_NAME))?;

        Ok(serde_json::from_str(strip_json_fences(text))?)
    }
}
