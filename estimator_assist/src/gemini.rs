//! Generative Language REST client.
//!
//! Speaks `POST {endpoint}/models/{model}:generateContent` and implements
//! both [`TextBackend`] and [`ImageBackend`].

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat::{ChatMessage, Role, TextBackend};
use crate::errors::{AssistError, AssistResult};
use crate::image::{ImageBackend, ImagePayload};
use crate::settings::AssistSettings;

/// Client version sent in the User-Agent header
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Part {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GenerateResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// All text parts of the first candidate, joined
    fn text(&self) -> Option<String> {
        let text: String = self.first_parts().iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }

    /// First inline image of the first candidate
    fn inline_image(&self) -> Option<ImagePayload> {
        self.first_parts().iter().find_map(|p| {
            p.inline_data.as_ref().map(|d| ImagePayload {
                mime_type: d.mime_type.clone(),
                data: d.data.clone(),
            })
        })
    }
}

fn history_contents(history: &[ChatMessage]) -> Vec<Content> {
    history
        .iter()
        .map(|m| Content {
            role: Some(
                match m.role {
                    Role::User => "user",
                    Role::Model => "model",
                }
                .to_string(),
            ),
            parts: vec![Part::text(m.text.clone())],
        })
        .collect()
}

/// Map a non-success HTTP answer to an error.
fn error_from_status(status: u16, body: &str) -> AssistError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if envelope.error.status.is_empty() => envelope.error.message,
        Ok(envelope) => format!("{}: {}", envelope.error.status, envelope.error.message),
        Err(_) => body.trim().to_string(),
    };

    if status == 429 {
        AssistError::RateLimited { message }
    } else {
        AssistError::Api { status, message }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    chat_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Build a client from settings, reading the API key from the environment.
    pub fn from_settings(settings: &AssistSettings) -> AssistResult<Self> {
        let api_key = settings.api_key()?;
        GeminiClient::with_api_key(settings, api_key)
    }

    pub fn with_api_key(settings: &AssistSettings, api_key: impl Into<String>) -> AssistResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("Timberline/{}", CLIENT_VERSION))
            .timeout(settings.timeout())
            .build()
            .map_err(|e| AssistError::http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(GeminiClient {
            http,
            api_key: api_key.into(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            chat_model: settings.chat_model.clone(),
            image_model: settings.image_model.clone(),
        })
    }

    fn url_for(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }

    async fn generate_content(&self, model: &str, request: &GenerateRequest) -> AssistResult<GenerateResponse> {
        debug!(model, turns = request.contents.len(), "generateContent request");

        let response = self
            .http
            .post(self.url_for(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| AssistError::http(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| AssistError::http(format!("Failed to parse response: {}", e)))
    }
}

impl TextBackend for GeminiClient {
    fn complete(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
    ) -> impl Future<Output = AssistResult<String>> + Send {
        let request = GenerateRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(system_instruction)],
            }),
            contents: history_contents(history),
        };

        async move {
            let response = self.generate_content(&self.chat_model, &request).await?;
            response.text().ok_or_else(|| AssistError::EmptyResponse {
                model: self.chat_model.clone(),
            })
        }
    }
}

impl ImageBackend for GeminiClient {
    fn generate_image(&self, prompt: &str) -> impl Future<Output = AssistResult<Option<ImagePayload>>> + Send {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(prompt)],
            }],
        };

        async move {
            let response = self.generate_content(&self.image_model, &request).await?;
            Ok(response.inline_image())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text("be helpful")],
            }),
            contents: history_contents(&[ChatMessage::user("hi"), ChatMessage::model("hello")]),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be helpful");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][1]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_parse_text_response() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{ "candidates": [ { "content": { "role": "model",
                "parts": [ { "text": "Cedar resists " }, { "text": "rot." } ] } } ] }"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Cedar resists rot."));
        assert_eq!(response.inline_image(), None);
    }

    #[test]
    fn test_parse_image_response() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{ "candidates": [ { "content": { "parts": [
                { "text": "Here is your board." },
                { "inlineData": { "mimeType": "image/png", "data": "iVBOR" } } ] } } ] }"#,
        )
        .unwrap();
        assert_eq!(
            response.inline_image(),
            Some(ImagePayload {
                mime_type: "image/png".into(),
                data: "iVBOR".into()
            })
        );
    }

    #[test]
    fn test_empty_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.inline_image(), None);
    }

    #[test]
    fn test_error_mapping() {
        let quota = error_from_status(
            429,
            r#"{ "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" } }"#,
        );
        assert_eq!(
            quota,
            AssistError::RateLimited {
                message: "RESOURCE_EXHAUSTED: Quota exceeded".into()
            }
        );

        let bad = error_from_status(400, "plain text failure\n");
        assert_eq!(
            bad,
            AssistError::Api {
                status: 400,
                message: "plain text failure".into()
            }
        );
        assert!(!bad.is_rate_limit());
    }

    #[test]
    fn test_url_for_model() {
        let settings = AssistSettings {
            endpoint: "https://example.invalid/v1beta/".into(),
            ..AssistSettings::default()
        };
        let client = GeminiClient::with_api_key(&settings, "k").unwrap();
        assert_eq!(
            client.url_for("gemini-2.5-flash-image"),
            "https://example.invalid/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }
}
