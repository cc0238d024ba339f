//! Gemini image generation over the `generateContent` REST endpoint.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use fleetseed_generate::{GeneratedImage, MediaError, MediaProvider};

use crate::options::GeminiOptions;

/// Media provider that asks a Gemini model for an inline image.
pub struct GeminiMedia {
    client: Client,
    options: GeminiOptions,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GeminiMedia {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(options: GeminiOptions) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self { client, options })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.options.base_url.trim_end_matches('/'),
            self.options.model
        )
    }
}

#[async_trait]
impl MediaProvider for GeminiMedia {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, MediaError> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": self.options.instruction },
                    { "text": prompt },
                ]
            }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] },
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.options.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|err| MediaError::Transport(err.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| MediaError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(MediaError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let decoded: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|err| MediaError::Decode(format!("invalid response JSON: {err}")))?;
        extract_image(decoded)
    }
}

/// Pull the first inline `image/*` part out of the first candidate.
pub(crate) fn extract_image(
    response: GenerateContentResponse,
) -> Result<GeneratedImage, MediaError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(MediaError::NoCandidates)?;
    let content = candidate.content.ok_or(MediaError::NoContent)?;
    let inline = content
        .parts
        .into_iter()
        .filter_map(|part| part.inline_data)
        .find(|inline| inline.mime_type.starts_with("image/"))
        .ok_or(MediaError::NoImagePart)?;

    let bytes = STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|err| MediaError::Decode(err.to_string()))?;
    Ok(GeneratedImage {
        bytes,
        mime_type: inline.mime_type,
    })
}
