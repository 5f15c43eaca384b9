//! Hosted OCR API recognition engine.
//!
//! Sends the image as base64 JSON to a remote OCR service with an API key.
//! Useful when no sidecar is deployed next to the service.

use super::{RecognizedLine, Recognizer, RecognizerInput};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub struct RemoteRecognizer {
    url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RemoteRecognizer {
    pub fn from_env(client: reqwest::Client) -> anyhow::Result<Self> {
        let url = std::env::var("OCR_API_URL")
            .map_err(|_| anyhow::anyhow!("OCR_API_URL not set"))?;
        let api_key = std::env::var("OCR_API_KEY")
            .map_err(|_| anyhow::anyhow!("OCR_API_KEY not set"))?;
        Ok(Self {
            url,
            api_key,
            client,
        })
    }
}

// ── Remote API request/response types ───────────────────────────────────────

#[derive(Serialize)]
struct RecognizeRequest {
    image_base64: String,
    languages: Vec<String>,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    lines: Vec<RecognizedLine>,
}

// ── Engine implementation ───────────────────────────────────────────────────

#[async_trait::async_trait]
impl Recognizer for RemoteRecognizer {
    fn name(&self) -> &str {
        "remote"
    }

    async fn recognize(&self, input: &RecognizerInput) -> anyhow::Result<Vec<RecognizedLine>> {
        let body = RecognizeRequest {
            image_base64: base64::engine::general_purpose::STANDARD.encode(&input.data),
            languages: vec!["ar".to_string(), "en".to_string()],
        };

        info!("RemoteRecognizer: calling OCR API for {}", input.filename);

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("OCR API error ({}): {}", status, text);
        }

        let raw_text = resp.text().await?;
        let preview: String = raw_text.chars().take(500).collect();
        debug!(
            "RemoteRecognizer: raw response ({} bytes): {}",
            raw_text.len(),
            preview
        );
        let parsed: RecognizeResponse = serde_json::from_str(&raw_text)?;

        Ok(parsed.lines)
    }
}
