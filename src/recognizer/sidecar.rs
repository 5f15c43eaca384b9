//! EasyOCR sidecar recognition engine.
//!
//! The sidecar wraps the Python EasyOCR reader (loaded once with the
//! Arabic/Latin model pair) behind a small HTTP endpoint, so the expensive
//! model initialization lives in one process and this service stays thin.

use super::{RecognizedLine, Recognizer, RecognizerInput};
use serde::Deserialize;
use tracing::info;

/// Sidecar response (private deserialization types).
#[derive(Debug, Deserialize)]
struct SidecarResponse {
    lines: Vec<RecognizedLine>,
}

pub struct SidecarRecognizer {
    url: String,
    client: reqwest::Client,
}

impl SidecarRecognizer {
    pub fn new(client: reqwest::Client) -> Self {
        let url =
            std::env::var("SIDECAR_URL").unwrap_or_else(|_| "http://localhost:3001".to_string());
        Self { url, client }
    }
}

#[async_trait::async_trait]
impl Recognizer for SidecarRecognizer {
    fn name(&self) -> &str {
        "sidecar"
    }

    async fn recognize(&self, input: &RecognizerInput) -> anyhow::Result<Vec<RecognizedLine>> {
        use reqwest::multipart::{Form, Part};

        let part = Part::bytes(input.data.clone())
            .file_name(input.filename.clone())
            .mime_str("application/octet-stream")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/recognize", self.url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Recognition sidecar error ({}): {}", status, error_text);
        }

        let sidecar: SidecarResponse = response.json().await?;
        info!(
            "SidecarRecognizer: {} lines from {}",
            sidecar.lines.len(),
            input.filename
        );

        Ok(sidecar.lines)
    }
}
