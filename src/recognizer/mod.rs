//! Modular text-recognition engine abstraction.
//!
//! Defines the [`Recognizer`] trait and unified types so different engines
//! (EasyOCR sidecar, hosted OCR API) can be swapped via query parameter. The
//! engine is the service's only externally-latent dependency; everything
//! downstream of it is pure.

pub mod remote;
pub mod sidecar;

use serde::{Deserialize, Serialize};

/// One recognized text fragment with its location on the card.
///
/// The classifier reads only `text`; the box and confidence are carried so
/// clients and logs can see where a field came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizedLine {
    pub text: String,
    #[serde(default)]
    pub bbox: Vec<[f32; 2]>,
    #[serde(default)]
    pub confidence: f64,
}

/// Input to a recognition engine.
pub struct RecognizerInput {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Async trait implemented by each recognition backend.
#[async_trait::async_trait]
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &str;
    async fn recognize(&self, input: &RecognizerInput) -> anyhow::Result<Vec<RecognizedLine>>;
}

/// Known engine identifiers used for registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecognizerKind {
    Sidecar,
    Remote,
}

impl RecognizerKind {
    /// Parse the `?engine=` query-parameter string into an engine kind.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sidecar" => Some(Self::Sidecar),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!(RecognizerKind::from_str("sidecar"), Some(RecognizerKind::Sidecar));
        assert_eq!(RecognizerKind::from_str("remote"), Some(RecognizerKind::Remote));
        assert_eq!(RecognizerKind::from_str("tesseract"), None);
    }

    #[test]
    fn test_recognized_line_tolerates_text_only_payload() {
        let line: RecognizedLine = serde_json::from_str(r#"{"text": "ذكر"}"#).unwrap();
        assert_eq!(line.text, "ذكر");
        assert!(line.bbox.is_empty());
        assert_eq!(line.confidence, 0.0);
    }
}
