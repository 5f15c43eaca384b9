//! Classifier rule configuration.
//!
//! The filter-phrase set, the gender-marker exception, and the field-length
//! thresholds are deployment configuration, not code: a different card
//! template or script set ships a different JSON rules file. The built-in
//! default covers the Arabic/Latin card layout the service was written for.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Rules consumed by [`crate::classifier::classify`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierRules {
    /// Boilerplate substrings that suppress a digit-free line entirely.
    pub filter_phrases: Vec<String>,
    /// The one line of exactly `min_chars` characters that is kept anyway
    /// (the "male" gender marker on the shipped card layout).
    pub keep_exact: String,
    /// Digit count of a full identity number.
    #[serde(default = "default_id_digits")]
    pub id_digits: usize,
    /// Minimum digit count for a fragment to be treated as date-shaped.
    #[serde(default = "default_date_digits")]
    pub date_digits: usize,
    /// Minimum character count for a digit-free line to be a field candidate.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

fn default_id_digits() -> usize {
    18
}

fn default_date_digits() -> usize {
    8
}

fn default_min_chars() -> usize {
    3
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            filter_phrases: [
                "Rh:",
                "بطاقة",
                "الديمقراطية",
                "الجمهورية",
                "سلطة",
                "تاررخ",
                "التعريف",
                "اللقب",
                "بلدية",
                "تاريخ",
                ":",
                "الجنس",
                "ائرية",
                "الإسم",
                "مكان",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            keep_exact: "ذكر".to_string(),
            id_digits: default_id_digits(),
            date_digits: default_date_digits(),
            min_chars: default_min_chars(),
        }
    }
}

impl ClassifierRules {
    /// Load rules from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {:?}", path))?;
        let rules: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse rules file: {:?}", path))?;
        info!(
            "Loaded classifier rules from {:?} ({} filter phrases)",
            path,
            rules.filter_phrases.len()
        );
        Ok(rules)
    }

    /// Load from the `RULES_PATH` env var if set, otherwise the built-in
    /// default rule set.
    pub fn from_env() -> Result<Self> {
        match std::env::var("RULES_PATH") {
            Ok(path) => Self::load(Path::new(&path)),
            Err(_) => {
                info!("RULES_PATH not set, using built-in classifier rules");
                Ok(Self::default())
            }
        }
    }
}
