//! Batch specification loading
//!
//! A batch file is a JSON array of categories, each holding an ordered list
//! of prompt variations:
//!
//! ```json
//! [
//!   {
//!     "category": "love",
//!     "variations": [
//!       { "prompt": "A happy song", "tags": "pop", "title": "Joy" },
//!       { "prompt": "A sad song", "tags": ["blues", "slow"] }
//!     ]
//!   }
//! ]
//! ```
//!
//! The whole file is parsed before any processing starts; there is no
//! partial-batch recovery.

use crate::config::TagStrategy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A full batch specification: the ordered list of categories for one run
///
/// Loaded once, immutable, source of truth for the run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchSpec {
    /// Categories in file order
    pub categories: Vec<Category>,
}

impl BatchSpec {
    /// Load and fully parse a batch file
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBatch`] if the file is missing, unreadable,
    /// or not valid JSON for the expected schema. These are fatal: a run
    /// never starts from a partially-parsed batch.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidBatch(format!("cannot read '{}': {}", path.display(), e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::InvalidBatch(format!("cannot parse '{}': {}", path.display(), e)))
    }

    /// Total number of variations across all categories
    pub fn variation_count(&self) -> usize {
        self.categories.iter().map(|c| c.variations.len()).sum()
    }
}

/// A named grouping of variations sharing one output folder
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    /// Category name; maps 1:1 to an output directory of the same name
    #[serde(rename = "category")]
    pub name: String,

    /// Variations in file order
    pub variations: Vec<Variation>,
}

/// One concrete (prompt, tags, title) combination to submit for generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Variation {
    /// Description or custom lyrics, depending on the generation mode
    pub prompt: String,

    /// Desired style tags, as a single string or an ordered list
    pub tags: TagSpec,

    /// Song title; when absent a default is derived from the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Variation {
    /// Resolve the effective title for this variation
    ///
    /// An explicit title always wins. Otherwise the prompt is used, except
    /// in the per-tag flow where the first tag is appended so sibling
    /// requests stay distinguishable on disk.
    pub fn resolved_title(&self, strategy: TagStrategy) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        match (strategy, self.tags.first()) {
            (TagStrategy::PerTag, Some(tag)) => format!("{} - {}", self.prompt, tag),
            _ => self.prompt.clone(),
        }
    }
}

/// Style tags for a variation: a single string or an ordered list of strings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagSpec {
    /// A single tag string, possibly comma-separated free text
    One(String),
    /// An explicit ordered list of tags
    Many(Vec<String>),
}

impl TagSpec {
    /// All tags combined into the single string the service expects
    pub fn combined(&self) -> String {
        match self {
            TagSpec::One(s) => s.clone(),
            TagSpec::Many(list) => list.join(", "),
        }
    }

    /// The individual tags, one slice element each
    pub fn list(&self) -> Vec<&str> {
        match self {
            TagSpec::One(s) => vec![s.as_str()],
            TagSpec::Many(list) => list.iter().map(String::as_str).collect(),
        }
    }

    /// The first tag, if any
    pub fn first(&self) -> Option<&str> {
        match self {
            TagSpec::One(s) => (!s.is_empty()).then_some(s.as_str()),
            TagSpec::Many(list) => list.first().map(String::as_str),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE_BATCH: &str = r#"[
        {
            "category": "love",
            "variations": [
                { "prompt": "A happy song", "tags": "pop", "title": "Joy" },
                { "prompt": "A sad song", "tags": ["blues", "slow"] }
            ]
        },
        {
            "category": "fortune",
            "variations": [
                { "prompt": "Песня об удаче", "tags": ["folk"] }
            ]
        }
    ]"#;

    #[test]
    fn load_parses_categories_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("batch.json");
        fs::write(&path, SAMPLE_BATCH).unwrap();

        let batch = BatchSpec::load(&path).unwrap();
        assert_eq!(batch.categories.len(), 2);
        assert_eq!(batch.categories[0].name, "love");
        assert_eq!(batch.categories[1].name, "fortune");
        assert_eq!(batch.variation_count(), 3);

        let first = &batch.categories[0].variations[0];
        assert_eq!(first.prompt, "A happy song");
        assert_eq!(first.title.as_deref(), Some("Joy"));
        assert_eq!(first.tags.combined(), "pop");
    }

    #[test]
    fn tags_accept_string_or_list() {
        let one: TagSpec = serde_json::from_str(r#""pop, upbeat""#).unwrap();
        assert_eq!(one.combined(), "pop, upbeat");
        assert_eq!(one.list(), vec!["pop, upbeat"]);

        let many: TagSpec = serde_json::from_str(r#"["blues", "slow"]"#).unwrap();
        assert_eq!(many.combined(), "blues, slow");
        assert_eq!(many.list(), vec!["blues", "slow"]);
        assert_eq!(many.first(), Some("blues"));
    }

    #[test]
    fn load_missing_file_is_fatal() {
        let result = BatchSpec::load("/nonexistent/batch.json");
        assert!(matches!(result, Err(crate::error::Error::InvalidBatch(_))));
    }

    #[test]
    fn load_malformed_json_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let result = BatchSpec::load(&path);
        assert!(matches!(result, Err(crate::error::Error::InvalidBatch(_))));
    }

    #[test]
    fn title_defaults_to_prompt_or_prompt_plus_first_tag() {
        let variation = Variation {
            prompt: "A sad song".to_string(),
            tags: TagSpec::Many(vec!["blues".to_string(), "slow".to_string()]),
            title: None,
        };
        assert_eq!(
            variation.resolved_title(TagStrategy::Combined),
            "A sad song"
        );
        assert_eq!(
            variation.resolved_title(TagStrategy::PerTag),
            "A sad song - blues"
        );

        let titled = Variation {
            title: Some("Melancholy".to_string()),
            ..variation
        };
        assert_eq!(titled.resolved_title(TagStrategy::PerTag), "Melancholy");
    }
}
