//! Configuration types for suno-dl

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Environment variable holding the session cookie for the remote service
pub const COOKIE_ENV_VAR: &str = "SUNO_COOKIE";

/// Archive layout configuration (where downloaded songs land)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Base directory under which one folder per category is created
    /// (default: "./songs")
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
        }
    }
}

/// Download pacing configuration
///
/// After every `batch_size` successful downloads the whole pipeline pauses
/// for `batch_pause` to stay under the service's throttling radar. This is a
/// plain blocking delay, not adaptive throttling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Number of successful downloads between pauses (default: 8)
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,

    /// How long to pause once a batch completes (default: 30 seconds)
    #[serde(default = "default_batch_pause", with = "duration_serde")]
    pub batch_pause: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_pause: default_batch_pause(),
        }
    }
}

/// Generation request shaping
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Whether prompts are descriptions or custom lyrics
    #[serde(default)]
    pub mode: GenerationMode,

    /// How a variation's tags map onto generation requests
    #[serde(default)]
    pub tag_strategy: TagStrategy,

    /// Request instrumental-only renditions (no vocals)
    #[serde(default)]
    pub make_instrumental: bool,
}

/// How the prompt string is interpreted by the service
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// The prompt is a brief description of what the song should be about
    /// (default)
    #[default]
    Description,
    /// The prompt is the full custom lyrics of the song
    CustomLyrics,
}

/// How a variation's tag list maps onto generation requests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagStrategy {
    /// One request per variation with all tags combined (default)
    #[default]
    Combined,
    /// One request per tag within the variation
    PerTag,
}

/// Remote service client configuration
///
/// The session cookie authenticates against the third-party generation
/// service and is typically read from the environment via [`ClientConfig::from_env`]
/// rather than stored in a config file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Session cookie for the remote service
    #[serde(default)]
    pub cookie: String,

    /// Base URL of the service API (default: the public studio endpoint)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model version selector passed with every generation request
    #[serde(default)]
    pub model: ModelVersion,

    /// How often to poll the feed while waiting for audio (default: 5 seconds)
    #[serde(default = "default_poll_interval", with = "duration_serde")]
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cookie: String::new(),
            base_url: default_base_url(),
            model: ModelVersion::default(),
            poll_interval: default_poll_interval(),
        }
    }
}

impl ClientConfig {
    /// Build a client config from the environment
    ///
    /// Reads the session cookie from `SUNO_COOKIE`; all other fields take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the variable is unset or empty.
    pub fn from_env() -> crate::error::Result<Self> {
        let cookie = std::env::var(COOKIE_ENV_VAR).unwrap_or_default();
        if cookie.is_empty() {
            return Err(crate::error::Error::config(
                format!("{COOKIE_ENV_VAR} is not set"),
                "cookie",
            ));
        }
        Ok(Self {
            cookie,
            ..Self::default()
        })
    }
}

/// Model version selector for the generation service
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVersion {
    /// chirp-v3-0
    #[serde(rename = "chirp-v3-0")]
    ChirpV3_0,
    /// chirp-v3-5 (default)
    #[default]
    #[serde(rename = "chirp-v3-5")]
    ChirpV3_5,
}

impl ModelVersion {
    /// Wire identifier sent to the service
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVersion::ChirpV3_0 => "chirp-v3-0",
            ModelVersion::ChirpV3_5 => "chirp-v3-5",
        }
    }
}

impl std::fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main configuration for a batch run
///
/// Fields are organized into logical sub-configs:
/// - [`archive`](ArchiveConfig) — output directory layout
/// - [`pacing`](PacingConfig) — pause-between-batches behavior
/// - [`generation`](GenerationConfig) — request shaping
/// - [`client`](ClientConfig) — remote service endpoint and credentials
///
/// Sub-config fields are flattened for serialization, so the JSON/TOML
/// format stays flat (no nesting).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Output directory layout
    #[serde(flatten)]
    pub archive: ArchiveConfig,

    /// Pause-between-batches behavior
    #[serde(flatten)]
    pub pacing: PacingConfig,

    /// Generation request shaping
    #[serde(flatten)]
    pub generation: GenerationConfig,

    /// Remote service endpoint and credentials
    #[serde(flatten)]
    pub client: ClientConfig,
}

// Convenience accessors — delegate to the sub-config structs
impl Config {
    /// Base download directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.archive.base_dir
    }
}

// Default value functions
fn default_base_dir() -> PathBuf {
    PathBuf::from("songs")
}

fn default_batch_size() -> u64 {
    8
}

fn default_batch_pause() -> Duration {
    Duration::from_secs(30)
}

fn default_base_url() -> String {
    "https://studio-api.suno.ai".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

// Duration serialization helper (serializes as seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
