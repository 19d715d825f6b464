//! Remote generation service client
//!
//! The [`SongService`] trait is the seam between the archiver pipeline and
//! the third-party service: the pipeline only ever sees `generate` and
//! `download`. [`SunoClient`] is the production implementation; tests plug
//! in their own.
//!
//! The service's request/response schema is owned by the third party and is
//! treated as opaque beyond the fields declared on [`Track`].

use crate::config::{ClientConfig, GenerationMode};
use crate::error::{Error, Result};
use crate::types::{Track, TrackStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One generation request as the pipeline sees it
#[derive(Clone, Debug)]
pub struct GenerateRequest {
    /// Description or custom lyrics, depending on `mode`
    pub prompt: String,
    /// Desired style tags, already combined into one string
    pub tags: String,
    /// Song title to record with the request
    pub title: String,
    /// Whether `prompt` is a description or full custom lyrics
    pub mode: GenerationMode,
    /// Request an instrumental-only rendition
    pub make_instrumental: bool,
    /// Block until every resulting track reports its audio ready
    pub wait_audio: bool,
}

/// Pluggable generation/download backend
///
/// A single logical request may yield multiple track variants (the service
/// typically returns two per call). `generate` declares failure by
/// returning an error; the caller decides whether that aborts anything.
#[async_trait]
pub trait SongService: Send + Sync {
    /// Issue one generation request and return the resulting tracks
    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Track>>;

    /// Fetch a track's audio into `dest_dir` under the service-assigned
    /// name, returning the local path
    async fn download(&self, track: &Track, dest_dir: &Path) -> Result<PathBuf>;
}

/// Wire payload for the generate endpoint
#[derive(Debug, Serialize)]
struct GeneratePayload<'a> {
    mv: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    gpt_description_prompt: Option<&'a str>,
    tags: &'a str,
    title: &'a str,
    make_instrumental: bool,
    continue_clip_id: Option<&'a str>,
    continue_at: Option<u32>,
}

/// Response envelope of the generate endpoint
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    clips: Vec<Track>,
}

/// HTTP client for the Suno studio API
///
/// Authenticates with the session cookie from [`ClientConfig`] and pins the
/// configured model version on every request. No retries are attempted and
/// no timeout is enforced beyond reqwest's own.
pub struct SunoClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl SunoClient {
    /// Build a client from the given configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the cookie is empty or cannot be
    /// encoded as a header value.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.cookie.is_empty() {
            return Err(Error::config("session cookie is empty", "cookie"));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let cookie = reqwest::header::HeaderValue::from_str(&config.cookie)
            .map_err(|e| Error::config(format!("cookie is not a valid header: {e}"), "cookie"))?;
        headers.insert(reqwest::header::COOKIE, cookie);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    /// Fetch the current feed state of the given track ids
    async fn fetch_feed(&self, ids: &[String]) -> Result<Vec<Track>> {
        let url = format!("{}/api/feed/", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("ids", ids.join(","))])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Service {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }

    /// Poll the feed until every track reports its audio ready
    async fn wait_for_audio(&self, mut tracks: Vec<Track>) -> Result<Vec<Track>> {
        let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();

        loop {
            if let Some(failed) = tracks.iter().find(|t| t.status == TrackStatus::Error) {
                return Err(Error::Generation(format!(
                    "service reported error for track {}",
                    failed.id
                )));
            }
            if tracks
                .iter()
                .all(|t| t.status.is_ready() && !t.audio_url.is_empty())
            {
                return Ok(tracks);
            }

            tokio::time::sleep(self.config.poll_interval).await;
            tracks = self.fetch_feed(&ids).await?;
            tracing::debug!(
                ready = tracks.iter().filter(|t| t.status.is_ready()).count(),
                total = tracks.len(),
                "waiting for audio"
            );
        }
    }
}

#[async_trait]
impl SongService for SunoClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Track>> {
        // Description mode routes the prompt through the description field;
        // custom mode submits it as the literal lyrics.
        let payload = match request.mode {
            GenerationMode::Description => GeneratePayload {
                mv: self.config.model.as_str(),
                prompt: "",
                gpt_description_prompt: Some(&request.prompt),
                tags: &request.tags,
                title: &request.title,
                make_instrumental: request.make_instrumental,
                continue_clip_id: None,
                continue_at: None,
            },
            GenerationMode::CustomLyrics => GeneratePayload {
                mv: self.config.model.as_str(),
                prompt: &request.prompt,
                gpt_description_prompt: None,
                tags: &request.tags,
                title: &request.title,
                make_instrumental: request.make_instrumental,
                continue_clip_id: None,
                continue_at: None,
            },
        };

        let url = format!("{}/api/generate/v2/", self.config.base_url);
        let response = self.http.post(&url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Service {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: GenerateResponse = response.json().await?;
        if body.clips.is_empty() {
            return Err(Error::Generation(
                "service accepted the request but returned no tracks".to_string(),
            ));
        }

        if request.wait_audio {
            self.wait_for_audio(body.clips).await
        } else {
            Ok(body.clips)
        }
    }

    async fn download(&self, track: &Track, dest_dir: &Path) -> Result<PathBuf> {
        if track.audio_url.is_empty() {
            return Err(Error::Download {
                id: track.id.clone(),
                reason: "track has no audio URL".to_string(),
            });
        }

        let response = self.http.get(&track.audio_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Download {
                id: track.id.clone(),
                reason: format!("HTTP {status}"),
            });
        }

        let bytes = response.bytes().await?;
        let path = dest_dir.join(format!("{}.mp3", track.id));
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!(track_id = %track.id, path = %path.display(), "audio fetched");
        Ok(path)
    }
}
