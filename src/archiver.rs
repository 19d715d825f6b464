//! Batch archival pipeline
//!
//! One linear pass over the batch: for each category, ensure its folder,
//! then for each variation issue the generation request(s), download every
//! resulting track, write its sidecars, and pace between download batches.
//!
//! Failure tiers: a failed generation call or a failed track archive is
//! logged, recorded as a skip, and the loop moves on — one bad item never
//! aborts the batch. Batch loading and folder creation failures propagate
//! and end the run.

use crate::batch::{BatchSpec, Variation};
use crate::client::{GenerateRequest, SongService};
use crate::config::{Config, TagStrategy};
use crate::error::Result;
use crate::metadata::to_sidecar_json;
use crate::naming::allocate_sidecar_paths;
use crate::pacing::DownloadPacer;
use crate::types::{ArchivedTrack, RunSummary, Skip, Track, TrackInfo};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Sequential batch-archival pipeline
///
/// Holds the run configuration and the injected [`SongService`]
/// implementation; one instance can execute any number of runs.
pub struct SongArchiver {
    config: Arc<Config>,
    service: Arc<dyn SongService>,
}

impl SongArchiver {
    /// Create an archiver over the given service
    pub fn new(config: Config, service: Arc<dyn SongService>) -> Self {
        Self {
            config: Arc::new(config),
            service,
        }
    }

    /// Execute a full batch run
    ///
    /// Processes categories and variations strictly in file order. Returns
    /// the aggregated [`RunSummary`]; the summary is produced (and the
    /// completion log emitted) regardless of how many per-item failures
    /// occurred along the way.
    ///
    /// # Errors
    ///
    /// Only fatal-tier failures surface here: category folder creation and
    /// other filesystem errors outside the per-item scope.
    pub async fn run(&self, batch: &BatchSpec) -> Result<RunSummary> {
        let mut summary = RunSummary {
            categories: batch.categories.len(),
            ..RunSummary::default()
        };
        let mut pacer = DownloadPacer::new(
            self.config.pacing.batch_size,
            self.config.pacing.batch_pause,
        );

        for category in &batch.categories {
            tracing::info!(category = %category.name, "generating songs for category");
            let category_dir = ensure_category_dir(self.config.base_dir(), &category.name).await?;

            for variation in &category.variations {
                self.process_variation(category, variation, &category_dir, &mut pacer, &mut summary)
                    .await;
            }
        }

        tracing::info!(
            categories = summary.categories,
            tracks_archived = summary.tracks_archived,
            skipped = summary.skips.len(),
            "batch run complete"
        );
        Ok(summary)
    }

    /// Generate and archive every track of one variation
    ///
    /// All failures below this point are per-item: they are recorded on the
    /// summary and processing continues.
    async fn process_variation(
        &self,
        category: &crate::batch::Category,
        variation: &Variation,
        category_dir: &Path,
        pacer: &mut DownloadPacer,
        summary: &mut RunSummary,
    ) {
        let title = variation.resolved_title(self.config.generation.tag_strategy);

        for (tag, request) in self.build_requests(variation, &title) {
            tracing::info!(prompt = %variation.prompt, tag = ?tag, "generating songs for prompt");

            let tracks = match self.service.generate(&request).await {
                Ok(tracks) => tracks,
                Err(e) => {
                    tracing::warn!(
                        prompt = %variation.prompt,
                        tag = ?tag,
                        error = %e,
                        "generation failed, skipping"
                    );
                    summary.skips.push(Skip {
                        category: category.name.clone(),
                        prompt: variation.prompt.clone(),
                        tag: tag.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            for (index, track) in tracks.iter().enumerate() {
                match self
                    .archive_track(track, category_dir, &title, index + 1)
                    .await
                {
                    Ok(archived) => {
                        tracing::info!(
                            track_id = %track.id,
                            path = %archived.audio_path.display(),
                            "song downloaded and archived"
                        );
                        summary.tracks_archived += 1;
                        pacer.pace().await;
                    }
                    Err(e) => {
                        tracing::warn!(
                            track_id = %track.id,
                            prompt = %variation.prompt,
                            error = %e,
                            "failed to archive track, skipping"
                        );
                        summary.skips.push(Skip {
                            category: category.name.clone(),
                            prompt: variation.prompt.clone(),
                            tag: tag.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }
    }

    /// Build the generation requests for one variation
    ///
    /// Combined strategy yields one request with all tags joined; per-tag
    /// yields one request per tag, each paired with its tag for skip
    /// reporting.
    fn build_requests(
        &self,
        variation: &Variation,
        title: &str,
    ) -> Vec<(Option<String>, GenerateRequest)> {
        let generation = &self.config.generation;
        let request = |tags: String| GenerateRequest {
            prompt: variation.prompt.clone(),
            tags,
            title: title.to_string(),
            mode: generation.mode,
            make_instrumental: generation.make_instrumental,
            wait_audio: true,
        };

        match generation.tag_strategy {
            TagStrategy::Combined => vec![(None, request(variation.tags.combined()))],
            TagStrategy::PerTag => variation
                .tags
                .list()
                .into_iter()
                .map(|tag| (Some(tag.to_string()), request(tag.to_string())))
                .collect(),
        }
    }

    /// Download one track and write its audio plus sidecars
    ///
    /// The sidecar set shares a single version suffix so the audio and its
    /// metadata/lyrics files stay paired across reruns. Write order: info
    /// sidecar, audio rename, lyrics sidecar; a failure anywhere leaves the
    /// track unarchived (it is never counted toward pacing).
    async fn archive_track(
        &self,
        track: &Track,
        category_dir: &Path,
        title: &str,
        index: usize,
    ) -> Result<ArchivedTrack> {
        let fetched = self.service.download(track, category_dir).await?;

        let base = format!("{title} - {index}");
        let paths = allocate_sidecar_paths(category_dir, &base)?;

        let info = TrackInfo::from_track(track);
        tokio::fs::write(&paths.info, to_sidecar_json(&info)?).await?;
        tracing::info!(path = %paths.info.display(), "song info saved");

        tokio::fs::rename(&fetched, &paths.audio).await?;

        let lyrics_path = if info.lyrics.is_empty() {
            None
        } else {
            tokio::fs::write(&paths.lyrics, &info.lyrics).await?;
            tracing::info!(path = %paths.lyrics.display(), "lyrics saved");
            Some(paths.lyrics)
        };

        Ok(ArchivedTrack {
            audio_path: paths.audio,
            info_path: paths.info,
            lyrics_path,
        })
    }
}

/// Ensure the output directory for a category exists
///
/// Idempotent: an already existing directory is fine; any other filesystem
/// failure propagates to the caller (fatal tier).
pub(crate) async fn ensure_category_dir(base: &Path, category: &str) -> Result<PathBuf> {
    let dir = base.join(category);
    tokio::fs::create_dir_all(&dir).await?;
    Ok(dir)
}
