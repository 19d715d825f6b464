//! End-to-end pipeline tests against a scripted fake service
//!
//! These exercise the full run: category folders, generation, download,
//! naming, sidecar writing, pacing, and skip-and-continue error handling —
//! without touching the real service.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use suno_dl::{
    BatchSpec, Config, Error, GenerateRequest, Result, SongArchiver, SongService, Track,
};
use tempfile::TempDir;

/// Scripted stand-in for the remote service
///
/// Each generate call yields two tracks; the first carries lyrics, the
/// second does not (mirrors the real service, which frequently returns one
/// vocal and one alternate take). Prompts and track ids can be marked as
/// failing.
struct FakeService {
    next_id: AtomicUsize,
    failing_prompts: HashSet<String>,
    failing_downloads: HashSet<String>,
}

impl FakeService {
    fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(1),
            failing_prompts: HashSet::new(),
            failing_downloads: HashSet::new(),
        }
    }

    fn failing_prompt(mut self, prompt: &str) -> Self {
        self.failing_prompts.insert(prompt.to_string());
        self
    }

    fn failing_download(mut self, track_id: &str) -> Self {
        self.failing_downloads.insert(track_id.to_string());
        self
    }
}

#[async_trait]
impl SongService for FakeService {
    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Track>> {
        if self.failing_prompts.contains(&request.prompt) {
            return Err(Error::Generation("scripted failure".to_string()));
        }

        let make_track = |n: usize, lyrics: &str| -> Track {
            serde_json::from_value(serde_json::json!({
                "id": format!("track-{n}"),
                "title": request.title,
                "status": "complete",
                "audio_url": format!("http://cdn.example/track-{n}.mp3"),
                "video_url": format!("http://cdn.example/track-{n}.mp4"),
                "image_large_url": format!("http://cdn.example/track-{n}.jpeg"),
                "user_id": "user-1",
                "metadata": {"prompt": lyrics, "tags": request.tags}
            }))
            .unwrap()
        };

        let first = self.next_id.fetch_add(2, Ordering::SeqCst);
        Ok(vec![
            make_track(first, &format!("first verse of {}\nsecond verse", request.title)),
            make_track(first + 1, ""),
        ])
    }

    async fn download(&self, track: &Track, dest_dir: &Path) -> Result<PathBuf> {
        if self.failing_downloads.contains(&track.id) {
            return Err(Error::Download {
                id: track.id.clone(),
                reason: "scripted failure".to_string(),
            });
        }
        let path = dest_dir.join(format!("{}.mp3", track.id));
        tokio::fs::write(&path, b"ID3fakeaudio").await?;
        Ok(path)
    }
}

fn batch_from_json(json: &str) -> BatchSpec {
    serde_json::from_str(json).unwrap()
}

fn archiver(base_dir: &Path, service: FakeService) -> SongArchiver {
    let mut config = Config::default();
    config.archive.base_dir = base_dir.to_path_buf();
    // Keep test runs fast; pacing behavior itself is covered in unit tests
    config.pacing.batch_pause = std::time::Duration::from_millis(0);
    SongArchiver::new(config, Arc::new(service))
}

#[tokio::test]
async fn single_variation_archives_both_tracks_with_sidecars() {
    let base = TempDir::new().unwrap();
    let batch = batch_from_json(
        r#"[{
            "category": "love",
            "variations": [
                { "prompt": "A happy song", "tags": "pop", "title": "Joy" }
            ]
        }]"#,
    );

    let summary = archiver(base.path(), FakeService::new())
        .run(&batch)
        .await
        .unwrap();

    assert!(summary.is_clean());
    assert_eq!(summary.tracks_archived, 2);

    let dir = base.path().join("love");
    assert!(dir.join("Joy - 1.mp3").is_file());
    assert!(dir.join("Joy - 2.mp3").is_file());
    assert!(dir.join("Joy - 1.json").is_file());
    assert!(dir.join("Joy - 2.json").is_file());

    // Lyrics sidecar only for the track whose metadata carries lyrics
    assert!(dir.join("Joy - 1.txt").is_file());
    assert!(!dir.join("Joy - 2.txt").exists());

    let lyrics = std::fs::read_to_string(dir.join("Joy - 1.txt")).unwrap();
    assert_eq!(lyrics, "first verse of Joy\nsecond verse");

    // The original service-named download must have been renamed away
    assert!(!dir.join("track-1.mp3").exists());
}

#[tokio::test]
async fn sidecar_json_has_expected_fields_and_verbatim_unicode() {
    let base = TempDir::new().unwrap();
    let batch = batch_from_json(
        r#"[{
            "category": "amor",
            "variations": [
                { "prompt": "Una canción alegre", "tags": "pop", "title": "Canción de Amor" }
            ]
        }]"#,
    );

    archiver(base.path(), FakeService::new())
        .run(&batch)
        .await
        .unwrap();

    let info_path = base.path().join("amor").join("Canción de Amor - 1.json");
    let raw = std::fs::read_to_string(&info_path).unwrap();
    assert!(raw.contains("Canción de Amor"), "non-ASCII must be verbatim");
    assert!(!raw.contains("\\u"), "no unicode escapes expected");

    let info: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(info["id"], "track-1");
    assert_eq!(info["title"], "Canción de Amor");
    assert_eq!(info["user_id"], "user-1");
    assert_eq!(info["metadata"]["tags"], "pop");
    assert_eq!(
        info["lyrics"],
        "first verse of Canción de Amor\nsecond verse"
    );
}

#[tokio::test]
async fn failed_generation_skips_variation_and_run_completes() {
    let base = TempDir::new().unwrap();
    let batch = batch_from_json(
        r#"[{
            "category": "mixed",
            "variations": [
                { "prompt": "doomed prompt", "tags": "pop", "title": "Doomed" },
                { "prompt": "fine prompt", "tags": "pop", "title": "Fine" }
            ]
        }]"#,
    );

    let summary = archiver(base.path(), FakeService::new().failing_prompt("doomed prompt"))
        .run(&batch)
        .await
        .unwrap();

    // The failing variation produced zero output files
    let dir = base.path().join("mixed");
    assert!(!dir.join("Doomed - 1.mp3").exists());
    assert!(!dir.join("Doomed - 1.json").exists());

    // Processing continued and the run reached its summary
    assert_eq!(summary.tracks_archived, 2);
    assert!(dir.join("Fine - 1.mp3").is_file());

    assert_eq!(summary.skips.len(), 1);
    let skip = &summary.skips[0];
    assert_eq!(skip.category, "mixed");
    assert_eq!(skip.prompt, "doomed prompt");
    assert!(skip.reason.contains("scripted failure"));
}

#[tokio::test]
async fn failed_download_skips_track_but_not_its_siblings() {
    let base = TempDir::new().unwrap();
    let batch = batch_from_json(
        r#"[{
            "category": "love",
            "variations": [
                { "prompt": "A happy song", "tags": "pop", "title": "Joy" }
            ]
        }]"#,
    );

    // track-1 fails to download; its sibling track-2 must still archive
    let summary = archiver(base.path(), FakeService::new().failing_download("track-1"))
        .run(&batch)
        .await
        .unwrap();

    assert_eq!(summary.tracks_archived, 1);
    assert_eq!(summary.skips.len(), 1);

    let dir = base.path().join("love");
    // The surviving sibling keeps its own index
    assert!(dir.join("Joy - 2.mp3").is_file());
    assert!(!dir.join("Joy - 1.mp3").exists());
    assert!(!dir.join("Joy - 1.json").exists());
}

#[tokio::test]
async fn rerun_into_same_folder_versions_whole_sidecar_sets() {
    let base = TempDir::new().unwrap();
    let batch = batch_from_json(
        r#"[{
            "category": "love",
            "variations": [
                { "prompt": "A happy song", "tags": "pop", "title": "Joy" }
            ]
        }]"#,
    );

    let runner = archiver(base.path(), FakeService::new());
    runner.run(&batch).await.unwrap();
    runner.run(&batch).await.unwrap();

    let dir = base.path().join("love");
    for name in [
        "Joy - 1.mp3",
        "Joy - 1.json",
        "Joy - 1.txt",
        "Joy - 1 - V1.mp3",
        "Joy - 1 - V1.json",
        "Joy - 1 - V1.txt",
        "Joy - 2.mp3",
        "Joy - 2 - V1.mp3",
    ] {
        assert!(dir.join(name).is_file(), "expected {name} to exist");
    }
}

#[tokio::test]
async fn multiple_categories_get_their_own_folders() {
    let base = TempDir::new().unwrap();
    let batch = batch_from_json(
        r#"[
            {
                "category": "love",
                "variations": [{ "prompt": "warm", "tags": "pop", "title": "Warm" }]
            },
            {
                "category": "fortune",
                "variations": [{ "prompt": "lucky", "tags": ["folk", "upbeat"], "title": "Lucky" }]
            }
        ]"#,
    );

    let summary = archiver(base.path(), FakeService::new())
        .run(&batch)
        .await
        .unwrap();

    assert_eq!(summary.categories, 2);
    assert_eq!(summary.tracks_archived, 4);
    assert!(base.path().join("love").join("Warm - 1.mp3").is_file());
    assert!(base.path().join("fortune").join("Lucky - 1.mp3").is_file());
}

#[tokio::test]
async fn untitled_variation_falls_back_to_prompt_for_filenames() {
    let base = TempDir::new().unwrap();
    let batch = batch_from_json(
        r#"[{
            "category": "love",
            "variations": [{ "prompt": "A quiet song", "tags": "ambient" }]
        }]"#,
    );

    archiver(base.path(), FakeService::new())
        .run(&batch)
        .await
        .unwrap();

    let dir = base.path().join("love");
    assert!(dir.join("A quiet song - 1.mp3").is_file());
    assert!(dir.join("A quiet song - 2.mp3").is_file());
}
