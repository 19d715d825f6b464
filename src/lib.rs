//! # suno-dl
//!
//! Batch AI song generation and local archival library.
//!
//! Feed it a JSON batch specification (categories of prompt variations) and
//! it drives a third-party music-generation service through one blocking
//! request per variation, downloads every resulting track, and files audio
//! plus metadata/lyrics sidecars into a category-scoped folder layout with
//! collision-safe naming.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Sequential by contract** - One request at a time, paced between
//!   download batches; the service sets the tempo
//! - **Skip, don't abort** - A failed generation or download is logged and
//!   tallied; the batch always runs to completion
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use suno_dl::{BatchSpec, ClientConfig, Config, SongArchiver, SunoClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         client: ClientConfig::from_env()?, // reads SUNO_COOKIE
//!         ..Config::default()
//!     };
//!
//!     let client = SunoClient::new(config.client.clone())?;
//!     let archiver = SongArchiver::new(config, Arc::new(client));
//!
//!     let batch = BatchSpec::load("prompts/fortune.json")?;
//!     let summary = archiver.run(&batch).await?;
//!     println!("archived {} tracks", summary.tracks_archived);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Batch archival pipeline
pub mod archiver;
/// Batch specification loading
pub mod batch;
/// Remote generation service client
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Metadata tree modeling and sidecar serialization
pub mod metadata;
/// Collision-safe filename allocation
pub mod naming;
/// Download pacing between batches
pub mod pacing;
/// Core types
pub mod types;

// Re-export commonly used types
pub use archiver::SongArchiver;
pub use batch::{BatchSpec, Category, TagSpec, Variation};
pub use client::{GenerateRequest, SongService, SunoClient};
pub use config::{
    ArchiveConfig, ClientConfig, Config, GenerationConfig, GenerationMode, ModelVersion,
    PacingConfig, TagStrategy,
};
pub use error::{Error, Result};
pub use metadata::MetadataValue;
pub use pacing::DownloadPacer;
pub use types::{ArchivedTrack, RunSummary, Skip, Track, TrackInfo, TrackStatus};
