//! Collision-safe filename allocation
//!
//! Archived files are named `"{title} - {index}.{ext}"`; when that name is
//! taken, an incrementing ` - V{n}` suffix is appended until a free name is
//! found. The scan re-checks existence before every increment, but is not
//! safe against a second process writing into the same folder — intended
//! single-operator use.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Maximum number of version suffixes tried before giving up
const MAX_VERSION_ATTEMPTS: u32 = 9999;

/// Find a collision-free path for `base.ext` inside `dir`
///
/// Returns `dir/base.ext` if it does not exist, otherwise the first free
/// `dir/base - V{n}.ext` with `n` counting up from 1.
///
/// # Examples
///
/// ```no_run
/// use suno_dl::naming::unique_path;
/// use std::path::Path;
///
/// let path = unique_path(Path::new("songs/love"), "Joy - 1", "mp3").unwrap();
/// // "songs/love/Joy - 1.mp3", or "songs/love/Joy - 1 - V1.mp3" if taken
/// ```
///
/// # Errors
///
/// Returns [`Error::FileCollision`] if no free name is found within the
/// attempt cap.
pub fn unique_path(dir: &Path, base: &str, ext: &str) -> Result<PathBuf> {
    let candidate = dir.join(format!("{base}.{ext}"));
    if !candidate.exists() {
        return Ok(candidate);
    }

    for version in 1..=MAX_VERSION_ATTEMPTS {
        let candidate = dir.join(format!("{base} - V{version}.{ext}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(Error::FileCollision {
        path: dir.join(format!("{base}.{ext}")),
        reason: format!("no free name within {MAX_VERSION_ATTEMPTS} attempts"),
    })
}

/// The three sidecar-set paths for one archived track
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidecarPaths {
    /// Destination for the audio file (`.mp3`)
    pub audio: PathBuf,
    /// Destination for the metadata sidecar (`.json`)
    pub info: PathBuf,
    /// Destination for the lyrics sidecar (`.txt`)
    pub lyrics: PathBuf,
}

/// Allocate a consistent set of sidecar paths for `base` inside `dir`
///
/// All three extensions share one version suffix: the smallest version for
/// which none of `base[ - V{n}].{mp3,json,txt}` exists. This keeps an audio
/// file and its sidecars paired on reruns, instead of each extension
/// drifting to its own version.
///
/// # Errors
///
/// Returns [`Error::FileCollision`] if no shared free version is found
/// within the attempt cap.
pub fn allocate_sidecar_paths(dir: &Path, base: &str) -> Result<SidecarPaths> {
    const EXTENSIONS: [&str; 3] = ["mp3", "json", "txt"];

    let set_for = |suffix: &str| SidecarPaths {
        audio: dir.join(format!("{base}{suffix}.mp3")),
        info: dir.join(format!("{base}{suffix}.json")),
        lyrics: dir.join(format!("{base}{suffix}.txt")),
    };
    let free = |suffix: &str| {
        EXTENSIONS
            .iter()
            .all(|ext| !dir.join(format!("{base}{suffix}.{ext}")).exists())
    };

    if free("") {
        return Ok(set_for(""));
    }
    for version in 1..=MAX_VERSION_ATTEMPTS {
        let suffix = format!(" - V{version}");
        if free(&suffix) {
            return Ok(set_for(&suffix));
        }
    }

    Err(Error::FileCollision {
        path: dir.join(format!("{base}.mp3")),
        reason: format!("no free sidecar set within {MAX_VERSION_ATTEMPTS} attempts"),
    })
}
