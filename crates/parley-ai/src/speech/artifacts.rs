//! Output file naming for synthesized clips.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Audio and viseme paths for one synthesis, sharing a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechArtifacts {
    pub audio_path: PathBuf,
    pub viseme_path: PathBuf,
}

impl SpeechArtifacts {
    pub fn timestamped(dir: &Path, now: NaiveDateTime) -> Self {
        let stamp = now.format(TIMESTAMP_FORMAT);
        Self {
            audio_path: dir.join(format!("tts_{stamp}.wav")),
            viseme_path: dir.join(format!("viseme_{stamp}.json")),
        }
    }

    /// Paths stamped with the current local time.
    pub fn now(dir: &Path) -> Self {
        Self::timestamped(dir, chrono::Local::now().naive_local())
    }
}
