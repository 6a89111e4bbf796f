//! Speech synthesis surface.
//!
//! The synthesizer itself is an external engine behind [`SpeechSynthesizer`].
//! This module prepares text for it, names its output files, and decodes the
//! viseme track it writes next to the audio.

mod artifacts;
mod text;
mod viseme;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

pub use artifacts::SpeechArtifacts;
pub use text::{prepare_for_speech, render_ssml};
pub use viseme::{VisemeFrame, VisemeTrack, VISEME_CHANNELS, VISEME_FRAME_RATE};

/// What a synthesizer reports for one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    Completed {
        audio_path: PathBuf,
        viseme_path: PathBuf,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed viseme data: {0}")]
    Malformed(String),

    #[error("synthesis failed: {0}")]
    SynthesisFailed(String),
}

/// Text-to-speech engine that writes an audio file and a viseme file.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> SynthesisOutcome;
}

/// A synthesized utterance with its decoded viseme track.
#[derive(Debug, Clone)]
pub struct SpeechClip {
    pub audio_path: PathBuf,
    pub visemes: VisemeTrack,
}

/// Synthesize `text` and load the resulting viseme track.
pub async fn speak(
    synthesizer: &dyn SpeechSynthesizer,
    text: &str,
) -> Result<SpeechClip, SpeechError> {
    match synthesizer.synthesize(text).await {
        SynthesisOutcome::Completed {
            audio_path,
            viseme_path,
        } => {
            let visemes = VisemeTrack::load(&viseme_path)?;
            debug!(
                audio = %audio_path.display(),
                frames = visemes.len(),
                "speech synthesized"
            );
            Ok(SpeechClip {
                audio_path,
                visemes,
            })
        }
        SynthesisOutcome::Failed { reason } => {
            warn!(%reason, "speech synthesis failed");
            Err(SpeechError::SynthesisFailed(reason))
        }
    }
}
