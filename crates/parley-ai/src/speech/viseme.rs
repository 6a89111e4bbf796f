//! Viseme key-frame tracks produced alongside synthesized audio.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::SpeechError;

/// Blend-shape channels per frame.
pub const VISEME_CHANNELS: usize = 55;

/// Key frames per second of audio.
pub const VISEME_FRAME_RATE: f32 = 60.0;

pub type VisemeFrame = [f32; VISEME_CHANNELS];

#[derive(Debug, Deserialize)]
struct Chunk {
    #[serde(rename = "BlendShapes", default)]
    blend_shapes: Vec<Vec<f32>>,
}

/// Ordered viseme frames, concatenated across synthesizer chunks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisemeTrack {
    frames: Vec<VisemeFrame>,
}

impl VisemeTrack {
    pub fn from_json(source: &str) -> Result<Self, SpeechError> {
        let chunks: Vec<Chunk> =
            serde_json::from_str(source).map_err(|e| SpeechError::Malformed(e.to_string()))?;

        let mut frames = Vec::with_capacity(chunks.iter().map(|c| c.blend_shapes.len()).sum());
        for chunk in chunks {
            for ratios in chunk.blend_shapes {
                let index = frames.len();
                let frame: VisemeFrame = ratios.try_into().map_err(|r: Vec<f32>| {
                    SpeechError::Malformed(format!(
                        "frame {index} has {} channels, expected {VISEME_CHANNELS}",
                        r.len()
                    ))
                })?;
                frames.push(frame);
            }
        }

        Ok(Self { frames })
    }

    pub fn load(path: &Path) -> Result<Self, SpeechError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    pub fn frames(&self) -> &[VisemeFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Playback length at the fixed frame rate.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f32(self.frames.len() as f32 / VISEME_FRAME_RATE)
    }

    /// Frame nearest to `elapsed`, or `None` past the end.
    pub fn frame_at(&self, elapsed: Duration) -> Option<&VisemeFrame> {
        let index = (elapsed.as_secs_f32() * VISEME_FRAME_RATE + 0.5) as usize;
        self.frames.get(index)
    }
}
