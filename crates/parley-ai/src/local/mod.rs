//! Local in-process completion backend.
//!
//! Flattens the conversation into a single transcript prompt and hands it
//! to an [`InferenceEngine`]. The engine itself (weights, sampling) is
//! supplied by the embedder.

mod backend;
mod engine;
mod prompt;


pub use backend::LocalBackend;
pub use engine::{EngineError, EngineLoader, Generation, GenerationParams, InferenceEngine};
