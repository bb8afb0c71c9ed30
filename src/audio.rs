//! Text-to-speech playback for card sides.
//!
//! Synthesis is an external call (see [`Synthesizer`]); the [`AudioCache`]
//! memoizes results by `(text, language)` and is shared by every session.

pub mod cache;
pub mod synthesizer;

use sha2::{Digest, Sha256};
use std::sync::Arc;

pub use cache::AudioCache;
pub use synthesizer::{GoogleTts, SynthesisError, Synthesizer};

/// MIME type of synthesized speech
pub const AUDIO_MIME: &str = "audio/mpeg";

/// Synthesized speech, cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    bytes: Arc<[u8]>,
    digest: String,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        let digest = hex::encode(Sha256::digest(&bytes));
        Self {
            bytes: bytes.into(),
            digest,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex SHA-256 of the bytes
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Short form of the digest, used to bust browser caches on `<audio>` sources
    pub fn version(&self) -> &str {
        &self.digest[..12]
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
