//! Speech synthesis backends.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Longest piece of text the translate TTS endpoint accepts per request
pub const MAX_CHUNK_CHARS: usize = 100;

const USER_AGENT: &str = concat!("flashdeck/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Nothing to read aloud")]
    EmptyText,

    #[error("Speech request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Speech service returned HTTP {0}")]
    Status(u16),

    #[error("Speech service returned no audio")]
    EmptyResponse,

    #[error("Speech synthesis unavailable: {0}")]
    Unavailable(String),
}

/// Turns text into speech bytes. Implementations must be deterministic for a
/// given `(text, language)` so results can be memoized.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthesisError>;
}

/// Google Translate's text-to-speech endpoint (MP3 output).
pub struct GoogleTts {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTts {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SynthesisError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, SynthesisError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Synthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthesisError> {
        let chunks = split_into_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        tracing::debug!(
            "Synthesizing {} chars in {} chunk(s), language {}",
            text.chars().count(),
            chunks.len(),
            language
        );

        // MP3 frames are self-delimiting, so chunk responses concatenate cleanly
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, language, idx, chunks.len()).await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(SynthesisError::EmptyResponse);
        }
        Ok(audio)
    }
}

/// Split text into pieces of at most `max_chars` characters, breaking on
/// whitespace. Words longer than the limit are cut at character boundaries.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
