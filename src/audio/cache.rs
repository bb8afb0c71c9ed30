//! Process-wide memo cache in front of a [`Synthesizer`].
//!
//! Entries are never evicted: the deck is finite and immutable, so the cache
//! is bounded by the number of distinct card sides. Concurrent requests for
//! the same `(text, language)` share one in-flight synthesis.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

use super::{AudioPayload, SynthesisError, Synthesizer};

type CacheKey = (String, String);

pub struct AudioCache {
    synthesizer: Arc<dyn Synthesizer>,
    entries: Mutex<HashMap<CacheKey, Arc<OnceCell<AudioPayload>>>>,
}

impl AudioCache {
    pub fn new(synthesizer: Arc<dyn Synthesizer>) -> Self {
        Self {
            synthesizer,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return cached audio for `(text, language)`, synthesizing it on first use.
    ///
    /// Failures are not cached; the next call for the same key retries.
    pub async fn get_or_synthesize(
        &self,
        text: &str,
        language: &str,
    ) -> Result<AudioPayload, SynthesisError> {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries
                .entry((text.to_string(), language.to_string()))
                .or_default()
                .clone()
        };

        if let Some(payload) = cell.get() {
            tracing::debug!("Audio cache hit ({} bytes)", payload.len());
            return Ok(payload.clone());
        }

        let payload = cell
            .get_or_try_init(|| async {
                let bytes = self.synthesizer.synthesize(text, language).await?;
                if bytes.is_empty() {
                    return Err(SynthesisError::EmptyResponse);
                }
                Ok(AudioPayload::new(bytes))
            })
            .await?;

        Ok(payload.clone())
    }

    /// Number of successfully synthesized entries
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingSynthesizer;
    use std::time::Duration;

    #[tokio::test]
    async fn test_identical_requests_synthesize_once() {
        let synth = Arc::new(CountingSynthesizer::new());
        let cache = AudioCache::new(synth.clone());

        let first = cache.get_or_synthesize("Q1", "ru").await.unwrap();
        let second = cache.get_or_synthesize("Q1", "ru").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(synth.calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_language_is_part_of_the_key() {
        let synth = Arc::new(CountingSynthesizer::new());
        let cache = AudioCache::new(synth.clone());

        let ru = cache.get_or_synthesize("Q1", "ru").await.unwrap();
        let th = cache.get_or_synthesize("Q1", "th").await.unwrap();

        assert_ne!(ru, th);
        assert_eq!(synth.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let synth = Arc::new(CountingSynthesizer::failing());
        let cache = AudioCache::new(synth.clone());

        assert!(cache.get_or_synthesize("Q1", "ru").await.is_err());
        assert!(cache.get_or_synthesize("Q1", "ru").await.is_err());

        assert_eq!(synth.calls(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_empty_audio_is_an_error() {
        let synth = Arc::new(CountingSynthesizer::silent());
        let cache = AudioCache::new(synth);

        let err = cache.get_or_synthesize("Q1", "ru").await.unwrap_err();
        assert!(matches!(err, SynthesisError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_synthesis() {
        let synth = Arc::new(CountingSynthesizer::new().with_delay(Duration::from_millis(50)));
        let cache = Arc::new(AudioCache::new(synth.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_or_synthesize("Q1", "ru").await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(synth.calls(), 1);
    }
}
