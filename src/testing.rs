//! Test utilities: in-memory decks and a call-counting synthesizer.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::audio::{SynthesisError, Synthesizer};
use crate::content::Deck;
use crate::domain::{Card, Hint};

/// Deck of `n` cards keyed "Q1".."Qn" with answers "A1".."An".
/// Odd-numbered cards carry a question hint.
pub fn numbered_deck(n: usize) -> Deck {
    let cards = (1..=n).map(|i| {
        let card = Card::new(format!("Q{i}"), format!("A{i}"));
        if i % 2 == 1 {
            card.with_hint(Hint {
                question: Some(format!("HQ{i}")),
                answer: None,
            })
        } else {
            card
        }
    });
    Deck::from_cards(cards, vec!["Quote".to_string()]).expect("numbered deck is valid")
}

#[derive(Debug, Clone, Copy)]
enum Behaviour {
    Speak,
    Fail,
    Silent,
}

/// Synthesizer stub that returns `"{language}:{text}"` as bytes and counts calls.
pub struct CountingSynthesizer {
    calls: AtomicUsize,
    behaviour: Behaviour,
    delay: Option<Duration>,
}

impl CountingSynthesizer {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            behaviour: Behaviour::Speak,
            delay: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            behaviour: Behaviour::Fail,
            ..Self::new()
        }
    }

    /// Succeeds with zero bytes
    pub fn silent() -> Self {
        Self {
            behaviour: Behaviour::Silent,
            ..Self::new()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synthesizer for CountingSynthesizer {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.behaviour {
            Behaviour::Speak => Ok(format!("{language}:{text}").into_bytes()),
            Behaviour::Fail => Err(SynthesisError::Unavailable("stub failure".into())),
            Behaviour::Silent => Ok(Vec::new()),
        }
    }
}
