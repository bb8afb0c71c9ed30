//! Shared helpers for HTTP flow tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use flashdeck::audio::{AudioCache, SynthesisError, Synthesizer};
use flashdeck::config::Settings;
use flashdeck::content::Deck;
use flashdeck::domain::{Card, Hint};
use flashdeck::handlers;
use flashdeck::state::AppState;

/// Returns `"{language}:{text}"` as audio bytes, or fails when `fail` is set.
pub struct StubSynthesizer {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl StubSynthesizer {
    pub fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synthesizer for StubSynthesizer {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SynthesisError::Unavailable("speech service offline".into()));
        }
        Ok(format!("{language}:{text}").into_bytes())
    }
}

/// Q1/A1, Q2/A2, Q3/A3; Q1 has a question hint.
pub fn three_card_deck() -> Deck {
    let cards = vec![
        Card::new("Q1", "A1").with_hint(Hint {
            question: Some("HQ1".into()),
            answer: None,
        }),
        Card::new("Q2", "A2"),
        Card::new("Q3", "A3"),
    ];
    Deck::from_cards(cards, vec!["Keep going".into()]).unwrap()
}

/// Server that keeps cookies between requests, like a single browser.
pub fn server_with(deck: Deck, synth: Arc<StubSynthesizer>) -> TestServer {
    let state = AppState::new(deck, AudioCache::new(synth), Settings::default());
    let mut server = TestServer::new(handlers::router(state)).unwrap();
    server.save_cookies();
    server
}

pub fn server() -> TestServer {
    server_with(three_card_deck(), StubSynthesizer::new(false))
}
