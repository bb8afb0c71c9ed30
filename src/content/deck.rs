//! Deck loading - reads the card deck from a JSON file.
//!
//! The deck is loaded once at startup and never changes afterwards. Cards are
//! keyed by their question text, and the file order is the deck's natural
//! order (the order ranges are counted in).
//!
//! ```json
//! {
//!   "cards": [
//!     { "question": "...", "answer": "...", "hint": { "question": "...", "answer": "..." } }
//!   ],
//!   "quotes": ["..."]
//! }
//! ```

use indexmap::IndexMap;
use indexmap::map::Entry;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::domain::{Card, Hint};

/// Card definition from the deck file.
#[derive(Debug, Clone, Deserialize)]
pub struct CardDefinition {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub hint: Option<Hint>,
}

impl From<CardDefinition> for Card {
    fn from(def: CardDefinition) -> Self {
        Card {
            question: def.question,
            answer: def.answer,
            hint: def.hint,
        }
    }
}

/// Top-level layout of the deck file.
#[derive(Debug, Deserialize)]
pub struct DeckData {
    pub cards: Vec<CardDefinition>,
    #[serde(default)]
    pub quotes: Vec<String>,
}

/// Deck loading errors. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Deck file not found: {0}")]
    FileNotFound(String),

    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("Parse error in deck: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate question in deck: {0:?}")]
    DuplicateQuestion(String),

    #[error("Card #{0} has a blank question")]
    BlankQuestion(usize),
}

impl DeckError {
    /// Returns a user-facing error message without exposing filesystem paths.
    pub fn user_message(&self) -> &'static str {
        match self {
            DeckError::FileNotFound(_) => "Deck file not found",
            DeckError::Io { .. } => "Failed to read deck file",
            DeckError::Parse(_) => "Failed to parse deck file",
            DeckError::DuplicateQuestion(_) | DeckError::BlankQuestion(_) => {
                "Deck file contains invalid cards"
            }
        }
    }
}

/// The immutable card deck plus the decorative quote list.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: IndexMap<String, Card>,
    quotes: Vec<String>,
}

impl Deck {
    /// Build a deck, rejecting blank or duplicate questions.
    pub fn from_cards(
        cards: impl IntoIterator<Item = Card>,
        quotes: Vec<String>,
    ) -> Result<Self, DeckError> {
        let mut map = IndexMap::new();

        for (i, card) in cards.into_iter().enumerate() {
            if card.question.trim().is_empty() {
                return Err(DeckError::BlankQuestion(i + 1));
            }
            match map.entry(card.question.clone()) {
                Entry::Occupied(_) => return Err(DeckError::DuplicateQuestion(card.question)),
                Entry::Vacant(slot) => {
                    slot.insert(card);
                }
            }
        }

        Ok(Self { cards: map, quotes })
    }

    pub fn from_json(content: &str) -> Result<Self, DeckError> {
        let data: DeckData = serde_json::from_str(content)?;
        Self::from_cards(data.cards.into_iter().map(Card::from), data.quotes)
    }

    /// Load the deck from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DeckError> {
        if !path.exists() {
            return Err(DeckError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path).map_err(|e| DeckError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let deck = Self::from_json(&content)?;
        if deck.is_empty() {
            tracing::warn!("Deck at {} has no cards", path.display());
        } else {
            tracing::info!(
                "Loaded {} cards and {} quotes from {}",
                deck.len(),
                deck.quotes.len(),
                path.display()
            );
        }
        Ok(deck)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All card keys in load order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cards.keys().map(String::as_str)
    }

    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.cards.get_index(index).map(|(key, _)| key.as_str())
    }

    pub fn lookup(&self, key: &str) -> Option<&Card> {
        self.cards.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cards.contains_key(key)
    }

    /// Hint pair for a card. A missing hint is not an error.
    pub fn hints(&self, key: &str) -> Option<&Hint> {
        self.lookup(key).and_then(|card| card.hint.as_ref())
    }

    pub fn quotes(&self) -> &[String] {
        &self.quotes
    }

    pub fn random_quote<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.quotes.choose(rng).map(String::as_str)
    }
}
