//! Static study content: the card deck and its quotes.

pub mod deck;

pub use deck::{CardDefinition, Deck, DeckData, DeckError};
