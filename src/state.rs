//! Application state shared by all handlers.

use std::sync::Arc;

use crate::audio::AudioCache;
use crate::config::Settings;
use crate::content::Deck;
use crate::session::SessionStore;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable deck, loaded once at startup
    pub deck: Arc<Deck>,

    /// Per-client study sessions
    pub sessions: Arc<SessionStore>,

    /// Speech cache shared across sessions
    pub audio: Arc<AudioCache>,

    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(deck: Deck, audio: AudioCache, settings: Settings) -> Self {
        let sessions = SessionStore::new(
            settings.session_expiry(),
            settings.session.cleanup_threshold,
        );
        Self {
            deck: Arc::new(deck),
            sessions: Arc::new(sessions),
            audio: Arc::new(audio),
            settings: Arc::new(settings),
        }
    }
}
