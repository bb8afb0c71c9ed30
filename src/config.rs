//! Application configuration.
//!
//! Values are resolved in layers: built-in defaults, then `config.toml`, then
//! environment variables (a `.env` file is loaded first if present).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::paths;

// ==================== Defaults ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Language the deck is read aloud in
pub const AUDIO_LANGUAGE: &str = "ru";

/// Language of the hint translations (display only)
pub const HINT_LANGUAGE: &str = "th";

/// Google Translate text-to-speech endpoint
pub const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Per-request timeout for speech synthesis
pub const TTS_TIMEOUT_SECS: u64 = 15;

/// Session expiration time in hours
pub const SESSION_EXPIRY_HOURS: i64 = 12;

/// Probability threshold for session cleanup (0-255, lower = less frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "flashdeck_session";

// ==================== Settings ====================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub deck: DeckSettings,
    pub audio: AudioSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub addr: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SERVER_ADDR.to_string(),
            port: SERVER_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeckSettings {
    /// Deck file; falls back to `<DATA_DIR>/deck.json`
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub language: String,
    pub hint_language: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            language: AUDIO_LANGUAGE.to_string(),
            hint_language: HINT_LANGUAGE.to_string(),
            endpoint: TTS_ENDPOINT.to_string(),
            timeout_secs: TTS_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub expiry_hours: i64,
    pub cleanup_threshold: u8,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            expiry_hours: SESSION_EXPIRY_HOURS,
            cleanup_threshold: SESSION_CLEANUP_THRESHOLD,
        }
    }
}

impl Settings {
    /// Load settings with priority: environment > config.toml > defaults
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config_path = paths::config_path();
        let mut settings = match std::fs::read_to_string(&config_path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(settings) => {
                    tracing::info!("Using configuration from {}", config_path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("Ignoring malformed {}: {}", config_path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };

        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply `PORT`, `DECK_PATH` and `AUDIO_LANGUAGE` overrides
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(port) = var("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(path) = var("DECK_PATH") {
            tracing::info!("Using deck from DECK_PATH env: {}", path);
            self.deck.path = Some(PathBuf::from(path));
        }
        if let Some(language) = var("AUDIO_LANGUAGE") {
            self.audio.language = language;
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.addr, self.server.port)
    }

    pub fn deck_path(&self) -> PathBuf {
        self.deck
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(paths::deck_path()))
    }

    pub fn tts_timeout(&self) -> Duration {
        Duration::from_secs(self.audio.timeout_secs)
    }

    /// Session lifetime. Non-positive or out-of-range hours fall back to the default.
    pub fn session_expiry(&self) -> chrono::Duration {
        let hours = self.session.expiry_hours;
        match chrono::Duration::try_hours(hours).filter(|_| hours > 0) {
            Some(expiry) => expiry,
            None => {
                tracing::warn!(
                    "Invalid session expiry of {} hours, using {}",
                    hours,
                    SESSION_EXPIRY_HOURS
                );
                chrono::Duration::hours(SESSION_EXPIRY_HOURS)
            }
        }
    }
}
