//! In-memory session storage for study sessions.
//!
//! Stores one `SessionState` per session ID (from cookie). Sessions are never
//! shared between clients and auto-expire after a period of inactivity.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::content::Deck;
use crate::study::SessionState;

/// A single client's session, locked per intent
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Session entry with last access time for expiration
struct SessionEntry {
  session: SharedSession,
  last_access: DateTime<Utc>,
}

pub struct SessionStore {
  sessions: Mutex<HashMap<String, SessionEntry>>,
  expiry: Duration,
  cleanup_threshold: u8,
}

impl SessionStore {
  /// `cleanup_threshold` out of 256 is the chance of sweeping expired
  /// sessions on each access.
  pub fn new(expiry: Duration, cleanup_threshold: u8) -> Self {
    Self {
      sessions: Mutex::new(HashMap::new()),
      expiry,
      cleanup_threshold,
    }
  }

  /// Get the session for `session_id`, creating a fresh one over `deck` only
  /// if none exists. An existing session is never reset.
  pub fn get_or_init(&self, session_id: &str, deck: &Deck) -> SharedSession {
    let mut sessions = self.lock();

    if rand::random::<u8>() < self.cleanup_threshold {
      self.cleanup_expired(&mut sessions);
    }

    if let Some(entry) = sessions.get_mut(session_id) {
      entry.last_access = Utc::now();
      return entry.session.clone();
    }

    tracing::debug!("Starting new study session ({} active)", sessions.len() + 1);
    let session = Arc::new(Mutex::new(SessionState::new(deck)));
    sessions.insert(
      session_id.to_string(),
      SessionEntry {
        session: session.clone(),
        last_access: Utc::now(),
      },
    );
    session
  }

  /// Existing session, if any. Does not create one.
  pub fn get(&self, session_id: &str) -> Option<SharedSession> {
    let mut sessions = self.lock();
    let entry = sessions.get_mut(session_id)?;
    entry.last_access = Utc::now();
    Some(entry.session.clone())
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Drop sessions idle for longer than the expiry window
  pub fn purge_expired(&self) -> usize {
    let mut sessions = self.lock();
    self.cleanup_expired(&mut sessions)
  }

  fn cleanup_expired(&self, sessions: &mut HashMap<String, SessionEntry>) -> usize {
    let cutoff = Utc::now() - self.expiry;
    let before = sessions.len();
    sessions.retain(|_, entry| entry.last_access > cutoff);
    let removed = before - sessions.len();
    if removed > 0 {
      tracing::debug!("Expired {} idle session(s)", removed);
    }
    removed
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
    self.sessions.lock().unwrap_or_else(|e| e.into_inner())
  }
}

/// Lock a session, recovering the state if a previous holder panicked
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, SessionState> {
  session.lock().unwrap_or_else(|e| e.into_inner())
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::ReviewStatus;
  use crate::testing::numbered_deck;

  fn store() -> SessionStore {
    SessionStore::new(Duration::hours(1), 0)
  }

  #[test]
  fn test_get_or_init_does_not_reset_existing_session() {
    let deck = numbered_deck(5);
    let store = store();

    {
      let session = store.get_or_init("abc", &deck);
      let mut state = lock_session(&session);
      state.next_card();
      state.mark_status(ReviewStatus::Remembered);
    }

    let session = store.get_or_init("abc", &deck);
    let state = lock_session(&session);
    assert_eq!(state.current_index(), 1);
    assert_eq!(state.status_of("Q2"), ReviewStatus::Remembered);
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn test_sessions_are_isolated() {
    let deck = numbered_deck(5);
    let store = store();

    let a = store.get_or_init("a", &deck);
    let b = store.get_or_init("b", &deck);
    lock_session(&a).flip_card();

    assert!(lock_session(&a).is_flipped());
    assert!(!lock_session(&b).is_flipped());
    assert_eq!(store.len(), 2);
  }

  #[test]
  fn test_get_does_not_create() {
    let store = store();
    assert!(store.get("missing").is_none());
    assert!(store.is_empty());
  }

  #[test]
  fn test_purge_expired() {
    let deck = numbered_deck(2);
    let store = SessionStore::new(Duration::zero(), 0);
    store.get_or_init("old", &deck);

    assert_eq!(store.purge_expired(), 1);
    assert!(store.is_empty());
  }

  #[test]
  fn test_generate_session_id_format() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_ne!(id, generate_session_id());
  }
}
