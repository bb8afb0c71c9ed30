//! Read-aloud handlers.
//!
//! Synthesis can be slow, so the session lock is released while it runs. The
//! result is attached only if the same card side is still displayed.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use crate::audio::AUDIO_MIME;
use crate::config::SESSION_COOKIE_NAME;
use crate::session::lock_session;
use crate::state::AppState;
use crate::study::AudioOutcome;

use super::templates::Notice;
use super::{open_session, render};

/// POST /audio - synthesize the displayed side and attach it to the session
pub async fn request_audio(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
  let (jar, session) = open_session(&state, jar);

  let ticket = lock_session(&session).audio_ticket(&state.deck);

  let outcome = match ticket {
    Some(ticket) => {
      let result = state
        .audio
        .get_or_synthesize(&ticket.text, &state.settings.audio.language)
        .await;
      lock_session(&session).attach_audio(&ticket, result)
    }
    None => AudioOutcome::NoCard,
  };

  let notice = match outcome {
    AudioOutcome::Ready(_) => None,
    AudioOutcome::Failed(message) => Some(Notice::warning(format!(
      "Could not generate audio: {message}"
    ))),
    AudioOutcome::Stale => Some(Notice::info("The card changed before its audio was ready.")),
    AudioOutcome::NoCard => Some(Notice::warning("There is no card to read aloud.")),
  };

  let session = lock_session(&session);
  (jar, render(&state, &session, notice))
}

/// GET /audio/current - bytes of the pending audio for the caller's session
pub async fn current_audio(
  State(state): State<AppState>,
  jar: CookieJar,
  headers: HeaderMap,
) -> Response {
  let Some(session_id) = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string()) else {
    return StatusCode::NOT_FOUND.into_response();
  };
  let Some(session) = state.sessions.get(&session_id) else {
    return StatusCode::NOT_FOUND.into_response();
  };
  let Some(payload) = lock_session(&session).pending_audio().cloned() else {
    return StatusCode::NOT_FOUND.into_response();
  };

  let etag = format!("\"{}\"", payload.digest());
  let cache_headers = [
    (header::ETAG, etag.clone()),
    (header::CACHE_CONTROL, "private, max-age=3600".to_string()),
  ];

  let not_modified = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| etag_matches(v, &etag));
  if not_modified {
    return (StatusCode::NOT_MODIFIED, cache_headers).into_response();
  }

  (
    [(header::CONTENT_TYPE, AUDIO_MIME.to_string())],
    cache_headers,
    payload.bytes().to_vec(),
  )
    .into_response()
}

/// Weak comparison of an `If-None-Match` value against our strong ETag.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
  if_none_match.split(',').map(str::trim).any(|candidate| {
    candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_etag_matches_exact_and_weak() {
    assert!(etag_matches("\"abc\"", "\"abc\""));
    assert!(etag_matches("W/\"abc\"", "\"abc\""));
    assert!(!etag_matches("\"abd\"", "\"abc\""));
  }

  #[test]
  fn test_etag_matches_list_and_wildcard() {
    assert!(etag_matches("\"old\", W/\"abc\"", "\"abc\""));
    assert!(etag_matches("*", "\"abc\""));
    assert!(!etag_matches("\"old\",\"older\"", "\"abc\""));
  }
}
