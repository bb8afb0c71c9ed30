pub mod audio;
pub mod study;
mod templates;

use askama::Template;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SESSION_COOKIE_NAME;
use crate::paths;
use crate::session::{generate_session_id, SharedSession};
use crate::state::AppState;
use crate::study::SessionState;

pub use audio::{current_audio, request_audio};
pub use study::{
  apply_range, flip_card, index, mark_status, next_card, prev_card, reset_progress, toggle_hint,
};
pub use templates::{Notice, StudyTemplate};

/// All routes of the study app
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/flip", post(flip_card))
    .route("/next", post(next_card))
    .route("/prev", post(prev_card))
    .route("/mark", post(mark_status))
    .route("/reset", post(reset_progress))
    .route("/range", post(apply_range))
    .route("/hint", post(toggle_hint))
    .route("/audio", post(request_audio))
    .route("/audio/current", get(current_audio))
    .nest_service("/static", ServeDir::new(paths::STATIC_DIR))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Resolve the caller's session from the cookie, starting one if needed.
///
/// A cookie whose session has expired gets a fresh session under the same ID.
pub(crate) fn open_session(state: &AppState, jar: CookieJar) -> (CookieJar, SharedSession) {
  if let Some(id) = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string()) {
    let session = state.sessions.get_or_init(&id, &state.deck);
    return (jar, session);
  }

  let id = generate_session_id();
  let session = state.sessions.get_or_init(&id, &state.deck);
  let cookie = Cookie::build((SESSION_COOKIE_NAME, id))
    .path("/")
    .http_only(true)
    .secure(false) // Set to true in production with HTTPS
    .max_age(time::Duration::seconds(state.settings.session_expiry().num_seconds()))
    .build();

  (jar.add(cookie), session)
}

pub(crate) fn render(state: &AppState, session: &SessionState, notice: Option<Notice>) -> Html<String> {
  let template = StudyTemplate::build(
    &state.deck,
    session,
    &state.settings.audio.hint_language,
    notice,
  );
  Html(template.render().unwrap_or_else(|e| {
    tracing::error!("Failed to render study page: {}", e);
    String::new()
  }))
}
