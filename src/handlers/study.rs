//! Study page handlers. Each intent locks the caller's session, applies one
//! transition and re-renders the page.

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Form;
use axum_extra::extract::CookieJar;

use crate::domain::{ReviewStatus, Side};
use crate::session::lock_session;
use crate::state::AppState;
use crate::study::SessionState;

use super::templates::{HintForm, MarkForm, Notice, RangeForm};
use super::{open_session, render};

pub async fn index(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
  let (jar, session) = open_session(&state, jar);
  let session = lock_session(&session);
  (jar, render(&state, &session, None))
}

pub async fn flip_card(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
  intent(state, jar, |session, _| {
    session.flip_card();
    None
  })
}

pub async fn next_card(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
  intent(state, jar, |session, _| {
    session.next_card();
    None
  })
}

pub async fn prev_card(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
  intent(state, jar, |session, _| {
    session.prev_card();
    None
  })
}

pub async fn mark_status(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<MarkForm>,
) -> impl IntoResponse {
  intent(state, jar, move |session, _| {
    match ReviewStatus::from_str(&form.status) {
      Some(status) => {
        session.mark_status(status);
        None
      }
      None => Some(Notice::error(format!("Unknown status: {}", form.status))),
    }
  })
}

pub async fn reset_progress(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
  intent(state, jar, |session, _| {
    session.reset_progress();
    tracing::debug!("Progress reset");
    Some(Notice::info("Progress reset."))
  })
}

pub async fn apply_range(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<RangeForm>,
) -> impl IntoResponse {
  intent(state, jar, move |session, state| {
    let (Ok(start), Ok(end)) = (form.start.trim().parse::<i64>(), form.end.trim().parse::<i64>())
    else {
      return Some(Notice::error("Range bounds must be whole numbers."));
    };

    match session.apply_range(&state.deck, start, end, form.shuffle(), &mut rand::rng()) {
      Ok(()) => None,
      Err(e) => {
        tracing::debug!("Rejected range: {}", e);
        Some(Notice::error(e.to_string()))
      }
    }
  })
}

pub async fn toggle_hint(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<HintForm>,
) -> impl IntoResponse {
  intent(state, jar, move |session, _| match Side::from_str(&form.side) {
    Some(side) => {
      session.toggle_hint(side);
      None
    }
    None => Some(Notice::error(format!("Unknown side: {}", form.side))),
  })
}

/// Run one synchronous transition against the caller's session and render.
fn intent(
  state: AppState,
  jar: CookieJar,
  apply: impl FnOnce(&mut SessionState, &AppState) -> Option<Notice>,
) -> (CookieJar, Html<String>) {
  let (jar, session) = open_session(&state, jar);
  let mut session = lock_session(&session);
  let notice = apply(&mut session, &state);
  (jar, render(&state, &session, notice))
}
