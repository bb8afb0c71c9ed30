//! Template and form structs for the study page.

use askama::Template;
use serde::Deserialize;

use crate::content::Deck;
use crate::filters;
use crate::study::SessionState;

/// Flash message shown above the card
#[derive(Debug, Clone)]
pub struct Notice {
  /// One of "error", "warning", "info"
  pub level: &'static str,
  pub message: String,
}

impl Notice {
  pub fn error(message: impl Into<String>) -> Self {
    Self {
      level: "error",
      message: message.into(),
    }
  }

  pub fn warning(message: impl Into<String>) -> Self {
    Self {
      level: "warning",
      message: message.into(),
    }
  }

  pub fn info(message: impl Into<String>) -> Self {
    Self {
      level: "info",
      message: message.into(),
    }
  }
}

#[derive(Template)]
#[template(path = "study.html")]
pub struct StudyTemplate {
  pub has_card: bool,
  pub is_flipped: bool,
  /// "question" or "answer"
  pub side: &'static str,
  pub side_label: &'static str,
  pub text: String,
  pub status: &'static str,
  pub status_label: &'static str,
  pub position: usize,
  pub total: usize,
  pub percent: usize,
  pub remembered: usize,
  pub needs_review: usize,
  pub is_first: bool,
  pub is_last: bool,
  pub hint_open: bool,
  pub hint_text: Option<String>,
  pub hint_language: String,
  pub audio_version: Option<String>,
  pub deck_size: usize,
  pub range_start: usize,
  pub range_end: usize,
  pub range_shuffled: bool,
  pub quote: Option<String>,
  pub notice: Option<Notice>,
}

impl StudyTemplate {
  pub fn build(
    deck: &Deck,
    session: &SessionState,
    hint_language: &str,
    notice: Option<Notice>,
  ) -> Self {
    let side = session.displayed_side();
    let progress = session.progress();
    let range = session.applied_range();
    let status = session.current_status().unwrap_or_default();
    let percent = if progress.total == 0 {
      0
    } else {
      session.position() * 100 / progress.total
    };

    Self {
      has_card: session.current_card(deck).is_some(),
      is_flipped: session.is_flipped(),
      side: side.as_str(),
      side_label: side.label(),
      text: session.displayed_text(deck).unwrap_or_default().to_string(),
      status: status.as_str(),
      status_label: status.label(),
      position: session.position(),
      total: progress.total,
      percent,
      remembered: progress.remembered,
      needs_review: progress.needs_review,
      is_first: session.is_first(),
      is_last: session.is_last(),
      hint_open: session.revealed_hint().is_some(),
      hint_text: session.hint_text(deck).map(str::to_string),
      hint_language: hint_language.to_string(),
      audio_version: session.pending_audio().map(|a| a.version().to_string()),
      deck_size: deck.len(),
      range_start: range.start,
      range_end: range.end,
      range_shuffled: range.shuffled,
      quote: deck.random_quote(&mut rand::rng()).map(str::to_string),
      notice,
    }
  }
}

/// Range bounds arrive as raw text so malformed numbers become a notice, not a 422
#[derive(Debug, Deserialize)]
pub struct RangeForm {
  pub start: String,
  pub end: String,
  #[serde(default)]
  pub shuffle: Option<String>,
}

impl RangeForm {
  pub fn shuffle(&self) -> bool {
    self.shuffle.is_some()
  }
}

#[derive(Debug, Deserialize)]
pub struct MarkForm {
  pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct HintForm {
  pub side: String,
}
