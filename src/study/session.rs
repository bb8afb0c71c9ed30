//! Flashcard session state machine.
//!
//! A [`SessionState`] owns the working set (the range of the deck being
//! studied, possibly shuffled), the position within it, which side is showing,
//! and the review status of every card in the deck. Every user intent maps to
//! one method here; nothing else mutates the state.
//!
//! Audio and the hint panel belong to the displayed side. Anything that
//! changes the displayed card, the side, or the working set drops them and
//! advances the session epoch, so an audio result requested earlier can be
//! recognised as stale when it finally arrives.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use thiserror::Error;

use crate::audio::{AudioCache, AudioPayload, SynthesisError};
use crate::content::Deck;
use crate::domain::{Card, ReviewStatus, Side};

/// Rejected `apply_range` input. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid range {start}-{end}: expected 1 <= start <= end <= {deck_size}")]
pub struct RangeError {
  pub start: i64,
  pub end: i64,
  pub deck_size: usize,
}

/// 1-based inclusive range that produced the current working set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedRange {
  pub start: usize,
  pub end: usize,
  pub shuffled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressCounts {
  pub remembered: usize,
  pub needs_review: usize,
  pub total: usize,
}

impl ProgressCounts {
  pub fn unseen(&self) -> usize {
    self.total - self.remembered - self.needs_review
  }
}

/// Identifies which card side an audio request was made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTicket {
  pub key: String,
  pub side: Side,
  pub text: String,
  epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOutcome {
  /// Audio attached to the displayed side
  Ready(AudioPayload),
  /// Synthesis failed; carries a user-facing message
  Failed(String),
  /// The displayed card or side changed while synthesizing; result dropped
  Stale,
  /// Working set is empty
  NoCard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
  working_set: Vec<String>,
  current_index: usize,
  is_flipped: bool,
  status_by_key: HashMap<String, ReviewStatus>,
  pending_audio: Option<AudioPayload>,
  revealed_hint: Option<Side>,
  applied_range: AppliedRange,
  epoch: u64,
}

impl SessionState {
  /// Fresh session over the whole deck in load order, everything unseen.
  pub fn new(deck: &Deck) -> Self {
    Self {
      working_set: deck.keys().map(str::to_string).collect(),
      current_index: 0,
      is_flipped: false,
      status_by_key: deck
        .keys()
        .map(|key| (key.to_string(), ReviewStatus::Unseen))
        .collect(),
      pending_audio: None,
      revealed_hint: None,
      applied_range: AppliedRange {
        start: 1,
        end: deck.len(),
        shuffled: false,
      },
      epoch: 0,
    }
  }

  // ==================== Intents ====================

  /// Replace the working set with deck cards `start..=end` (1-based, counted
  /// over the full deck), shuffled when asked.
  pub fn apply_range<R: Rng + ?Sized>(
    &mut self,
    deck: &Deck,
    start: i64,
    end: i64,
    shuffle: bool,
    rng: &mut R,
  ) -> Result<(), RangeError> {
    let deck_size = deck.len();
    let (lo, hi) = validate_range(start, end, deck_size).ok_or(RangeError {
      start,
      end,
      deck_size,
    })?;

    let mut keys: Vec<String> = deck.keys().skip(lo).take(hi - lo).map(str::to_string).collect();
    if shuffle {
      keys.shuffle(rng);
    }

    self.working_set = keys;
    self.current_index = 0;
    self.is_flipped = false;
    self.applied_range = AppliedRange {
      start: lo + 1,
      end: hi,
      shuffled: shuffle,
    };
    self.clear_side_artifacts();

    tracing::debug!(
      "Applied range {}..={} ({} cards, shuffled: {})",
      lo + 1,
      hi,
      self.working_set.len(),
      shuffle
    );
    Ok(())
  }

  /// Move to the next card. Returns false (and changes nothing) on the last card.
  pub fn next_card(&mut self) -> bool {
    if self.current_index + 1 >= self.working_set.len() {
      return false;
    }
    self.current_index += 1;
    self.is_flipped = false;
    self.clear_side_artifacts();
    true
  }

  /// Move to the previous card. Returns false (and changes nothing) on the first card.
  pub fn prev_card(&mut self) -> bool {
    if self.current_index == 0 {
      return false;
    }
    self.current_index -= 1;
    self.is_flipped = false;
    self.clear_side_artifacts();
    true
  }

  pub fn flip_card(&mut self) {
    self.is_flipped = !self.is_flipped;
    self.clear_side_artifacts();
  }

  /// Label the displayed card. Returns false when there is no card.
  pub fn mark_status(&mut self, status: ReviewStatus) -> bool {
    let Some(key) = self.working_set.get(self.current_index) else {
      return false;
    };
    self.status_by_key.insert(key.clone(), status);
    true
  }

  /// Every deck card back to unseen, including cards outside the working set.
  pub fn reset_progress(&mut self) {
    for status in self.status_by_key.values_mut() {
      *status = ReviewStatus::Unseen;
    }
  }

  /// Open the hint panel for `side`, or close it if it is already open.
  ///
  /// The flag toggles even when the card has no hint for that side; the panel
  /// then renders a "not found" placeholder.
  pub fn toggle_hint(&mut self, side: Side) {
    self.revealed_hint = match self.revealed_hint {
      Some(open) if open == side => None,
      _ => Some(side),
    };
  }

  // ==================== Audio ====================

  /// Capture the displayed side's text for synthesis. `None` on an empty working set.
  pub fn audio_ticket(&self, deck: &Deck) -> Option<AudioTicket> {
    let card = self.current_card(deck)?;
    let side = self.displayed_side();
    Some(AudioTicket {
      key: card.key().to_string(),
      side,
      text: card.text(side).to_string(),
      epoch: self.epoch,
    })
  }

  /// Apply a synthesis result if the ticket still describes what is displayed.
  pub fn attach_audio(
    &mut self,
    ticket: &AudioTicket,
    result: Result<AudioPayload, SynthesisError>,
  ) -> AudioOutcome {
    if !self.ticket_is_current(ticket) {
      tracing::debug!("Dropping stale audio for {:?} ({})", ticket.key, ticket.side.as_str());
      return AudioOutcome::Stale;
    }

    match result {
      Ok(payload) => {
        self.pending_audio = Some(payload.clone());
        AudioOutcome::Ready(payload)
      }
      Err(e) => {
        tracing::warn!("Audio synthesis failed for {:?}: {}", ticket.key, e);
        self.pending_audio = None;
        AudioOutcome::Failed(e.to_string())
      }
    }
  }

  /// Synthesize the displayed side through `cache` and attach the result.
  pub async fn request_audio(
    &mut self,
    deck: &Deck,
    cache: &AudioCache,
    language: &str,
  ) -> AudioOutcome {
    let Some(ticket) = self.audio_ticket(deck) else {
      return AudioOutcome::NoCard;
    };
    let result = cache.get_or_synthesize(&ticket.text, language).await;
    self.attach_audio(&ticket, result)
  }

  pub fn ticket_is_current(&self, ticket: &AudioTicket) -> bool {
    ticket.epoch == self.epoch
      && ticket.side == self.displayed_side()
      && self.current_key() == Some(ticket.key.as_str())
  }

  // ==================== Queries ====================

  pub fn working_set(&self) -> &[String] {
    &self.working_set
  }

  pub fn is_empty(&self) -> bool {
    self.working_set.is_empty()
  }

  pub fn current_index(&self) -> usize {
    self.current_index
  }

  /// 1-based position for display
  pub fn position(&self) -> usize {
    self.current_index + 1
  }

  pub fn is_flipped(&self) -> bool {
    self.is_flipped
  }

  pub fn displayed_side(&self) -> Side {
    if self.is_flipped { Side::Answer } else { Side::Question }
  }

  pub fn current_key(&self) -> Option<&str> {
    self.working_set.get(self.current_index).map(String::as_str)
  }

  pub fn current_card<'d>(&self, deck: &'d Deck) -> Option<&'d Card> {
    self.current_key().and_then(|key| deck.lookup(key))
  }

  pub fn displayed_text<'d>(&self, deck: &'d Deck) -> Option<&'d str> {
    self
      .current_card(deck)
      .map(|card| card.text(self.displayed_side()))
  }

  pub fn status_of(&self, key: &str) -> ReviewStatus {
    self.status_by_key.get(key).copied().unwrap_or_default()
  }

  pub fn current_status(&self) -> Option<ReviewStatus> {
    self.current_key().map(|key| self.status_of(key))
  }

  pub fn pending_audio(&self) -> Option<&AudioPayload> {
    self.pending_audio.as_ref()
  }

  pub fn revealed_hint(&self) -> Option<Side> {
    self.revealed_hint
  }

  /// Hint text for the open panel, if the panel is open and the card has one
  pub fn hint_text<'d>(&self, deck: &'d Deck) -> Option<&'d str> {
    let side = self.revealed_hint?;
    self.current_card(deck)?.hint_text(side)
  }

  pub fn applied_range(&self) -> AppliedRange {
    self.applied_range
  }

  /// Status counts over the working set only
  pub fn progress(&self) -> ProgressCounts {
    let mut counts = ProgressCounts {
      total: self.working_set.len(),
      ..ProgressCounts::default()
    };
    for key in &self.working_set {
      match self.status_of(key) {
        ReviewStatus::Remembered => counts.remembered += 1,
        ReviewStatus::NeedsReview => counts.needs_review += 1,
        ReviewStatus::Unseen => {}
      }
    }
    counts
  }

  pub fn is_first(&self) -> bool {
    self.current_index == 0
  }

  pub fn is_last(&self) -> bool {
    self.current_index + 1 >= self.working_set.len()
  }

  fn clear_side_artifacts(&mut self) {
    self.pending_audio = None;
    self.revealed_hint = None;
    self.epoch = self.epoch.wrapping_add(1);
  }
}

/// Convert 1-based inclusive bounds to a 0-based half-open range, if valid.
fn validate_range(start: i64, end: i64, deck_size: usize) -> Option<(usize, usize)> {
  let lo = usize::try_from(start.checked_sub(1)?).ok()?;
  let hi = usize::try_from(end).ok()?;
  (lo < hi && hi <= deck_size).then_some((lo, hi))
}
