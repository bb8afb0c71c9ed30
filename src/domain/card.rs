use serde::{Deserialize, Serialize};

/// Which face of a card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
  Question,
  Answer,
}

impl Side {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "question" => Some(Self::Question),
      "answer" => Some(Self::Answer),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Question => "question",
      Self::Answer => "answer",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Question => "Question",
      Self::Answer => "Answer",
    }
  }
}

/// Per-card review label, tracked across the whole deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
  #[default]
  Unseen,
  Remembered,
  NeedsReview,
}

impl ReviewStatus {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "unseen" => Some(Self::Unseen),
      "remembered" => Some(Self::Remembered),
      "needs_review" => Some(Self::NeedsReview),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Unseen => "unseen",
      Self::Remembered => "remembered",
      Self::NeedsReview => "needs_review",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Unseen => "Not seen yet",
      Self::Remembered => "Remembered",
      Self::NeedsReview => "Needs review",
    }
  }
}

/// Secondary-language translation for one or both sides of a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
  #[serde(default)]
  pub question: Option<String>,
  #[serde(default)]
  pub answer: Option<String>,
}

impl Hint {
  pub fn for_side(&self, side: Side) -> Option<&str> {
    match side {
      Side::Question => self.question.as_deref(),
      Side::Answer => self.answer.as_deref(),
    }
    .filter(|text| !text.trim().is_empty())
  }
}

/// One question/answer unit. The question text is the card's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
  pub question: String,
  pub answer: String,
  #[serde(default)]
  pub hint: Option<Hint>,
}

impl Card {
  pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
    Self {
      question: question.into(),
      answer: answer.into(),
      hint: None,
    }
  }

  pub fn with_hint(mut self, hint: Hint) -> Self {
    self.hint = Some(hint);
    self
  }

  pub fn key(&self) -> &str {
    &self.question
  }

  /// Text shown on the given side
  pub fn text(&self, side: Side) -> &str {
    match side {
      Side::Question => &self.question,
      Side::Answer => &self.answer,
    }
  }

  pub fn hint_text(&self, side: Side) -> Option<&str> {
    self.hint.as_ref().and_then(|h| h.for_side(side))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_side_parsing() {
    assert_eq!(Side::from_str("question"), Some(Side::Question));
    assert_eq!(Side::from_str("answer"), Some(Side::Answer));
    assert_eq!(Side::from_str("back"), None);
    assert_eq!(Side::Answer.as_str(), "answer");
  }

  #[test]
  fn test_review_status_parsing() {
    assert_eq!(ReviewStatus::from_str("remembered"), Some(ReviewStatus::Remembered));
    assert_eq!(ReviewStatus::from_str("needs_review"), Some(ReviewStatus::NeedsReview));
    assert_eq!(ReviewStatus::from_str("unseen"), Some(ReviewStatus::Unseen));
    assert_eq!(ReviewStatus::from_str("Remembered"), None);
    assert_eq!(ReviewStatus::default(), ReviewStatus::Unseen);
  }

  #[test]
  fn test_card_text_by_side() {
    let card = Card::new("Q1", "A1");
    assert_eq!(card.text(Side::Question), "Q1");
    assert_eq!(card.text(Side::Answer), "A1");
    assert_eq!(card.key(), "Q1");
  }

  #[test]
  fn test_hint_text_missing_or_blank_is_none() {
    let card = Card::new("Q1", "A1").with_hint(Hint {
      question: Some("คำถาม".into()),
      answer: Some("   ".into()),
    });
    assert_eq!(card.hint_text(Side::Question), Some("คำถาม"));
    assert_eq!(card.hint_text(Side::Answer), None);
    assert_eq!(Card::new("Q2", "A2").hint_text(Side::Question), None);
  }
}
