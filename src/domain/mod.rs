pub mod card;

pub use card::{Card, Hint, ReviewStatus, Side};
