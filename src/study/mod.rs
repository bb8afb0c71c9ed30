pub mod session;

pub use session::{
  AppliedRange, AudioOutcome, AudioTicket, ProgressCounts, RangeError, SessionState,
};
