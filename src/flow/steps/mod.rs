mod review;
mod single;

pub use review::{execute_review, ReviewOutcome, ReviewSettings};
pub use single::{execute_single, SingleOutcome};
