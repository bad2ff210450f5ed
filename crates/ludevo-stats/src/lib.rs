//! Small statistics helpers for fitness and tournament reporting.

pub use self::{descriptive::*, tally::*};

pub mod descriptive;
pub mod tally;
