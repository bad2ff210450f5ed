//! Move evaluation for ludevo: position heuristics, the simulate-and-score
//! move fitness pipeline, and the baseline players built on top of it.
//!
//! # Architecture
//!
//! ```text
//! Position Heuristic (score a resulting position for one player)
//!     ↑ used by
//! Move Scorer (validate -> clone -> apply -> score)
//!     ↑ used by
//! Selectors (greedy argmax player) and the evolutionary search
//! ```
//!
//! Heuristics are pluggable: the canonical Quixo heuristic is
//! [`TriangularRuns`], with [`LineOccupancy`] and [`MaxLineCount`] as simpler
//! substitutes, and [`ZeroNimSum`] for Nim. The [`MoveScorer`] folds move
//! invalidity into the score scale (see [`INVALID_MOVE_SCORE`]) instead of
//! raising an error, so search loops discount illegal candidates naturally.

pub use self::{heuristic::*, move_scorer::*, selectors::*};

pub mod heuristic;
pub mod move_scorer;
pub mod selectors;
