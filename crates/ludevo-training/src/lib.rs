//! Learning-based move selection for ludevo: the evolutionary move search
//! and the tabular Q-learning player.
//!
//! # Evolutionary move search
//!
//! Instead of evolving a whole policy offline, the search here runs once per
//! turn: candidates are *moves* in the current position, fitness comes from
//! simulating each candidate against a disposable copy of the state, and a
//! small generation loop (elitist selection, field-wise crossover,
//! re-randomizing mutation) converges on a good move.
//!
//! ```text
//! CandidateSpace (one position + one fitness strategy)
//!     ↑ consumed by
//! Population (rejection-sampled legal candidates, ranked by fitness)
//!     ↑ evolved by
//! Evolver (generation loop, best-ever tracking, early stop)
//!     ↑ wrapped by
//! GeneticPlayer (per-position MoveMemory cache, Player impl)
//! ```
//!
//! The driver always reports the best candidate seen across the whole run,
//! not just the final generation; fitness never decreases from one
//! generation's best-ever to the next.
//!
//! # Q-learning
//!
//! [`QLearningPlayer`] learns a tabular action-value function for Quixo from
//! shaped per-move rewards plus terminal reinforcement. Unlike the move
//! memory, its table keys include the player to move.

pub use self::{candidate::*, genetic::*, genetic_player::*, move_memory::*, q_learning::*};

pub mod candidate;
pub mod genetic;
pub mod genetic_player;
pub mod move_memory;
pub mod q_learning;
