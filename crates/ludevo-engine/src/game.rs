use std::{fmt, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::IllegalMoveError;

/// Identity of one of the two players.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum PlayerId {
    #[display("player 1")]
    One,
    #[display("player 2")]
    Two,
}

impl PlayerId {
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// Rules contract for a finite, deterministic, two-player game with perfect
/// information.
///
/// Implementors own the full rule set; the search and evaluation layers only
/// ever go through this interface. `apply` produces a successor state from an
/// immutable snapshot, which is what makes fitness evaluation side-effect
/// free: every simulation works on its own copy.
pub trait Game {
    type State: Clone + fmt::Debug;
    type Move: Copy + Eq + Hash + fmt::Debug;
    /// Canonical snapshot of the public board contents.
    ///
    /// Deliberately excludes whose turn it is, so two states that differ only
    /// in the player to move share a key. Per-position caches built on this
    /// key inherit that ambiguity.
    type PositionKey: Clone + Eq + Hash + fmt::Debug;

    fn current_player(state: &Self::State) -> PlayerId;

    /// All legal moves, in a stable order.
    fn legal_moves(state: &Self::State) -> Vec<Self::Move>;

    fn is_legal(state: &Self::State, mv: Self::Move) -> bool;

    /// Returns the state after `mv`, leaving `state` untouched.
    fn apply(state: &Self::State, mv: Self::Move) -> Result<Self::State, IllegalMoveError>;

    fn winner(state: &Self::State) -> Option<PlayerId>;

    fn is_over(state: &Self::State) -> bool;

    fn position_key(state: &Self::State) -> Self::PositionKey;
}
