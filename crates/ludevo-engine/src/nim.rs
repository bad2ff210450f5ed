//! Nim under the normal play convention: players alternately remove objects
//! from a single row, and whoever takes the last object wins.

use std::fmt;

use crate::{
    IllegalMoveError,
    game::{Game, PlayerId},
};

/// Marker type implementing [`Game`] for Nim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nim;

/// A Nim position: row sizes plus an optional cap on how many objects a
/// single move may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NimState {
    rows: Vec<u32>,
    take_cap: Option<u32>,
    to_move: PlayerId,
}

impl NimState {
    /// Creates the classic starting position with rows of size 1, 3, 5, …,
    /// `2 * num_rows - 1`.
    #[must_use]
    pub fn new(num_rows: usize) -> Self {
        let mut rows = Vec::with_capacity(num_rows);
        let mut size = 1;
        for _ in 0..num_rows {
            rows.push(size);
            size += 2;
        }
        Self {
            rows,
            take_cap: None,
            to_move: PlayerId::One,
        }
    }

    /// Like [`Self::new`], but no move may take more than `cap` objects.
    #[must_use]
    pub fn with_take_cap(num_rows: usize, cap: u32) -> Self {
        let mut state = Self::new(num_rows);
        state.take_cap = Some(cap);
        state
    }

    /// Builds a position with explicit row sizes, `player 1` to move.
    #[must_use]
    pub fn from_rows(rows: Vec<u32>) -> Self {
        Self {
            rows,
            take_cap: None,
            to_move: PlayerId::One,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    #[must_use]
    pub fn take_cap(&self) -> Option<u32> {
        self.take_cap
    }
}

impl fmt::Display for NimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{row}")?;
        }
        write!(f, ">")
    }
}

/// One Nim move: take `take` objects from `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("take {take} from row {row}")]
pub struct Nimply {
    pub row: usize,
    pub take: u32,
}

/// Bitwise XOR of all row sizes.
///
/// Zero means the player to move loses under optimal play.
#[must_use]
pub fn nim_sum(state: &NimState) -> u32 {
    state.rows.iter().fold(0, |acc, row| acc ^ row)
}

impl Game for Nim {
    type State = NimState;
    type Move = Nimply;
    type PositionKey = Vec<u32>;

    fn current_player(state: &NimState) -> PlayerId {
        state.to_move
    }

    fn legal_moves(state: &NimState) -> Vec<Nimply> {
        let mut moves = Vec::new();
        for (row, &count) in state.rows.iter().enumerate() {
            let max_take = state.take_cap.map_or(count, |cap| count.min(cap));
            for take in 1..=max_take {
                moves.push(Nimply { row, take });
            }
        }
        moves
    }

    fn is_legal(state: &NimState, mv: Nimply) -> bool {
        if mv.row >= state.rows.len() || mv.take == 0 || mv.take > state.rows[mv.row] {
            return false;
        }
        state.take_cap.is_none_or(|cap| mv.take <= cap)
    }

    fn apply(state: &NimState, mv: Nimply) -> Result<NimState, IllegalMoveError> {
        if !Self::is_legal(state, mv) {
            return Err(IllegalMoveError);
        }
        let mut next = state.clone();
        next.rows[mv.row] -= mv.take;
        next.to_move = state.to_move.opponent();
        Ok(next)
    }

    fn winner(state: &NimState) -> Option<PlayerId> {
        if Self::is_over(state) {
            // The player who just emptied the last row wins.
            Some(state.to_move.opponent())
        } else {
            None
        }
    }

    fn is_over(state: &NimState) -> bool {
        state.rows.iter().all(|&row| row == 0)
    }

    fn position_key(state: &NimState) -> Vec<u32> {
        state.rows.clone()
    }
}
