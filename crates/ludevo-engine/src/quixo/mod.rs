//! Quixo: take a cube from the border (empty or your own), then slide it back
//! in from another edge, shifting the whole row or column.
//!
//! A full line of five of one player's cubes wins. A move that completes a
//! line for both players at once loses: the mover's opponent takes the game.

pub use self::board::*;

mod board;

use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{
    IllegalMoveError,
    game::{Game, PlayerId},
};

/// Marker type implementing [`Game`] for Quixo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quixo;

/// Edge a taken cube re-enters the board from.
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
pub enum Slide {
    #[display("top")]
    Top,
    #[display("bottom")]
    Bottom,
    #[display("left")]
    Left,
    #[display("right")]
    Right,
}

impl Slide {
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];
}

/// One Quixo move: pick up the cube at `(row, col)` and slide it back in from
/// the `slide` edge.
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
#[display("({row},{col}) from {slide}")]
pub struct QuixoMove {
    pub row: usize,
    pub col: usize,
    pub slide: Slide,
}

/// A Quixo position: board contents plus the player to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuixoState {
    board: QuixoBoard,
    to_move: PlayerId,
}

impl Default for QuixoState {
    fn default() -> Self {
        Self::new()
    }
}

impl QuixoState {
    /// Empty board, `player 1` to move.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: QuixoBoard::EMPTY,
            to_move: PlayerId::One,
        }
    }

    #[must_use]
    pub fn from_parts(board: QuixoBoard, to_move: PlayerId) -> Self {
        Self { board, to_move }
    }

    #[must_use]
    pub fn board(&self) -> &QuixoBoard {
        &self.board
    }
}

impl fmt::Display for QuixoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.board.fmt(f)
    }
}

/// Slides legal at a border position.
///
/// A cube may not re-enter from an edge its position lies on, so corners
/// allow 2 slides and other border cells 3. Interior positions allow none.
#[must_use]
pub fn allowed_slides(row: usize, col: usize) -> ArrayVec<Slide, 4> {
    let mut slides = ArrayVec::new();
    if !QuixoBoard::is_border(row, col) {
        return slides;
    }
    for slide in Slide::ALL {
        let blocked = match slide {
            Slide::Top => row == 0,
            Slide::Bottom => row == BOARD_SIZE - 1,
            Slide::Left => col == 0,
            Slide::Right => col == BOARD_SIZE - 1,
        };
        if !blocked {
            slides.push(slide);
        }
    }
    slides
}

impl Game for Quixo {
    type State = QuixoState;
    type Move = QuixoMove;
    type PositionKey = QuixoBoard;

    fn current_player(state: &QuixoState) -> PlayerId {
        state.to_move
    }

    fn legal_moves(state: &QuixoState) -> Vec<QuixoMove> {
        let mut moves = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if !QuixoBoard::is_border(row, col) {
                    continue;
                }
                match state.board.cell(row, col) {
                    None => {}
                    Some(owner) if owner == state.to_move => {}
                    Some(_) => continue,
                }
                for slide in allowed_slides(row, col) {
                    moves.push(QuixoMove { row, col, slide });
                }
            }
        }
        moves
    }

    fn is_legal(state: &QuixoState, mv: QuixoMove) -> bool {
        if mv.row >= BOARD_SIZE || mv.col >= BOARD_SIZE {
            return false;
        }
        match state.board.cell(mv.row, mv.col) {
            Some(owner) if owner != state.to_move => return false,
            _ => {}
        }
        allowed_slides(mv.row, mv.col).contains(&mv.slide)
    }

    fn apply(state: &QuixoState, mv: QuixoMove) -> Result<QuixoState, IllegalMoveError> {
        if !Self::is_legal(state, mv) {
            return Err(IllegalMoveError);
        }
        let mover = state.to_move;
        let mut board = state.board;
        let QuixoMove { row, col, slide } = mv;
        // The taken cube leaves a gap at (row, col); the line shifts toward
        // the gap and the cube re-enters, re-marked for the mover, at the
        // slide edge.
        match slide {
            Slide::Left => {
                let mut c = col;
                while c > 0 {
                    board.cells[row][c] = board.cells[row][c - 1];
                    c -= 1;
                }
                board.cells[row][0] = Some(mover);
            }
            Slide::Right => {
                for c in col..BOARD_SIZE - 1 {
                    board.cells[row][c] = board.cells[row][c + 1];
                }
                board.cells[row][BOARD_SIZE - 1] = Some(mover);
            }
            Slide::Top => {
                let mut r = row;
                while r > 0 {
                    board.cells[r][col] = board.cells[r - 1][col];
                    r -= 1;
                }
                board.cells[0][col] = Some(mover);
            }
            Slide::Bottom => {
                for r in row..BOARD_SIZE - 1 {
                    board.cells[r][col] = board.cells[r + 1][col];
                }
                board.cells[BOARD_SIZE - 1][col] = Some(mover);
            }
        }
        Ok(QuixoState {
            board,
            to_move: mover.opponent(),
        })
    }

    fn winner(state: &QuixoState) -> Option<PlayerId> {
        let mut one = false;
        let mut two = false;
        for line in state.board.lines() {
            match QuixoBoard::line_owner(&line) {
                Some(PlayerId::One) => one = true,
                Some(PlayerId::Two) => two = true,
                None => {}
            }
        }
        match (one, two) {
            // Completing a line for both sides loses: the player to move is
            // the one who did not make the last move.
            (true, true) => Some(state.to_move),
            (true, false) => Some(PlayerId::One),
            (false, true) => Some(PlayerId::Two),
            (false, false) => None,
        }
    }

    fn is_over(state: &QuixoState) -> bool {
        Self::winner(state).is_some()
    }

    fn position_key(state: &QuixoState) -> QuixoBoard {
        state.board
    }
}
