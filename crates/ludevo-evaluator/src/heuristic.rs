//! Position heuristics: how good does a resulting position look for the
//! player who just moved?
//!
//! All heuristics are stateless value objects so strategies can be swapped
//! freely; higher scores are always better for the scored player.

use ludevo_engine::{
    BOARD_SIZE, Cell, Game, Nim, NimState, PlayerId, Quixo, QuixoState, nim_sum,
};

/// Scores a position from the point of view of `player`.
///
/// Implementations must be pure: same state, same score, no side effects.
pub trait PositionHeuristic<G: Game> {
    fn score_position(&self, state: &G::State, player: PlayerId) -> f64;
}

/// Canonical Quixo heuristic: triangular scoring of contiguous runs.
///
/// For every line (5 rows, 5 columns, 2 diagonals), a contiguous run of `k`
/// of the player's cubes contributes `1 + 2 + ... + k`, rewarding long runs
/// superlinearly as a proxy for closeness to a winning line. Each opposing
/// cube in the line costs one point and breaks the current run; empty cells
/// break the run without penalty.
///
/// A fully owned line contributes 15.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriangularRuns;

fn triangular_line_score(line: &[Cell; BOARD_SIZE], player: PlayerId) -> i32 {
    let mut score = 0;
    let mut run = 0;
    for cell in line {
        match cell {
            Some(owner) if *owner == player => {
                run += 1;
                score += run;
            }
            Some(_) => {
                run = 0;
                score -= 1;
            }
            None => run = 0,
        }
    }
    score
}

impl PositionHeuristic<Quixo> for TriangularRuns {
    fn score_position(&self, state: &QuixoState, player: PlayerId) -> f64 {
        let total: i32 = state
            .board()
            .lines()
            .map(|line| triangular_line_score(&line, player))
            .sum();
        f64::from(total)
    }
}

/// Simple Quixo heuristic: count fully-owned rows and columns, plus the
/// player's cubes on each diagonal.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineOccupancy;

impl PositionHeuristic<Quixo> for LineOccupancy {
    fn score_position(&self, state: &QuixoState, player: PlayerId) -> f64 {
        let board = state.board();
        let mut score = 0;
        for r in 0..BOARD_SIZE {
            if (0..BOARD_SIZE).all(|c| board.cell(r, c) == Some(player)) {
                score += 1;
            }
        }
        for c in 0..BOARD_SIZE {
            if (0..BOARD_SIZE).all(|r| board.cell(r, c) == Some(player)) {
                score += 1;
            }
        }
        for i in 0..BOARD_SIZE {
            if board.cell(i, i) == Some(player) {
                score += 1;
            }
            if board.cell(i, BOARD_SIZE - 1 - i) == Some(player) {
                score += 1;
            }
        }
        f64::from(score)
    }
}

/// Simplest Quixo heuristic: the most cubes the player has in any one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxLineCount;

impl PositionHeuristic<Quixo> for MaxLineCount {
    fn score_position(&self, state: &QuixoState, player: PlayerId) -> f64 {
        let best = state
            .board()
            .lines()
            .map(|line| {
                i32::try_from(
                    line.iter()
                        .filter(|&&cell| cell == Some(player))
                        .count(),
                )
                .unwrap_or(i32::MAX)
            })
            .max()
            .unwrap_or(0);
        f64::from(best)
    }
}

/// Nim heuristic: positions with nim-sum zero are the ones to hand the
/// opponent, so the score is the negated nim-sum of the resulting state.
///
/// A move that leaves nim-sum zero scores 0.0, the maximum.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroNimSum;

impl PositionHeuristic<Nim> for ZeroNimSum {
    fn score_position(&self, state: &NimState, _player: PlayerId) -> f64 {
        -f64::from(nim_sum(state))
    }
}
