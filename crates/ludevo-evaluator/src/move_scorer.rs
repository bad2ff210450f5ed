//! The move fitness pipeline: validate a candidate, simulate it against a
//! disposable copy of the position, and score the result.

use ludevo_engine::Game;

use crate::heuristic::PositionHeuristic;

/// Sentinel fitness for candidates that fail validation.
///
/// Strictly lower than any score a legal move can attain (triangular scores
/// of legal moves can be well below zero on opponent-heavy boards, so a
/// finite sentinel would be unsound).
pub const INVALID_MOVE_SCORE: f64 = f64::NEG_INFINITY;

/// Scores candidate moves by simulating them.
///
/// Evaluation never mutates the input state: the successor is produced by
/// [`Game::apply`] on a clone, so repeated evaluations of the same
/// `(state, move)` pair always return the same score.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveScorer<H> {
    heuristic: H,
}

impl<H> MoveScorer<H> {
    pub fn new(heuristic: H) -> Self {
        Self { heuristic }
    }

    /// Fitness of `mv` in `state` for the player to move.
    ///
    /// Illegal candidates score [`INVALID_MOVE_SCORE`] and are not simulated.
    pub fn score<G>(&self, state: &G::State, mv: G::Move) -> f64
    where
        G: Game,
        H: PositionHeuristic<G>,
    {
        if !G::is_legal(state, mv) {
            return INVALID_MOVE_SCORE;
        }
        let mover = G::current_player(state);
        match G::apply(state, mv) {
            Ok(next) => self.heuristic.score_position(&next, mover),
            Err(_) => INVALID_MOVE_SCORE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ludevo_engine::{
        BOARD_SIZE, Nim, NimState, Nimply, PlayerId, Quixo, QuixoBoard, QuixoMove, QuixoState,
        Slide,
    };

    use crate::heuristic::{TriangularRuns, ZeroNimSum};

    #[test]
    fn test_illegal_candidate_gets_sentinel() {
        let scorer = MoveScorer::new(TriangularRuns);
        let state = QuixoState::new();
        let interior = QuixoMove {
            row: 2,
            col: 2,
            slide: Slide::Top,
        };
        assert_eq!(scorer.score::<Quixo>(&state, interior), INVALID_MOVE_SCORE);
    }

    #[test]
    fn test_sentinel_is_below_every_legal_score() {
        // Board dominated by the opponent: legal moves still score deeply
        // negative, but never as low as the sentinel.
        let mut cells = [[Some(PlayerId::Two); BOARD_SIZE]; BOARD_SIZE];
        cells[0][0] = None;
        let state = QuixoState::from_parts(QuixoBoard::from_cells(cells), PlayerId::One);
        let scorer = MoveScorer::new(TriangularRuns);
        for mv in Quixo::legal_moves(&state) {
            let score = scorer.score::<Quixo>(&state, mv);
            assert!(score > INVALID_MOVE_SCORE, "{mv:?} scored {score}");
        }
    }

    #[test]
    fn test_evaluation_does_not_mutate_state() {
        let state = NimState::new(5);
        let before = state.clone();
        let scorer = MoveScorer::new(ZeroNimSum);
        scorer.score::<Nim>(&state, Nimply { row: 4, take: 9 });
        assert_eq!(state, before);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let state = NimState::new(5);
        let scorer = MoveScorer::new(ZeroNimSum);
        let mv = Nimply { row: 3, take: 2 };
        let first = scorer.score::<Nim>(&state, mv);
        for _ in 0..10 {
            assert_eq!(scorer.score::<Nim>(&state, mv), first);
        }
    }

    #[test]
    fn test_nim_scorer_prefers_balancing_move() {
        // From <1 3>, taking 2 from row 1 leaves <1 1> with nim-sum 0.
        let state = NimState::from_rows(vec![1, 3]);
        let scorer = MoveScorer::new(ZeroNimSum);
        let balancing = scorer.score::<Nim>(&state, Nimply { row: 1, take: 2 });
        let other = scorer.score::<Nim>(&state, Nimply { row: 1, take: 1 });
        assert_eq!(balancing, 0.0);
        assert!(other < balancing);
    }
}
