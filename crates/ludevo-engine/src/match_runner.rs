use crate::{
    IllegalMoveError,
    game::{Game, PlayerId},
    player::{MoveSelectionError, Player},
};

/// Result of one finished (or capped) match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    /// `None` means the turn limit was reached without a winner.
    pub winner: Option<PlayerId>,
    pub turns: usize,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum MatchError {
    #[display("{player} failed to select a move: {source}")]
    Selection {
        player: PlayerId,
        source: MoveSelectionError,
    },
    #[display("{player} proposed an illegal move")]
    IllegalMove {
        player: PlayerId,
        source: IllegalMoveError,
    },
}

/// Plays two strategies against each other from a given position.
///
/// The turn limit exists because Quixo positions can cycle; hitting it is
/// reported as a draw rather than an error.
#[derive(Debug, Clone, Copy)]
pub struct MatchRunner {
    turn_limit: usize,
}

impl MatchRunner {
    #[must_use]
    pub fn new(turn_limit: usize) -> Self {
        Self { turn_limit }
    }

    pub fn play<G: Game>(
        &self,
        initial: &G::State,
        one: &mut dyn Player<G>,
        two: &mut dyn Player<G>,
    ) -> Result<MatchOutcome, MatchError> {
        let mut state = initial.clone();
        let mut turns = 0;
        while !G::is_over(&state) && turns < self.turn_limit {
            let mover = G::current_player(&state);
            let player: &mut dyn Player<G> = match mover {
                PlayerId::One => &mut *one,
                PlayerId::Two => &mut *two,
            };
            let mv = player
                .choose_move(&state)
                .map_err(|source| MatchError::Selection {
                    player: mover,
                    source,
                })?;
            state = G::apply(&state, mv).map_err(|source| MatchError::IllegalMove {
                player: mover,
                source,
            })?;
            turns += 1;
        }
        Ok(MatchOutcome {
            winner: G::winner(&state),
            turns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::nim::{Nim, NimState, Nimply};

    /// Always takes one object from the first non-empty row.
    struct OneAtATime;

    impl Player<Nim> for OneAtATime {
        fn choose_move(&mut self, state: &NimState) -> Result<Nimply, MoveSelectionError> {
            state
                .rows()
                .iter()
                .position(|&count| count > 0)
                .map(|row| Nimply { row, take: 1 })
                .ok_or(MoveSelectionError::NoLegalCandidate)
        }
    }

    #[test]
    fn test_match_plays_to_completion() {
        let runner = MatchRunner::new(100);
        let state = NimState::from_rows(vec![2, 1]);
        let outcome = runner
            .play::<Nim>(&state, &mut OneAtATime, &mut OneAtATime)
            .unwrap();
        // Three objects, one per turn: the first player takes the last one.
        assert_eq!(outcome.turns, 3);
        assert_eq!(outcome.winner, Some(PlayerId::One));
    }

    #[test]
    fn test_turn_limit_produces_a_draw() {
        let runner = MatchRunner::new(2);
        let state = NimState::from_rows(vec![5, 5]);
        let outcome = runner
            .play::<Nim>(&state, &mut OneAtATime, &mut OneAtATime)
            .unwrap();
        assert_eq!(outcome.turns, 2);
        assert_eq!(outcome.winner, None);
    }

    #[test]
    fn test_selection_failure_is_reported_with_player() {
        struct Refuses;
        impl Player<Nim> for Refuses {
            fn choose_move(&mut self, _state: &NimState) -> Result<Nimply, MoveSelectionError> {
                Err(MoveSelectionError::NoLegalCandidate)
            }
        }

        let runner = MatchRunner::new(10);
        let state = NimState::from_rows(vec![1]);
        let err = runner
            .play::<Nim>(&state, &mut Refuses, &mut OneAtATime)
            .unwrap_err();
        assert!(matches!(
            err,
            MatchError::Selection {
                player: PlayerId::One,
                ..
            }
        ));
    }
}
