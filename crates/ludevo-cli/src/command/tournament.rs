use std::path::PathBuf;

use chrono::Utc;

use ludevo_engine::{Game, MatchRunner, Nim, NimState, Player, PlayerId, Quixo, QuixoState, RngSeed};
use ludevo_stats::{DescriptiveStats, WinTally};

use crate::{
    schema::{TournamentReport, TurnSummary},
    util::Output,
};

use super::{GameKind, GeneticArgs, StrategyKind, derive_seeds, nim_player, quixo_player};

const TURN_LIMIT: usize = 200;
const NIM_ROWS: usize = 5;

#[derive(Debug, clap::Args)]
pub(crate) struct TournamentArg {
    /// Which game to play
    #[arg(long, default_value = "quixo")]
    game: GameKind,
    /// First strategy
    #[arg(long, default_value = "genetic")]
    one: StrategyKind,
    /// Second strategy
    #[arg(long, default_value = "random")]
    two: StrategyKind,
    /// Number of game pairs; each pair alternates who moves first
    #[arg(long, default_value_t = 10)]
    rounds: usize,
    /// Hex seed for a reproducible series
    #[arg(long)]
    seed: Option<RngSeed>,
    /// Output file path for the JSON report (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    genetic: GeneticArgs,
}

pub(crate) fn run(arg: &TournamentArg) -> anyhow::Result<()> {
    let (seed_one, seed_two) = derive_seeds(arg.seed);
    let (tally, turn_counts) = match arg.game {
        GameKind::Nim => {
            let mut one = nim_player(arg.one, arg.genetic, seed_one)?;
            let mut two = nim_player(arg.two, arg.genetic, seed_two)?;
            run_series::<Nim>(
                &NimState::new(NIM_ROWS),
                one.as_mut(),
                two.as_mut(),
                arg.rounds,
            )?
        }
        GameKind::Quixo => {
            let mut one = quixo_player(arg.one, arg.genetic, seed_one)?;
            let mut two = quixo_player(arg.two, arg.genetic, seed_two)?;
            run_series::<Quixo>(&QuixoState::new(), one.as_mut(), two.as_mut(), arg.rounds)?
        }
    };

    eprintln!();
    eprintln!("{} vs {} at {}:", arg.one, arg.two, arg.game);
    eprintln!("  {} wins: {}", arg.one, tally.wins_one);
    eprintln!("  {} wins: {}", arg.two, tally.wins_two);
    eprintln!("  draws:   {}", tally.draws);
    eprintln!(
        "  win rates: {:.3} / {:.3}",
        tally.win_rate_one(),
        tally.win_rate_two()
    );

    let turns = DescriptiveStats::new(turn_counts).as_ref().map(TurnSummary::from);
    let report = TournamentReport {
        game: arg.game.to_string(),
        strategy_one: arg.one.to_string(),
        strategy_two: arg.two.to_string(),
        games_played: tally.total(),
        wins_one: tally.wins_one,
        wins_two: tally.wins_two,
        draws: tally.draws,
        win_rate_one: tally.win_rate_one(),
        win_rate_two: tally.win_rate_two(),
        turns,
        created_at: Utc::now(),
    };
    Output::save_json(&report, arg.output.clone())
}

/// Plays `rounds` pairs of games, swapping who moves first inside each pair
/// so neither strategy keeps the first-mover advantage.
#[expect(clippy::cast_precision_loss)]
fn run_series<G: Game>(
    initial: &G::State,
    a: &mut dyn Player<G>,
    b: &mut dyn Player<G>,
    rounds: usize,
) -> anyhow::Result<(WinTally, Vec<f64>)> {
    let runner = MatchRunner::new(TURN_LIMIT);
    let mut tally = WinTally::new();
    let mut turn_counts = Vec::with_capacity(rounds * 2);
    let progress_step = (rounds / 10).max(1);

    for round in 0..rounds {
        let outcome = runner.play::<G>(initial, &mut *a, &mut *b)?;
        record(&mut tally, outcome.winner, false);
        turn_counts.push(outcome.turns as f64);

        let outcome = runner.play::<G>(initial, &mut *b, &mut *a)?;
        record(&mut tally, outcome.winner, true);
        turn_counts.push(outcome.turns as f64);

        if (round + 1) % progress_step == 0 {
            eprintln!("round {}/{rounds} complete", round + 1);
        }
    }
    Ok((tally, turn_counts))
}

/// Attributes an outcome to strategy `a` or `b`, accounting for swapped
/// seats.
fn record(tally: &mut WinTally, winner: Option<PlayerId>, swapped: bool) {
    match winner {
        None => tally.record_draw(),
        Some(seat) => {
            let a_won = match seat {
                PlayerId::One => !swapped,
                PlayerId::Two => swapped,
            };
            if a_won {
                tally.record_one();
            } else {
                tally.record_two();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_attributes_swapped_seats_correctly() {
        let mut tally = WinTally::new();
        record(&mut tally, Some(PlayerId::One), false);
        record(&mut tally, Some(PlayerId::One), true);
        record(&mut tally, Some(PlayerId::Two), false);
        record(&mut tally, Some(PlayerId::Two), true);
        record(&mut tally, None, false);
        assert_eq!(tally.wins_one, 2);
        assert_eq!(tally.wins_two, 2);
        assert_eq!(tally.draws, 1);
    }
}
