use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;

use ludevo_engine::{MatchRunner, PlayerId, Quixo, QuixoState, RngSeed};
use ludevo_evaluator::RandomPlayer;
use ludevo_stats::WinTally;
use ludevo_training::QLearningPlayer;

use crate::{schema::QPolicyModel, util::Output};

use super::derive_seeds;

const TURN_LIMIT: usize = 200;

#[derive(Debug, clap::Args)]
pub(crate) struct TrainQArg {
    /// Self-play training games
    #[arg(long, default_value_t = 2_000)]
    epochs: usize,
    /// Evaluation games against the random baseline after training
    #[arg(long, default_value_t = 1_000)]
    eval_games: usize,
    /// Learning rate
    #[arg(long, default_value_t = 0.6)]
    alpha: f64,
    /// Discount factor
    #[arg(long, default_value_t = 0.5)]
    gamma: f64,
    /// Exploration rate during training
    #[arg(long, default_value_t = 0.3)]
    epsilon: f64,
    /// Hex seed for a reproducible run
    #[arg(long)]
    seed: Option<RngSeed>,
    /// Output file path for the JSON model (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainQArg) -> anyhow::Result<()> {
    let (seed_one, seed_two) = derive_seeds(arg.seed);
    let mut learner = QLearningPlayer::with_seed(arg.alpha, arg.gamma, arg.epsilon, seed_one);
    let mut sparring = QLearningPlayer::with_seed(arg.alpha, arg.gamma, arg.epsilon, seed_two);
    let runner = MatchRunner::new(TURN_LIMIT);

    eprintln!("training for {} self-play games...", arg.epochs);
    let progress_step = (arg.epochs / 10).max(1);
    for epoch in 0..arg.epochs {
        let outcome = runner
            .play::<Quixo>(&QuixoState::new(), &mut learner, &mut sparring)
            .context("self-play game failed")?;
        match outcome.winner {
            Some(PlayerId::One) => {
                learner.reinforce(1.0);
                sparring.reinforce(-1.0);
            }
            Some(PlayerId::Two) => {
                learner.reinforce(-1.0);
                sparring.reinforce(1.0);
            }
            None => {
                learner.reinforce(0.0);
                sparring.reinforce(0.0);
            }
        }
        if (epoch + 1) % progress_step == 0 {
            eprintln!("  {}% complete", (epoch + 1) * 100 / arg.epochs);
        }
    }
    eprintln!("training complete, {} table entries", learner.table().len());

    // Evaluation: freeze exploration and play the random baseline.
    learner.set_epsilon(0.0);
    let (baseline_seed, _) = derive_seeds(None);
    let mut baseline = RandomPlayer::<Quixo>::with_seed(baseline_seed);
    let mut tally = WinTally::new();
    eprintln!("evaluating over {} games vs random...", arg.eval_games);
    for _ in 0..arg.eval_games {
        let outcome = runner
            .play::<Quixo>(&QuixoState::new(), &mut learner, &mut baseline)
            .context("evaluation game failed")?;
        match outcome.winner {
            Some(PlayerId::One) => tally.record_one(),
            Some(PlayerId::Two) => tally.record_two(),
            None => tally.record_draw(),
        }
    }
    eprintln!(
        "eval: {} wins, {} losses, {} draws (win rate {:.3})",
        tally.wins_one,
        tally.wins_two,
        tally.draws,
        tally.win_rate_one()
    );

    let model = QPolicyModel {
        name: "q-learning".to_owned(),
        trained_at: Utc::now(),
        alpha: arg.alpha,
        gamma: arg.gamma,
        epsilon: arg.epsilon,
        epochs: arg.epochs,
        table_entries: learner.table().len(),
        win_rate_vs_random: tally.win_rate_one(),
        table: learner.into_table(),
    };
    Output::save_json(&model, arg.output.clone())?;
    eprintln!("model saved");
    Ok(())
}
