use clap::{Parser, Subcommand};

use ludevo_engine::{Nim, Player, Quixo, RngSeed};
use ludevo_evaluator::{
    GreedyPlayer, LowestRowPlayer, NimSumPlayer, RandomPlayer, TriangularRuns, ZeroNimSum,
};
use ludevo_training::{
    CachePolicy, SearchConfig, nim_evolution_player, nim_search_config, quixo_genetic_player,
    quixo_search_config,
};
use rand::Rng as _;

mod play;
mod tournament;
mod train_q;

#[derive(Debug, Parser)]
#[command(author, version, about = "Game-playing agents for Nim and Quixo", long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Play one game with a verbose move log
    Play(play::PlayArg),
    /// Play a series of games between two strategies and report statistics
    Tournament(tournament::TournamentArg),
    /// Train the Q-learning player by self-play and export the model
    TrainQ(train_q::TrainQArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Play(arg) => play::run(&arg),
        Mode::Tournament(arg) => tournament::run(&arg),
        Mode::TrainQ(arg) => train_q::run(&arg),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub(crate) enum GameKind {
    #[display("nim")]
    Nim,
    #[display("quixo")]
    Quixo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub(crate) enum StrategyKind {
    /// Uniform over the legal moves.
    #[display("random")]
    Random,
    /// One-step heuristic argmax (triangular runs for Quixo, nim-sum for
    /// Nim).
    #[display("greedy")]
    Greedy,
    /// Exact nim-sum play (Nim only).
    #[display("optimal")]
    Optimal,
    /// Empty the lowest non-empty row (Nim only).
    #[display("takeall")]
    TakeAll,
    /// Evolutionary strategy with soft mutation and adaptive rate (Nim
    /// only).
    #[display("evolve")]
    Evolve,
    /// Genetic move search with per-position memory (Quixo only).
    #[display("genetic")]
    Genetic,
    /// Genetic move search without memory (Quixo only).
    #[display("fresh")]
    Fresh,
}

/// Overrides for the genetic players' search parameters.
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub(crate) struct GeneticArgs {
    /// Population size per move search (strategy default when omitted)
    #[arg(long)]
    population: Option<usize>,
    /// Generations per move search (strategy default when omitted)
    #[arg(long)]
    generations: Option<usize>,
}

impl GeneticArgs {
    fn apply(self, mut config: SearchConfig) -> SearchConfig {
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        config
    }
}

/// Expands an optional base seed into two independent per-player seeds.
pub(crate) fn derive_seeds(seed: Option<RngSeed>) -> (RngSeed, RngSeed) {
    let base: RngSeed = seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = base.rng();
    (rng.random(), rng.random())
}

pub(crate) fn nim_player(
    kind: StrategyKind,
    genetic: GeneticArgs,
    seed: RngSeed,
) -> anyhow::Result<Box<dyn Player<Nim>>> {
    let player: Box<dyn Player<Nim>> = match kind {
        StrategyKind::Random => Box::new(RandomPlayer::<Nim>::with_seed(seed)),
        StrategyKind::Greedy => Box::new(GreedyPlayer::<Nim, _>::new(ZeroNimSum)),
        StrategyKind::Optimal => Box::new(NimSumPlayer::with_seed(seed)),
        StrategyKind::TakeAll => Box::new(LowestRowPlayer),
        StrategyKind::Evolve => Box::new(nim_evolution_player(
            genetic.apply(nim_search_config()),
            seed,
        )),
        StrategyKind::Genetic | StrategyKind::Fresh => {
            anyhow::bail!("strategy `{kind}` is not available for nim")
        }
    };
    Ok(player)
}

pub(crate) fn quixo_player(
    kind: StrategyKind,
    genetic: GeneticArgs,
    seed: RngSeed,
) -> anyhow::Result<Box<dyn Player<Quixo>>> {
    let player: Box<dyn Player<Quixo>> = match kind {
        StrategyKind::Random => Box::new(RandomPlayer::<Quixo>::with_seed(seed)),
        StrategyKind::Greedy => Box::new(GreedyPlayer::<Quixo, _>::new(TriangularRuns)),
        StrategyKind::Genetic => Box::new(quixo_genetic_player(
            genetic.apply(quixo_search_config()),
            true,
            CachePolicy::KeepBest,
            seed,
        )),
        StrategyKind::Fresh => Box::new(quixo_genetic_player(
            genetic.apply(quixo_search_config()),
            false,
            CachePolicy::KeepBest,
            seed,
        )),
        StrategyKind::Optimal | StrategyKind::TakeAll | StrategyKind::Evolve => {
            anyhow::bail!("strategy `{kind}` is not available for quixo")
        }
    };
    Ok(player)
}
