mod card;
mod game;
mod rng;
mod simulation;

use card::CardSetConfig;
use clap::{Parser, Subcommand};
use game::GameConfig;
use rayon::prelude::*;
use simulation::runner::{run_game, GameResult};
use simulation::RandomPolicy;
use std::collections::HashMap;

#[derive(Parser)]
#[command(name = "flip7-sim")]
#[command(about = "Flip7 random-policy game simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Seed for random number generator (for reproducibility)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Enable verbose output for the first game
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch of games (default)
    Run {
        /// Number of games to simulate
        #[arg(short = 'n', long, default_value = "1000")]
        games: usize,

        /// Number of players
        #[arg(short, long, default_value = "2")]
        players: usize,

        /// Target score ending the game
        #[arg(short, long, default_value = "100")]
        target: u32,

        /// Probability of choosing Hit over Stay
        #[arg(short, long, default_value = "0.9")]
        bias: f64,

        /// Card-set composition JSON file (defaults to the standard 98-card set)
        #[arg(long)]
        card_set: Option<String>,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Enable verbose output for the first game
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compare two Hit biases head-to-head in two-player games
    Compare {
        /// Hit bias for the first strategy
        bias1: f64,

        /// Hit bias for the second strategy
        bias2: f64,

        /// Number of games (seat order alternates each game)
        #[arg(short = 'n', long, default_value = "1000")]
        games: usize,

        /// Target score ending the game
        #[arg(short, long, default_value = "100")]
        target: u32,

        /// Seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            games,
            players,
            target,
            bias,
            card_set,
            seed,
            verbose,
        }) => {
            let config = build_config(players, target, card_set.as_deref());
            run_batch(&config, bias, games, seed, verbose);
        }
        Some(Commands::Compare {
            bias1,
            bias2,
            games,
            target,
            seed,
        }) => {
            let config = build_config(2, target, None);
            compare_biases(&config, bias1, bias2, games, seed);
        }
        None => {
            // Default: run a batch with CLI args
            let games = if cli.verbose { 1 } else { 1000 };
            let config = build_config(2, 100, None);
            run_batch(
                &config,
                RandomPolicy::DEFAULT_HIT_BIAS,
                games,
                cli.seed,
                cli.verbose,
            );
        }
    }
}

fn build_config(players: usize, target: u32, card_set: Option<&str>) -> GameConfig {
    let card_set = match card_set {
        Some(path) => match CardSetConfig::from_file(path) {
            Ok(set) => {
                eprintln!("✓ Loaded card set from {} ({} cards)", path, set.card_count());
                set
            }
            Err(e) => {
                eprintln!("✗ Failed to load card set '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => CardSetConfig::default(),
    };

    let config = GameConfig {
        players,
        target_score: target,
        card_set,
        ..GameConfig::default()
    };
    if let Err(e) = config.validate() {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
    config
}

fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn collect_results(results: Vec<Result<GameResult, game::GameError>>) -> Vec<GameResult> {
    match results.into_iter().collect::<Result<Vec<_>, _>>() {
        Ok(results) => results,
        Err(e) => {
            eprintln!("✗ Simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_batch(config: &GameConfig, bias: f64, num_games: usize, seed: Option<u64>, verbose: bool) {
    let policy = RandomPolicy::uniform(bias);

    println!("\n=== Flip7 Simulator ===\n");
    println!(
        "Players: {}, Target: {}, Hit bias: {:.2}",
        config.players, config.target_score, bias
    );
    println!("Deck: {} cards", config.card_set.card_count());
    println!("Games: {}", num_games);
    if let Some(s) = seed {
        println!("Seed: {}", s);
    }
    println!();

    let start = std::time::Instant::now();
    let results: Vec<GameResult> = if let Some(base_seed) = seed {
        // Sequential with fixed seed
        collect_results(
            (0..num_games)
                .map(|i| run_game(config, &policy, base_seed + i as u64, verbose && i == 0))
                .collect(),
        )
    } else if verbose {
        // Sequential for verbose mode (verbose only makes sense for the first game)
        let seed = time_seed();
        println!("Seed: {}", seed);
        collect_results(
            (0..num_games)
                .map(|i| run_game(config, &policy, seed.wrapping_add(i as u64), i == 0))
                .collect(),
        )
    } else {
        // Parallel with random seeds
        let seed = time_seed();
        collect_results(
            (0..num_games)
                .into_par_iter()
                .map(|i| run_game(config, &policy, seed.wrapping_add(i as u64), false))
                .collect(),
        )
    };
    let elapsed = start.elapsed();

    // Seat win rates
    let mut wins_per_seat = vec![0usize; config.players];
    for result in &results {
        wins_per_seat[result.winner] += 1;
    }

    let total_rounds: u32 = results.iter().map(|r| r.rounds).sum();
    let avg_rounds = total_rounds as f64 / num_games as f64;
    let avg_winning_score = results
        .iter()
        .map(|r| r.final_scores[r.winner] as f64)
        .sum::<f64>()
        / num_games as f64;
    let flip7_rounds: u32 = results.iter().map(|r| r.flip7_rounds).sum();

    println!("=== Results ===\n");
    println!("Seat win rates:");
    for (seat, wins) in wins_per_seat.iter().enumerate() {
        let pct = *wins as f64 / num_games as f64 * 100.0;
        println!("  Player {}: {:5.1}% ({}/{})", seat + 1, pct, wins, num_games);
    }
    println!();
    println!("Average rounds per game: {:.2}", avg_rounds);
    println!("Average winning score: {:.1}", avg_winning_score);
    println!(
        "Flip 7 rate: {:.1}% of rounds ({}/{})",
        flip7_rounds as f64 / total_rounds as f64 * 100.0,
        flip7_rounds,
        total_rounds
    );
    println!();

    // Round-count distribution
    let mut round_dist: HashMap<u32, usize> = HashMap::new();
    for result in &results {
        *round_dist.entry(result.rounds).or_insert(0) += 1;
    }
    println!("Round-count distribution:");
    let mut rounds: Vec<_> = round_dist.iter().collect();
    rounds.sort_by_key(|(r, _)| *r);
    for (round_count, count) in rounds {
        let pct = *count as f64 / num_games as f64 * 100.0;
        let bar = "█".repeat((pct / 2.0) as usize);
        println!("  {:3} rounds: {:5.1}% {} ({})", round_count, pct, bar, count);
    }

    println!();
    println!(
        "Simulation completed in {:.2?} ({:.0} games/sec)",
        elapsed,
        num_games as f64 / elapsed.as_secs_f64()
    );
}

fn compare_biases(config: &GameConfig, bias1: f64, bias2: f64, num_games: usize, seed: Option<u64>) {
    println!("\n=== Flip7 Bias Comparison ===\n");
    println!("Bias 1: {:.2}", bias1);
    println!("Bias 2: {:.2}", bias2);
    println!("Target: {}", config.target_score);
    println!("Games: {} (seat order alternates)", num_games);
    println!();

    let base_seed = seed.unwrap_or_else(time_seed);
    let start = std::time::Instant::now();

    // Even games seat bias1 first, odd games seat bias2 first, cancelling
    // the first-seat advantage.
    let results: Vec<(usize, GameResult)> = collect_results(
        (0..num_games)
            .into_par_iter()
            .map(|i| {
                let biases = if i % 2 == 0 {
                    vec![bias1, bias2]
                } else {
                    vec![bias2, bias1]
                };
                let policy = RandomPolicy::per_seat(biases);
                run_game(config, &policy, base_seed.wrapping_add(i as u64), false)
            })
            .collect(),
    )
    .into_iter()
    .enumerate()
    .collect();

    let mut bias1_wins = 0usize;
    for (i, result) in &results {
        let bias1_seat = if i % 2 == 0 { 0 } else { 1 };
        if result.winner == bias1_seat {
            bias1_wins += 1;
        }
    }
    let bias2_wins = num_games - bias1_wins;
    let elapsed = start.elapsed();

    let rate1 = bias1_wins as f64 / num_games as f64 * 100.0;
    let rate2 = bias2_wins as f64 / num_games as f64 * 100.0;

    println!("=== Results ===\n");
    println!("{:20} {:>12} {:>12}", "Metric", format!("bias {:.2}", bias1), format!("bias {:.2}", bias2));
    println!("{:-<50}", "");
    println!("{:20} {:>11.1}% {:>11.1}%", "Win rate", rate1, rate2);

    println!();
    if bias1_wins > bias2_wins {
        println!("✓ Bias {:.2} wins {:.1}% more games", bias1, rate1 - rate2);
    } else if bias2_wins > bias1_wins {
        println!("✓ Bias {:.2} wins {:.1}% more games", bias2, rate2 - rate1);
    } else {
        println!("Both biases win the same number of games");
    }

    println!("\nCompleted in {:.2?}", elapsed);
}
