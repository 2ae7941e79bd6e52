//! Simulator CLI - run unattended games between AI tiers.
//!
//! The `you` seat is played by the `--pilot` tier, so every game runs to
//! completion without input.

use std::time::Instant;

use clap::Parser;
use equilibrium_market::core::{Difficulty, GameConfig, PlayerId, PlayerMap};
use equilibrium_market::game::{Game, NullObserver, Progress};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simulate")]
#[command(about = "Run seeded games between AI tiers and report results")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "100")]
    games: u64,

    /// Tier for cpuA
    #[arg(long, default_value = "medium")]
    cpu_a: Difficulty,

    /// Tier for cpuB
    #[arg(long, default_value = "medium")]
    cpu_b: Difficulty,

    /// Tier playing the `you` seat
    #[arg(long, default_value = "easy")]
    pilot: Difficulty,

    /// Seed of the first game; game N uses seed + N
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Print final standings of every game
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Default)]
struct Tally {
    /// Games where the seat shared first place.
    wins: PlayerMap<u64>,
    vp: PlayerMap<u64>,
    sudden_deaths: u64,
    finished: u64,
}

fn main() {
    let args = Args::parse();

    let default = if args.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(games = args.games, cpu_a = %args.cpu_a, cpu_b = %args.cpu_b, pilot = %args.pilot, "starting simulation");

    let start = Instant::now();
    let mut tally = Tally::default();

    for n in 0..args.games {
        let seed = args.seed.wrapping_add(n);
        let config = GameConfig::new()
            .with_seed(seed)
            .with_difficulty(PlayerId::CpuA, args.cpu_a)
            .with_difficulty(PlayerId::CpuB, args.cpu_b)
            .with_autopilot(args.pilot);
        let mut game = Game::new(config);

        let standings = match game.advance(&mut NullObserver) {
            Progress::Finished(standings) => standings,
            Progress::Awaiting(decision) => {
                warn!(seed, ?decision, "game stopped on a human decision");
                continue;
            }
        };

        for player in standings.leaders() {
            tally.wins[player] += 1;
        }
        for entry in standings.entries() {
            tally.vp[entry.player] += u64::from(entry.vp);
        }
        tally.sudden_deaths += game.history().iter().filter(|r| r.sudden_death.is_some()).count() as u64;
        tally.finished += 1;

        if args.verbose {
            println!("game {} (seed {seed})\n{standings}\n", n + 1);
        }
    }

    let elapsed = start.elapsed();
    let games = tally.finished.max(1) as f64;

    println!("{} games in {:.2?}", tally.finished, elapsed);
    println!("{:<6} {:<8} {:>6} {:>8}", "seat", "tier", "wins", "avg VP");
    for player in PlayerId::ALL {
        let tier = match player {
            PlayerId::You => args.pilot,
            PlayerId::CpuA => args.cpu_a,
            PlayerId::CpuB => args.cpu_b,
        };
        println!(
            "{:<6} {:<8} {:>6} {:>8.2}",
            player.name(),
            tier.name(),
            tally.wins[player],
            tally.vp[player] as f64 / games
        );
    }
    println!("sudden deaths: {}", tally.sudden_deaths);
}
