//! Nectar forager CLI.
//!
//! Provides three modes of operation:
//! - `headless`: Run an arena without a window and print episode statistics
//! - `config`: Print the default or a loaded configuration as TOML
//! - `info`: Print workspace crate versions

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bevy::log::Level;
use clap::{Parser, Subcommand, ValueEnum};

use nectar_agent::{HomingPolicy, IdlePolicy, RandomPolicy};
use nectar_core::config::NectarConfig;
use nectar_sim::{ArenaBuilder, ArenaLayout, EpisodeStats, SpawnedArena};

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Hummingbird foraging arena.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyKind {
    /// Steer straight at the current target.
    Homing,
    /// Uniform random actions.
    Random,
    /// Hover in place.
    Idle,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an arena headless and print statistics.
    Headless {
        /// TOML config file. Defaults are used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// TOML arena layout. A ring of plants is generated when omitted.
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Episodes to complete (training mode only).
        #[arg(short = 'n', long, default_value_t = 1)]
        episodes: u32,

        /// Tick limit for the whole run.
        #[arg(short = 't', long, default_value_t = 2000)]
        ticks: u32,

        /// Random seed, overriding the config.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Force training mode on.
        #[arg(long)]
        training: bool,

        #[arg(short, long, value_enum, default_value_t = PolicyKind::Homing)]
        policy: PolicyKind,

        /// Plants in the generated ring.
        #[arg(long, default_value_t = 6)]
        plants: usize,

        /// Flowers per plant in the generated ring.
        #[arg(long, default_value_t = 3)]
        flowers: usize,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Print configuration as TOML.
    Config {
        /// Config file to load and validate. Defaults are printed when omitted.
        path: Option<PathBuf>,
    },

    /// Print crate information.
    Info,
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

struct HeadlessArgs {
    config: Option<PathBuf>,
    layout: Option<PathBuf>,
    episodes: u32,
    ticks: u32,
    seed: Option<u64>,
    training: bool,
    policy: PolicyKind,
    plants: usize,
    flowers: usize,
    verbose: bool,
}

fn load_config(path: Option<&Path>) -> AppResult<NectarConfig> {
    Ok(match path {
        Some(path) => NectarConfig::from_file(path)?,
        None => NectarConfig::default(),
    })
}

fn load_layout(path: &Path) -> AppResult<ArenaLayout> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn run_headless(args: HeadlessArgs) -> AppResult<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.training {
        config.training_mode = true;
    }
    let layout = match args.layout.as_deref() {
        Some(path) => load_layout(path)?,
        None => ArenaLayout::ring(args.plants, args.flowers, 3.0),
    };
    let training = config.training_mode;
    let seed = config.seed;

    let builder = ArenaBuilder::new()
        .with_config(config)
        .with_layout(layout)
        .with_logging(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        });
    let builder = match args.policy {
        PolicyKind::Homing => builder.with_forager(HomingPolicy::default()),
        PolicyKind::Random => builder.with_forager(RandomPolicy::new(seed)),
        PolicyKind::Idle => builder.with_forager(IdlePolicy),
    };
    let mut arena = builder.build()?;

    let mut ticks = 0;
    while ticks < args.ticks {
        arena.app.update();
        ticks += 1;
        if training
            && arena.app.world().resource::<EpisodeStats>().episodes_completed >= args.episodes
        {
            break;
        }
    }

    report(&arena, ticks);
    Ok(())
}

fn report(arena: &SpawnedArena, ticks: u32) {
    let stats = arena.app.world().resource::<EpisodeStats>();
    for (i, ((steps, reward), nectar)) in stats
        .step_history
        .iter()
        .zip(&stats.reward_history)
        .zip(&stats.nectar_history)
        .enumerate()
    {
        println!(
            "episode {}: steps={steps}, reward={reward:.3}, nectar={nectar:.3}",
            i + 1
        );
    }

    if let Some(forager) = arena.forager(0) {
        let episode = forager.episode();
        println!(
            "current: episode={} state={:?} steps={} reward={:.3} nectar={:.3}",
            episode.episode_number,
            episode.state,
            episode.step_count,
            episode.total_reward,
            forager.nectar_obtained()
        );
    }
    println!(
        "\ntotal: ticks={ticks}, episodes={} (done={}, truncated={}), steps={}",
        stats.episodes_completed, stats.episodes_done, stats.episodes_truncated, stats.total_steps
    );
    if let Some(mean) = stats.mean_nectar() {
        println!("mean nectar per episode: {mean:.3}");
    }
}

fn run_config(path: Option<&Path>) -> AppResult<()> {
    let config = load_config(path)?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn run_info() {
    println!("nectar v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  nectar-core    {}", env!("CARGO_PKG_VERSION"));
    println!("  nectar-field   {}", env!("CARGO_PKG_VERSION"));
    println!("  nectar-physics {}", env!("CARGO_PKG_VERSION"));
    println!("  nectar-agent   {}", env!("CARGO_PKG_VERSION"));
    println!("  nectar-sim     {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("edition: 2024");
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Headless {
            config,
            layout,
            episodes,
            ticks,
            seed,
            training,
            policy,
            plants,
            flowers,
            verbose,
        }) => run_headless(HeadlessArgs {
            config,
            layout,
            episodes,
            ticks,
            seed,
            training,
            policy,
            plants,
            flowers,
            verbose,
        }),
        Some(Commands::Config { path }) => run_config(path.as_deref()),
        Some(Commands::Info) => {
            run_info();
            Ok(())
        }
        None => run_headless(HeadlessArgs {
            config: None,
            layout: None,
            episodes: 1,
            ticks: 2000,
            seed: None,
            training: false,
            policy: PolicyKind::Homing,
            plants: 6,
            flowers: 3,
            verbose: false,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
