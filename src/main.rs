//! Shotgun Duel - Main Binary
//!
//! Runs narrated demo duels and parallel simulations of the duel engine

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use shotgun_duel::{
    core::{ChatId, DuelConfig, Seat},
    game::{DuelEndReason, DuelEngine, DuelLoop, OutputFormat, RandomController, VerbosityLevel},
    simulation::run_simulation,
};
use std::path::PathBuf;

/// Log output format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Verbosity level for duel output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "duel")]
#[command(about = "Shotgun Duel - two-player shotgun roulette engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play many random duels in parallel and print statistics
    Simulate {
        /// Number of duels to play
        #[arg(long, default_value = "1000")]
        games: usize,

        /// Master seed; every duel derives its own seed from it
        #[arg(long, default_value = "42")]
        seed: u64,

        /// JSON rule set (defaults to the classic rules)
        #[arg(long, value_name = "CONFIG_FILE")]
        config: Option<PathBuf>,
    },

    /// Play one narrated duel between two random controllers
    Demo {
        /// Seed for the engine and both controllers
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Verbosity level for duel output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Log line format
        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,

        /// First player name
        #[arg(long, default_value = "Player 1")]
        p1_name: String,

        /// Second player name
        #[arg(long, default_value = "Player 2")]
        p2_name: String,

        /// JSON rule set (defaults to the classic rules)
        #[arg(long, value_name = "CONFIG_FILE")]
        config: Option<PathBuf>,

        /// Print the final duel snapshot as JSON
        #[arg(long)]
        snapshot: bool,
    },

    /// Write the default rule set to a JSON file
    Config {
        /// Output path
        #[arg(long, default_value = "duel.json")]
        output: PathBuf,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<DuelConfig> {
    match path {
        Some(path) => DuelConfig::load_from_file(&path)
            .with_context(|| format!("loading rule set from {}", path.display())),
        None => Ok(DuelConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            games,
            seed,
            config,
        } => {
            let config = load_config(config)?;
            println!("Running {games} duels with seed {seed}\n");
            let report = tokio::task::spawn_blocking(move || run_simulation(games, seed, &config))
                .await
                .context("simulation task failed")??;
            println!("{report}");
        }
        Commands::Demo {
            seed,
            verbosity,
            format,
            p1_name,
            p2_name,
            config,
            snapshot,
        } => {
            let config = load_config(config)?;
            run_demo(seed, verbosity.into(), format.into(), &p1_name, &p2_name, config, snapshot)?;
        }
        Commands::Config { output } => {
            DuelConfig::default()
                .save_to_file(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Default rule set written to {}", output.display());
        }
    }

    Ok(())
}

fn run_demo(
    seed: u64,
    verbosity: VerbosityLevel,
    format: OutputFormat,
    p1_name: &str,
    p2_name: &str,
    config: DuelConfig,
    print_snapshot: bool,
) -> anyhow::Result<()> {
    let first_id = ChatId::new(1);
    let second_id = ChatId::new(2);

    let mut engine = DuelEngine::new(config, seed)?;
    engine.logger_mut().set_verbosity(verbosity);
    engine.logger_mut().set_output_format(format);
    engine
        .seat_player(p1_name, first_id, Seat::First)
        .context("seating first player")?;
    engine
        .seat_player(p2_name, second_id, Seat::Second)
        .context("seating second player")?;
    engine.start()?;

    let mut first = RandomController::with_seed(first_id, seed.wrapping_add(1));
    let mut second = RandomController::with_seed(second_id, seed.wrapping_add(2));
    let outcome = DuelLoop::new(&mut engine).run_duel(&mut first, &mut second)?;

    match outcome.end_reason {
        DuelEndReason::Victory(seat) => {
            let name = engine
                .player(seat)
                .map(|p| p.name.to_string())
                .unwrap_or_default();
            println!("\n{name} wins after {} actions", outcome.actions_taken);
        }
        DuelEndReason::ActionLimit => {
            println!("\nNo winner after {} actions", outcome.actions_taken)
        }
        DuelEndReason::Abandoned => println!("\nDuel abandoned"),
    }

    if print_snapshot {
        println!("{}", engine.snapshot().to_json()?);
    }
    Ok(())
}
