//! CLI frontend for the loot engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use loot_core::EnemyTier;
use loot_sim::SimConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "loot",
    about = "Roll, simulate and check tiered loot tables",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine events to stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in zone-1 config as JSON
    Init {
        /// Output file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a loot config and report problems
    Check {
        /// Config file (default: built-in zone-1 preset)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Roll loot for one or more kills
    Roll {
        /// Loot table name
        #[arg(short, long, default_value = "zone1")]
        table: String,

        /// Enemy tier: trash, normal, elite, miniboss, boss
        #[arg(long, value_parser = parse_tier)]
        tier: EnemyTier,

        /// Number of kills to roll
        #[arg(short, long, default_value = "1")]
        kills: u32,

        /// RNG seed (default: non-deterministic)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Threat level; applies the table's matching threat band
        #[arg(long)]
        threat: Option<f64>,

        /// Also roll every configured item set
        #[arg(long)]
        sets: bool,

        /// Config file (default: built-in zone-1 preset)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Simulate many kills and report drop rates
    Simulate {
        /// Loot table name
        #[arg(short, long, default_value = "zone1")]
        table: String,

        /// Enemy tier: trash, normal, elite, miniboss, boss
        #[arg(long, value_parser = parse_tier)]
        tier: EnemyTier,

        /// Number of kills to simulate
        #[arg(short = 'n', long, default_value = "100000")]
        iterations: u64,

        /// RNG seed for deterministic simulation
        #[arg(short, long, default_value = "12345")]
        seed: u64,

        /// How many of the most frequent items to list
        #[arg(long, default_value = "20")]
        top: usize,

        /// Threat level; applies the table's matching threat band
        #[arg(long)]
        threat: Option<f64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Config file (default: built-in zone-1 preset)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Simulate set-piece drops and pity for one set
    Sets {
        /// Set id
        #[arg(long = "set", default_value = "abyssal_initiate")]
        set_id: String,

        /// Enemy tier: trash, normal, elite, miniboss, boss
        #[arg(long, value_parser = parse_tier)]
        tier: EnemyTier,

        /// Number of kills to simulate
        #[arg(short = 'n', long, default_value = "100000")]
        iterations: u64,

        /// RNG seed for deterministic simulation
        #[arg(short, long, default_value = "12345")]
        seed: u64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Config file (default: built-in zone-1 preset)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn parse_tier(s: &str) -> Result<EnemyTier, String> {
    EnemyTier::parse(s).ok_or_else(|| {
        format!("unknown tier '{s}' (expected trash, normal, elite, miniboss or boss)")
    })
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { path, force } => commands::init::run(&path, force),
        Commands::Check { config } => commands::check::run(config.as_deref()),
        Commands::Roll {
            table,
            tier,
            kills,
            seed,
            threat,
            sets,
            config,
        } => commands::roll::run(config.as_deref(), &table, tier, kills, seed, threat, sets),
        Commands::Simulate {
            table,
            tier,
            iterations,
            seed,
            top,
            threat,
            json,
            config,
        } => {
            let mut sim = SimConfig::default()
                .with_seed(seed)
                .with_iterations(iterations)
                .with_top_items(top);
            if let Some(threat) = threat {
                sim = sim.with_threat(threat);
            }
            commands::simulate::run(config.as_deref(), &table, tier, &sim, json)
        }
        Commands::Sets {
            set_id,
            tier,
            iterations,
            seed,
            json,
            config,
        } => commands::sets::run(config.as_deref(), &set_id, tier, iterations, seed, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
