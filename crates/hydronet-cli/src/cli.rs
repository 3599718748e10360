use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "HydroNet - Generates proton-disordered ice structures obeying the ice rule with a minimal net dipole.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    // --- Core Arguments ---
    /// Oxygen table to read (.csv comma-separated or .xyz tab-separated).
    #[arg(short, long = "input-file", required = true, value_name = "PATH")]
    pub input_file: PathBuf,

    /// Output structure (.xyz, .pdb or .csv). Defaults to 'ice.xyz'.
    #[arg(short, long = "output-file", value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop once the net dipole falls below this value. Defaults to 0.1.
    #[arg(short, long, value_name = "FLOAT")]
    pub dipole_target: Option<f64>,

    /// Random bond flips per round. Defaults to a tenth of the bond count.
    #[arg(short, long, value_name = "INT")]
    pub nshakes: Option<usize>,

    /// Write TIP3P water (three sites) instead of TIP4P.
    #[arg(short, long)]
    pub tip3p: bool,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Search Overrides ---
    /// Seed for the random number generator. A random seed is drawn and logged if omitted.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Maximum number of shake/adjust rounds [default: 1000000].
    #[arg(long, value_name = "INT")]
    pub max_rounds: Option<u64>,

    /// Wall-clock limit for the round loop. Unbounded unless set.
    #[arg(long, value_name = "SECONDS")]
    pub time_limit: Option<f64>,

    /// Maximum repair iterations before a round is discarded.
    #[arg(long, value_name = "INT")]
    pub max_repair_iterations: Option<usize>,

    /// Consecutive discarded rounds tolerated before giving up.
    #[arg(long, value_name = "INT")]
    pub max_round_retries: Option<usize>,

    // --- Checkpointing ---
    /// Where to write checkpoints. Defaults to the output path with '.chk' appended.
    #[arg(long, value_name = "PATH", conflicts_with = "no_checkpoint")]
    pub checkpoint: Option<PathBuf>,

    /// Do not write checkpoints.
    #[arg(long)]
    pub no_checkpoint: bool,

    /// Resume from a checkpoint written by an earlier run on the same input.
    #[arg(long, value_name = "PATH")]
    pub resume: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.cutoff=3.2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    // --- Global ---
    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,
}
