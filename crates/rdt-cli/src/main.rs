//! CLI for the RDT suite: run the randomness battery, extract seeds, stream
//! generator output.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rdt-suite")]
#[command(about = "rdt-suite — randomness smoke tests for the RDT generators")]
#[command(version = rdt_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a stream and run the statistical battery on it.
    /// The report is printed and written to --output.
    Run {
        /// Stream seed: 64 hex digits, or "os" for a fresh random seed
        #[arg(long)]
        seed: Option<String>,

        /// Seed for the avalanche source: 64 hex digits, or "os"
        #[arg(long)]
        avalanche_seed: Option<String>,

        /// Generator: rdt-v2 (default), rdt-v1, drbg, std
        #[arg(long, default_value = "rdt-v2")]
        source: String,

        /// JSON battery config; flags below override its fields
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of values to generate
        #[arg(long)]
        count: Option<usize>,

        /// Bit width of each value (multiple of 8, at most 64)
        #[arg(long)]
        width: Option<u32>,

        /// Comma-separated autocorrelation lags (e.g. "1,2,8,64")
        #[arg(long)]
        lags: Option<String>,

        /// Avalanche draw pairs
        #[arg(long)]
        trials: Option<usize>,

        /// Path for the text report
        #[arg(long, default_value = "RDT_RESULTS.txt")]
        output: PathBuf,

        /// Also write the structured report (with p-values) as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Derive a 256-bit seed from sensor files.
    /// Uses the rdt_seed_extractor binary unless --digest is given.
    Seed {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output format: hex (default), bytes, c, u64
        #[arg(long, default_value = "hex")]
        format: String,

        /// Explicit path to the extractor binary
        #[arg(long, conflicts_with = "digest")]
        extractor: Option<PathBuf>,

        /// Hash the inputs in process instead of running the extractor
        #[arg(long)]
        digest: bool,
    },

    /// Write raw generator output to stdout (little-endian 64-bit words).
    /// Pipe into external test batteries.
    Stream {
        /// Stream seed: 64 hex digits, or "os"
        #[arg(long)]
        seed: Option<String>,

        /// Generator: rdt-v2 (default), rdt-v1, drbg, std
        #[arg(long, default_value = "rdt-v2")]
        source: String,

        /// Total bytes to output (0 = infinite)
        #[arg(long, default_value = "0")]
        bytes: usize,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            seed,
            avalanche_seed,
            source,
            config,
            count,
            width,
            lags,
            trials,
            output,
            json,
        } => commands::run::run(commands::run::RunCommandConfig {
            seed: seed.as_deref(),
            avalanche_seed: avalanche_seed.as_deref(),
            source: &source,
            config_path: config.as_deref(),
            count,
            width,
            lags: lags.as_deref(),
            trials,
            output_path: &output,
            json_path: json.as_deref(),
        }),
        Commands::Seed {
            inputs,
            format,
            extractor,
            digest,
        } => commands::seed::run(&inputs, &format, extractor.as_deref(), digest),
        Commands::Stream {
            seed,
            source,
            bytes,
        } => commands::stream::run(seed.as_deref(), &source, bytes),
    }
}
