//! xsband CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod convert;
mod list;
mod run;

#[derive(Parser)]
#[command(name = "xsband")]
#[command(about = "xsband - cross-section table to plot-artifact conversion")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one or more prediction tables into an artifact container
    Convert {
        /// Input table files (whitespace-delimited text)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output container file (overwritten)
        #[arg(short, long)]
        output: PathBuf,

        /// Column layout preset (eight, six, five)
        #[arg(long, default_value = "eight")]
        layout: String,

        /// Override one column role, `role=index` (repeatable).
        /// Roles: bin_lo, bin_hi, edge, value, low_bound, high_bound.
        #[arg(long = "column")]
        columns: Vec<String>,

        /// Drop the uncertainty bound columns (plain binned-value input)
        #[arg(long)]
        no_bounds: bool,

        /// Artifact name (single input only; defaults to the file stem)
        #[arg(long)]
        name: Option<String>,

        /// Branching-ratio scale applied to values and bounds
        #[arg(long)]
        branching_ratio: Option<f64>,

        /// Also emit a `<name>_ratio` series normalized to this order,
        /// locating the reference table by order-token swap (lo, nlo_qcd,
        /// nnlo_qcd)
        #[arg(long)]
        ratio_to: Option<String>,

        /// Explicit reference table for the ratio (conflicts with
        /// --ratio-to)
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Keep uncertainty bounds that cross the central value instead of
        /// failing
        #[arg(long)]
        allow_inverted_bounds: bool,

        /// Also emit a `<name>_hist` step histogram per input
        #[arg(long)]
        with_histogram: bool,
    },

    /// Convert a batch of tables described by a JSON job spec
    Run {
        /// Job spec file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output container file; overrides the spec's `output`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the artifacts in a container file
    List {
        /// Container file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Convert {
            input,
            output,
            layout,
            columns,
            no_bounds,
            name,
            branching_ratio,
            ratio_to,
            reference,
            allow_inverted_bounds,
            with_histogram,
        } => convert::cmd_convert(convert::ConvertArgs {
            inputs: input,
            output,
            layout,
            columns,
            no_bounds,
            name,
            branching_ratio,
            ratio_to,
            reference,
            allow_inverted_bounds,
            with_histogram,
        }),
        Commands::Run { input, output } => run::cmd_run(&input, output.as_ref()),
        Commands::List { input } => list::cmd_list(&input),
        Commands::Version => {
            println!("xsband {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
