mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swequant", about = "Shear-wave elastography quantification tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show scan metadata and detected regions
    Info(commands::info::InfoArgs),
    /// List the frames carrying fresh SWE data
    Resample(commands::resample::ResampleArgs),
    /// Quantify stiffness in a region of one scan
    Analyse(commands::analyse::AnalyseArgs),
    /// Analyse several scans in order, reusing the first region
    Batch(commands::batch::BatchArgs),
    /// Export cached results as CSV
    Export(commands::export::ExportArgs),
    /// Print or save the default analysis config
    Config(commands::config::ConfigArgs),
    /// Delete cached results or forget remembered settings
    Clear(commands::clear::ClearArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Resample(args) => commands::resample::run(args),
        Commands::Analyse(args) => commands::analyse::run(args),
        Commands::Batch(args) => commands::batch::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Clear(args) => commands::clear::run(args),
    }
}
