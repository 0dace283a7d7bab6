// ===== demoforge/src/main.rs =====
use clap::{Parser, Subcommand};
use demoforge::loader;
use demoforge::registry::Registry;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root of the resource tree (one directory per region)
    #[arg(global = true, short, long, default_value = "resources")]
    data: PathBuf,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assign descriptors to counties by stochastic search
    Search(cmd::search::SearchArgs),
    /// Score the freshly built registry without searching
    Score(cmd::score::ScoreArgs),
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the score stream.
    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing DemoForge Core...");

    info!("📂 Loading counties from: {}", cli.data.display());
    let records = loader::load_counties(&cli.data).unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });

    let synthesis = match &cli.command {
        Commands::Search(args) => args.config.synthesis.clone(),
        Commands::Score(args) => args.config.synthesis.clone(),
    };

    let registry = Registry::build(records, &synthesis).unwrap_or_else(|e| {
        error!("❌ FATAL ERROR BUILDING REGISTRY: {}", e);
        process::exit(1);
    });

    info!(
        "🧩 Registry ready: {} counties, {} descriptors ({} modifiable)",
        registry.counties.len(),
        registry.descriptors.len(),
        registry.modifiable.len()
    );

    match cli.command {
        Commands::Search(args) => cmd::search::run(args, registry),
        Commands::Score(args) => cmd::score::run(args, registry),
    }
}
