use crate::reports;
use clap::Args;
use demoforge::config::Config;
use demoforge::optimizer::{ProgressSink, SearchLoop, SearchOptions};
use demoforge::registry::Registry;
use demoforge::scorer::Scorer;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short = 'T', long)]
    pub time: Option<u64>,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Write the final counties and descriptors to this file
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,
}

/// Prints every accepted mean on its own stdout line, so the search can be
/// piped into a plotting tool.
struct ScoreStream;

impl ProgressSink for ScoreStream {
    fn on_commit(&mut self, _step: u64, mean: f32) -> bool {
        println!("{:.6}", mean);
        true
    }
}

pub fn run(args: SearchArgs, registry: Registry) {
    let method = args.config.search.similarity_method().unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        process::exit(1);
    });

    if args.config.search.max_steps.is_none() && args.time.is_none() {
        warn!("no --max-steps or --time given, running until interrupted");
    }

    let mut options = SearchOptions::from(&args.config);
    options.max_time = args.time.map(Duration::from_secs);
    options.seed = args.seed;

    println!(
        "\n➡️  Searching with method '{}' over {} counties and {} descriptors",
        method,
        registry.counties.len(),
        registry.descriptors.len()
    );

    let scorer = Scorer::new(method);
    let mut search = SearchLoop::new(registry, scorer, options);
    let summary = search.run(&mut ScoreStream);

    println!("\n=== 🏆 SEARCH COMPLETE ===");
    println!("Steps:       {}", summary.steps);
    println!("Committed:   {}", summary.committed);
    println!("Rolled back: {}", summary.rolled_back);
    println!("Mean score:  {:.6}", summary.mean_score);

    reports::print_county_table(&search.registry, &search.scorer);
    reports::print_descriptor_table(&search.registry);

    if let Some(path) = &args.out {
        match reports::write_dump(&search.registry, path) {
            Ok(()) => println!("💾 Final state written to {}", path.display()),
            Err(e) => eprintln!("❌ Error writing {}: {}", path.display(), e),
        }
    }
}
