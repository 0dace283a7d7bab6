use crate::reports;
use clap::Args;
use demoforge::config::Config;
use demoforge::registry::Registry;
use demoforge::scorer::Scorer;
use std::process;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub county: Option<String>,
}

pub fn run(args: ScoreArgs, registry: Registry) {
    let method = args.config.search.similarity_method().unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        process::exit(1);
    });

    let mut scorer = Scorer::new(method);
    scorer.rescore_all(&registry);

    println!("\n🔎 === COUNTY AUDIT === 🔎");

    let mut results = Vec::new();
    for (id, county) in registry.counties.iter().enumerate() {
        if let Some(ref filter) = args.county {
            if !county.name.to_lowercase().contains(&filter.to_lowercase()) {
                continue;
            }
        }
        results.push((county.name.clone(), scorer.score(id).unwrap_or(0.0)));
    }

    // Sort by score, best first
    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    reports::print_score_report(&results, scorer.mean_score());
}
