#![allow(dead_code)] // Suppress warnings for unused test helpers

use demoforge::config::SynthesisParams;
use demoforge::loader::CountyRecord;
use demoforge::model::Distribution;
use demoforge::registry::Registry;

pub fn dist(pairs: &[(&str, f32)]) -> Distribution {
    Distribution::from_pairs(pairs.iter().map(|&(k, w)| (k, w)))
}

pub fn record(name: &str, region: &str, target: &[(&str, f32)]) -> CountyRecord {
    CountyRecord {
        name: name.to_string(),
        region: region.to_string(),
        population: 10_000,
        demographics: dist(target),
    }
}

pub fn params(descriptor_cap: usize, seed_effects: bool) -> SynthesisParams {
    SynthesisParams {
        descriptor_cap,
        seed_effects,
    }
}

/// Three counties over two regions with small disjoint-ish targets.
pub fn small_registry(descriptor_cap: usize, seed_effects: bool) -> Registry {
    let records = vec![
        record("Alpha", "North", &[("ages->0-20", 0.3), ("ages->21-99", 0.7)]),
        record("Beta", "North", &[("ages->0-20", 0.6), ("ages->21-99", 0.4)]),
        record("Gamma", "South", &[("ages->0-20", 0.5), ("ages->21-99", 0.5)]),
    ];
    Registry::build(records, &params(descriptor_cap, seed_effects))
        .expect("Failed to build registry")
}
