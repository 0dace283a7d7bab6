pub mod similarity;

pub use self::similarity::{normalize, similarity, SimilarityMethod};

use crate::model::CountyId;
use crate::registry::Registry;

/// Caches one similarity score per county, keyed by county index, and derives
/// the global mean from the cache.
///
/// The cache only changes through `rescore`/`rescore_all`; callers invoke
/// those after any change to a county's aggregate.
pub struct Scorer {
    pub method: SimilarityMethod,
    scores: Vec<Option<f32>>,
}

impl Scorer {
    pub fn new(method: SimilarityMethod) -> Self {
        Self {
            method,
            scores: Vec::new(),
        }
    }

    /// Recomputes and caches the score of one county, returning it.
    pub fn rescore(&mut self, registry: &Registry, county: CountyId) -> f32 {
        match registry.counties.get(county) {
            Some(c) => {
                let score = similarity(&c.target, &c.aggregate, self.method);
                if county >= self.scores.len() {
                    self.scores.resize(county + 1, None);
                }
                self.scores[county] = Some(score);
                score
            }
            None => 0.0,
        }
    }

    /// Warms the whole cache. Run once before a search so every county has a
    /// baseline score.
    pub fn rescore_all(&mut self, registry: &Registry) {
        for county in 0..registry.counties.len() {
            self.rescore(registry, county);
        }
    }

    pub fn score(&self, county: CountyId) -> Option<f32> {
        self.scores.get(county).copied().flatten()
    }

    /// Mean over counties with a cached score; 0 when nothing is cached.
    pub fn mean_score(&self) -> f32 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for &score in self.scores.iter().flatten() {
            sum += score;
            count += 1;
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f32
        }
    }

    pub fn cached_len(&self) -> usize {
        self.scores.iter().filter(|s| s.is_some()).count()
    }
}
