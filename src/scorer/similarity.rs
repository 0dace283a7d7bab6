use crate::model::Distribution;
use std::collections::BTreeSet;
use strum_macros::{Display, EnumIter, EnumString};

/// How two distributions are compared. Parsed from configuration by name
/// (`l1`, `l2`, `cosine`, `js`).
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum SimilarityMethod {
    L1,
    L2,
    Cosine,
    Js,
}

/// Scales a vector so it sums to 1. All-zero input is left unchanged.
pub fn normalize(values: &mut [f32]) {
    let total: f32 = values.iter().sum();
    if total == 0.0 {
        return;
    }
    for value in values.iter_mut() {
        *value /= total;
    }
}

/// Similarity of `actual` to `expected` under the given method.
///
/// Both inputs are aligned over the union of their categories, missing
/// weights are treated as 0, and each side is normalized independently. A
/// zero `actual` against a non-zero `expected` scores 0 for every method.
/// `l1`/`l2`/`cosine` map identical inputs to 1; `js` additionally clamps
/// into [0, 1].
pub fn similarity(expected: &Distribution, actual: &Distribution, method: SimilarityMethod) -> f32 {
    let keys: BTreeSet<&str> = expected.categories().chain(actual.categories()).collect();

    let mut e: Vec<f32> = keys.iter().map(|&k| expected.get(k).unwrap_or(0.0)).collect();
    let mut a: Vec<f32> = keys.iter().map(|&k| actual.get(k).unwrap_or(0.0)).collect();
    normalize(&mut e);
    normalize(&mut a);

    if a.iter().sum::<f32>() == 0.0 && e.iter().sum::<f32>() != 0.0 {
        return 0.0;
    }

    match method {
        SimilarityMethod::L1 => {
            let dist: f32 = e.iter().zip(&a).map(|(x, y)| (x - y).abs()).sum();
            1.0 - dist / 2.0
        }
        SimilarityMethod::L2 => {
            let dist: f32 = e.iter().zip(&a).map(|(x, y)| (x - y) * (x - y)).sum();
            1.0 - dist.sqrt() / 2.0
        }
        SimilarityMethod::Cosine => {
            let dot: f32 = e.iter().zip(&a).map(|(x, y)| x * y).sum();
            let norm_e: f32 = e.iter().map(|x| x * x).sum::<f32>().sqrt();
            let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            dot / (norm_e * norm_a + 1e-12)
        }
        SimilarityMethod::Js => {
            let m: Vec<f32> = e.iter().zip(&a).map(|(x, y)| (x + y) / 2.0).collect();
            let divergence = (kl_divergence(&e, &m) + kl_divergence(&a, &m)) / 2.0;
            (1.0 - divergence).clamp(0.0, 1.0)
        }
    }
}

// Kullback-Leibler divergence in bits, summed only over indices where both
// sides carry mass.
fn kl_divergence(p: &[f32], q: &[f32]) -> f32 {
    p.iter()
        .zip(q)
        .filter(|(&pi, &qi)| pi > 0.0 && qi > 0.0)
        .map(|(&pi, &qi)| pi * (pi / qi).log2())
        .sum()
}
