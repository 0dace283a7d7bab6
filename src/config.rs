use crate::error::{DemoForgeError, DfResult};
use crate::scorer::SimilarityMethod;
use clap::Args;
use std::str::FromStr;

#[derive(Args, Debug, Clone)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub synthesis: SynthesisParams,
}

#[derive(Args, Debug, Clone)]
pub struct SearchParams {
    /// Similarity method for comparing demographics: l1, l2, cosine or js
    #[arg(long, default_value = "l1")]
    pub method: String,

    /// Width of the uniform effect perturbation window
    #[arg(long, default_value_t = 0.1)]
    pub max_perturbation: f32,

    /// Stop after this many mutation steps
    #[arg(long)]
    pub max_steps: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct SynthesisParams {
    /// Total descriptor count to synthesize blanks up to
    #[arg(long, default_value_t = 300)]
    pub descriptor_cap: usize,

    /// Pre-populate modifiable descriptors with zero weights for every
    /// observed target category
    #[arg(long, default_value_t = false)]
    pub seed_effects: bool,
}

impl SearchParams {
    pub fn similarity_method(&self) -> DfResult<SimilarityMethod> {
        SimilarityMethod::from_str(&self.method)
            .map_err(|_| DemoForgeError::UnknownMethod(self.method.clone()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchParams::default(),
            synthesis: SynthesisParams::default(),
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            method: "l1".to_string(),
            max_perturbation: 0.1,
            max_steps: None,
        }
    }
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            descriptor_cap: 300,
            seed_effects: false,
        }
    }
}
