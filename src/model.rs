use std::collections::BTreeMap;
use std::fmt;

/// Index of a county in `Registry::counties`.
pub type CountyId = usize;
/// Index of a descriptor in `Registry::descriptors`.
pub type DescriptorId = usize;

/// A weighted mapping from demographic category keys to non-negative weights.
///
/// Backed by an ordered map so iteration, summation and random key selection
/// are deterministic for a given content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    pub weights: BTreeMap<String, f32>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f32)>,
        K: Into<String>,
    {
        let weights = pairs.into_iter().map(|(k, w)| (k.into(), w)).collect();
        Self { weights }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<f32> {
        self.weights.get(category).copied()
    }

    /// Inserts or overwrites the weight for a category.
    pub fn set(&mut self, category: &str, weight: f32) {
        self.weights.insert(category.to_string(), weight);
    }

    pub fn total(&self) -> f32 {
        self.weights.values().sum()
    }

    /// Scales weights so they sum to 1. All-zero distributions are left
    /// unchanged.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total == 0.0 {
            return;
        }
        for weight in self.weights.values_mut() {
            *weight /= total;
        }
    }

    /// Elementwise addition of another distribution into this one.
    pub fn add(&mut self, other: &Distribution) {
        for (category, weight) in &other.weights {
            *self.weights.entry(category.clone()).or_insert(0.0) += weight;
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.weights.iter().map(|(k, &w)| (k.as_str(), w))
    }

    /// Category at the given position in key order. Used for uniform random
    /// key selection.
    pub fn nth_category(&self, index: usize) -> Option<&str> {
        self.weights.keys().nth(index).map(String::as_str)
    }
}

/// A named bundle of demographic effects. Fixed descriptors are structural
/// baselines (nation or region wide) and are never offered to the membership
/// mutator.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub name: String,
    pub effects: Distribution,
    pub fixed: bool,
}

impl Descriptor {
    pub fn new(name: impl Into<String>, fixed: bool) -> Self {
        Self {
            name: name.into(),
            effects: Distribution::new(),
            fixed,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let effects = self
            .effects
            .iter()
            .map(|(k, w)| format!("\"{}\": {:.6}", k, w))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "\"{}\" : {{{}}};", self.name, effects)
    }
}

/// A geographic entity with an observed target distribution and a mutable
/// set of assigned descriptors.
///
/// Invariant: `aggregate` always equals the elementwise sum of the effects of
/// every descriptor in `assigned`; callers must recalculate after touching
/// membership or any assigned descriptor's effects.
#[derive(Debug, Clone, PartialEq)]
pub struct County {
    pub name: String,
    pub region: String,
    pub population: u64,
    pub target: Distribution,
    pub assigned: Vec<DescriptorId>,
    pub aggregate: Distribution,
}

impl County {
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        population: u64,
        target: Distribution,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            population,
            target,
            assigned: Vec::new(),
            aggregate: Distribution::new(),
        }
    }

    /// Rebuilds the aggregate from scratch by summing assigned effects.
    pub fn recalculate(&mut self, descriptors: &[Descriptor]) {
        self.aggregate = Distribution::new();
        for &id in &self.assigned {
            if let Some(descriptor) = descriptors.get(id) {
                self.aggregate.add(&descriptor.effects);
            }
        }
    }

    pub fn has_descriptor(&self, id: DescriptorId) -> bool {
        self.assigned.contains(&id)
    }

    /// Appends the descriptor if absent. Returns true when membership changed.
    pub fn add_descriptor(&mut self, id: DescriptorId) -> bool {
        if self.has_descriptor(id) {
            return false;
        }
        self.assigned.push(id);
        true
    }

    /// Removes the descriptor and reports the position it occupied, so a
    /// reversal can reinsert it at the exact same place.
    pub fn remove_descriptor(&mut self, id: DescriptorId) -> Option<usize> {
        let position = self.assigned.iter().position(|&d| d == id)?;
        self.assigned.remove(position);
        Some(position)
    }

    pub fn insert_descriptor_at(&mut self, position: usize, id: DescriptorId) {
        let position = position.min(self.assigned.len());
        self.assigned.insert(position, id);
    }
}
