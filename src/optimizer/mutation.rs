// ===== demoforge/src/optimizer/mutation.rs =====
use crate::model::{CountyId, DescriptorId};
use crate::registry::Registry;
use crate::scorer::Scorer;
use fastrand::Rng;

/// A reversible edit record. Applying a mutation returns the `Change` that
/// describes it; `undo` re-runs the same recompute path in reverse so every
/// touched weight, membership position, aggregate and cached score ends up
/// numerically identical to its pre-edit value.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    NoOp,
    EffectEdit {
        descriptor: DescriptorId,
        category: String,
        old_weight: f32,
        new_weight: f32,
        affected: Vec<CountyId>,
    },
    MembershipEdit {
        county: CountyId,
        descriptor: DescriptorId,
        action: MembershipAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipAction {
    Added,
    /// Removal remembers the slot it vacated so undo reinserts the id at the
    /// exact same position, keeping the aggregate summation order identical.
    Removed {
        position: usize,
    },
}

impl Change {
    pub fn is_noop(&self) -> bool {
        matches!(self, Change::NoOp)
    }

    pub fn undo(self, registry: &mut Registry, scorer: &mut Scorer) {
        match self {
            Change::NoOp => {}
            Change::EffectEdit {
                descriptor,
                category,
                old_weight,
                affected,
                ..
            } => {
                if let Some(d) = registry.descriptors.get_mut(descriptor) {
                    d.effects.set(&category, old_weight);
                }
                for &county in &affected {
                    registry.recalculate_county(county);
                    scorer.rescore(registry, county);
                }
            }
            Change::MembershipEdit {
                county,
                descriptor,
                action,
            } => {
                if let Some(c) = registry.counties.get_mut(county) {
                    match action {
                        MembershipAction::Added => {
                            let _ = c.remove_descriptor(descriptor);
                        }
                        MembershipAction::Removed { position } => {
                            c.insert_descriptor_at(position, descriptor);
                        }
                    }
                }
                registry.recalculate_county(county);
                scorer.rescore(registry, county);
            }
        }
    }
}

/// Perturbs one random effect weight of one random descriptor by a uniform
/// delta in `[-max_perturbation / 2, +max_perturbation / 2]`, clamped into
/// [0, 1], then rescores every county holding that descriptor.
///
/// The draw covers the full descriptor list, fixed descriptors included; a
/// descriptor with no effects degrades to `NoOp`.
pub fn permute_descriptors(
    rng: &mut Rng,
    registry: &mut Registry,
    scorer: &mut Scorer,
    max_perturbation: f32,
) -> Change {
    if registry.descriptors.is_empty() {
        return Change::NoOp;
    }
    let descriptor = rng.usize(0..registry.descriptors.len());

    let category = {
        let effects = &registry.descriptors[descriptor].effects;
        if effects.is_empty() {
            return Change::NoOp;
        }
        match effects.nth_category(rng.usize(0..effects.len())) {
            Some(category) => category.to_string(),
            None => return Change::NoOp,
        }
    };

    let old_weight = registry.descriptors[descriptor]
        .effects
        .get(&category)
        .unwrap_or(0.0);
    let delta = (rng.f32() - 0.5) * max_perturbation;
    let new_weight = (old_weight + delta).clamp(0.0, 1.0);
    registry.descriptors[descriptor]
        .effects
        .set(&category, new_weight);

    let affected = registry.counties_with(descriptor);
    for &county in &affected {
        registry.recalculate_county(county);
        scorer.rescore(registry, county);
    }

    Change::EffectEdit {
        descriptor,
        category,
        old_weight,
        new_weight,
        affected,
    }
}

/// Toggles one random modifiable descriptor on one random county: removed if
/// present, appended otherwise. Rescores just that county.
pub fn permute_counties(rng: &mut Rng, registry: &mut Registry, scorer: &mut Scorer) -> Change {
    if registry.counties.is_empty() || registry.modifiable.is_empty() {
        return Change::NoOp;
    }
    let county = rng.usize(0..registry.counties.len());
    let descriptor = registry.modifiable[rng.usize(0..registry.modifiable.len())];

    let action = match registry.counties[county].remove_descriptor(descriptor) {
        Some(position) => MembershipAction::Removed { position },
        None => {
            registry.counties[county].add_descriptor(descriptor);
            MembershipAction::Added
        }
    };

    registry.recalculate_county(county);
    scorer.rescore(registry, county);

    Change::MembershipEdit {
        county,
        descriptor,
        action,
    }
}
