use crate::config::SynthesisParams;
use crate::error::{DemoForgeError, DfResult};
use crate::loader::CountyRecord;
use crate::model::{County, CountyId, Descriptor, DescriptorId};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Name of the fixed baseline descriptor assigned to every county.
pub const NATION_DESCRIPTOR: &str = "Nation";

/// The single owner of all counties and descriptors.
///
/// Counties reference descriptors by index into `descriptors`, so an effect
/// perturbation is immediately visible to every county holding the id.
/// `modifiable` lists the non-fixed descriptor ids the membership mutator may
/// toggle.
#[derive(Debug)]
pub struct Registry {
    pub counties: Vec<County>,
    pub descriptors: Vec<Descriptor>,
    pub modifiable: Vec<DescriptorId>,
}

impl Registry {
    /// Builds the registry from loaded records:
    /// one county per record, a fixed nation-wide descriptor on every county,
    /// a fixed per-region descriptor (created in first-encounter order) on
    /// every county of that region, then blank non-fixed descriptors
    /// `Descriptor 0`, `Descriptor 1`, ... until the total count reaches
    /// `descriptor_cap`.
    pub fn build(records: Vec<CountyRecord>, params: &SynthesisParams) -> DfResult<Self> {
        let counties = records
            .into_iter()
            .map(|r| County::new(r.name, r.region, r.population, r.demographics))
            .collect();

        let mut registry = Registry {
            counties,
            descriptors: Vec::new(),
            modifiable: Vec::new(),
        };
        let mut index: HashMap<String, DescriptorId> = HashMap::new();

        let nation = registry.push_descriptor(&mut index, NATION_DESCRIPTOR.to_string(), true)?;
        for county in &mut registry.counties {
            county.add_descriptor(nation);
        }

        for i in 0..registry.counties.len() {
            let region = registry.counties[i].region.clone();
            let id = match index.get(&region) {
                Some(&id) => id,
                None => registry.push_descriptor(&mut index, region, true)?,
            };
            registry.counties[i].add_descriptor(id);
        }

        let mut blank = 0usize;
        while registry.descriptors.len() < params.descriptor_cap {
            registry.push_descriptor(&mut index, format!("Descriptor {blank}"), false)?;
            blank += 1;
        }

        if params.seed_effects {
            registry.seed_modifiable_effects();
        }

        registry.recalculate_all();
        debug!(
            "registry built: {} counties, {} descriptors ({} modifiable)",
            registry.counties.len(),
            registry.descriptors.len(),
            registry.modifiable.len()
        );
        Ok(registry)
    }

    fn push_descriptor(
        &mut self,
        index: &mut HashMap<String, DescriptorId>,
        name: String,
        fixed: bool,
    ) -> DfResult<DescriptorId> {
        if index.contains_key(&name) {
            return Err(DemoForgeError::Validation(format!(
                "duplicate descriptor name: {name}"
            )));
        }
        let id = self.descriptors.len();
        index.insert(name.clone(), id);
        self.descriptors.push(Descriptor::new(name, fixed));
        if !fixed {
            self.modifiable.push(id);
        }
        Ok(id)
    }

    // Gives the effect mutator keys to act on: every modifiable descriptor
    // gets a zero weight for each category observed across county targets.
    fn seed_modifiable_effects(&mut self) {
        let mut categories: BTreeSet<String> = BTreeSet::new();
        for county in &self.counties {
            categories.extend(county.target.categories().map(str::to_string));
        }
        for &id in &self.modifiable {
            if let Some(descriptor) = self.descriptors.get_mut(id) {
                for category in &categories {
                    descriptor.effects.set(category, 0.0);
                }
            }
        }
    }

    /// Ids of every county currently holding the descriptor.
    pub fn counties_with(&self, descriptor: DescriptorId) -> Vec<CountyId> {
        self.counties
            .iter()
            .enumerate()
            .filter(|(_, county)| county.has_descriptor(descriptor))
            .map(|(id, _)| id)
            .collect()
    }

    /// Membership by descriptor value rather than id; with unique names the
    /// two coincide.
    pub fn county_has_matching(&self, county: CountyId, descriptor: &Descriptor) -> bool {
        self.counties.get(county).map_or(false, |c| {
            c.assigned
                .iter()
                .any(|&id| self.descriptors.get(id) == Some(descriptor))
        })
    }

    pub fn recalculate_county(&mut self, county: CountyId) {
        let Registry {
            counties,
            descriptors,
            ..
        } = self;
        if let Some(c) = counties.get_mut(county) {
            c.recalculate(descriptors);
        }
    }

    pub fn recalculate_all(&mut self) {
        let Registry {
            counties,
            descriptors,
            ..
        } = self;
        for county in counties.iter_mut() {
            county.recalculate(descriptors);
        }
    }
}
