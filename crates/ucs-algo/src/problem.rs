//! Commitment problem definition
//!
//! A [`UcProblem`] is the validated, immutable input to a solve: the
//! generators, the storage units and the demand series, plus an id index
//! built once so constraint construction never searches the unit lists.

use std::collections::HashMap;
use ucs_core::{DemandSeries, Generator, GeneratorId, StorageUnit, UcsError, UcsResult};

/// Position of a unit inside a [`UcProblem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitIndex {
    Generator(usize),
    Storage(usize),
}

/// Validated unit commitment problem for one horizon.
#[derive(Debug, Clone)]
pub struct UcProblem {
    generators: Vec<Generator>,
    storage: Vec<StorageUnit>,
    demand: DemandSeries,
    index: HashMap<GeneratorId, UnitIndex>,
}

impl UcProblem {
    /// Validate the inputs and build the id index.
    ///
    /// Fails with a validation error when there are no generators, a unit is
    /// malformed, or an id appears twice across generators and storage.
    pub fn new(
        generators: Vec<Generator>,
        storage: Vec<StorageUnit>,
        demand: DemandSeries,
    ) -> UcsResult<Self> {
        if generators.is_empty() {
            return Err(UcsError::validation(
                "generators",
                "at least one generator is required",
            ));
        }

        let mut index = HashMap::with_capacity(generators.len() + storage.len());
        for (i, gen) in generators.iter().enumerate() {
            gen.validate()?;
            if index.insert(gen.id.clone(), UnitIndex::Generator(i)).is_some() {
                return Err(UcsError::validation(
                    format!("generators[{}].id", gen.id),
                    "duplicate unit id",
                ));
            }
        }
        for (i, unit) in storage.iter().enumerate() {
            unit.validate()?;
            if index.insert(unit.id.clone(), UnitIndex::Storage(i)).is_some() {
                return Err(UcsError::validation(
                    format!("storage[{}].id", unit.id),
                    "duplicate unit id",
                ));
            }
        }

        Ok(Self {
            generators,
            storage,
            demand,
            index,
        })
    }

    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    pub fn storage(&self) -> &[StorageUnit] {
        &self.storage
    }

    pub fn demand(&self) -> &DemandSeries {
        &self.demand
    }

    /// Number of hours T.
    pub fn hours(&self) -> usize {
        self.demand.hours()
    }

    pub fn lookup(&self, id: &GeneratorId) -> Option<UnitIndex> {
        self.index.get(id).copied()
    }

    pub fn generator(&self, id: &GeneratorId) -> Option<&Generator> {
        match self.lookup(id)? {
            UnitIndex::Generator(i) => self.generators.get(i),
            UnitIndex::Storage(_) => None,
        }
    }

    pub fn storage_unit(&self, id: &GeneratorId) -> Option<&StorageUnit> {
        match self.lookup(id)? {
            UnitIndex::Storage(i) => self.storage.get(i),
            UnitIndex::Generator(_) => None,
        }
    }

    /// Whether any decision in this problem is binary.
    pub fn has_integer_decisions(&self, exclusive_storage: bool) -> bool {
        self.generators.iter().any(|g| g.committable)
            || (exclusive_storage && !self.storage.is_empty())
    }

    /// Sum of generator `p_max` (storage excluded).
    pub fn installed_capacity(&self) -> f64 {
        self.generators.iter().map(|g| g.p_max.value()).sum()
    }

    /// The same problem with every storage unit removed.
    pub fn without_storage(&self) -> UcProblem {
        let index = self
            .generators
            .iter()
            .enumerate()
            .map(|(i, g)| (g.id.clone(), UnitIndex::Generator(i)))
            .collect();
        UcProblem {
            generators: self.generators.clone(),
            storage: Vec::new(),
            demand: self.demand.clone(),
            index,
        }
    }
}

/// Builder for constructing commitment problems
#[derive(Debug, Default)]
pub struct UcProblemBuilder {
    generators: Vec<Generator>,
    storage: Vec<StorageUnit>,
    demand: Option<Vec<f64>>,
}

impl UcProblemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generator(mut self, generator: Generator) -> Self {
        self.generators.push(generator);
        self
    }

    pub fn generators(mut self, generators: impl IntoIterator<Item = Generator>) -> Self {
        self.generators.extend(generators);
        self
    }

    pub fn storage(mut self, unit: StorageUnit) -> Self {
        self.storage.push(unit);
        self
    }

    pub fn storage_units(mut self, units: impl IntoIterator<Item = StorageUnit>) -> Self {
        self.storage.extend(units);
        self
    }

    pub fn demand(mut self, demand: impl Into<Vec<f64>>) -> Self {
        self.demand = Some(demand.into());
        self
    }

    /// Validate and build the problem.
    pub fn build(self) -> UcsResult<UcProblem> {
        let demand = self
            .demand
            .ok_or_else(|| UcsError::validation("demand", "no demand series supplied"))?;
        UcProblem::new(self.generators, self.storage, DemandSeries::new(demand)?)
    }
}
