use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

/// A unit denomination. Two denominations are the same level when their
/// strengths match; the tag is only used by renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Unit {
    pub name: String,
    pub strength: u32,
    pub tag: String,
}

impl Unit {
    pub fn new(name: &str, strength: u32, tag: &str) -> Self {
        Self {
            name: name.to_string(),
            strength,
            tag: tag.to_string(),
        }
    }
}

/// Denominations ordered by strength, at most one per strength level.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UnitRegistry {
    units: BTreeMap<u32, Unit>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self {
            units: BTreeMap::new(),
        }
    }

    pub fn add_unit(&mut self, unit: Unit) -> Result<()> {
        if unit.strength == 0 {
            return Err(GameError::UnknownDenomination(0));
        }
        if self.units.contains_key(&unit.strength) {
            return Err(GameError::DuplicateStrength(unit.strength));
        }
        self.units.insert(unit.strength, unit);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn get_strongest(&self) -> Option<&Unit> {
        self.units.values().next_back()
    }

    pub fn get_weakest(&self) -> Option<&Unit> {
        self.units.values().next()
    }

    pub fn get_unit_above(&self, unit: &Unit) -> Option<&Unit> {
        self.units
            .range((Excluded(unit.strength), Unbounded))
            .next()
            .map(|(_, u)| u)
    }

    pub fn get_unit_below(&self, unit: &Unit) -> Option<&Unit> {
        self.units.range(..unit.strength).next_back().map(|(_, u)| u)
    }

    pub fn get_by_strength(&self, strength: u32) -> Option<&Unit> {
        self.units.get(&strength)
    }

    /// Strongest denomination not exceeding `strength`.
    pub fn strongest_at_most(&self, strength: u32) -> Option<&Unit> {
        self.units.range(..=strength).next_back().map(|(_, u)| u)
    }

    pub fn has_atomic_unit(&self) -> bool {
        self.units.contains_key(&1)
    }

    /// Weakest to strongest.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Greedy split of `strength` into denominations, strongest first.
    pub fn compose(&self, strength: u32) -> Result<Vec<Unit>> {
        let mut remaining = strength;
        let mut units = Vec::new();
        while remaining > 0 {
            let unit = self
                .strongest_at_most(remaining)
                .ok_or(GameError::MissingAtomicUnit(strength))?;
            remaining -= unit.strength;
            units.push(unit.clone());
        }
        Ok(units)
    }
}
