use crate::error::{GameError, Result};
use crate::unit::{Unit, UnitRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Handle to one unit instance inside an [`Army`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitInstance {
    pub id: UnitId,
    pub unit: Unit,
    /// Lent to a squad. Drafted instances still count towards the army's
    /// strength but cannot be removed or broken down.
    pub drafted: bool,
}

/// A strength-conserving collection of unit instances.
///
/// `strength` is kept equal to the sum of every instance's strength,
/// drafted or not. Instances keep insertion order, which doubles as their age.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Army {
    units: Vec<UnitInstance>,
    strength: u32,
    next_id: u64,
}

impl Army {
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            strength: 0,
            next_id: 0,
        }
    }

    pub fn with_strength(registry: &UnitRegistry, strength: u32) -> Result<Self> {
        let mut army = Self::new();
        army.add_strength(registry, strength)?;
        Ok(army)
    }

    pub fn strength(&self) -> u32 {
        self.strength
    }

    /// Strength that is not lent to a squad.
    pub fn available_strength(&self) -> u32 {
        self.available().map(|i| i.unit.strength).sum()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn drafted_count(&self) -> usize {
        self.units.iter().filter(|i| i.drafted).count()
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().map(|i| &i.unit)
    }

    pub fn instances(&self) -> &[UnitInstance] {
        &self.units
    }

    pub fn available(&self) -> impl Iterator<Item = &UnitInstance> {
        self.units.iter().filter(|i| !i.drafted)
    }

    pub fn get_number_of(&self, unit: &Unit) -> usize {
        self.units
            .iter()
            .filter(|i| i.unit.strength == unit.strength)
            .count()
    }

    pub fn add(&mut self, unit: Unit) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.strength += unit.strength;
        self.units.push(UnitInstance {
            id,
            unit,
            drafted: false,
        });
        id
    }

    pub fn add_units<I>(&mut self, units: I)
    where
        I: IntoIterator<Item = Unit>,
    {
        for unit in units {
            self.add(unit);
        }
    }

    /// Synthesizes `amount` of strength from the registry's denominations.
    pub fn add_strength(&mut self, registry: &UnitRegistry, amount: u32) -> Result<()> {
        let units = registry.compose(amount)?;
        self.add_units(units);
        Ok(())
    }

    /// Removes one unit of `unit`'s denomination, breaking stronger units
    /// down into change when none is held directly.
    pub fn remove(&mut self, registry: &UnitRegistry, unit: &Unit) -> Result<Unit> {
        let target = registry
            .get_by_strength(unit.strength)
            .ok_or(GameError::UnknownDenomination(unit.strength))?;

        let available = self.available_strength();
        if available < target.strength {
            return Err(GameError::InsufficientStrength {
                requested: target.strength,
                available,
            });
        }

        let mut scratch = self.clone();
        while scratch.position_of(target.strength).is_none() {
            let pos = scratch
                .weakest_above(target.strength)
                .ok_or(GameError::CannotDecompose(target.strength))?;
            scratch.split(registry, pos)?;
        }
        let pos = scratch
            .position_of(target.strength)
            .ok_or(GameError::CannotDecompose(target.strength))?;
        let removed = scratch.take(pos);

        *self = scratch;
        Ok(removed)
    }

    /// Removes exactly `amount` of strength and returns the removed units.
    pub fn remove_strength(&mut self, registry: &UnitRegistry, amount: u32) -> Result<Vec<Unit>> {
        let available = self.available_strength();
        if amount > available {
            return Err(GameError::InsufficientStrength {
                requested: amount,
                available,
            });
        }

        let mut scratch = self.clone();
        let mut removed = Vec::new();
        let mut remaining = amount;
        while remaining > 0 {
            if let Some(pos) = scratch.strongest_at_most(remaining) {
                let unit = scratch.take(pos);
                remaining -= unit.strength;
                removed.push(unit);
                continue;
            }
            // Everything left is stronger than what is still owed.
            let pos = scratch
                .weakest_above(remaining)
                .ok_or(GameError::CannotDecompose(remaining))?;
            scratch.split(registry, pos)?;
        }

        *self = scratch;
        Ok(removed)
    }

    pub fn set_strength(&mut self, registry: &UnitRegistry, strength: u32) -> Result<()> {
        if strength >= self.strength {
            self.add_strength(registry, strength - self.strength)
        } else {
            self.remove_strength(registry, self.strength - strength)
                .map(|_| ())
        }
    }

    /// Lends an available instance to a squad.
    pub fn draft(&mut self, id: UnitId) -> Option<Unit> {
        let instance = self.units.iter_mut().find(|i| i.id == id && !i.drafted)?;
        instance.drafted = true;
        Some(instance.unit.clone())
    }

    /// Whether `id` names a drafted instance of `unit` in this army.
    pub fn is_drafted(&self, id: UnitId, unit: &Unit) -> bool {
        self.units
            .iter()
            .any(|i| i.id == id && i.drafted && i.unit.strength == unit.strength)
    }

    /// Takes back a drafted instance that survived.
    pub fn release(&mut self, id: UnitId) -> Result<()> {
        let instance = self
            .units
            .iter_mut()
            .find(|i| i.id == id && i.drafted)
            .ok_or(GameError::UnitNotDrafted(id.0))?;
        instance.drafted = false;
        Ok(())
    }

    /// Drops a drafted instance that died.
    pub fn discard(&mut self, id: UnitId) -> Result<Unit> {
        let pos = self
            .units
            .iter()
            .position(|i| i.id == id && i.drafted)
            .ok_or(GameError::UnitNotDrafted(id.0))?;
        Ok(self.take(pos))
    }

    fn take(&mut self, pos: usize) -> Unit {
        let instance = self.units.remove(pos);
        self.strength -= instance.unit.strength;
        instance.unit
    }

    fn position_of(&self, strength: u32) -> Option<usize> {
        self.units
            .iter()
            .position(|i| !i.drafted && i.unit.strength == strength)
    }

    fn strongest_at_most(&self, strength: u32) -> Option<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, i)| !i.drafted && i.unit.strength <= strength)
            .max_by_key(|(pos, i)| (i.unit.strength, std::cmp::Reverse(*pos)))
            .map(|(pos, _)| pos)
    }

    fn weakest_above(&self, strength: u32) -> Option<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, i)| !i.drafted && i.unit.strength > strength)
            .min_by_key(|(pos, i)| (i.unit.strength, *pos))
            .map(|(pos, _)| pos)
    }

    /// Replaces the instance at `pos` with its worth of the next weaker
    /// denomination.
    fn split(&mut self, registry: &UnitRegistry, pos: usize) -> Result<()> {
        let upper = self.units[pos].unit.clone();
        let lower = registry
            .get_unit_below(&upper)
            .ok_or(GameError::MalformedRegistry {
                upper: upper.strength,
                lower: 0,
            })?;
        if upper.strength % lower.strength != 0 {
            return Err(GameError::MalformedRegistry {
                upper: upper.strength,
                lower: lower.strength,
            });
        }

        let count = upper.strength / lower.strength;
        debug!(
            "Breaking {} ({}) into {} x {} ({})",
            upper.name, upper.strength, count, lower.name, lower.strength
        );
        self.take(pos);
        for _ in 0..count {
            self.add(lower.clone());
        }
        Ok(())
    }
}
