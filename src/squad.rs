use crate::army::{Army, UnitId};
use crate::constants::{MAX_ATTACK_SQUAD_SIZE, MAX_DEFEND_SQUAD_SIZE};
use crate::error::{GameError, Result};
use crate::territory::Territory;
use crate::unit::Unit;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquadRole {
    Attacker,
    Defender,
}

impl SquadRole {
    pub fn capacity(&self) -> usize {
        match self {
            SquadRole::Attacker => MAX_ATTACK_SQUAD_SIZE,
            SquadRole::Defender => MAX_DEFEND_SQUAD_SIZE,
        }
    }
}

/// Which units a squad drafts first. Ties go to the oldest instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DraftOrder {
    #[default]
    StrongestFirst,
    WeakestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Alive,
    Dead,
    Returned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadMember {
    pub id: UnitId,
    pub unit: Unit,
    pub status: MemberStatus,
}

/// Units lent by one territory's army for a single combat round.
///
/// The squad only holds handles; the instances stay in the army, flagged as
/// drafted, until [`Squad::resolve`] or [`Squad::disband`] hands them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    role: SquadRole,
    origin: String,
    members: Vec<SquadMember>,
}

impl Squad {
    pub fn new(role: SquadRole, origin: &str) -> Self {
        Self {
            role,
            origin: origin.to_string(),
            members: Vec::new(),
        }
    }

    pub fn role(&self) -> SquadRole {
        self.role
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn capacity(&self) -> usize {
        self.role.capacity()
    }

    pub fn members(&self) -> &[SquadMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drafts available units from the origin territory's army until the
    /// squad is full or the army has nothing left to lend. Returns how many
    /// were drafted.
    pub fn auto_populate(
        &mut self,
        territory: &mut Territory,
        order: DraftOrder,
    ) -> Result<usize> {
        if territory.name != self.origin {
            return Err(GameError::SquadOrigin {
                expected: self.origin.clone(),
                found: territory.name.clone(),
            });
        }
        let army = &mut territory.army;
        let room = self.capacity().saturating_sub(self.members.len());
        let picks: Vec<UnitId> = match order {
            DraftOrder::StrongestFirst => army
                .available()
                .sorted_by_key(|i| Reverse(i.unit.strength))
                .take(room)
                .map(|i| i.id)
                .collect(),
            DraftOrder::WeakestFirst => army
                .available()
                .sorted_by_key(|i| i.unit.strength)
                .take(room)
                .map(|i| i.id)
                .collect(),
        };

        let mut drafted = 0;
        for id in picks {
            if let Some(unit) = army.draft(id) {
                self.members.push(SquadMember {
                    id,
                    unit,
                    status: MemberStatus::Alive,
                });
                drafted += 1;
            }
        }
        Ok(drafted)
    }

    /// Fails unless every alive member is still drafted in `army`, so that
    /// a later [`Squad::resolve`] cannot stop halfway.
    pub fn check_drafted_in(&self, army: &Army) -> Result<()> {
        match self
            .members
            .iter()
            .find(|m| m.status == MemberStatus::Alive && !army.is_drafted(m.id, &m.unit))
        {
            Some(member) => Err(GameError::UnitNotDrafted(member.id.0)),
            None => Ok(()),
        }
    }

    pub fn get_alive_units(&self) -> usize {
        self.count(MemberStatus::Alive)
    }

    pub fn get_dead_units(&self) -> usize {
        self.count(MemberStatus::Dead)
    }

    pub fn get_returned_units(&self) -> usize {
        self.count(MemberStatus::Returned)
    }

    fn count(&self, status: MemberStatus) -> usize {
        self.members.iter().filter(|m| m.status == status).count()
    }

    /// Indices of alive members in squad order.
    pub(crate) fn alive_indices(&self) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.status == MemberStatus::Alive)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub(crate) fn mark_dead(&mut self, idx: usize) {
        if let Some(member) = self.members.get_mut(idx) {
            if member.status == MemberStatus::Alive {
                member.status = MemberStatus::Dead;
            }
        }
    }

    /// Settles the round with the source army: dead members leave it for
    /// good, alive ones are returned.
    pub fn resolve(&mut self, army: &mut Army) -> Result<()> {
        for member in &mut self.members {
            match member.status {
                MemberStatus::Alive => {
                    army.release(member.id)?;
                    member.status = MemberStatus::Returned;
                }
                MemberStatus::Dead => {
                    army.discard(member.id)?;
                }
                MemberStatus::Returned => {}
            }
        }
        Ok(())
    }

    /// Hands back the alive members `army` still holds as drafted and
    /// leaves the rest alone.
    pub(crate) fn release_drafted(&mut self, army: &mut Army) {
        for member in &mut self.members {
            if member.status == MemberStatus::Alive
                && army.is_drafted(member.id, &member.unit)
                && army.release(member.id).is_ok()
            {
                member.status = MemberStatus::Returned;
            }
        }
    }

    /// Hands every alive member back without fighting.
    pub fn disband(&mut self, army: &mut Army) -> Result<()> {
        for member in &mut self.members {
            if member.status == MemberStatus::Alive {
                army.release(member.id)?;
                member.status = MemberStatus::Returned;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::UnitRegistry;

    fn registry() -> UnitRegistry {
        let mut registry = UnitRegistry::new();
        registry.add_unit(Unit::new("Infantry", 1, "inf")).unwrap();
        registry.add_unit(Unit::new("Cavalry", 5, "cav")).unwrap();
        registry.add_unit(Unit::new("Artillery", 10, "art")).unwrap();
        registry
    }

    fn mixed_territory(name: &str, registry: &UnitRegistry) -> Territory {
        let mut territory = Territory::new(name, Some(0));
        for strength in [1, 10, 5, 1, 5] {
            territory
                .army
                .add(registry.get_by_strength(strength).unwrap().clone());
        }
        territory
    }

    #[test]
    fn test_attacker_drafts_strongest_first() {
        let registry = registry();
        let mut ukraine = mixed_territory("Ukraine", &registry);
        let mut squad = Squad::new(SquadRole::Attacker, "Ukraine");

        assert_eq!(
            squad
                .auto_populate(&mut ukraine, DraftOrder::StrongestFirst)
                .unwrap(),
            3
        );
        let strengths: Vec<u32> = squad.members().iter().map(|m| m.unit.strength).collect();
        assert_eq!(strengths, vec![10, 5, 5]);
        assert_eq!(ukraine.army.drafted_count(), 3);
        assert_eq!(ukraine.army.strength(), 22);
        assert_eq!(ukraine.army.available_strength(), 2);
    }

    #[test]
    fn test_defender_capacity_and_weakest_first() {
        let registry = registry();
        let mut ural = mixed_territory("Ural", &registry);
        let mut squad = Squad::new(SquadRole::Defender, "Ural");

        assert_eq!(squad.auto_populate(&mut ural, DraftOrder::WeakestFirst).unwrap(), 2);
        assert!(squad.members().iter().all(|m| m.unit.strength == 1));
        assert_eq!(squad.auto_populate(&mut ural, DraftOrder::WeakestFirst).unwrap(), 0);
        assert_eq!(squad.get_alive_units(), 2);
    }

    #[test]
    fn test_small_army_fills_partially() {
        let registry = registry();
        let mut ukraine = Territory::new("Ukraine", Some(0));
        ukraine.army = Army::with_strength(&registry, 1).unwrap();
        let mut squad = Squad::new(SquadRole::Attacker, "Ukraine");
        assert_eq!(
            squad
                .auto_populate(&mut ukraine, DraftOrder::StrongestFirst)
                .unwrap(),
            1
        );
        assert_eq!(squad.len(), 1);
    }

    #[test]
    fn test_drafting_from_another_territory_rejected() {
        let registry = registry();
        let mut ural = mixed_territory("Ural", &registry);
        let mut squad = Squad::new(SquadRole::Attacker, "Ukraine");

        assert!(matches!(
            squad.auto_populate(&mut ural, DraftOrder::StrongestFirst),
            Err(GameError::SquadOrigin { .. })
        ));
        assert!(squad.is_empty());
        assert_eq!(ural.army.drafted_count(), 0);
    }

    #[test]
    fn test_check_drafted_in_detects_foreign_army() {
        let registry = registry();
        let mut ukraine = mixed_territory("Ukraine", &registry);
        let ural = mixed_territory("Ural", &registry);
        let mut squad = Squad::new(SquadRole::Attacker, "Ukraine");
        squad
            .auto_populate(&mut ukraine, DraftOrder::StrongestFirst)
            .unwrap();

        assert!(squad.check_drafted_in(&ukraine.army).is_ok());
        // Same handles, but nothing is drafted over there.
        assert!(matches!(
            squad.check_drafted_in(&ural.army),
            Err(GameError::UnitNotDrafted(_))
        ));
    }

    #[test]
    fn test_resolve_discards_dead_and_returns_alive() {
        let registry = registry();
        let mut ukraine = mixed_territory("Ukraine", &registry);
        let mut squad = Squad::new(SquadRole::Attacker, "Ukraine");
        squad
            .auto_populate(&mut ukraine, DraftOrder::StrongestFirst)
            .unwrap();

        squad.mark_dead(0);
        squad.resolve(&mut ukraine.army).unwrap();

        assert_eq!(squad.get_dead_units(), 1);
        assert_eq!(squad.get_returned_units(), 2);
        assert_eq!(squad.get_alive_units(), 0);
        assert_eq!(ukraine.army.strength(), 12);
        assert_eq!(ukraine.army.drafted_count(), 0);
    }

    #[test]
    fn test_disband_returns_everything() {
        let registry = registry();
        let mut ural = mixed_territory("Ural", &registry);
        let mut squad = Squad::new(SquadRole::Defender, "Ural");
        squad
            .auto_populate(&mut ural, DraftOrder::StrongestFirst)
            .unwrap();
        squad.disband(&mut ural.army).unwrap();

        assert_eq!(ural.army.available_strength(), 22);
        assert_eq!(squad.get_returned_units(), 2);
    }
}
