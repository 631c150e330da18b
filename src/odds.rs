use crate::board::Board;
use crate::combat::{CombatEngine, CombatRound};
use crate::error::Result;
use crate::link::LinkState;
use crate::squad::{DraftOrder, Squad, SquadRole};
use crate::territory::Territory;
use crate::unit::{Unit, UnitRegistry};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

const ATTACKER: &str = "attacker";
const DEFENDER: &str = "defender";

/// Chance of an attacker emptying a defending territory, keyed by
/// (attacking units, defending units).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConquestOdds {
    cache: HashMap<(u16, u16), f64>,
}

impl ConquestOdds {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub fn get(&self, attackers: u16, defenders: u16) -> Option<f64> {
        self.cache.get(&(attackers, defenders)).copied()
    }

    pub fn insert(&mut self, attackers: u16, defenders: u16, probability: f64) {
        self.cache.insert((attackers, defenders), probability);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn load(path: &str) -> Result<Self> {
        let encoded = fs::read(path)?;
        Ok(bincode::deserialize(&encoded)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let encoded = bincode::serialize(self)?;
        fs::write(path, encoded)?;
        Ok(())
    }

    /// Plays `trials` full assaults of single-strength units through the
    /// combat engine and returns the share the attacker won.
    pub fn estimate<R: Rng>(
        engine: &mut CombatEngine<R>,
        attackers: u16,
        defenders: u16,
        trials: u32,
    ) -> Result<f64> {
        if trials == 0 || attackers == 0 {
            return Ok(0.0);
        }
        if defenders == 0 {
            return Ok(1.0);
        }

        let mut registry = UnitRegistry::new();
        registry.add_unit(Unit::new("Infantry", 1, "inf"))?;
        let mut board = Board::new(registry.clone());
        board.add_territory(Territory::new(ATTACKER, Some(0)));
        board.add_territory(Territory::new(DEFENDER, Some(1)));
        board.connect(ATTACKER, DEFENDER, LinkState::Open)?;

        let mut wins = 0;
        for _ in 0..trials {
            board
                .territory_mut(ATTACKER)?
                .army
                .set_strength(&registry, u32::from(attackers))?;
            board
                .territory_mut(DEFENDER)?
                .army
                .set_strength(&registry, u32::from(defenders))?;

            loop {
                let mut attacking = Squad::new(SquadRole::Attacker, ATTACKER);
                let mut defending = Squad::new(SquadRole::Defender, DEFENDER);
                let (from, to) = board.pair_mut(ATTACKER, DEFENDER)?;
                if attacking.auto_populate(from, DraftOrder::StrongestFirst)? == 0 {
                    break;
                }
                if defending.auto_populate(to, DraftOrder::StrongestFirst)? == 0 {
                    attacking.disband(&mut from.army)?;
                    wins += 1;
                    break;
                }
                let round = CombatRound::new(&board, ATTACKER, DEFENDER, attacking, defending)?;
                engine.fight(&mut board, round)?;
            }
            board.drain_events();
        }
        Ok(f64::from(wins) / f64::from(trials))
    }
}
