use crate::board::Board;
use crate::constants::{DIE_FACES, MAX_ATTACK_SQUAD_SIZE, MAX_DEFEND_SQUAD_SIZE};
use crate::error::{GameError, Result};
use crate::events::BoardEvent;
use crate::squad::Squad;
use rand::rngs::ThreadRng;
use rand::{thread_rng, Rng};
use serde::Serialize;
use tracing::{debug, info, warn};

/// An attacker/defender pairing with the squads each side committed.
/// Only constructible through [`CombatRound::new`], which enforces the
/// round's rules.
#[derive(Debug, PartialEq, Serialize)]
pub struct CombatRound {
    attacker: String,
    defender: String,
    attacking: Squad,
    defending: Squad,
}

impl CombatRound {
    pub fn new(
        board: &Board,
        attacker: &str,
        defender: &str,
        attacking: Squad,
        defending: Squad,
    ) -> Result<Self> {
        Self::validate(board, attacker, defender, &attacking, &defending)?;
        Ok(Self {
            attacker: attacker.to_string(),
            defender: defender.to_string(),
            attacking,
            defending,
        })
    }

    /// Checks the round's rules without taking the squads, so a caller can
    /// still disband them when the round is rejected.
    pub fn validate(
        board: &Board,
        attacker: &str,
        defender: &str,
        attacking: &Squad,
        defending: &Squad,
    ) -> Result<()> {
        let from = board.territory(attacker)?;
        let to = board.territory(defender)?;
        if from.owner == to.owner {
            return Err(GameError::SameOwner(
                attacker.to_string(),
                defender.to_string(),
            ));
        }
        if attacker == defender {
            return Err(GameError::SameTerritory(attacker.to_string()));
        }
        for (squad, expected) in [(attacking, attacker), (defending, defender)] {
            if squad.origin() != expected {
                return Err(GameError::SquadOrigin {
                    expected: expected.to_string(),
                    found: squad.origin().to_string(),
                });
            }
        }
        attacking.check_drafted_in(&from.army)?;
        defending.check_drafted_in(&to.army)?;

        let alive = attacking.get_alive_units();
        if alive == 0 || alive > MAX_ATTACK_SQUAD_SIZE {
            return Err(GameError::SquadSize {
                role: "attacking",
                alive,
                max: MAX_ATTACK_SQUAD_SIZE,
            });
        }
        let alive = defending.get_alive_units();
        if alive == 0 || alive > MAX_DEFEND_SQUAD_SIZE {
            return Err(GameError::SquadSize {
                role: "defending",
                alive,
                max: MAX_DEFEND_SQUAD_SIZE,
            });
        }
        Ok(())
    }

    pub fn attacker(&self) -> &str {
        &self.attacker
    }

    pub fn defender(&self) -> &str {
        &self.defender
    }

    pub fn attacking_squad(&self) -> &Squad {
        &self.attacking
    }

    pub fn defending_squad(&self) -> &Squad {
        &self.defending
    }
}

/// What a resolved round looked like. Dice are sorted high to low.
#[derive(Debug, PartialEq, Serialize)]
pub struct CombatResult {
    pub round: CombatRound,
    pub attacker_rolls: Vec<u16>,
    pub defender_rolls: Vec<u16>,
    pub attackers_alive: usize,
    pub defenders_alive: usize,
    pub attackers_killed: usize,
    pub defenders_killed: usize,
}

impl CombatResult {
    pub fn defenders_wiped_out(&self) -> bool {
        self.defenders_alive == 0
    }
}

/// Resolves combat rounds with six-sided dice.
#[derive(Debug)]
pub struct CombatEngine<R: Rng = ThreadRng> {
    rng: R,
}

impl CombatEngine<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: thread_rng() }
    }
}

impl Default for CombatEngine<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> CombatEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// One die per alive member, paired with the member's index, highest
    /// roll first.
    fn roll(&mut self, squad: &Squad) -> Vec<(u16, usize)> {
        let mut rolls: Vec<(u16, usize)> = squad
            .alive_indices()
            .into_iter()
            .map(|idx| (self.rng.gen_range(1..=DIE_FACES), idx))
            .collect();
        rolls.sort_by(|a, b| b.0.cmp(&a.0));
        rolls
    }

    /// Rolls, compares the highest dice pairwise (ties go to the defender),
    /// then hands survivors back to their armies and drops the dead.
    /// Squads whose units are no longer drafted in their armies are handed
    /// back unfought.
    pub fn fight(&mut self, board: &mut Board, mut round: CombatRound) -> Result<CombatResult> {
        {
            let (from, to) = board.pair_mut(&round.attacker, &round.defender)?;
            let drafted = round
                .attacking
                .check_drafted_in(&from.army)
                .and_then(|_| round.defending.check_drafted_in(&to.army));
            if let Err(err) = drafted {
                warn!(
                    "{} attacking {}: squads out of sync with armies",
                    round.attacker, round.defender
                );
                round.attacking.release_drafted(&mut from.army);
                round.defending.release_drafted(&mut to.army);
                return Err(err);
            }
        }

        let attacker_rolls = self.roll(&round.attacking);
        let defender_rolls = self.roll(&round.defending);
        debug!(
            "{} rolls {:?}, {} rolls {:?}",
            round.attacker, attacker_rolls, round.defender, defender_rolls
        );

        let mut attackers_killed = 0;
        let mut defenders_killed = 0;
        for (&(attack, attack_idx), &(defend, defend_idx)) in
            attacker_rolls.iter().zip(defender_rolls.iter())
        {
            if attack > defend {
                round.defending.mark_dead(defend_idx);
                defenders_killed += 1;
            } else {
                round.attacking.mark_dead(attack_idx);
                attackers_killed += 1;
            }
        }

        let attackers_alive = round.attacking.get_alive_units();
        let defenders_alive = round.defending.get_alive_units();

        let (from, to) = board.pair_mut(&round.attacker, &round.defender)?;
        round.attacking.resolve(&mut from.army)?;
        round.defending.resolve(&mut to.army)?;

        info!(
            "{} attacked {}: lost {}, killed {}",
            round.attacker, round.defender, attackers_killed, defenders_killed
        );
        board.push_event(BoardEvent::CombatResolved {
            attacker: round.attacker.clone(),
            defender: round.defender.clone(),
            attackers_killed,
            defenders_killed,
        });

        Ok(CombatResult {
            attacker_rolls: attacker_rolls.iter().map(|&(roll, _)| roll).collect(),
            defender_rolls: defender_rolls.iter().map(|&(roll, _)| roll).collect(),
            attackers_alive,
            defenders_alive,
            attackers_killed,
            defenders_killed,
            round,
        })
    }
}
