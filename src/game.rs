use crate::board::Board;
use crate::combat::{CombatEngine, CombatResult, CombatRound};
use crate::connectivity::ConnectivityFinder;
use crate::error::{GameError, Result};
use crate::events::BoardEvent;
use crate::link::LinkState;
use crate::odds::ConquestOdds;
use crate::player::Player;
use crate::squad::{DraftOrder, Squad, SquadRole};
use crate::unit::Unit;
use itertools::Itertools;
use rand::rngs::ThreadRng;
use rand::Rng;
use std::collections::HashSet;
use tracing::info;

/// Drives the combat core on behalf of a turn-flow or AI caller. Every
/// command either fully applies or returns an error with the board unchanged.
#[derive(Debug)]
pub struct Game<R: Rng = ThreadRng> {
    pub board: Board,
    pub players: Vec<Player>,
    engine: CombatEngine<R>,
    odds: ConquestOdds,
}

impl Game<ThreadRng> {
    pub fn new(board: Board, players: Vec<Player>) -> Self {
        Self::with_rng(board, players, rand::thread_rng())
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(board: Board, players: Vec<Player>, rng: R) -> Self {
        Self {
            board,
            players,
            engine: CombatEngine::with_rng(rng),
            odds: ConquestOdds::new(),
        }
    }

    pub fn player(&self, player_id: usize) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .ok_or(GameError::UnknownPlayer(player_id))
    }

    fn player_index(&self, player_id: usize) -> Result<usize> {
        self.players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(GameError::UnknownPlayer(player_id))
    }

    fn ensure_owner(&self, player_id: usize, territory: &str) -> Result<()> {
        if !self.board.territory(territory)?.is_owned_by(player_id) {
            return Err(GameError::NotOwner {
                territory: territory.to_string(),
                player: player_id,
            });
        }
        Ok(())
    }

    /// Moves strength from the player's reserve onto one of their territories.
    pub fn reinforce(&mut self, player_id: usize, territory: &str, strength: u32) -> Result<()> {
        let idx = self.player_index(player_id)?;
        self.ensure_owner(player_id, territory)?;

        let units = self.players[idx]
            .reserve
            .remove_strength(self.board.registry(), strength)?;
        self.board.territory_mut(territory)?.army.add_units(units);
        info!("Player {} reinforced {} with {}", player_id, territory, strength);
        Ok(())
    }

    /// Fights one round between neighbors. The attacker drafts with `order`,
    /// the defender always strongest first. Squads of a rejected round are
    /// handed back untouched.
    pub fn attack(&mut self, from: &str, to: &str, order: DraftOrder) -> Result<CombatResult> {
        if !self.board.territory(from)?.is_adjacent(to) {
            return Err(GameError::NotNeighbors(from.to_string(), to.to_string()));
        }
        if self.board.link(from, to).is_none() {
            return Err(GameError::NoLink(from.to_string(), to.to_string()));
        }

        let mut attacking = Squad::new(SquadRole::Attacker, from);
        let mut defending = Squad::new(SquadRole::Defender, to);
        {
            let (origin, target) = self.board.pair_mut(from, to)?;
            attacking.auto_populate(origin, order)?;
            defending.auto_populate(target, DraftOrder::StrongestFirst)?;
        }

        if let Err(err) = CombatRound::validate(&self.board, from, to, &attacking, &defending) {
            let (origin, target) = self.board.pair_mut(from, to)?;
            attacking.disband(&mut origin.army)?;
            defending.disband(&mut target.army)?;
            return Err(err);
        }
        let round = CombatRound::new(&self.board, from, to, attacking, defending)?;
        self.engine.fight(&mut self.board, round)
    }

    /// Claims an emptied enemy territory and moves `strength` into it.
    pub fn occupy(&mut self, from: &str, to: &str, strength: u32) -> Result<()> {
        let origin = self.board.territory(from)?;
        let target = self.board.territory(to)?;
        let new_owner = origin
            .owner
            .ok_or_else(|| GameError::Unowned(from.to_string()))?;
        if !origin.is_adjacent(to) {
            return Err(GameError::NotNeighbors(from.to_string(), to.to_string()));
        }
        if target.owner == origin.owner {
            return Err(GameError::SameOwner(from.to_string(), to.to_string()));
        }
        if !target.army.is_empty() {
            return Err(GameError::NotConquerable(to.to_string()));
        }
        if strength == 0 {
            return Err(GameError::InsufficientStrength {
                requested: 0,
                available: origin.army.available_strength(),
            });
        }

        let mut army = origin.army.clone();
        let moved = army.remove_strength(self.board.registry(), strength)?;
        let previous_owner = target.owner;

        let (origin, target) = self.board.pair_mut(from, to)?;
        origin.army = army;
        target.army.add_units(moved);
        target.owner = Some(new_owner);

        info!("Player {} conquered {} from {}", new_owner, to, from);
        self.board.push_event(BoardEvent::TerritoryConquered {
            territory: to.to_string(),
            previous_owner,
            new_owner,
        });
        self.board.push_event(BoardEvent::UnitsMoved {
            from: from.to_string(),
            to: to.to_string(),
            strength,
        });
        Ok(())
    }

    /// Moves `strength` between two territories of the same owner, provided
    /// every denomination being moved can reach the destination.
    pub fn move_units(&mut self, from: &str, to: &str, strength: u32) -> Result<()> {
        let origin = self.board.territory(from)?;
        let target = self.board.territory(to)?;
        if from == to {
            return Err(GameError::SameTerritory(from.to_string()));
        }
        let owner = origin
            .owner
            .ok_or_else(|| GameError::Unowned(from.to_string()))?;
        if !target.is_owned_by(owner) {
            return Err(GameError::NotOwner {
                territory: to.to_string(),
                player: owner,
            });
        }
        if strength == 0 {
            return Err(GameError::InsufficientStrength {
                requested: 0,
                available: origin.army.available_strength(),
            });
        }

        let mut army = origin.army.clone();
        let moved = army.remove_strength(self.board.registry(), strength)?;
        let finder = ConnectivityFinder::new(&self.board);
        let denominations: Vec<&Unit> = moved.iter().unique_by(|u| u.strength).collect();
        if denominations
            .iter()
            .any(|unit| !finder.is_reachable(from, to, unit))
        {
            return Err(GameError::Unreachable(to.to_string(), from.to_string()));
        }

        let (origin, target) = self.board.pair_mut(from, to)?;
        origin.army = army;
        target.army.add_units(moved);

        info!("Moved {} strength from {} to {}", strength, from, to);
        self.board.push_event(BoardEvent::UnitsMoved {
            from: from.to_string(),
            to: to.to_string(),
            strength,
        });
        Ok(())
    }

    /// Sends a single unit across the link between two neighbors.
    pub fn transfer_unit(&mut self, unit: &Unit, from: &str, to: &str) -> Result<bool> {
        self.board.transfer_unit(unit, from, to)
    }

    pub fn set_link_state(
        &mut self,
        a: &str,
        b: &str,
        state: LinkState,
        duration: u32,
    ) -> Result<()> {
        self.board.set_link_state(a, b, state, duration)
    }

    /// Counts down every temporary link effect.
    pub fn end_turn(&mut self) {
        self.board.elapse_links();
    }

    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.board.drain_events()
    }

    /// The only owner left on the board, if any.
    pub fn check_win_conditions(&self) -> Option<usize> {
        let owners: HashSet<Option<usize>> = self.board.territories().map(|t| t.owner).collect();
        match owners.into_iter().collect::<Vec<_>>().as_slice() {
            [Some(owner)] => Some(*owner),
            _ => None,
        }
    }

    pub fn load_conquest_odds(&mut self, path: &str) -> Result<()> {
        self.odds = ConquestOdds::load(path)?;
        Ok(())
    }

    pub fn set_conquest_odds(&mut self, odds: ConquestOdds) {
        self.odds = odds;
    }

    /// Looked-up chance of `from` emptying `to`, by available unit counts.
    pub fn conquest_odds(&self, from: &str, to: &str) -> Result<Option<f64>> {
        let attackers = self.board.territory(from)?.army.available().count();
        let defenders = self.board.territory(to)?.army.available().count();
        let clamp = |n: usize| u16::try_from(n).unwrap_or(u16::MAX);
        Ok(self.odds.get(clamp(attackers), clamp(defenders)))
    }
}
