use crate::army::Army;
use crate::error::{GameError, Result};
use crate::territory::Territory;
use crate::unit::{Unit, UnitRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// How a link treats units trying to cross it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LinkState {
    #[default]
    Open,
    Blockade,
}

impl LinkState {
    pub fn can_transfer(&self, _unit: &Unit) -> bool {
        match self {
            LinkState::Open => true,
            LinkState::Blockade => false,
        }
    }

    /// Moves one unit of `unit`'s denomination between two armies.
    pub fn transfer(
        &self,
        registry: &UnitRegistry,
        unit: &Unit,
        origin: &mut Army,
        destination: &mut Army,
    ) -> Result<()> {
        match self {
            LinkState::Open => {
                let moved = origin.remove(registry, unit)?;
                destination.add(moved);
                Ok(())
            }
            LinkState::Blockade => Err(GameError::TransferBlocked),
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkState::Open => write!(f, "open"),
            LinkState::Blockade => write!(f, "blockade"),
        }
    }
}

/// The connection between two neighboring territories.
///
/// While `current_state` differs from `default_state` the link counts down
/// `remaining_duration` turns and then reverts. In the default state the
/// duration is always zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub ends: (String, String),
    default_state: LinkState,
    current_state: LinkState,
    remaining_duration: u32,
}

impl Link {
    pub fn new(a: &str, b: &str, default_state: LinkState) -> Self {
        Self {
            ends: (a.to_string(), b.to_string()),
            default_state,
            current_state: default_state,
            remaining_duration: 0,
        }
    }

    pub fn current_state(&self) -> LinkState {
        self.current_state
    }

    pub fn default_state(&self) -> LinkState {
        self.default_state
    }

    pub fn remaining_duration(&self) -> u32 {
        self.remaining_duration
    }

    pub fn is_default(&self) -> bool {
        self.current_state == self.default_state
    }

    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.ends.0 == a && self.ends.1 == b) || (self.ends.0 == b && self.ends.1 == a)
    }

    pub fn set_state(&mut self, state: LinkState, duration: u32) -> Result<()> {
        if state == self.default_state {
            self.current_state = state;
            self.remaining_duration = 0;
            return Ok(());
        }
        if duration == 0 {
            return Err(GameError::ZeroDuration);
        }
        self.current_state = state;
        self.remaining_duration = duration;
        debug!(
            "Link {}-{} set to {} for {} turns",
            self.ends.0, self.ends.1, state, duration
        );
        Ok(())
    }

    /// Counts one turn down. Returns true when the link reverted.
    pub fn elapse(&mut self) -> bool {
        if self.is_default() {
            return false;
        }
        self.remaining_duration = self.remaining_duration.saturating_sub(1);
        if self.remaining_duration == 0 {
            info!(
                "Link {}-{} reverted to {}",
                self.ends.0, self.ends.1, self.default_state
            );
            self.current_state = self.default_state;
            return true;
        }
        false
    }

    pub fn can_transfer(&self, unit: &Unit) -> bool {
        self.current_state.can_transfer(unit)
    }

    /// Moves one unit across the link. Returns `Ok(false)` when the current
    /// state does not let the unit through.
    pub fn transfer_between(
        &self,
        registry: &UnitRegistry,
        unit: &Unit,
        origin: &mut Territory,
        destination: &mut Territory,
    ) -> Result<bool> {
        if !origin.is_adjacent(&destination.name) || !destination.is_adjacent(&origin.name) {
            return Err(GameError::NotNeighbors(
                origin.name.clone(),
                destination.name.clone(),
            ));
        }
        if !self.connects(&origin.name, &destination.name) {
            return Err(GameError::NoLink(
                origin.name.clone(),
                destination.name.clone(),
            ));
        }
        if !self.can_transfer(unit) {
            warn!(
                "{} cannot cross from {} to {}: link is {}",
                unit.name, origin.name, destination.name, self.current_state
            );
            return Ok(false);
        }
        self.current_state
            .transfer(registry, unit, &mut origin.army, &mut destination.army)?;
        Ok(true)
    }
}
