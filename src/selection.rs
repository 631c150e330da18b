use crate::board::Board;
use crate::connectivity::ConnectivityFinder;
use crate::error::{GameError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    Attack,
    Move,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionState {
    #[default]
    Idle,
    Origin(String),
    Ready {
        origin: String,
        target: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionEvent {
    OriginSelected(String),
    OriginCleared,
    TargetSelected { origin: String, target: String },
}

/// Tracks which two territories a player has picked for an attack or a
/// troop movement. Invalid picks are rejected and leave the state as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selector {
    player: usize,
    mode: SelectionMode,
    state: SelectionState,
}

impl Selector {
    pub fn new(player: usize, mode: SelectionMode) -> Self {
        Self {
            player,
            mode,
            state: SelectionState::Idle,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// The picked pair once both ends are chosen.
    pub fn ready(&self) -> Option<(&str, &str)> {
        match &self.state {
            SelectionState::Ready { origin, target } => Some((origin, target)),
            _ => None,
        }
    }

    pub fn set_mode(&mut self, mode: SelectionMode) -> Option<SelectionEvent> {
        self.mode = mode;
        if self.state == SelectionState::Idle {
            return None;
        }
        Some(self.clear())
    }

    pub fn clear(&mut self) -> SelectionEvent {
        self.state = SelectionState::Idle;
        SelectionEvent::OriginCleared
    }

    pub fn select(&mut self, board: &Board, name: &str) -> Result<SelectionEvent> {
        let territory = board.territory(name)?;
        let own = territory.is_owned_by(self.player);

        let origin = match &self.state {
            SelectionState::Origin(origin) => origin.clone(),
            SelectionState::Idle | SelectionState::Ready { .. } => {
                return self.pick_origin(board, name);
            }
        };

        if origin == name {
            return Ok(self.clear());
        }

        let ready = match self.mode {
            SelectionMode::Attack if own => return self.pick_origin(board, name),
            SelectionMode::Attack => {
                territory.is_adjacent(&origin) && board.link(&origin, name).is_some()
            }
            SelectionMode::Move => {
                let unit = board.registry().get_weakest().ok_or_else(|| {
                    GameError::InvalidSelection("no unit denominations registered".to_string())
                })?;
                own && ConnectivityFinder::new(board).is_reachable(&origin, name, unit)
            }
        };
        if !ready {
            return Err(GameError::InvalidSelection(format!(
                "'{}' is not a valid target from '{}'",
                name, origin
            )));
        }

        self.state = SelectionState::Ready {
            origin: origin.clone(),
            target: name.to_string(),
        };
        Ok(SelectionEvent::TargetSelected {
            origin,
            target: name.to_string(),
        })
    }

    fn pick_origin(&mut self, board: &Board, name: &str) -> Result<SelectionEvent> {
        let territory = board.territory(name)?;
        if !territory.is_owned_by(self.player) {
            return Err(GameError::NotOwner {
                territory: name.to_string(),
                player: self.player,
            });
        }
        if territory.army.available_strength() == 0 {
            return Err(GameError::InvalidSelection(format!(
                "'{}' has no units to send",
                name
            )));
        }
        self.state = SelectionState::Origin(name.to_string());
        Ok(SelectionEvent::OriginSelected(name.to_string()))
    }
}
