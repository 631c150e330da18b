use crate::link::LinkState;
use serde::{Deserialize, Serialize};

/// Changes the orchestration layer (renderer, AI) may want to react to.
/// Queued on the board and drained by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    LinkChanged {
        a: String,
        b: String,
        state: LinkState,
        remaining: u32,
    },
    LinkReverted {
        a: String,
        b: String,
        state: LinkState,
    },
    CombatResolved {
        attacker: String,
        defender: String,
        attackers_killed: usize,
        defenders_killed: usize,
    },
    TerritoryConquered {
        territory: String,
        previous_owner: Option<usize>,
        new_owner: usize,
    },
    UnitsMoved {
        from: String,
        to: String,
        strength: u32,
    },
}
