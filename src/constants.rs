//! Combat limits shared by squads, rounds and the odds estimator.

/// Attacking squads roll at most this many dice.
pub const MAX_ATTACK_SQUAD_SIZE: usize = 3;

/// Defending squads roll at most this many dice.
pub const MAX_DEFEND_SQUAD_SIZE: usize = 2;

pub const DIE_FACES: u16 = 6;
