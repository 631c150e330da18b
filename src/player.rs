use crate::army::Army;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: usize,
    pub name: String,
    /// Units not yet placed on the board.
    pub reserve: Army,
}

impl Player {
    pub fn new(id: usize, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            reserve: Army::new(),
        }
    }

    pub fn reserve_strength(&self) -> u32 {
        self.reserve.strength()
    }
}
