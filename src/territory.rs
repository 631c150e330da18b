use crate::army::Army;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Territory {
    pub name: String,
    pub owner: Option<usize>,
    pub adjacent_territories: BTreeSet<String>,
    pub army: Army,
}

impl Territory {
    pub fn new(name: &str, owner: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            owner,
            adjacent_territories: BTreeSet::new(),
            army: Army::new(),
        }
    }

    pub fn add_adjacent(&mut self, adjacent: &str) {
        self.adjacent_territories.insert(adjacent.to_string());
    }

    pub fn is_adjacent(&self, territory: &str) -> bool {
        self.adjacent_territories.contains(territory)
    }

    pub fn is_owned_by(&self, player: usize) -> bool {
        self.owner == Some(player)
    }

    pub fn shares_owner_with(&self, other: &Territory) -> bool {
        self.owner.is_some() && self.owner == other.owner
    }
}
