use crate::error::{GameError, Result};
use crate::events::BoardEvent;
use crate::link::{Link, LinkState};
use crate::territory::Territory;
use crate::unit::{Unit, UnitRegistry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The territory graph. Owns every territory, one link per connected pair
/// and the unit registry their armies are denominated in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Board {
    registry: UnitRegistry,
    territories: Vec<Territory>,
    index: HashMap<String, usize>,
    #[serde(with = "link_list")]
    links: BTreeMap<(String, String), Link>,
    #[serde(skip)]
    events: Vec<BoardEvent>,
}

fn link_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Links are stored as a plain list; each key is rebuilt from the link's ends.
mod link_list {
    use super::link_key;
    use crate::link::Link;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S>(
        links: &BTreeMap<(String, String), Link>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(links.values())
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<(String, String), Link>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let links = Vec::<Link>::deserialize(deserializer)?;
        Ok(links
            .into_iter()
            .map(|link| (link_key(&link.ends.0, &link.ends.1), link))
            .collect())
    }
}

fn split_pair(
    territories: &mut [Territory],
    first: usize,
    second: usize,
) -> (&mut Territory, &mut Territory) {
    if first < second {
        let (left, right) = territories.split_at_mut(second);
        (&mut left[first], &mut right[0])
    } else {
        let (left, right) = territories.split_at_mut(first);
        (&mut right[0], &mut left[second])
    }
}

impl Board {
    pub fn new(registry: UnitRegistry) -> Self {
        Self {
            registry,
            territories: Vec::new(),
            index: HashMap::new(),
            links: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    pub fn registry(&self) -> &UnitRegistry {
        &self.registry
    }

    /// Adds or replaces a territory by name.
    pub fn add_territory(&mut self, territory: Territory) {
        match self.index.get(&territory.name) {
            Some(&idx) => self.territories[idx] = territory,
            None => {
                self.index
                    .insert(territory.name.clone(), self.territories.len());
                self.territories.push(territory);
            }
        }
    }

    /// Makes two territories neighbors joined by a link in `default_state`.
    pub fn connect(&mut self, a: &str, b: &str, default_state: LinkState) -> Result<()> {
        let (first, second) = self.pair_mut(a, b)?;
        first.add_adjacent(b);
        second.add_adjacent(a);
        self.links
            .insert(link_key(a, b), Link::new(a, b, default_state));
        Ok(())
    }

    pub fn get_territory(&self, name: &str) -> Option<&Territory> {
        self.index.get(name).map(|&idx| &self.territories[idx])
    }

    pub fn territory(&self, name: &str) -> Result<&Territory> {
        self.get_territory(name)
            .ok_or_else(|| GameError::UnknownTerritory(name.to_string()))
    }

    pub fn territory_mut(&mut self, name: &str) -> Result<&mut Territory> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| GameError::UnknownTerritory(name.to_string()))?;
        Ok(&mut self.territories[idx])
    }

    pub fn territories(&self) -> impl Iterator<Item = &Territory> {
        self.territories.iter()
    }

    pub fn owned_by(&self, player: usize) -> impl Iterator<Item = &Territory> {
        self.territories.iter().filter(move |t| t.is_owned_by(player))
    }

    /// Mutable access to two distinct territories at once.
    pub fn pair_mut(&mut self, a: &str, b: &str) -> Result<(&mut Territory, &mut Territory)> {
        let (first, second) = self.indices(a, b)?;
        Ok(split_pair(&mut self.territories, first, second))
    }

    fn indices(&self, a: &str, b: &str) -> Result<(usize, usize)> {
        let first = *self
            .index
            .get(a)
            .ok_or_else(|| GameError::UnknownTerritory(a.to_string()))?;
        let second = *self
            .index
            .get(b)
            .ok_or_else(|| GameError::UnknownTerritory(b.to_string()))?;
        if first == second {
            return Err(GameError::SameTerritory(a.to_string()));
        }
        Ok((first, second))
    }

    pub fn link(&self, a: &str, b: &str) -> Option<&Link> {
        self.links.get(&link_key(a, b))
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn set_link_state(
        &mut self,
        a: &str,
        b: &str,
        state: LinkState,
        duration: u32,
    ) -> Result<()> {
        let link = self
            .links
            .get_mut(&link_key(a, b))
            .ok_or_else(|| GameError::NoLink(a.to_string(), b.to_string()))?;
        link.set_state(state, duration)?;
        let event = BoardEvent::LinkChanged {
            a: link.ends.0.clone(),
            b: link.ends.1.clone(),
            state: link.current_state(),
            remaining: link.remaining_duration(),
        };
        self.events.push(event);
        Ok(())
    }

    /// Advances every link by one turn.
    pub fn elapse_links(&mut self) {
        for link in self.links.values_mut() {
            if link.elapse() {
                self.events.push(BoardEvent::LinkReverted {
                    a: link.ends.0.clone(),
                    b: link.ends.1.clone(),
                    state: link.current_state(),
                });
            }
        }
    }

    /// Moves one unit between neighbors through their link. `Ok(false)` means
    /// the link currently refuses the unit.
    pub fn transfer_unit(&mut self, unit: &Unit, from: &str, to: &str) -> Result<bool> {
        let (first, second) = self.indices(from, to)?;
        let link = self
            .links
            .get(&link_key(from, to))
            .ok_or_else(|| GameError::NoLink(from.to_string(), to.to_string()))?;
        let (origin, destination) = split_pair(&mut self.territories, first, second);
        let moved = link.transfer_between(&self.registry, unit, origin, destination)?;
        if moved {
            self.events.push(BoardEvent::UnitsMoved {
                from: from.to_string(),
                to: to.to_string(),
                strength: unit.strength,
            });
        }
        Ok(moved)
    }

    pub fn push_event(&mut self, event: BoardEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }
}
