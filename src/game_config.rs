use crate::army::Army;
use crate::board::Board;
use crate::error::{GameError, Result};
use crate::game::Game;
use crate::link::LinkState;
use crate::player::Player;
use crate::territory::Territory;
use crate::unit::{Unit, UnitRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub units: Vec<UnitConfig>,
    pub players: Vec<PlayerConfig>,
    pub territories: Vec<TerritoryConfig>,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConfig {
    pub name: String,
    pub strength: u32,
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub reserve: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerritoryConfig {
    pub name: String,
    pub owner: Option<usize>,
    #[serde(default)]
    pub strength: u32,
    pub adjacent_territories: Vec<String>,
}

/// Overrides the default state of the link between two territories.
/// Links not listed here start open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub between: (String, String),
    pub state: LinkState,
}

impl GameConfig {
    pub fn to_registry(&self) -> Result<UnitRegistry> {
        let mut registry = UnitRegistry::new();
        for unit in &self.units {
            registry.add_unit(Unit::new(&unit.name, unit.strength, &unit.tag))?;
        }
        if !registry.has_atomic_unit() {
            return Err(GameError::MissingAtomicUnit(1));
        }
        Ok(registry)
    }

    pub fn to_board_and_players(&self) -> Result<(Board, Vec<Player>)> {
        let registry = self.to_registry()?;
        let player_ids: HashSet<usize> = self.players.iter().map(|p| p.id).collect();

        let mut players = Vec::new();
        for player_config in &self.players {
            let mut player = Player::new(player_config.id, &player_config.name);
            player.reserve = Army::with_strength(&registry, player_config.reserve)?;
            players.push(player);
        }

        let mut board = Board::new(registry.clone());
        for territory_config in &self.territories {
            if let Some(owner) = territory_config.owner {
                if !player_ids.contains(&owner) {
                    return Err(GameError::UnknownPlayer(owner));
                }
            }
            let mut territory = Territory::new(&territory_config.name, territory_config.owner);
            territory.army = Army::with_strength(&registry, territory_config.strength)?;
            board.add_territory(territory);
        }

        for territory_config in &self.territories {
            for adjacent in &territory_config.adjacent_territories {
                if board.link(&territory_config.name, adjacent).is_none() {
                    board.connect(&territory_config.name, adjacent, LinkState::Open)?;
                }
            }
        }
        for link in &self.links {
            let (a, b) = &link.between;
            board.connect(a, b, link.state)?;
        }

        Ok((board, players))
    }

    pub fn build(&self) -> Result<Game> {
        let (board, players) = self.to_board_and_players()?;
        Ok(Game::new(board, players))
    }

    pub fn load_from_file(filename: &str) -> Result<Self> {
        let data = std::fs::read_to_string(filename)?;
        let config: GameConfig = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// The map bundled with the crate.
    pub fn default_map() -> Result<Self> {
        let config_data = include_str!("config.json");
        Ok(serde_json::from_str(config_data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map_builds() {
        let config = GameConfig::default_map().unwrap();
        let (board, players) = config.to_board_and_players().unwrap();

        assert_eq!(players.len(), 2);
        assert_eq!(board.territories().count(), config.territories.len());
        for territory in board.territories() {
            for adjacent in &territory.adjacent_territories {
                let other = board.territory(adjacent).unwrap();
                assert!(other.is_adjacent(&territory.name));
                assert!(board.link(&territory.name, adjacent).is_some());
            }
        }
        assert_eq!(
            board.link("Kamchatka", "Alaska").unwrap().default_state(),
            LinkState::Blockade
        );
    }

    #[test]
    fn test_registry_errors() {
        let mut config = GameConfig::default_map().unwrap();
        config.units.retain(|u| u.strength != 1);
        assert!(matches!(
            config.to_registry(),
            Err(GameError::MissingAtomicUnit(1))
        ));

        let mut config = GameConfig::default_map().unwrap();
        let duplicate = config.units[0].clone();
        config.units.push(duplicate);
        assert!(matches!(
            config.to_registry(),
            Err(GameError::DuplicateStrength(_))
        ));
    }

    #[test]
    fn test_unknown_references_rejected() {
        let mut config = GameConfig::default_map().unwrap();
        config.territories[0]
            .adjacent_territories
            .push("Atlantis".to_string());
        assert!(matches!(
            config.to_board_and_players(),
            Err(GameError::UnknownTerritory(_))
        ));

        let mut config = GameConfig::default_map().unwrap();
        config.territories[0].owner = Some(9);
        assert!(matches!(
            config.to_board_and_players(),
            Err(GameError::UnknownPlayer(9))
        ));
    }
}
