use crate::board::Board;
use crate::territory::Territory;
use crate::unit::Unit;
use std::collections::{HashMap, HashSet};

/// Depth-first search over territories held by one owner, crossing only
/// links that currently let `unit` through.
pub struct ConnectivityFinder<'a> {
    board: &'a Board,
}

impl<'a> ConnectivityFinder<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }

    /// Territory names from `start` to `target` inclusive, or an empty path
    /// when `target` cannot be reached.
    pub fn find_path(&self, start: &str, target: &str, unit: &Unit) -> Vec<String> {
        let Some(parents) = self.search(start, target, unit) else {
            return Vec::new();
        };

        let mut path = vec![target.to_string()];
        let mut current = target;
        while let Some(previous) = parents.get(current) {
            path.push(previous.to_string());
            current = previous;
        }
        path.reverse();
        path
    }

    pub fn is_reachable(&self, start: &str, target: &str, unit: &Unit) -> bool {
        self.search(start, target, unit).is_some()
    }

    fn permits(&self, from: &str, to: &str, unit: &Unit) -> bool {
        self.board
            .link(from, to)
            .is_some_and(|link| link.can_transfer(unit))
    }

    fn joins(&self, origin: &Territory, current: &Territory, next: &str, unit: &Unit) -> bool {
        current.is_adjacent(next)
            && self
                .board
                .get_territory(next)
                .is_some_and(|t| t.shares_owner_with(origin))
            && self.permits(&current.name, next, unit)
    }

    /// Returns the parent of every territory discovered on the way to
    /// `target`, or `None` if the search ran dry.
    fn search(&self, start: &str, target: &str, unit: &Unit) -> Option<HashMap<&'a str, &'a str>> {
        let origin = self.board.get_territory(start)?;
        let destination = self.board.get_territory(target)?;
        if !destination.shares_owner_with(origin) {
            return None;
        }

        let mut parents: HashMap<&'a str, &'a str> = HashMap::new();
        if start == target {
            return Some(parents);
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&'a Territory> = vec![origin];
        visited.insert(origin.name.as_str());

        while let Some(current) = stack.pop() {
            if self.joins(origin, current, target, unit) {
                parents.insert(destination.name.as_str(), current.name.as_str());
                return Some(parents);
            }
            for adjacent in &current.adjacent_territories {
                if visited.contains(adjacent.as_str())
                    || !self.joins(origin, current, adjacent, unit)
                {
                    continue;
                }
                if let Some(next) = self.board.get_territory(adjacent) {
                    visited.insert(next.name.as_str());
                    parents.insert(next.name.as_str(), current.name.as_str());
                    stack.push(next);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::LinkState;
    use crate::unit::UnitRegistry;

    fn chain(b_to_c: LinkState) -> (Board, Unit) {
        let mut registry = UnitRegistry::new();
        registry.add_unit(Unit::new("Infantry", 1, "inf")).unwrap();
        let infantry = registry.get_by_strength(1).unwrap().clone();
        let mut board = Board::new(registry);
        for name in ["A", "B", "C", "D", "E"] {
            let owner = if name == "E" { 1 } else { 0 };
            board.add_territory(Territory::new(name, Some(owner)));
        }
        board.connect("A", "B", LinkState::Open).unwrap();
        board.connect("B", "C", b_to_c).unwrap();
        board.connect("C", "D", LinkState::Open).unwrap();
        board.connect("D", "A", LinkState::Open).unwrap();
        board.connect("B", "E", LinkState::Open).unwrap();
        (board, infantry)
    }

    #[test]
    fn test_open_chain_is_walked() {
        let (mut board, infantry) = chain(LinkState::Open);
        // Close the loop back through D so the only way to C is via B.
        board.set_link_state("A", "D", LinkState::Blockade, 2).unwrap();
        let finder = ConnectivityFinder::new(&board);
        assert_eq!(finder.find_path("A", "C", &infantry), vec!["A", "B", "C"]);
        assert!(finder.is_reachable("A", "C", &infantry));
    }

    #[test]
    fn test_blockade_cuts_the_chain() {
        let (mut board, infantry) = chain(LinkState::Blockade);
        board.set_link_state("A", "D", LinkState::Blockade, 2).unwrap();
        board.set_link_state("C", "D", LinkState::Blockade, 2).unwrap();
        let finder = ConnectivityFinder::new(&board);
        assert!(finder.find_path("A", "C", &infantry).is_empty());
        assert!(!finder.is_reachable("A", "C", &infantry));
    }

    #[test]
    fn test_cycle_routes_around_blockade() {
        let (board, infantry) = chain(LinkState::Blockade);
        let finder = ConnectivityFinder::new(&board);
        let path = finder.find_path("B", "C", &infantry);
        assert_eq!(path, vec!["B", "A", "D", "C"]);
    }

    #[test]
    fn test_enemy_territory_not_crossed_or_reached() {
        let (board, infantry) = chain(LinkState::Open);
        let finder = ConnectivityFinder::new(&board);
        assert!(!finder.is_reachable("A", "E", &infantry));
        assert!(finder.find_path("A", "Nowhere", &infantry).is_empty());
    }

    #[test]
    fn test_start_is_its_own_path() {
        let (board, infantry) = chain(LinkState::Open);
        let finder = ConnectivityFinder::new(&board);
        assert_eq!(finder.find_path("C", "C", &infantry), vec!["C"]);
    }
}
