//! End-to-end flows over the bundled map: selection, combat, conquest,
//! movement and link effects.

use rand::rngs::StdRng;
use rand::SeedableRng;
use risk_board_game_core::board::Board;
use risk_board_game_core::connectivity::ConnectivityFinder;
use risk_board_game_core::events::BoardEvent;
use risk_board_game_core::game::Game;
use risk_board_game_core::game_config::GameConfig;
use risk_board_game_core::link::LinkState;
use risk_board_game_core::selection::{SelectionMode, Selector};
use risk_board_game_core::squad::DraftOrder;
use risk_board_game_core::territory::Territory;
use risk_board_game_core::unit::{Unit, UnitRegistry};

fn seeded_game(seed: u64) -> Game<StdRng> {
    let config = GameConfig::default_map().unwrap();
    let (board, players) = config.to_board_and_players().unwrap();
    Game::with_rng(board, players, StdRng::seed_from_u64(seed))
}

fn total_strength(game: &Game<StdRng>) -> u32 {
    game.board.territories().map(|t| t.army.strength()).sum()
}

#[test]
fn test_selected_attack_conserves_strength() {
    for seed in 0..20 {
        let mut game = seeded_game(seed);
        let mut selector = Selector::new(0, SelectionMode::Attack);
        selector.select(&game.board, "Northwest Territory").unwrap();
        selector.select(&game.board, "Ontario").unwrap();
        let (from, to) = selector.ready().unwrap();
        let (from, to) = (from.to_string(), to.to_string());

        let before = total_strength(&game);
        let result = game.attack(&from, &to, DraftOrder::StrongestFirst).unwrap();

        assert_eq!(result.attacker_rolls.len(), 2);
        assert_eq!(result.defender_rolls.len(), 2);
        assert_eq!(
            total_strength(&game),
            before - (result.attackers_killed + result.defenders_killed) as u32
        );
        assert_eq!(result.attackers_killed + result.defenders_killed, 2);
        assert!(game.board.territories().all(|t| t.army.drafted_count() == 0));
    }
}

#[test]
fn test_campaign_until_conquest() {
    let mut game = seeded_game(5);
    game.reinforce(0, "Alberta", 12).unwrap();
    assert_eq!(game.player(0).unwrap().reserve_strength(), 0);
    let infantry = game.board.registry().get_by_strength(1).unwrap().clone();
    game.board
        .territory_mut("Alberta")
        .unwrap()
        .army
        .add_units(vec![infantry; 30]);

    let mut rounds = 0;
    while game.board.territory("Ontario").unwrap().army.strength() > 0 {
        game.attack("Alberta", "Ontario", DraftOrder::WeakestFirst)
            .unwrap();
        rounds += 1;
        assert!(rounds < 50);
    }

    game.occupy("Alberta", "Ontario", 1).unwrap();
    assert_eq!(game.board.territory("Ontario").unwrap().owner, Some(0));

    let events = game.drain_events();
    let combats = events
        .iter()
        .filter(|e| matches!(e, BoardEvent::CombatResolved { .. }))
        .count();
    assert_eq!(combats, rounds);
    assert!(events
        .iter()
        .any(|e| matches!(e, BoardEvent::TerritoryConquered { previous_owner: Some(1), .. })));
}

#[test]
fn test_strait_blockade_thaws_after_temporary_opening() {
    let mut game = seeded_game(1);
    let registry = game.board.registry().clone();
    let infantry = registry.get_by_strength(1).unwrap().clone();

    // Default blockade: nothing crosses.
    assert!(!game.transfer_unit(&infantry, "Alaska", "Kamchatka").unwrap());

    game.set_link_state("Kamchatka", "Alaska", LinkState::Open, 2)
        .unwrap();
    game.end_turn();
    let link = game.board.link("Alaska", "Kamchatka").unwrap();
    assert_eq!(link.current_state(), LinkState::Open);
    assert_eq!(link.remaining_duration(), 1);

    game.end_turn();
    let link = game.board.link("Alaska", "Kamchatka").unwrap();
    assert_eq!(link.current_state(), LinkState::Blockade);
    assert_eq!(link.remaining_duration(), 0);

    let events = game.drain_events();
    assert!(matches!(
        events.last(),
        Some(BoardEvent::LinkReverted {
            state: LinkState::Blockade,
            ..
        })
    ));
}

fn chain(b_to_c: LinkState) -> (Board, Unit) {
    let mut registry = UnitRegistry::new();
    registry.add_unit(Unit::new("Infantry", 1, "inf")).unwrap();
    let unit = registry.get_by_strength(1).unwrap().clone();
    let mut board = Board::new(registry);
    for name in ["A", "B", "C"] {
        board.add_territory(Territory::new(name, Some(0)));
    }
    board.connect("A", "B", LinkState::Open).unwrap();
    board.connect("B", "C", b_to_c).unwrap();
    (board, unit)
}

#[test]
fn test_chain_reachability() {
    let (blocked, unit) = chain(LinkState::Blockade);
    assert!(ConnectivityFinder::new(&blocked)
        .find_path("A", "C", &unit)
        .is_empty());

    let (open, unit) = chain(LinkState::Open);
    assert_eq!(
        ConnectivityFinder::new(&open).find_path("A", "C", &unit),
        vec!["A", "B", "C"]
    );
}

#[test]
fn test_fortify_through_own_territories() {
    let mut game = seeded_game(2);
    let before = game.board.territory("Alberta").unwrap().army.strength();
    game.move_units("Alaska", "Alberta", 2).unwrap();
    assert_eq!(
        game.board.territory("Alberta").unwrap().army.strength(),
        before + 2
    );
    assert!(game.move_units("Alaska", "Yakutsk", 1).is_err());
}
