//! Strength conservation checks for armies under arbitrary mutation.

use proptest::prelude::*;
use risk_board_game_core::army::Army;
use risk_board_game_core::unit::{Unit, UnitRegistry};

fn registry() -> UnitRegistry {
    let mut registry = UnitRegistry::new();
    registry.add_unit(Unit::new("Infantry", 1, "inf")).unwrap();
    registry.add_unit(Unit::new("Cavalry", 5, "cav")).unwrap();
    registry.add_unit(Unit::new("Artillery", 15, "art")).unwrap();
    registry
}

#[derive(Debug, Clone)]
enum Op {
    AddStrength(u32),
    AddUnit(u32),
    RemoveStrength(u32),
    RemoveUnit(u32),
    SetStrength(u32),
}

fn denomination() -> impl Strategy<Value = u32> {
    prop_oneof![Just(1u32), Just(5u32), Just(15u32)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..40).prop_map(Op::AddStrength),
        denomination().prop_map(Op::AddUnit),
        (0u32..40).prop_map(Op::RemoveStrength),
        denomination().prop_map(Op::RemoveUnit),
        (0u32..60).prop_map(Op::SetStrength),
    ]
}

proptest! {
    #[test]
    fn strength_matches_members(ops in proptest::collection::vec(op(), 1..40)) {
        let registry = registry();
        let mut army = Army::new();
        let mut expected: u32 = 0;

        for op in ops {
            match op {
                Op::AddStrength(n) => {
                    army.add_strength(&registry, n).unwrap();
                    expected += n;
                }
                Op::AddUnit(s) => {
                    army.add(registry.get_by_strength(s).unwrap().clone());
                    expected += s;
                }
                Op::RemoveStrength(n) => {
                    let removed = army.remove_strength(&registry, n);
                    if n <= expected {
                        let removed = removed.unwrap();
                        prop_assert_eq!(removed.iter().map(|u| u.strength).sum::<u32>(), n);
                        expected -= n;
                    } else {
                        prop_assert!(removed.is_err());
                    }
                }
                Op::RemoveUnit(s) => {
                    let unit = registry.get_by_strength(s).unwrap().clone();
                    if let Ok(removed) = army.remove(&registry, &unit) {
                        prop_assert_eq!(removed.strength, s);
                        expected -= s;
                    }
                }
                Op::SetStrength(n) => {
                    army.set_strength(&registry, n).unwrap();
                    expected = n;
                }
            }
            prop_assert_eq!(army.strength(), expected);
            prop_assert_eq!(army.units().map(|u| u.strength).sum::<u32>(), expected);
        }
    }

    #[test]
    fn single_unit_extraction_conserves_rest(count in 1u32..5) {
        let registry = registry();
        let mut army = Army::new();
        for _ in 0..count {
            army.add(registry.get_by_strength(15).unwrap().clone());
        }
        let one = registry.get_by_strength(1).unwrap().clone();
        army.remove(&registry, &one).unwrap();

        prop_assert_eq!(army.strength(), 15 * count - 1);
        prop_assert_eq!(army.get_number_of(&one), 4);
    }
}

#[test]
fn test_fifteen_breaks_into_change() {
    let registry = registry();
    let mut army = Army::new();
    army.add(registry.get_by_strength(15).unwrap().clone());

    let one = registry.get_by_strength(1).unwrap().clone();
    army.remove(&registry, &one).unwrap();

    let mut strengths: Vec<u32> = army.units().map(|u| u.strength).collect();
    strengths.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(strengths, vec![5, 5, 1, 1, 1, 1]);
    assert_eq!(army.strength(), 14);
}
