use rayon::prelude::*;
use risk_board_game_core::combat::CombatEngine;
use risk_board_game_core::error::Result;
use risk_board_game_core::odds::ConquestOdds;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

struct Args {
    max_attack_units: u16,
    max_defend_units: u16,
    trials: u32,
}

// Parse command line arguments once
lazy_static::lazy_static! {
    static ref ARGS: Args = {
        let args: Vec<String> = std::env::args().collect();

        let mut max_attack = 30;
        let mut max_defend = 30;
        let mut trials = 2000;

        // cargo run --bin estimate_conquest_odds <max_attack> <max_defend> [trials]
        if args.len() > 2 {
            max_attack = args[1].parse().unwrap_or(max_attack);
            max_defend = args[2].parse().unwrap_or(max_defend);
        }
        if args.len() > 3 {
            trials = args[3].parse().unwrap_or(trials);
        }

        Args {
            max_attack_units: max_attack,
            max_defend_units: max_defend,
            trials,
        }
    };
}

const OUTPUT_FILE: &str = "conquest_odds.bin";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("risk_board_game_core=warn,estimate_conquest_odds=info")
            }),
        )
        .init();

    let start = Instant::now();
    let pairs: Vec<(u16, u16)> = (1..=ARGS.max_attack_units)
        .flat_map(|attackers| {
            (1..=ARGS.max_defend_units).map(move |defenders| (attackers, defenders))
        })
        .collect();
    tracing::info!(
        "Estimating {} pairings with {} trials each",
        pairs.len(),
        ARGS.trials
    );

    let estimates = pairs
        .par_iter()
        .map(|&(attackers, defenders)| {
            let mut engine = CombatEngine::new();
            let probability =
                ConquestOdds::estimate(&mut engine, attackers, defenders, ARGS.trials)?;
            tracing::debug!(
                "{} attackers vs. {} defenders: {:.4}",
                attackers,
                defenders,
                probability
            );
            Ok((attackers, defenders, probability))
        })
        .collect::<Result<Vec<(u16, u16, f64)>>>()?;

    let mut odds = ConquestOdds::new();
    for (attackers, defenders, probability) in estimates {
        odds.insert(attackers, defenders, probability);
    }
    odds.save(OUTPUT_FILE)?;

    tracing::info!("Conquest odds written to {}", OUTPUT_FILE);
    tracing::info!("Total computation time: {:?}", start.elapsed());
    Ok(())
}
