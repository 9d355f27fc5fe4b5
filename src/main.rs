//! Hexfire - headless scenario runner
//!
//! Loads a scenario and reports, for each unit, where it can move, what it
//! can fire on and how much of the map it can see.

use clap::Parser;
use serde::Serialize;

use hexfire::battle::scenario::Scenario;
use hexfire::battle::{BattleState, HexCoord, UnitType};
use hexfire::core::error::{HexfireError, Result};
use hexfire::core::types::Side;

/// Headless scenario runner
#[derive(Parser, Debug)]
#[command(name = "hexfire")]
#[command(about = "Report movement, targets and sight for every unit in a scenario")]
struct Args {
    /// Scenario file to load
    #[arg(long, default_value = "data/scenarios/skirmish.toml")]
    scenario: String,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Only report the unit at this index
    #[arg(long)]
    unit: Option<usize>,
}

/// JSON output structure
#[derive(Serialize)]
struct UnitReport {
    index: usize,
    unit_type: UnitType,
    side: Side,
    position: HexCoord,
    remaining_movement: f32,
    reachable: Vec<HexCoord>,
    valid_targets: Vec<usize>,
    visible_hexes: usize,
}

#[derive(Serialize)]
struct ScenarioReport {
    scenario: String,
    turn: u32,
    moving_side: Side,
    units: Vec<UnitReport>,
}

fn report_unit(state: &mut BattleState, index: usize) -> Result<UnitReport> {
    let unit = state.units()[index].clone();

    let reachable = state.reachable_for(unit.id)?.coords();
    let target_ids: Vec<_> = state.valid_targets(unit.id)?.iter().map(|t| t.id).collect();
    let valid_targets = target_ids
        .iter()
        .filter_map(|id| state.units().iter().position(|u| u.id == *id))
        .collect();
    let visible_hexes = state.visible_hexes(unit.id)?.len();

    Ok(UnitReport {
        index,
        unit_type: unit.unit_type,
        side: unit.side,
        position: unit.position,
        remaining_movement: unit.remaining_movement,
        reachable,
        valid_targets,
        visible_hexes,
    })
}

fn print_text(report: &ScenarioReport) {
    println!("Scenario: {}", report.scenario);
    println!("Turn {}, {} to move", report.turn, report.moving_side);
    println!("=============");
    for unit in &report.units {
        println!(
            "[{}] {} {:?} at {} ({} movement left)",
            unit.index, unit.side, unit.unit_type, unit.position, unit.remaining_movement
        );
        println!("    reachable hexes: {}", unit.reachable.len());
        if unit.valid_targets.is_empty() {
            println!("    valid targets:   none");
        } else {
            let targets: Vec<String> = unit.valid_targets.iter().map(|i| format!("[{}]", i)).collect();
            println!("    valid targets:   {}", targets.join(" "));
        }
        println!("    visible hexes:   {}", unit.visible_hexes);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hexfire=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let scenario = Scenario::load(&args.scenario)?;
    let mut state = scenario.into_battle()?;

    let indices: Vec<usize> = match args.unit {
        Some(index) if index < state.units().len() => vec![index],
        Some(index) => {
            return Err(HexfireError::InvalidScenario(format!(
                "unit index {} out of range ({} units)",
                index,
                state.units().len()
            )))
        }
        None => (0..state.units().len()).collect(),
    };

    let mut units = Vec::with_capacity(indices.len());
    for index in indices {
        units.push(report_unit(&mut state, index)?);
    }

    let report = ScenarioReport {
        scenario: scenario.name.clone(),
        turn: state.turn,
        moving_side: state.moving_side,
        units,
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }

    Ok(())
}
