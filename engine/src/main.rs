//! Interactive turn loop for the entente adjudicator.
//!
//! Reads one order per unit per turn from stdin, adjudicates, prints the
//! outcome, applies it, and advances the season. With `--json` the
//! human-readable display is replaced by one visualiser message per line,
//! suitable for piping to a push channel.

use std::io::{self, BufRead, Write};

use entente::adjudicate::{adjudicate, apply_result, ConflictReason, TurnResult, UnitOutcome};
use entente::board::order::{Location, Order, OrderedUnit};
use entente::board::province::Coast;
use entente::board::state::GameState;
use entente::board::unit::Unit;
use entente::board::{adjacency, Power};
use entente::protocol::{format_order, parse_order, Message};

/// The implicit order for a blank or unusable line.
fn hold_order(unit: &Unit) -> Order {
    Order::Hold {
        unit: OrderedUnit {
            unit_type: unit.unit_type,
            location: Location::with_coast(unit.province, unit.coast),
        },
    }
}

fn main() {
    let json = std::env::args().any(|a| a == "--json");
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut state = GameState::opening_position();

    if json {
        println!("{}", Message::initial_state(&state).to_json());
    } else {
        println!("entente -- Diplomacy adjudication core");
        println!("Orders: H | - bur | S mar | S par - bur | C gre - smy | quit");
    }

    loop {
        if json {
            println!("{}", Message::turn_update(&state).to_json());
        } else {
            print_board(&state);
        }

        let Some(orders) = collect_orders(&mut input, &state, json) else {
            break;
        };

        let result = match adjudicate(&state, &orders) {
            Ok(result) => result,
            Err(err) => {
                eprintln!("adjudication failed: {err}");
                std::process::exit(1);
            }
        };

        if json {
            println!("{}", Message::adjudication_result(&result, &state).to_json());
        } else {
            print_result(&orders, &result);
        }

        apply_result(&mut state, &result);
        state.advance_turn();

        if state.units().is_empty() {
            if !json {
                println!("No units remain on the board.");
            }
            break;
        }
        if !proceed(&mut input, json) {
            break;
        }
    }
}

/// Units in prompt order: by power, then by province id.
fn prompt_order(state: &GameState) -> Vec<Unit> {
    let mut units: Vec<Unit> = state.units().to_vec();
    units.sort_by_key(|u| (u.power, u.province));
    units
}

/// Prompts for one order per unit. Returns None on end of input or `quit`.
fn collect_orders(input: &mut impl BufRead, state: &GameState, json: bool) -> Option<Vec<Order>> {
    let mut orders = Vec::new();
    let mut current_power: Option<Power> = None;
    for unit in prompt_order(state) {
        if !json && current_power != Some(unit.power) {
            println!("--- Orders for {} ---", unit.power.name());
            current_power = Some(unit.power);
        }
        loop {
            if !json {
                let reachable = adjacency::neighbors(unit.province, unit.coast, unit.unit_type);
                let hints: Vec<&str> = reachable.iter().map(|p| p.abbr()).collect();
                print!(
                    "  {} {} (can move to: {}): ",
                    unit.unit_type.letter(),
                    unit.province.abbr(),
                    hints.join(", ")
                );
                io::stdout().flush().ok();
            }
            let line = read_line(input)?;
            let line = line.trim();
            if line == "quit" {
                return None;
            }
            if line.is_empty() {
                orders.push(hold_order(&unit));
                break;
            }
            match parse_order(line, &unit) {
                Ok(order) => {
                    if json {
                        println!("{}", Message::add_order(unit.power, &order).to_json());
                    }
                    orders.push(order);
                    break;
                }
                Err(err) => {
                    if json {
                        // Stream mode cannot re-prompt; fall back to hold.
                        eprintln!("order for {}: {err}; holding", unit.province.abbr());
                        orders.push(hold_order(&unit));
                        break;
                    }
                    println!("    invalid order: {err}");
                }
            }
        }
    }
    Some(orders)
}

fn print_board(state: &GameState) {
    println!();
    println!("=== {} {} ===", state.season.name(), state.year);
    for unit in prompt_order(state) {
        let coast = match unit.coast {
            Coast::None => String::new(),
            c => format!("/{}", c.tag()),
        };
        println!(
            "  {:<8} {} {}{}",
            unit.power.name(),
            unit.unit_type.letter(),
            unit.province.abbr(),
            coast
        );
    }
}

fn print_result(orders: &[Order], result: &TurnResult) {
    println!();
    println!("--- Resolution ---");
    for (i, status) in result.order_outcomes.iter().enumerate() {
        // Prompting covers every unit, so order ids align with the input.
        let text = orders
            .get(i)
            .map(|o| format_order(o))
            .unwrap_or_else(|| "(hold)".to_string());
        println!("  {:<24} {:?}", text, status);
    }
    for conflict in &result.details.conflicts {
        let contenders: Vec<String> = conflict
            .contenders
            .iter()
            .map(|c| {
                let note = if c.reached { "" } else { " (no path)" };
                format!("{}:{}{}", c.from.abbr(), c.strength, note)
            })
            .collect();
        let verdict = match (conflict.winner, conflict.reason) {
            (Some(id), _) => format!(
                "taken from {}",
                result.units_after[id.0].from.province.abbr()
            ),
            (None, ConflictReason::Standoff) => "standoff".to_string(),
            (None, ConflictReason::SelfAttackBlocked) => "blocked by own unit".to_string(),
            (None, _) => "repelled".to_string(),
        };
        println!(
            "  {}: {} vs hold {} -> {}",
            conflict.province.abbr(),
            contenders.join(", "),
            conflict.hold_strength,
            verdict
        );
    }
    for report in &result.units_after {
        if let UnitOutcome::Dislodged { attacker_from } = report.outcome {
            println!(
                "  dislodged: {} {} {} (attacked from {})",
                report.power.name(),
                report.unit_type.letter(),
                report.from.province.abbr(),
                attacker_from.abbr()
            );
        }
    }
    if let Some(paradox) = &result.details.paradox {
        let moves: Vec<&str> = paradox
            .disrupted_moves
            .iter()
            .map(|id| result.units_after[id.0].from.province.abbr())
            .collect();
        println!("  convoy paradox: convoys treated as disrupted for {}", moves.join(", "));
    }
}

fn proceed(input: &mut impl BufRead, json: bool) -> bool {
    if !json {
        print!("Proceed to next turn? (Y/n): ");
        io::stdout().flush().ok();
    }
    match read_line(input) {
        None => false,
        Some(line) => !line.trim().eq_ignore_ascii_case("n"),
    }
}

fn read_line(input: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(_) => None,
    }
}
