//! Visualiser message payloads.
//!
//! The push channel itself lives outside the core; these are the JSON
//! shapes it carries, dictated by the adjudicator's outputs. Fields are
//! plain strings and numbers so the wire format stays stable regardless of
//! internal representation: provinces as 3-letter ids, powers and unit
//! types as lowercase names.

use serde::Serialize;

use crate::adjudicate::{ConflictReason, OrderStatus, TurnResult, UnitOutcome};
use crate::board::adjacency::neighbors;
use crate::board::order::Order;
use crate::board::province::{Coast, Power, ProvinceKind, ALL_PROVINCES};
use crate::board::state::GameState;
use crate::board::unit::{Unit, UnitType};

use super::notation::format_order;

/// A message for the visualiser channel, tagged by `type`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    InitialState {
        provinces: Vec<ProvinceMsg>,
        adjacencies: Vec<AdjacencyMsg>,
        units: Vec<UnitMsg>,
        season: String,
        year: u16,
    },
    TurnUpdate {
        season: String,
        year: u16,
        units: Vec<UnitMsg>,
    },
    AddOrder {
        order: OrderMsg,
    },
    AdjudicationResult {
        outcomes: Vec<OutcomeMsg>,
        conflicts: Vec<ConflictMsg>,
        units: Vec<UnitMsg>,
    },
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ProvinceMsg {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub is_supply_center: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AdjacencyMsg {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct UnitMsg {
    pub id: u16,
    pub power: String,
    pub unit_type: String,
    pub province: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub coast: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct OrderMsg {
    pub power: String,
    pub text: String,
}

/// One order's fate, keyed by the province its unit started in.
#[derive(Debug, Serialize, PartialEq)]
pub struct OutcomeMsg {
    pub province: String,
    pub status: String,
    pub unit_outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attacker_from: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ConflictMsg {
    pub province: String,
    pub strengths: Vec<StrengthMsg>,
    pub hold_strength: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    pub reason: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StrengthMsg {
    pub from: String,
    pub strength: u8,
}

impl Message {
    /// Full map and position dump sent once at connection time.
    pub fn initial_state(state: &GameState) -> Message {
        let provinces = ALL_PROVINCES
            .iter()
            .map(|p| ProvinceMsg {
                id: p.abbr().to_string(),
                name: p.name().to_string(),
                kind: kind_name(p.kind()).to_string(),
                is_supply_center: p.is_supply_center(),
            })
            .collect();
        // Directed pairs, merged over both unit classes.
        let mut adjacencies = Vec::new();
        for p in ALL_PROVINCES {
            let mut targets = neighbors(p, Coast::None, UnitType::Army);
            for q in neighbors(p, Coast::None, UnitType::Fleet) {
                if !targets.contains(&q) {
                    targets.push(q);
                }
            }
            for q in targets {
                adjacencies.push(AdjacencyMsg {
                    source: p.abbr().to_string(),
                    target: q.abbr().to_string(),
                });
            }
        }
        Message::InitialState {
            provinces,
            adjacencies,
            units: unit_msgs(state),
            season: state.season.name().to_string(),
            year: state.year,
        }
    }

    /// Position snapshot at the top of a turn.
    pub fn turn_update(state: &GameState) -> Message {
        Message::TurnUpdate {
            season: state.season.name().to_string(),
            year: state.year,
            units: unit_msgs(state),
        }
    }

    /// One interactively entered order.
    pub fn add_order(power: Power, order: &Order) -> Message {
        Message::AddOrder {
            order: OrderMsg {
                power: power.name().to_string(),
                text: format_order(order),
            },
        }
    }

    /// The adjudicated turn plus the updated position.
    pub fn adjudication_result(result: &TurnResult, state_after: &GameState) -> Message {
        let outcomes = result
            .units_after
            .iter()
            .zip(&result.order_outcomes)
            .map(|(report, status)| {
                let (unit_outcome, moved_to, attacker_from) = match report.outcome {
                    UnitOutcome::Held => ("held", None, None),
                    UnitOutcome::Moved { to } => {
                        ("moved", Some(to.province.abbr().to_string()), None)
                    }
                    UnitOutcome::Dislodged { attacker_from } => {
                        ("dislodged", None, Some(attacker_from.abbr().to_string()))
                    }
                };
                OutcomeMsg {
                    province: report.from.province.abbr().to_string(),
                    status: status_name(*status).to_string(),
                    unit_outcome: unit_outcome.to_string(),
                    moved_to,
                    attacker_from,
                }
            })
            .collect();
        let conflicts = result
            .details
            .conflicts
            .iter()
            .map(|c| ConflictMsg {
                province: c.province.abbr().to_string(),
                strengths: c
                    .contenders
                    .iter()
                    .map(|s| StrengthMsg {
                        from: s.from.abbr().to_string(),
                        strength: s.strength,
                    })
                    .collect(),
                hold_strength: c.hold_strength,
                winner: c.winner.map(|id| {
                    result.units_after[id.0].from.province.abbr().to_string()
                }),
                reason: reason_name(c.reason).to_string(),
            })
            .collect();
        Message::AdjudicationResult {
            outcomes,
            conflicts,
            units: unit_msgs(state_after),
        }
    }

    /// Serializes for the wire.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("message types serialize infallibly")
    }
}

fn unit_msgs(state: &GameState) -> Vec<UnitMsg> {
    state.units().iter().map(unit_msg).collect()
}

fn unit_msg(unit: &Unit) -> UnitMsg {
    UnitMsg {
        id: unit.id.0,
        power: unit.power.name().to_string(),
        unit_type: unit.unit_type.name().to_string(),
        province: unit.province.abbr().to_string(),
        coast: unit.coast.tag().to_string(),
    }
}

fn kind_name(kind: ProvinceKind) -> &'static str {
    match kind {
        ProvinceKind::Inland => "inland",
        ProvinceKind::Coastal => "coastal",
        ProvinceKind::Sea => "sea",
    }
}

fn status_name(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Success => "success",
        OrderStatus::Failed => "failed",
        OrderStatus::Void => "void",
        OrderStatus::Cut => "cut",
    }
}

fn reason_name(reason: ConflictReason) -> &'static str {
    match reason {
        ConflictReason::Taken => "taken",
        ConflictReason::Dislodgement => "dislodgement",
        ConflictReason::Standoff => "standoff",
        ConflictReason::Repelled => "repelled",
        ConflictReason::SelfAttackBlocked => "self_attack_blocked",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjudicate::adjudicate;
    use crate::board::order::{Location, OrderedUnit, Route};
    use crate::board::province::Province;
    use crate::board::state::Season;

    #[test]
    fn initial_state_shape() {
        let state = GameState::opening_position();
        let msg = Message::initial_state(&state);
        let json: serde_json::Value =
            serde_json::from_str(&msg.to_json()).expect("valid json");
        assert_eq!(json["type"], "initial_state");
        assert_eq!(json["year"], 1901);
        assert_eq!(json["season"], "Spring");
        assert_eq!(json["provinces"].as_array().unwrap().len(), 75);
        assert_eq!(json["units"].as_array().unwrap().len(), 22);
        // Every adjacency endpoint is a known province id.
        let ids: Vec<&str> = ALL_PROVINCES.iter().map(|p| p.abbr()).collect();
        for adj in json["adjacencies"].as_array().unwrap() {
            assert!(ids.contains(&adj["source"].as_str().unwrap()));
            assert!(ids.contains(&adj["target"].as_str().unwrap()));
        }
    }

    #[test]
    fn coast_is_omitted_when_absent() {
        let state = GameState::opening_position();
        let msg = Message::turn_update(&state);
        let json: serde_json::Value =
            serde_json::from_str(&msg.to_json()).expect("valid json");
        let units = json["units"].as_array().unwrap();
        let stp = units.iter().find(|u| u["province"] == "stp").unwrap();
        assert_eq!(stp["coast"], "sc");
        let mos = units.iter().find(|u| u["province"] == "mos").unwrap();
        assert!(mos.get("coast").is_none());
    }

    #[test]
    fn add_order_carries_notation_text() {
        let order = Order::Move {
            unit: OrderedUnit::army(Province::Par),
            dest: Location::new(Province::Bur),
            route: Route::Auto,
        };
        let msg = Message::add_order(Power::France, &order);
        let json: serde_json::Value =
            serde_json::from_str(&msg.to_json()).expect("valid json");
        assert_eq!(json["type"], "add_order");
        assert_eq!(json["order"]["power"], "france");
        assert_eq!(json["order"]["text"], "A par - bur");
    }

    #[test]
    fn adjudication_result_shape() {
        let mut state = GameState::new(1901, Season::Spring);
        state
            .place_unit(Power::France, UnitType::Army, Province::Par, Coast::None)
            .unwrap();
        state
            .place_unit(Power::Germany, UnitType::Army, Province::Mun, Coast::None)
            .unwrap();
        let orders = [
            Order::Move {
                unit: OrderedUnit::army(Province::Par),
                dest: Location::new(Province::Bur),
                route: Route::Auto,
            },
            Order::Move {
                unit: OrderedUnit::army(Province::Mun),
                dest: Location::new(Province::Bur),
                route: Route::Auto,
            },
        ];
        let result = adjudicate(&state, &orders).unwrap();
        let msg = Message::adjudication_result(&result, &state);
        let json: serde_json::Value =
            serde_json::from_str(&msg.to_json()).expect("valid json");
        assert_eq!(json["type"], "adjudication_result");
        let outcomes = json["outcomes"].as_array().unwrap();
        assert_eq!(outcomes.len(), 2);
        for o in outcomes {
            assert_eq!(o["status"], "failed");
            assert_eq!(o["unit_outcome"], "held");
        }
        let conflicts = json["conflicts"].as_array().unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0]["province"], "bur");
        assert_eq!(conflicts[0]["reason"], "standoff");
        assert!(conflicts[0].get("winner").is_none());
    }
}
