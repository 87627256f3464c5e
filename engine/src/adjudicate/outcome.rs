//! Solution selection and projection into a `TurnResult`.
//!
//! The solver hands back every consistent assignment. Under the standard
//! rules at most a handful survive, and they differ only along two known
//! ambiguities: self-referential convoy cycles (resolved by the Szykman
//! rule, the convoy fails) and pure move cycles (resolved optimistically,
//! the cycle rotates). Anything else left ambiguous is a hole in the
//! constraint set and is surfaced as a hard error.

use std::cmp::Reverse;

use crate::board::order::Location;
use crate::board::province::{Coast, Power, Province, ALL_PROVINCES};
use crate::board::state::GameState;
use crate::board::unit::{UnitId, UnitType};

use super::encode::{Encoding, ACTIVE, CONVOYED, CUT, DISLODGED, MOVES, NO_PATH, VALID};
use super::hypergraph::{Action, OrderId, TurnGraph};
use super::solver::Solution;
use super::AdjudicationError;

/// Final status of one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Success,
    Failed,
    Void,
    Cut,
}

/// Where a unit ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
    Held,
    Moved { to: Location },
    Dislodged { attacker_from: Province },
}

/// One unit's position after the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitReport {
    pub unit: UnitId,
    pub power: Power,
    pub unit_type: UnitType,
    pub from: Location,
    pub outcome: UnitOutcome,
}

/// One competing move in a contested province.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contender {
    pub order: OrderId,
    pub from: Province,
    pub strength: u8,
    /// False when the move's convoy path collapsed and it never arrived.
    pub reached: bool,
}

/// Why a contested province resolved the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// The winning move took the province.
    Taken,
    /// The winning move dislodged the standing unit.
    Dislodgement,
    /// The strongest attacks tied; nobody enters.
    Standoff,
    /// The defense held against the strongest attack.
    Repelled,
    /// The strongest attack belonged to the defender's own power.
    SelfAttackBlocked,
}

/// Strength breakdown for one contested province.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub province: Province,
    pub contenders: Vec<Contender>,
    pub hold_strength: u8,
    pub winner: Option<OrderId>,
    pub reason: ConflictReason,
}

/// Convoys that were treated as failed to break a support-cut cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paradox {
    pub disrupted_moves: Vec<OrderId>,
}

/// Per-turn reasoning log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnDetails {
    pub conflicts: Vec<Conflict>,
    pub paradox: Option<Paradox>,
}

/// The adjudicated turn: every unit accounted for, every order graded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    pub units_after: Vec<UnitReport>,
    /// Indexed by `OrderId`.
    pub order_outcomes: Vec<OrderStatus>,
    pub details: TurnDetails,
}

impl TurnResult {
    pub fn status(&self, id: OrderId) -> OrderStatus {
        self.order_outcomes[id.0]
    }

    /// The report for the unit that started the turn in `province`.
    pub fn report_at(&self, province: Province) -> Option<&UnitReport> {
        self.units_after
            .iter()
            .find(|r| r.from.province == province)
    }

    pub fn conflict_at(&self, province: Province) -> Option<&Conflict> {
        self.details
            .conflicts
            .iter()
            .find(|c| c.province == province)
    }
}

/// Picks the rule-correct assignment out of the solver's enumeration.
///
/// Solutions are ranked by: fewest supports cut only by convoyed attacks
/// (Szykman: the convoy fails instead), then most successful moves (move
/// cycles rotate), then fewest convoyed paths (land is preferred when both
/// routes work). A tie after ranking is a constraint-set bug.
pub(crate) fn select(
    graph: &TurnGraph,
    enc: &Encoding,
    solutions: Vec<Solution>,
) -> Result<(Solution, Option<Paradox>), AdjudicationError> {
    debug_assert!(!solutions.is_empty());
    if solutions.len() == 1 {
        let chosen = solutions.into_iter().next().expect("non-empty");
        return Ok((chosen, None));
    }

    let key = |sol: &Solution| {
        let convoy_cuts = graph
            .edges()
            .iter()
            .filter(|e| {
                let Some(var) = enc.support[e.id.0] else { return false };
                if sol[var.0] != CUT || sol[enc.outcome[e.id.0].0] == DISLODGED {
                    return false;
                }
                let reaching: Vec<bool> = enc.cutters[e.id.0]
                    .iter()
                    .filter(|c| match enc.path[c.0] {
                        Some(p) => sol[p.0] != NO_PATH,
                        None => true,
                    })
                    .map(|c| matches!(enc.path[c.0], Some(p) if sol[p.0] == CONVOYED))
                    .collect();
                !reaching.is_empty() && reaching.iter().all(|&convoyed| convoyed)
            })
            .count();
        let successes = enc
            .outcome
            .iter()
            .filter(|v| sol[v.0] == MOVES)
            .count();
        let convoyed_paths = enc
            .path
            .iter()
            .flatten()
            .filter(|v| sol[v.0] == CONVOYED)
            .count();
        (convoy_cuts, Reverse(successes), convoyed_paths)
    };

    let best = solutions
        .iter()
        .map(&key)
        .min()
        .expect("non-empty solution set");
    let mut ranked: Vec<&Solution> = solutions.iter().filter(|&s| key(s) == best).collect();
    if ranked.len() > 1 {
        return Err(AdjudicationError::Ambiguous { count: solutions.len() });
    }
    let chosen = ranked.pop().expect("one minimal solution").clone();

    // The tiebreak fired; report which convoyed moves were written off.
    let disrupted: Vec<OrderId> = enc
        .path
        .iter()
        .enumerate()
        .filter_map(|(i, var)| var.map(|v| (i, v)))
        .filter(|(_, v)| chosen[v.0] == NO_PATH)
        .filter(|(_, v)| solutions.iter().any(|s| s[v.0] == CONVOYED))
        .map(|(i, _)| OrderId(i))
        .collect();
    let paradox = (!disrupted.is_empty()).then_some(Paradox { disrupted_moves: disrupted });
    Ok((chosen, paradox))
}

/// Translates the chosen assignment into the external result record.
pub(crate) fn project(
    graph: &TurnGraph,
    enc: &Encoding,
    sol: &Solution,
    paradox: Option<Paradox>,
) -> TurnResult {
    let order_outcomes = graph
        .edges()
        .iter()
        .map(|e| {
            if e.void.is_some() {
                return OrderStatus::Void;
            }
            match e.action {
                Action::Move { .. } | Action::Hold => {
                    let out = sol[enc.outcome[e.id.0].0];
                    match e.action {
                        Action::Move { .. } if out == MOVES => OrderStatus::Success,
                        Action::Move { .. } => OrderStatus::Failed,
                        _ if out == DISLODGED => OrderStatus::Failed,
                        _ => OrderStatus::Success,
                    }
                }
                Action::SupportHold { .. } | Action::SupportMove { .. } => {
                    let var = enc.support[e.id.0].expect("support edge has a status");
                    if sol[var.0] == VALID {
                        OrderStatus::Success
                    } else {
                        OrderStatus::Cut
                    }
                }
                Action::Convoy { .. } => {
                    let var = enc.convoy[e.id.0].expect("convoy edge has a status");
                    if sol[var.0] == ACTIVE {
                        OrderStatus::Success
                    } else {
                        OrderStatus::Failed
                    }
                }
            }
        })
        .collect();

    let units_after = graph
        .edges()
        .iter()
        .map(|e| {
            let out = sol[enc.outcome[e.id.0].0];
            let outcome = if out == MOVES {
                match e.action {
                    Action::Move { dest, .. } => UnitOutcome::Moved { to: dest },
                    _ => unreachable!("only moves succeed as moves"),
                }
            } else if out == DISLODGED {
                let attacker_from = graph
                    .attackers(e.origin)
                    .iter()
                    .find(|id| sol[enc.outcome[id.0].0] == MOVES)
                    .map(|id| graph.edge(*id).origin)
                    .expect("dislodged unit has a successful attacker");
                UnitOutcome::Dislodged { attacker_from }
            } else {
                UnitOutcome::Held
            };
            UnitReport {
                unit: e.unit,
                power: e.power,
                unit_type: e.unit_type,
                from: Location::with_coast(e.origin, e.origin_coast),
                outcome,
            }
        })
        .collect();

    let conflicts = ALL_PROVINCES
        .iter()
        .filter(|p| !graph.attackers(**p).is_empty())
        .map(|p| build_conflict(graph, enc, sol, *p))
        .collect();

    TurnResult {
        units_after,
        order_outcomes,
        details: TurnDetails { conflicts, paradox },
    }
}

fn build_conflict(
    graph: &TurnGraph,
    enc: &Encoding,
    sol: &Solution,
    province: Province,
) -> Conflict {
    let contenders: Vec<Contender> = graph
        .attackers(province)
        .iter()
        .map(|id| Contender {
            order: *id,
            from: graph.edge(*id).origin,
            strength: sol[enc.strength[id.0].0],
            reached: match enc.path[id.0] {
                Some(v) => sol[v.0] != NO_PATH,
                None => true,
            },
        })
        .collect();

    let resident = graph.edge_at(province);
    let hold_strength = match resident {
        None => 0,
        Some(re) if re.is_effective_move() => {
            if sol[enc.outcome[re.id.0].0] == MOVES {
                0
            } else {
                1
            }
        }
        Some(re) => {
            1 + graph
                .supports_of(re.id)
                .iter()
                .filter(|id| {
                    let var = enc.support[id.0].expect("support edge");
                    sol[var.0] == VALID
                })
                .count() as u8
        }
    };

    let winner = contenders
        .iter()
        .find(|c| sol[enc.outcome[c.order.0].0] == MOVES)
        .map(|c| c.order);

    let reason = if winner.is_some() {
        let dislodged = resident
            .map(|re| sol[enc.outcome[re.id.0].0] == DISLODGED)
            .unwrap_or(false);
        if dislodged {
            ConflictReason::Dislodgement
        } else {
            ConflictReason::Taken
        }
    } else {
        let reaching: Vec<&Contender> = contenders.iter().filter(|c| c.reached).collect();
        let top = reaching.iter().map(|c| c.strength).max().unwrap_or(0);
        let at_top: Vec<&&Contender> =
            reaching.iter().filter(|c| c.strength == top).collect();
        if at_top.len() > 1 {
            ConflictReason::Standoff
        } else if let (Some(best), Some(re)) = (at_top.first(), resident) {
            if graph.edge(best.order).power == re.power {
                ConflictReason::SelfAttackBlocked
            } else {
                ConflictReason::Repelled
            }
        } else {
            ConflictReason::Repelled
        }
    };

    Conflict { province, contenders, hold_strength, winner, reason }
}

/// Applies an adjudicated turn to the board: dislodged units leave play
/// (retreats are resolved elsewhere) and successful movers relocate
/// simultaneously.
pub fn apply_result(state: &mut GameState, result: &TurnResult) {
    for report in &result.units_after {
        if matches!(report.outcome, UnitOutcome::Dislodged { .. }) {
            state.remove(report.from.province);
        }
    }
    let moves: Vec<(Province, Province, Coast)> = result
        .units_after
        .iter()
        .filter_map(|r| match r.outcome {
            UnitOutcome::Moved { to } => Some((r.from.province, to.province, to.coast)),
            _ => None,
        })
        .collect();
    state.relocate_all(&moves);
}
