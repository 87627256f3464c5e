//! CSP encoding of a turn: variables, domains, and the movement rules.
//!
//! Every rule of simultaneous resolution lives here. The hypergraph
//! supplies structure (who attacks where, which supports attach to what);
//! this module turns it into finite-domain variables and labelled
//! constraints for the backtracking solver. Cyclic dependencies between
//! supports, strengths, convoys, and outcomes are left cyclic: the solver
//! finds the globally consistent assignment rather than any ordered
//! evaluation.
//!
//! Variable classes, in branching order (most constraining first):
//! support statuses, strengths, convoy statuses, convoy path choices,
//! unit outcomes.

use crate::board::adjacency::adjacent;
use crate::board::province::{Coast, Province};
use crate::board::unit::UnitType;

use super::hypergraph::{Action, Edge, OrderId, TurnGraph};
use super::solver::{Problem, VarId};

/// Support status values.
pub(crate) const VALID: u8 = 0;
pub(crate) const CUT: u8 = 1;
pub(crate) const SUPPORT_VOID: u8 = 2;

/// Convoy status values.
pub(crate) const ACTIVE: u8 = 0;
pub(crate) const DISRUPTED: u8 = 1;
pub(crate) const CONVOY_VOID: u8 = 2;

/// Path status values for moves that may go by convoy.
pub(crate) const LAND: u8 = 0;
pub(crate) const CONVOYED: u8 = 1;
pub(crate) const NO_PATH: u8 = 2;

/// Unit outcome values.
pub(crate) const HOLDS: u8 = 0;
pub(crate) const MOVES: u8 = 1;
pub(crate) const DISLODGED: u8 = 2;
pub(crate) const BOUNCED: u8 = 3;

/// The encoded problem plus the variable table for projecting solutions.
pub(crate) struct Encoding {
    pub problem: Problem,
    /// Per edge: the issuing unit's outcome.
    pub outcome: Vec<VarId>,
    /// Per edge: the order's strength.
    pub strength: Vec<VarId>,
    /// Per edge: support status, for support edges.
    pub support: Vec<Option<VarId>>,
    /// Per edge: convoy status, for convoy edges.
    pub convoy: Vec<Option<VarId>>,
    /// Per edge: path choice, for moves with a convoy alternative.
    pub path: Vec<Option<VarId>>,
    /// Per edge: the moves that could cut this support.
    pub cutters: Vec<Vec<OrderId>>,
}

/// Builds the full CSP for a turn.
pub(crate) fn encode(graph: &TurnGraph) -> Encoding {
    let n = graph.edges().len();
    let mut problem = Problem::new();

    let path_domains: Vec<Option<Vec<u8>>> =
        graph.edges().iter().map(path_domain).collect();
    let cutters: Vec<Vec<OrderId>> = graph
        .edges()
        .iter()
        .map(|e| cutters_of(graph, e))
        .collect();

    // --- Variables, in branching order. ---

    let mut support = vec![None; n];
    for edge in graph.edges() {
        if !matches!(edge.action, Action::SupportHold { .. } | Action::SupportMove { .. }) {
            continue;
        }
        let name = format!("support {}", edge.origin.abbr());
        let var = if edge.void.is_some() {
            problem.add_var(name, vec![SUPPORT_VOID])
        } else {
            let domain = support_domain(graph, edge, &cutters[edge.id.0], &path_domains);
            problem.add_var(name, domain)
        };
        support[edge.id.0] = Some(var);
    }

    let mut strength = Vec::with_capacity(n);
    for edge in graph.edges() {
        let name = format!("strength {}", edge.origin.abbr());
        let domain = if edge.void.is_some() {
            vec![0]
        } else {
            let max = 1 + graph.supports_of(edge.id).len() as u8;
            (1..=max).collect()
        };
        strength.push(problem.add_var(name, domain));
    }

    let mut convoy = vec![None; n];
    for edge in graph.edges() {
        if !matches!(edge.action, Action::Convoy { .. }) {
            continue;
        }
        let name = format!("convoy {}", edge.origin.abbr());
        let domain = if edge.void.is_some() {
            vec![CONVOY_VOID]
        } else {
            vec![ACTIVE, DISRUPTED]
        };
        convoy[edge.id.0] = Some(problem.add_var(name, domain));
    }

    let mut path = vec![None; n];
    for edge in graph.edges() {
        if let Some(domain) = &path_domains[edge.id.0] {
            let name = format!("path {}", edge.origin.abbr());
            path[edge.id.0] = Some(problem.add_var(name, domain.clone()));
        }
    }

    let mut outcome = Vec::with_capacity(n);
    for edge in graph.edges() {
        let name = format!("outcome {}", edge.origin.abbr());
        let domain = if edge.is_effective_move() {
            vec![MOVES, DISLODGED, BOUNCED]
        } else {
            vec![HOLDS, DISLODGED]
        };
        outcome.push(problem.add_var(name, domain));
    }

    let mut enc = Encoding { problem, outcome, strength, support, convoy, path, cutters };

    // --- Constraints. ---

    for edge in graph.edges() {
        constrain_support(&mut enc, graph, edge);
        constrain_strength(&mut enc, graph, edge);
        constrain_convoy(&mut enc, graph, edge);
        constrain_path(&mut enc, graph, edge);
        constrain_move(&mut enc, graph, edge);
        constrain_occupancy(&mut enc, graph, edge);
    }

    enc
}

/// Path-choice domain for an edge, or None when the move can only go by
/// land (or is not a move at all).
fn path_domain(edge: &Edge) -> Option<Vec<u8>> {
    if edge.void.is_some() {
        return None;
    }
    let Action::Move { route, land_adjacent, convoyable, .. } = edge.action else {
        return None;
    };
    if !convoyable {
        return None;
    }
    use crate::board::order::Route;
    if route == Route::ViaConvoy || !land_adjacent {
        Some(vec![CONVOYED, NO_PATH])
    } else {
        Some(vec![LAND, CONVOYED])
    }
}

/// Moves that can cut this support: non-void foreign moves into the
/// supporter's province, except the move the support is directed against
/// (an attack out of the supported move's destination cannot cut).
fn cutters_of(graph: &TurnGraph, edge: &Edge) -> Vec<OrderId> {
    let exempt = match edge.action {
        Action::SupportMove { to, .. } => Some(to),
        Action::SupportHold { .. } => None,
        _ => return Vec::new(),
    };
    if edge.void.is_some() {
        return Vec::new();
    }
    graph
        .attackers(edge.origin)
        .iter()
        .copied()
        .filter(|id| {
            let attacker = graph.edge(*id);
            attacker.power != edge.power && Some(attacker.origin) != exempt
        })
        .collect()
}

/// Initial domain of a non-void support: pinned where the cut is already
/// decided, open only when it hinges on a convoyed attacker or on the
/// supporter being dislodged.
fn support_domain(
    graph: &TurnGraph,
    edge: &Edge,
    cutters: &[OrderId],
    path_domains: &[Option<Vec<u8>>],
) -> Vec<u8> {
    let certain_cut = cutters.iter().any(|id| {
        match &path_domains[id.0] {
            None => true,
            Some(domain) => !domain.contains(&NO_PATH),
        }
    });
    if certain_cut {
        return vec![CUT];
    }
    // With no attack on the supporter at all, the support cannot be cut
    // and the supporter cannot be dislodged.
    if graph.attackers(edge.origin).is_empty() {
        return vec![VALID];
    }
    vec![VALID, CUT]
}

/// Support cut rule: cut iff some cutter reaches the supporter's province,
/// or the supporter is dislodged (dislodgement cuts even the exempt
/// attack's support).
fn constrain_support(enc: &mut Encoding, _graph: &TurnGraph, edge: &Edge) {
    let Some(var) = enc.support[edge.id.0] else { return };
    if edge.void.is_some() || enc.problem.domain(var).len() == 1 {
        return;
    }
    let mut scope = vec![var, enc.outcome[edge.id.0]];
    let mut cutter_paths = Vec::new();
    for id in &enc.cutters[edge.id.0] {
        if let Some(path) = enc.path[id.0] {
            cutter_paths.push(scope.len());
            scope.push(path);
        } else {
            // A land attacker always reaches; the domain pass pins that
            // case, so reaching here means every cutter has a path var.
            debug_assert!(false, "certain cutter not pinned");
        }
    }
    let label = format!("cut {}", edge.origin.abbr());
    enc.problem.constrain(label, scope, move |v| {
        let reached = cutter_paths.iter().any(|&i| v[i] != NO_PATH);
        let cut = reached || v[1] == DISLODGED;
        (v[0] == CUT) == cut
    });
}

/// Strength rule: one plus the number of valid attached supports.
fn constrain_strength(enc: &mut Encoding, graph: &TurnGraph, edge: &Edge) {
    if edge.void.is_some() {
        return;
    }
    let supports = graph.supports_of(edge.id);
    if supports.is_empty() {
        return;
    }
    let mut scope = vec![enc.strength[edge.id.0]];
    for id in supports {
        scope.push(enc.support[id.0].expect("supports_of returns support edges"));
    }
    let label = format!("strength {}", edge.origin.abbr());
    enc.problem.constrain(label, scope, move |v| {
        let valid = v[1..].iter().filter(|&&s| s == VALID).count() as u8;
        v[0] == 1 + valid
    });
}

/// Convoy disruption rule: a convoy survives iff its fleet does.
fn constrain_convoy(enc: &mut Encoding, _graph: &TurnGraph, edge: &Edge) {
    let Some(var) = enc.convoy[edge.id.0] else { return };
    if edge.void.is_some() {
        return;
    }
    let scope = vec![var, enc.outcome[edge.id.0]];
    let label = format!("convoy {}", edge.origin.abbr());
    enc.problem.constrain(label, scope, move |v| {
        (v[0] == DISRUPTED) == (v[1] == DISLODGED)
    });
}

/// Path rule: a convoyed path exists iff some chain of active convoying
/// fleets links origin to destination. Chains are found by search over the
/// active fleets, so partially disrupted convoys still work when another
/// full chain remains.
fn constrain_path(enc: &mut Encoding, graph: &TurnGraph, edge: &Edge) {
    let Some(var) = enc.path[edge.id.0] else { return };
    let Action::Move { dest, .. } = edge.action else { return };
    let origin = edge.origin;
    let target = dest.province;

    let mut scope = vec![var];
    let mut fleets = Vec::new();
    for id in graph.convoys_for(edge.id) {
        fleets.push(graph.edge(*id).origin);
        scope.push(enc.convoy[id.0].expect("convoys_for returns convoy edges"));
    }
    let label = format!("path {}", edge.origin.abbr());
    enc.problem.constrain(label, scope, move |v| {
        let active: Vec<Province> = fleets
            .iter()
            .zip(&v[1..])
            .filter(|(_, &status)| status == ACTIVE)
            .map(|(&p, _)| p)
            .collect();
        let chain = chain_exists(origin, target, &active);
        match v[0] {
            LAND => true,
            CONVOYED => chain,
            _ => !chain,
        }
    });
}

/// Breadth-first search for a fully active convoy chain.
fn chain_exists(origin: Province, dest: Province, fleets: &[Province]) -> bool {
    let fleet_adj = |a: Province, b: Province| {
        adjacent(a, Coast::None, b, Coast::None, UnitType::Fleet)
    };
    let mut visited = vec![false; fleets.len()];
    let mut queue: Vec<usize> = Vec::new();
    for (i, &f) in fleets.iter().enumerate() {
        if fleet_adj(origin, f) {
            visited[i] = true;
            queue.push(i);
        }
    }
    while let Some(i) = queue.pop() {
        let here = fleets[i];
        if fleet_adj(here, dest) {
            return true;
        }
        for (j, &f) in fleets.iter().enumerate() {
            if !visited[j] && fleet_adj(here, f) {
                visited[j] = true;
                queue.push(j);
            }
        }
    }
    false
}

/// Positions within a move constraint's scope.
struct ResidentCtx {
    same_power: bool,
    is_mover: bool,
    targets_origin: bool,
    outcome: usize,
    move_strength: Option<usize>,
    move_path: Option<usize>,
    hold_supports: Vec<usize>,
    discount_supports: Vec<usize>,
}

/// Move resolution: a move succeeds iff its path holds, it strictly beats
/// every rival into the destination, and it overcomes the defense there.
/// Encodes the contest, bounce, head-to-head, self-dislodgement, and
/// own-support-discount rules in one predicate per move.
fn constrain_move(enc: &mut Encoding, graph: &TurnGraph, edge: &Edge) {
    if !edge.is_effective_move() {
        return;
    }
    let Action::Move { dest, .. } = edge.action else { return };
    let target = dest.province;

    let mut scope = vec![enc.outcome[edge.id.0], enc.strength[edge.id.0]];
    let own_path = enc.path[edge.id.0].map(|v| {
        scope.push(v);
        scope.len() - 1
    });

    // Rivals: other non-void moves into the same province.
    let mut rivals: Vec<(usize, Option<usize>)> = Vec::new();
    for id in graph.attackers(target) {
        if *id == edge.id {
            continue;
        }
        scope.push(enc.strength[id.0]);
        let strength_pos = scope.len() - 1;
        let path_pos = enc.path[id.0].map(|v| {
            scope.push(v);
            scope.len() - 1
        });
        rivals.push((strength_pos, path_pos));
    }

    // Defense: the unit standing in the destination, if any.
    let resident = graph.edge_at(target).map(|res| {
        let is_mover = res.is_effective_move();
        let targets_origin = matches!(
            res.action,
            Action::Move { dest, .. } if dest.province == edge.origin
        ) && is_mover;
        scope.push(enc.outcome[res.id.0]);
        let outcome_pos = scope.len() - 1;
        let move_strength = (is_mover && targets_origin).then(|| {
            scope.push(enc.strength[res.id.0]);
            scope.len() - 1
        });
        let move_path = if targets_origin {
            enc.path[res.id.0].map(|v| {
                scope.push(v);
                scope.len() - 1
            })
        } else {
            None
        };
        let hold_supports = if is_mover {
            Vec::new()
        } else {
            graph
                .supports_of(res.id)
                .iter()
                .map(|id| {
                    scope.push(enc.support[id.0].expect("support edge"));
                    scope.len() - 1
                })
                .collect()
        };
        // Supports for this move given by the resident's own power do not
        // help dislodge the resident.
        let discount_supports = if res.power == edge.power {
            Vec::new()
        } else {
            graph
                .supports_of(edge.id)
                .iter()
                .filter(|id| graph.edge(**id).power == res.power)
                .map(|id| {
                    scope.push(enc.support[id.0].expect("support edge"));
                    scope.len() - 1
                })
                .collect()
        };
        ResidentCtx {
            same_power: res.power == edge.power,
            is_mover,
            targets_origin,
            outcome: outcome_pos,
            move_strength,
            move_path,
            hold_supports,
            discount_supports,
        }
    });

    let label = format!("move {}-{}", edge.origin.abbr(), target.abbr());
    enc.problem.constrain(label, scope, move |v| {
        let reaches = own_path.map_or(true, |i| v[i] != NO_PATH);
        let strength = v[1];

        let beats_rivals = rivals.iter().all(|(s, p)| {
            let rival_reaches = p.map_or(true, |i| v[i] != NO_PATH);
            !rival_reaches || strength > v[*s]
        });

        let defense_ok = match &resident {
            None => true,
            Some(res) => {
                // Head-to-head only applies over land on both sides.
                let h2h = res.targets_origin
                    && own_path.map_or(true, |i| v[i] != CONVOYED)
                    && res.move_path.map_or(true, |i| v[i] != CONVOYED);
                if res.same_power {
                    // Never dislodge or swap with your own unit.
                    res.is_mover && v[res.outcome] == MOVES && !h2h
                } else {
                    let discount = res
                        .discount_supports
                        .iter()
                        .filter(|&&i| v[i] == VALID)
                        .count() as u8;
                    let effective = strength.saturating_sub(discount);
                    if h2h {
                        match res.move_strength {
                            Some(i) => effective > v[i],
                            None => false,
                        }
                    } else if res.is_mover {
                        v[res.outcome] == MOVES || effective > 1
                    } else {
                        let hold = 1 + res
                            .hold_supports
                            .iter()
                            .filter(|&&i| v[i] == VALID)
                            .count() as u8;
                        effective > hold
                    }
                }
            }
        };

        let succeeds = reaches && beats_rivals && defense_ok;
        (v[0] == MOVES) == succeeds
    });
}

/// Occupancy rule: a unit that did not leave its province is dislodged iff
/// some move into it succeeded, and stands otherwise.
fn constrain_occupancy(enc: &mut Encoding, graph: &TurnGraph, edge: &Edge) {
    let mut scope = vec![enc.outcome[edge.id.0]];
    for id in graph.attackers(edge.origin) {
        debug_assert_ne!(*id, edge.id);
        scope.push(enc.outcome[id.0]);
    }
    let label = format!("occupancy {}", edge.origin.abbr());
    enc.problem.constrain(label, scope, move |v| {
        let taken = v[1..].iter().any(|&o| o == MOVES);
        match v[0] {
            MOVES => true,
            DISLODGED => taken,
            _ => !taken,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::order::{Location, Order, OrderedUnit, Route};
    use crate::board::province::{Power, Province::*};
    use crate::board::state::{GameState, Season};

    fn graph_for(
        units: &[(Power, UnitType, crate::board::province::Province)],
        orders: &[Order],
    ) -> TurnGraph {
        let mut state = GameState::new(1901, Season::Spring);
        for (power, unit_type, province) in units {
            state
                .place_unit(*power, *unit_type, *province, Coast::None)
                .unwrap();
        }
        TurnGraph::build(&state, orders).unwrap()
    }

    #[test]
    fn unsupported_orders_have_pinned_strength() {
        let graph = graph_for(
            &[(Power::France, UnitType::Army, Par)],
            &[Order::Move {
                unit: OrderedUnit::army(Par),
                dest: Location::new(Bur),
                route: Route::Auto,
            }],
        );
        let enc = encode(&graph);
        let edge = graph.edge_at(Par).unwrap();
        assert_eq!(enc.problem.domain(enc.strength[edge.id.0]), &[1]);
        assert!(enc.support[edge.id.0].is_none());
        assert!(enc.path[edge.id.0].is_none());
    }

    #[test]
    fn unthreatened_support_is_pinned_valid() {
        let graph = graph_for(
            &[
                (Power::France, UnitType::Army, Par),
                (Power::France, UnitType::Army, Gas),
            ],
            &[
                Order::Move {
                    unit: OrderedUnit::army(Par),
                    dest: Location::new(Bur),
                    route: Route::Auto,
                },
                Order::SupportMove { unit: OrderedUnit::army(Gas), from: Par, to: Bur },
            ],
        );
        let enc = encode(&graph);
        let sup = graph.edge_at(Gas).unwrap();
        let var = enc.support[sup.id.0].unwrap();
        assert_eq!(enc.problem.domain(var), &[VALID]);
        // Strength of the supported move spans 1..=2 until solved.
        let mv = graph.edge_at(Par).unwrap();
        assert_eq!(enc.problem.domain(enc.strength[mv.id.0]), &[1, 2]);
    }

    #[test]
    fn land_attacker_pins_support_cut() {
        let graph = graph_for(
            &[
                (Power::France, UnitType::Army, Par),
                (Power::France, UnitType::Army, Mar),
                (Power::Germany, UnitType::Army, Gas),
            ],
            &[
                Order::Move {
                    unit: OrderedUnit::army(Par),
                    dest: Location::new(Bur),
                    route: Route::Auto,
                },
                Order::SupportMove { unit: OrderedUnit::army(Mar), from: Par, to: Bur },
                Order::Move {
                    unit: OrderedUnit::army(Gas),
                    dest: Location::new(Mar),
                    route: Route::Auto,
                },
            ],
        );
        // A foreign land attack on the supporter settles the cut pre-solve.
        let enc = encode(&graph);
        let sup = graph.edge_at(Mar).unwrap();
        assert_eq!(enc.problem.domain(enc.support[sup.id.0].unwrap()), &[CUT]);
    }

    #[test]
    fn convoy_threatened_support_stays_open() {
        // A convoyed attack on the supporter leaves the cut undecided.
        let graph = graph_for(
            &[
                (Power::Turkey, UnitType::Army, Gre),
                (Power::Turkey, UnitType::Fleet, Aeg),
                (Power::England, UnitType::Fleet, Smy),
                (Power::England, UnitType::Fleet, Eas),
            ],
            &[
                Order::Move {
                    unit: OrderedUnit::army(Gre),
                    dest: Location::new(Smy),
                    route: Route::Auto,
                },
                Order::Convoy { unit: OrderedUnit::fleet(Aeg), from: Gre, to: Smy },
                Order::SupportMove { unit: OrderedUnit::fleet(Smy), from: Eas, to: Aeg },
                Order::Move {
                    unit: OrderedUnit::fleet(Eas),
                    dest: Location::new(Aeg),
                    route: Route::Auto,
                },
            ],
        );
        let enc = encode(&graph);
        let sup = graph.edge_at(Smy).unwrap();
        assert_eq!(enc.problem.domain(enc.support[sup.id.0].unwrap()), &[VALID, CUT]);
        let mv = graph.edge_at(Gre).unwrap();
        assert_eq!(enc.problem.domain(enc.path[mv.id.0].unwrap()), &[CONVOYED, NO_PATH]);
    }

    #[test]
    fn chain_search_spans_multiple_fleets() {
        assert!(chain_exists(Lon, Nwy, &[Nth]));
        assert!(!chain_exists(Lon, Nwy, &[]));
        assert!(chain_exists(Lon, Tun, &[Eng, Mao, Wes]));
        // A gap breaks the chain.
        assert!(!chain_exists(Lon, Tun, &[Eng, Wes]));
    }
}
