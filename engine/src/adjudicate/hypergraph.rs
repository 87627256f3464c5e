//! The turn hypergraph: one hyperedge per unit's order.
//!
//! Builds the edge set from raw orders (filling in implicit holds),
//! canonicalises cross-references (supporter to supported order, convoy to
//! cargo move), flags statically impossible orders void, and derives the
//! per-province attacker and per-order supporter indexes. The hypergraph is
//! pure structure; every rule about who beats whom lives in the encoder.

use thiserror::Error;

use crate::board::adjacency::{adjacent, fleet_coasts_between};
use crate::board::order::{Location, Order, Route};
use crate::board::province::{Coast, Power, Province, ProvinceKind, PROVINCE_COUNT};
use crate::board::state::GameState;
use crate::board::unit::{UnitId, UnitType};

/// Identifies one hyperedge (one order) within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(pub usize);

/// Why an order was discarded before solving.
///
/// Void orders stay in the hypergraph with zero strength; they never abort
/// the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoidReason {
    /// Move destination is not reachable by this unit class.
    Unreachable,
    /// Move destination terrain cannot hold this unit class.
    BadTerrain,
    /// Army move with no land route and no fleet ordered to convoy it.
    NoConvoyRoute,
    /// Support names a province with no unit in it.
    NoSupportedUnit,
    /// Supported unit was not ordered to do what the support describes.
    NoMatchingAction,
    /// Supporter cannot reach the province the support acts on.
    SupporterNotAdjacent,
    /// Convoy order issued by a unit that is not a fleet at sea.
    ConvoyerNotAtSea,
    /// Convoy does not correspond to an army ordered to make that move.
    NoConvoyedMove,
}

/// The canonicalised action of a hyperedge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Hold,
    Move {
        dest: Location,
        route: Route,
        /// The origin borders the destination for this unit class.
        land_adjacent: bool,
        /// At least one sea fleet was ordered to convoy this move.
        convoyable: bool,
    },
    SupportHold {
        at: Province,
        /// Edge of the supported unit, once resolved.
        target: Option<OrderId>,
    },
    SupportMove {
        from: Province,
        to: Province,
        target: Option<OrderId>,
    },
    Convoy {
        from: Province,
        to: Province,
        /// Edge of the convoyed move, once resolved.
        cargo: Option<OrderId>,
    },
}

/// One hyperedge: a unit, its order, and the resolved references.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: OrderId,
    pub unit: UnitId,
    pub power: Power,
    pub unit_type: UnitType,
    pub origin: Province,
    pub origin_coast: Coast,
    pub action: Action,
    pub void: Option<VoidReason>,
}

impl Edge {
    /// Returns true if this edge is a move that takes part in contests.
    pub fn is_effective_move(&self) -> bool {
        self.void.is_none() && matches!(self.action, Action::Move { .. })
    }
}

/// Errors constructing the hypergraph. These indicate caller bugs (the
/// order entry layer validates references), not adjudication outcomes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("no unit in {0} to receive an order")]
    UnknownUnit(&'static str),

    #[error("unit in {0} was given more than one order")]
    DuplicateOrder(&'static str),
}

/// The complete hypergraph for one turn.
#[derive(Debug)]
pub struct TurnGraph {
    edges: Vec<Edge>,
    /// Edge of the unit occupying each province, keyed by discriminant.
    by_origin: [Option<OrderId>; PROVINCE_COUNT],
    /// Non-void moves into each province.
    attackers: Vec<Vec<OrderId>>,
    /// Non-void supports attached to each edge's action.
    supports: Vec<Vec<OrderId>>,
    /// Non-void convoy edges carrying each move edge.
    convoys: Vec<Vec<OrderId>>,
}

impl TurnGraph {
    /// Assembles the hypergraph for a turn.
    ///
    /// Every unit in `state` ends up with exactly one edge; units missing
    /// from `orders` hold. Orders for empty provinces or second orders for
    /// the same unit are construction errors.
    pub fn build(state: &GameState, orders: &[Order]) -> Result<TurnGraph, GraphError> {
        let mut by_origin: [Option<OrderId>; PROVINCE_COUNT] = [None; PROVINCE_COUNT];
        let mut edges: Vec<Edge> = Vec::with_capacity(state.units().len());

        for order in orders {
            let origin = order.origin();
            let unit = state
                .unit_at(origin)
                .ok_or(GraphError::UnknownUnit(origin.abbr()))?;
            if by_origin[origin as usize].is_some() {
                return Err(GraphError::DuplicateOrder(origin.abbr()));
            }
            let id = OrderId(edges.len());
            by_origin[origin as usize] = Some(id);
            edges.push(Edge {
                id,
                unit: unit.id,
                power: unit.power,
                unit_type: unit.unit_type,
                origin,
                origin_coast: unit.coast,
                action: raw_action(order),
                void: None,
            });
        }

        // Units without orders hold.
        for unit in state.units() {
            if by_origin[unit.province as usize].is_none() {
                let id = OrderId(edges.len());
                by_origin[unit.province as usize] = Some(id);
                edges.push(Edge {
                    id,
                    unit: unit.id,
                    power: unit.power,
                    unit_type: unit.unit_type,
                    origin: unit.province,
                    origin_coast: unit.coast,
                    action: Action::Hold,
                    void: None,
                });
            }
        }

        let mut graph = TurnGraph {
            edges,
            by_origin,
            attackers: vec![Vec::new(); PROVINCE_COUNT],
            supports: Vec::new(),
            convoys: Vec::new(),
        };
        graph.canonicalise();
        graph.index();
        Ok(graph)
    }

    /// Resolves references and marks statically impossible orders void.
    /// Moves are settled first so supports and convoys can see which moves
    /// survive.
    fn canonicalise(&mut self) {
        self.resolve_moves();
        self.resolve_supports();
        self.resolve_convoys();
    }

    fn resolve_moves(&mut self) {
        // Which (from, to) pairs have at least one sea fleet ordered to
        // convoy them. Collected from raw orders before any voiding so a
        // move and its convoys legitimise each other.
        let convoyed_pairs: Vec<(Province, Province)> = self
            .edges
            .iter()
            .filter(|e| {
                e.unit_type == UnitType::Fleet && e.origin.kind() == ProvinceKind::Sea
            })
            .filter_map(|e| match e.action {
                Action::Convoy { from, to, .. } => Some((from, to)),
                _ => None,
            })
            .collect();

        for edge in self.edges.iter_mut() {
            let Action::Move { dest, route, .. } = edge.action else {
                continue;
            };
            let void = move_void(edge, dest, route, &convoyed_pairs);
            let land_adjacent = adjacent(
                edge.origin,
                edge.origin_coast,
                dest.province,
                dest.coast,
                edge.unit_type,
            );
            let convoyable = edge.unit_type == UnitType::Army
                && convoyed_pairs.contains(&(edge.origin, dest.province));
            // Fleets moving to a split-coast province settle on a concrete
            // coast when exactly one is reachable.
            let dest = resolve_dest_coast(edge, dest);
            edge.action = Action::Move { dest, route, land_adjacent, convoyable };
            edge.void = void;
        }
    }

    fn resolve_supports(&mut self) {
        for i in 0..self.edges.len() {
            let edge = self.edges[i].clone();
            match edge.action {
                Action::SupportHold { at, .. } => {
                    let (target, void) = self.link_support_hold(&edge, at);
                    self.edges[i].action = Action::SupportHold { at, target };
                    self.edges[i].void = void;
                }
                Action::SupportMove { from, to, .. } => {
                    let (target, void) = self.link_support_move(&edge, from, to);
                    self.edges[i].action = Action::SupportMove { from, to, target };
                    self.edges[i].void = void;
                }
                _ => {}
            }
        }
    }

    fn link_support_hold(&self, edge: &Edge, at: Province) -> (Option<OrderId>, Option<VoidReason>) {
        if at == edge.origin {
            return (None, Some(VoidReason::NoSupportedUnit));
        }
        let Some(target) = self.by_origin[at as usize] else {
            return (None, Some(VoidReason::NoSupportedUnit));
        };
        // A unit with an effective move order cannot be supported in place;
        // a void move leaves its unit standing and supportable.
        if self.edges[target.0].is_effective_move() {
            return (None, Some(VoidReason::NoMatchingAction));
        }
        if !adjacent(edge.origin, edge.origin_coast, at, Coast::None, edge.unit_type) {
            return (None, Some(VoidReason::SupporterNotAdjacent));
        }
        (Some(target), None)
    }

    fn link_support_move(
        &self,
        edge: &Edge,
        from: Province,
        to: Province,
    ) -> (Option<OrderId>, Option<VoidReason>) {
        let Some(target) = self.by_origin[from as usize] else {
            return (None, Some(VoidReason::NoSupportedUnit));
        };
        let matches = match self.edges[target.0].action {
            Action::Move { dest, .. } => {
                self.edges[target.0].void.is_none() && dest.province == to
            }
            _ => false,
        };
        if !matches {
            return (None, Some(VoidReason::NoMatchingAction));
        }
        if !adjacent(edge.origin, edge.origin_coast, to, Coast::None, edge.unit_type) {
            return (None, Some(VoidReason::SupporterNotAdjacent));
        }
        (Some(target), None)
    }

    fn resolve_convoys(&mut self) {
        for i in 0..self.edges.len() {
            let edge = self.edges[i].clone();
            let Action::Convoy { from, to, .. } = edge.action else {
                continue;
            };
            let (cargo, void) = self.link_convoy(&edge, from, to);
            self.edges[i].action = Action::Convoy { from, to, cargo };
            self.edges[i].void = void;
        }
    }

    fn link_convoy(&self, edge: &Edge, from: Province, to: Province) -> (Option<OrderId>, Option<VoidReason>) {
        if edge.unit_type != UnitType::Fleet || edge.origin.kind() != ProvinceKind::Sea {
            return (None, Some(VoidReason::ConvoyerNotAtSea));
        }
        let Some(cargo) = self.by_origin[from as usize] else {
            return (None, Some(VoidReason::NoConvoyedMove));
        };
        let cargo_edge = &self.edges[cargo.0];
        let matches = cargo_edge.unit_type == UnitType::Army
            && cargo_edge.void.is_none()
            && matches!(cargo_edge.action, Action::Move { dest, .. } if dest.province == to);
        if !matches {
            return (None, Some(VoidReason::NoConvoyedMove));
        }
        (Some(cargo), None)
    }

    /// Builds the derived indexes over the canonicalised edge set.
    fn index(&mut self) {
        self.supports = vec![Vec::new(); self.edges.len()];
        self.convoys = vec![Vec::new(); self.edges.len()];
        for edge in &self.edges {
            if edge.void.is_some() {
                continue;
            }
            match edge.action {
                Action::Move { dest, .. } => {
                    self.attackers[dest.province as usize].push(edge.id);
                }
                Action::SupportHold { target: Some(t), .. }
                | Action::SupportMove { target: Some(t), .. } => {
                    self.supports[t.0].push(edge.id);
                }
                Action::Convoy { cargo: Some(c), .. } => {
                    self.convoys[c.0].push(edge.id);
                }
                _ => {}
            }
        }
    }

    /// All hyperedges, indexed by `OrderId`.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: OrderId) -> &Edge {
        &self.edges[id.0]
    }

    /// The edge of the unit occupying a province, if any.
    pub fn edge_at(&self, province: Province) -> Option<&Edge> {
        self.by_origin[province as usize].map(|id| &self.edges[id.0])
    }

    /// Non-void moves whose destination is the given province.
    pub fn attackers(&self, province: Province) -> &[OrderId] {
        &self.attackers[province as usize]
    }

    /// Non-void supports attached to the given order's action.
    pub fn supports_of(&self, id: OrderId) -> &[OrderId] {
        &self.supports[id.0]
    }

    /// Non-void convoy orders carrying the given move.
    pub fn convoys_for(&self, id: OrderId) -> &[OrderId] {
        &self.convoys[id.0]
    }
}

/// Static legality of a move, before reference resolution.
fn move_void(
    edge: &Edge,
    dest: Location,
    route: Route,
    convoyed_pairs: &[(Province, Province)],
) -> Option<VoidReason> {
    if dest.province == edge.origin {
        return Some(VoidReason::Unreachable);
    }
    if !edge.unit_type.can_occupy(dest.province.kind()) {
        return Some(VoidReason::BadTerrain);
    }
    let land = adjacent(
        edge.origin,
        edge.origin_coast,
        dest.province,
        dest.coast,
        edge.unit_type,
    );
    match edge.unit_type {
        UnitType::Fleet => (!land).then_some(VoidReason::Unreachable),
        UnitType::Army => {
            let convoyable = convoyed_pairs.contains(&(edge.origin, dest.province));
            let needs_convoy = !land || route == Route::ViaConvoy;
            (needs_convoy && !convoyable).then_some(VoidReason::NoConvoyRoute)
        }
    }
}

/// Settles the destination coast for fleet moves into split-coast provinces
/// when the order left it implicit and only one coast is reachable.
fn resolve_dest_coast(edge: &Edge, dest: Location) -> Location {
    if edge.unit_type != UnitType::Fleet
        || dest.coast != Coast::None
        || !dest.province.has_coasts()
    {
        return dest;
    }
    let options = fleet_coasts_between(edge.origin, edge.origin_coast, dest.province);
    match options.as_slice() {
        [only] => Location::with_coast(dest.province, *only),
        _ => dest,
    }
}

/// Translates a raw order into an unresolved action.
fn raw_action(order: &Order) -> Action {
    match *order {
        Order::Hold { .. } => Action::Hold,
        Order::Move { dest, route, .. } => Action::Move {
            dest,
            route,
            land_adjacent: false,
            convoyable: false,
        },
        Order::SupportHold { at, .. } => Action::SupportHold { at, target: None },
        Order::SupportMove { from, to, .. } => Action::SupportMove { from, to, target: None },
        Order::Convoy { from, to, .. } => Action::Convoy { from, to, cargo: None },
    }
}
