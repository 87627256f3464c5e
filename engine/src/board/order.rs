//! Movement-phase orders, one hyperedge variant per order kind.
//!
//! Each order names its issuing unit by class and location, so a raw order
//! list is self-contained; the hypergraph layer resolves these references
//! against the game state and flags anything unresolvable as void.

use super::province::{Coast, Province};
use super::unit::UnitType;

/// A board location: a province plus an optional coast specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub province: Province,
    pub coast: Coast,
}

impl Location {
    /// A location without a coast.
    pub const fn new(province: Province) -> Self {
        Location { province, coast: Coast::None }
    }

    /// A location with a coast specifier.
    pub const fn with_coast(province: Province, coast: Coast) -> Self {
        Location { province, coast }
    }
}

/// The unit issuing an order: its class and current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderedUnit {
    pub unit_type: UnitType,
    pub location: Location,
}

impl OrderedUnit {
    pub const fn army(province: Province) -> Self {
        OrderedUnit { unit_type: UnitType::Army, location: Location::new(province) }
    }

    pub const fn fleet(province: Province) -> Self {
        OrderedUnit { unit_type: UnitType::Fleet, location: Location::new(province) }
    }
}

/// How a move reaches its destination when both options could apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    /// Let the resolver pick between a land route and a convoy chain.
    #[default]
    Auto,
    /// The move was explicitly ordered via convoy.
    ViaConvoy,
}

/// A movement-phase order.
///
/// Exactly one is issued per unit per turn; a unit without an order is
/// treated as holding. Support and convoy orders reference other units by
/// province, resolved later by the hypergraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// `A vie H`
    Hold { unit: OrderedUnit },

    /// `A par - bur`, `F nrg - stp/nc`
    Move { unit: OrderedUnit, dest: Location, route: Route },

    /// `A tyr S vie` -- support the unit in vie to hold.
    SupportHold { unit: OrderedUnit, at: Province },

    /// `A gal S bud - rum` -- support the move from bud to rum.
    SupportMove { unit: OrderedUnit, from: Province, to: Province },

    /// `F aeg C gre - smy` -- convoy the army moving from gre to smy.
    Convoy { unit: OrderedUnit, from: Province, to: Province },
}

impl Order {
    /// The unit this order was issued to.
    pub const fn unit(&self) -> OrderedUnit {
        match *self {
            Order::Hold { unit }
            | Order::Move { unit, .. }
            | Order::SupportHold { unit, .. }
            | Order::SupportMove { unit, .. }
            | Order::Convoy { unit, .. } => unit,
        }
    }

    /// The province the issuing unit occupies.
    pub const fn origin(&self) -> Province {
        self.unit().location.province
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_units_province() {
        let order = Order::Move {
            unit: OrderedUnit::army(Province::Par),
            dest: Location::new(Province::Bur),
            route: Route::Auto,
        };
        assert_eq!(order.origin(), Province::Par);
        assert_eq!(order.unit().unit_type, UnitType::Army);
    }

    #[test]
    fn route_defaults_to_auto() {
        assert_eq!(Route::default(), Route::Auto);
    }
}
