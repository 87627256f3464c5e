//! Board representation: the map model, units, orders, and game state.

pub mod adjacency;
pub mod order;
pub mod province;
pub mod state;
pub mod unit;

pub use adjacency::{adjacent, fleet_coasts_between, neighbors, EDGE_COUNT};
pub use order::{Location, Order, OrderedUnit, Route};
pub use province::{
    Coast, Power, Province, ProvinceKind, ALL_POWERS, ALL_PROVINCES, PROVINCE_COUNT,
    SUPPLY_CENTER_COUNT,
};
pub use state::{GameState, Season, StateError};
pub use unit::{Unit, UnitId, UnitType};
