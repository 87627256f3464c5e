//! Game state: the unit set plus the season/year tag.
//!
//! Provinces are singleton-occupancy, so an occupancy index keyed by
//! province discriminant gives O(1) lookups while the unit list keeps
//! stable ids for the visualiser payloads.

use thiserror::Error;

use super::province::{Coast, Power, Province, PROVINCE_COUNT};
use super::unit::{Unit, UnitId, UnitType};

/// The season of a game turn. Movement alternates Spring and Fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Fall,
}

impl Season {
    /// Capitalised display name.
    pub const fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Fall => "Fall",
        }
    }
}

/// Errors when mutating the unit set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("province {0} is already occupied")]
    Occupied(&'static str),

    #[error("a {unit} cannot occupy {province}")]
    BadTerrain { unit: &'static str, province: &'static str },
}

/// Complete game state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub year: u16,
    pub season: Season,
    units: Vec<Unit>,
    /// Index into `units` of the occupant, keyed by province discriminant.
    occupancy: [Option<u16>; PROVINCE_COUNT],
    next_id: u16,
}

impl GameState {
    /// An empty board at the given date.
    pub fn new(year: u16, season: Season) -> Self {
        GameState {
            year,
            season,
            units: Vec::new(),
            occupancy: [None; PROVINCE_COUNT],
            next_id: 0,
        }
    }

    /// The standard 22-unit opening position, Spring 1901.
    pub fn opening_position() -> Self {
        use Province::*;
        use UnitType::{Army, Fleet};
        let mut state = GameState::new(1901, Season::Spring);
        let setup: [(Power, UnitType, Province, Coast); 22] = [
            (Power::Austria, Army, Vie, Coast::None),
            (Power::Austria, Army, Bud, Coast::None),
            (Power::Austria, Fleet, Tri, Coast::None),
            (Power::England, Fleet, Lon, Coast::None),
            (Power::England, Fleet, Edi, Coast::None),
            (Power::England, Army, Lvp, Coast::None),
            (Power::France, Fleet, Bre, Coast::None),
            (Power::France, Army, Par, Coast::None),
            (Power::France, Army, Mar, Coast::None),
            (Power::Germany, Fleet, Kie, Coast::None),
            (Power::Germany, Army, Ber, Coast::None),
            (Power::Germany, Army, Mun, Coast::None),
            (Power::Italy, Fleet, Nap, Coast::None),
            (Power::Italy, Army, Rom, Coast::None),
            (Power::Italy, Army, Ven, Coast::None),
            (Power::Russia, Fleet, Stp, Coast::South),
            (Power::Russia, Army, Mos, Coast::None),
            (Power::Russia, Army, War, Coast::None),
            (Power::Russia, Fleet, Sev, Coast::None),
            (Power::Turkey, Fleet, Ank, Coast::None),
            (Power::Turkey, Army, Con, Coast::None),
            (Power::Turkey, Army, Smy, Coast::None),
        ];
        for (power, unit_type, province, coast) in setup {
            state
                .place_unit(power, unit_type, province, coast)
                .expect("standard opening position is legal");
        }
        state
    }

    /// Places a new unit, enforcing terrain and singleton occupancy.
    pub fn place_unit(
        &mut self,
        power: Power,
        unit_type: UnitType,
        province: Province,
        coast: Coast,
    ) -> Result<UnitId, StateError> {
        if !unit_type.can_occupy(province.kind()) {
            return Err(StateError::BadTerrain {
                unit: unit_type.name(),
                province: province.abbr(),
            });
        }
        if self.occupancy[province as usize].is_some() {
            return Err(StateError::Occupied(province.abbr()));
        }
        let id = UnitId(self.next_id);
        self.next_id += 1;
        self.occupancy[province as usize] = Some(self.units.len() as u16);
        self.units.push(Unit { id, power, unit_type, province, coast });
        Ok(id)
    }

    /// The unit occupying a province, if any.
    pub fn unit_at(&self, province: Province) -> Option<&Unit> {
        self.occupancy[province as usize].map(|i| &self.units[i as usize])
    }

    /// All units on the board.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Applies a batch of simultaneous moves. Origins are vacated before
    /// destinations are filled so chains and full cycles land correctly.
    pub(crate) fn relocate_all(&mut self, moves: &[(Province, Province, Coast)]) {
        let mut movers = Vec::with_capacity(moves.len());
        for (from, to, coast) in moves {
            if let Some(i) = self.occupancy[*from as usize].take() {
                movers.push((i, *to, *coast));
            }
        }
        for (i, to, coast) in movers {
            debug_assert!(self.occupancy[to as usize].is_none());
            self.occupancy[to as usize] = Some(i);
            let unit = &mut self.units[i as usize];
            unit.province = to;
            unit.coast = coast;
        }
    }

    /// Removes the unit at a province (dislodged and not retreating here).
    pub(crate) fn remove(&mut self, province: Province) {
        if let Some(i) = self.occupancy[province as usize].take() {
            self.units.remove(i as usize);
            for slot in self.occupancy.iter_mut() {
                if let Some(j) = slot {
                    if *j > i {
                        *j -= 1;
                    }
                }
            }
        }
    }

    /// Advances the season: Spring to Fall, Fall to Spring of the next year.
    pub fn advance_turn(&mut self) {
        match self.season {
            Season::Spring => self.season = Season::Fall,
            Season::Fall => {
                self.season = Season::Spring;
                self.year += 1;
            }
        }
    }
}
