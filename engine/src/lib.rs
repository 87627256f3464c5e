//! Entente -- the adjudication core of a Diplomacy turn-resolution engine.
//!
//! Given a map, the current unit positions, and one order per unit, the
//! core computes the unique rule-correct outcome of the turn: which units
//! move, which hold, which supports are cut, which units are dislodged,
//! and which contests end in standoff. Orders are resolved simultaneously
//! by encoding the turn as a finite-domain constraint satisfaction problem
//! and handing global consistency to a backtracking solver, so circular
//! move chains, support-cut cascades, convoy disruptions, and the convoy
//! paradoxes fall out of one declarative rule set instead of special cases.
//!
//! Entry point: [`adjudicate::adjudicate`].

pub mod adjudicate;
pub mod board;
pub mod protocol;
