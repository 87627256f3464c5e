//! Turn adjudication: hypergraph, CSP encoding, solver, and projection.
//!
//! The whole pipeline is the pure function [`adjudicate`]: build the order
//! hypergraph, encode it as a finite-domain CSP, enumerate the consistent
//! assignments, select the rule-correct one, and project it into a
//! [`TurnResult`]. All search state is private to one call.

mod encode;
pub mod hypergraph;
pub mod outcome;
pub mod solver;

use thiserror::Error;

use crate::board::order::Order;
use crate::board::state::GameState;

pub use hypergraph::{Action, Edge, GraphError, OrderId, TurnGraph, VoidReason};
pub use outcome::{
    apply_result, Conflict, ConflictReason, Contender, OrderStatus, Paradox, TurnDetails,
    TurnResult, UnitOutcome, UnitReport,
};

/// More consistent assignments than any legal turn can produce; reaching
/// this many means the constraint set failed to pin the position down.
const SOLUTION_CAP: usize = 64;

/// Fatal adjudication failures. Void orders are not errors; these indicate
/// either a caller bug (graph construction) or a hole in the rule encoding.
#[derive(Debug, Error)]
pub enum AdjudicationError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The CSP admits no assignment: the encoded rules contradict each
    /// other for this input. Carries the constraints that failed deepest.
    #[error("no consistent resolution; violated constraints: [{}]", constraints.join(", "))]
    Inconsistent { constraints: Vec<String> },

    /// More than one assignment survives the Szykman and cycle tiebreaks.
    #[error("{count} resolutions survive the tiebreak; a tiebreak rule is missing")]
    Ambiguous { count: usize },
}

/// Adjudicates one movement turn.
///
/// Missing orders default to hold; void orders resolve with zero strength.
/// The input is read-only and the result is the only artifact, so repeated
/// calls on identical input give identical results.
pub fn adjudicate(state: &GameState, orders: &[Order]) -> Result<TurnResult, AdjudicationError> {
    let graph = TurnGraph::build(state, orders)?;
    resolve(&graph)
}

/// Adjudicates a pre-built hypergraph.
pub fn resolve(graph: &TurnGraph) -> Result<TurnResult, AdjudicationError> {
    let enc = encode::encode(graph);
    let solutions = enc
        .problem
        .solve_all(SOLUTION_CAP)
        .map_err(|unsat| AdjudicationError::Inconsistent {
            constraints: unsat.failed_constraints,
        })?;
    if solutions.len() > SOLUTION_CAP {
        return Err(AdjudicationError::Ambiguous { count: solutions.len() });
    }
    let (chosen, paradox) = outcome::select(graph, &enc, solutions)?;
    Ok(outcome::project(graph, &enc, &chosen, paradox))
}
