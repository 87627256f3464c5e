//! A small finite-domain constraint solver.
//!
//! Variables hold `u8` values from explicit domains; constraints are
//! labelled predicates over explicit scopes. The search is depth-first
//! backtracking in variable-creation order with propagation to a fixpoint
//! at every node: fully-assigned constraints are checked, and constraints
//! with exactly one open variable filter that variable's domain (forward
//! checking). The adjudicator needs every solution, not just one, so the
//! search enumerates exhaustively up to a caller-supplied cap.

use std::collections::BTreeSet;

/// Index of a variable within a [`Problem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarId(pub usize);

/// A labelled constraint over a fixed scope.
struct Constraint {
    label: String,
    scope: Vec<VarId>,
    test: Box<dyn Fn(&[u8]) -> bool>,
}

/// A complete assignment, indexed by `VarId`.
pub type Solution = Vec<u8>;

/// Raised when the constraint set admits no assignment. Carries the labels
/// of the constraints that failed at the deepest point the search reached,
/// which is where the contradiction surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsatisfiable {
    pub failed_constraints: Vec<String>,
}

/// A constraint satisfaction problem under construction.
#[derive(Default)]
pub struct Problem {
    domains: Vec<Vec<u8>>,
    names: Vec<String>,
    constraints: Vec<Constraint>,
}

impl Problem {
    pub fn new() -> Self {
        Problem::default()
    }

    /// Adds a variable with the given domain. Search branches in creation
    /// order, so callers add the most constraining variables first.
    pub fn add_var(&mut self, name: impl Into<String>, domain: Vec<u8>) -> VarId {
        debug_assert!(!domain.is_empty());
        let id = VarId(self.domains.len());
        self.domains.push(domain);
        self.names.push(name.into());
        id
    }

    /// Collapses a variable's domain to a single value.
    pub fn pin(&mut self, var: VarId, value: u8) {
        self.domains[var.0] = vec![value];
    }

    pub fn domain(&self, var: VarId) -> &[u8] {
        &self.domains[var.0]
    }

    pub fn var_name(&self, var: VarId) -> &str {
        &self.names[var.0]
    }

    /// Adds a constraint. `test` receives values for `scope` in order and
    /// is only invoked on full scope assignments.
    pub fn constrain(
        &mut self,
        label: impl Into<String>,
        scope: Vec<VarId>,
        test: impl Fn(&[u8]) -> bool + 'static,
    ) {
        self.constraints.push(Constraint {
            label: label.into(),
            scope,
            test: Box::new(test),
        });
    }

    /// Enumerates every satisfying assignment, up to `cap` solutions.
    pub fn solve_all(&self, cap: usize) -> Result<Vec<Solution>, Unsatisfiable> {
        let mut search = Search {
            problem: self,
            solutions: Vec::new(),
            cap,
            deepest_failure: 0,
            culprits: BTreeSet::new(),
        };
        search.dfs(self.domains.clone(), 0);
        if search.solutions.is_empty() {
            return Err(Unsatisfiable {
                failed_constraints: search.culprits.into_iter().collect(),
            });
        }
        Ok(search.solutions)
    }
}

struct Search<'a> {
    problem: &'a Problem,
    solutions: Vec<Solution>,
    cap: usize,
    deepest_failure: usize,
    culprits: BTreeSet<String>,
}

impl Search<'_> {
    fn dfs(&mut self, mut domains: Vec<Vec<u8>>, depth: usize) {
        if self.solutions.len() > self.cap {
            return;
        }
        if let Err(label) = propagate(&self.problem.constraints, &mut domains) {
            self.record_failure(depth, label);
            return;
        }
        let Some(var) = domains.iter().position(|d| d.len() > 1) else {
            self.solutions.push(domains.iter().map(|d| d[0]).collect());
            return;
        };
        for value in domains[var].clone() {
            let mut next = domains.clone();
            next[var] = vec![value];
            self.dfs(next, depth + 1);
        }
    }

    fn record_failure(&mut self, depth: usize, label: String) {
        if depth > self.deepest_failure {
            self.deepest_failure = depth;
            self.culprits.clear();
        }
        if depth == self.deepest_failure {
            self.culprits.insert(label);
        }
    }
}

/// Runs singleton checks and forward checking until nothing changes.
/// Returns the label of the first violated constraint on contradiction.
fn propagate(constraints: &[Constraint], domains: &mut [Vec<u8>]) -> Result<(), String> {
    let mut values = Vec::new();
    loop {
        let mut changed = false;
        for c in constraints {
            let mut open = None;
            let mut open_count = 0;
            for (i, v) in c.scope.iter().enumerate() {
                if domains[v.0].len() > 1 {
                    open = Some(i);
                    open_count += 1;
                    if open_count > 1 {
                        break;
                    }
                }
            }
            match (open, open_count) {
                (None, _) => {
                    values.clear();
                    values.extend(c.scope.iter().map(|v| domains[v.0][0]));
                    if !(c.test)(&values) {
                        return Err(c.label.clone());
                    }
                }
                (Some(slot), 1) => {
                    values.clear();
                    values.extend(c.scope.iter().map(|v| domains[v.0][0]));
                    let var = c.scope[slot];
                    let before = domains[var.0].len();
                    let mut kept = Vec::with_capacity(before);
                    for &candidate in &domains[var.0] {
                        values[slot] = candidate;
                        if (c.test)(&values) {
                            kept.push(candidate);
                        }
                    }
                    if kept.is_empty() {
                        return Err(c.label.clone());
                    }
                    if kept.len() < before {
                        domains[var.0] = kept;
                        changed = true;
                    }
                }
                _ => {}
            }
        }
        if !changed {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_problem_has_one_solution() {
        let mut p = Problem::new();
        let a = p.add_var("a", vec![0, 1, 2]);
        p.pin(a, 1);
        let sols = p.solve_all(8).unwrap();
        assert_eq!(sols, vec![vec![1]]);
    }

    #[test]
    fn functional_constraint_propagates() {
        let mut p = Problem::new();
        let a = p.add_var("a", vec![3]);
        let b = p.add_var("b", vec![0, 1, 2, 3, 4, 5]);
        // b = a + 1, forced without branching.
        p.constrain("b=a+1", vec![a, b], |v| v[1] == v[0] + 1);
        let sols = p.solve_all(8).unwrap();
        assert_eq!(sols, vec![vec![3, 4]]);
    }

    #[test]
    fn enumerates_all_solutions() {
        let mut p = Problem::new();
        let a = p.add_var("a", vec![0, 1]);
        let b = p.add_var("b", vec![0, 1]);
        p.constrain("a=b", vec![a, b], |v| v[0] == v[1]);
        let sols = p.solve_all(8).unwrap();
        assert_eq!(sols, vec![vec![0, 0], vec![1, 1]]);
    }

    #[test]
    fn unsatisfiable_reports_the_offending_constraint() {
        let mut p = Problem::new();
        let a = p.add_var("a", vec![0, 1]);
        p.constrain("a=0", vec![a], |v| v[0] == 0);
        p.constrain("a=1", vec![a], |v| v[0] == 1);
        let err = p.solve_all(8).unwrap_err();
        assert!(!err.failed_constraints.is_empty());
    }

    #[test]
    fn backtracks_through_cyclic_dependencies() {
        // x == y and y == x admits exactly the two diagonal assignments;
        // neither constraint alone pins anything.
        let mut p = Problem::new();
        let x = p.add_var("x", vec![0, 1]);
        let y = p.add_var("y", vec![0, 1]);
        let z = p.add_var("z", vec![0, 1]);
        p.constrain("x=y", vec![x, y], |v| v[0] == v[1]);
        p.constrain("y=x", vec![y, x], |v| v[0] == v[1]);
        p.constrain("z=x&y", vec![z, x, y], |v| v[0] == (v[1] & v[2]));
        let sols = p.solve_all(8).unwrap();
        assert_eq!(sols, vec![vec![0, 0, 0], vec![1, 1, 1]]);
    }

    #[test]
    fn cap_bounds_enumeration() {
        let mut p = Problem::new();
        for i in 0..6 {
            p.add_var(format!("v{i}"), vec![0, 1]);
        }
        let sols = p.solve_all(4).unwrap();
        assert!(sols.len() <= 5);
    }
}
