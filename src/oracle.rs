use crate::formula::prop::{self, Prop};
use crate::formula::{Clause, Formula, Variable};
use crate::sat::Solver;
use crate::SatResult;
use log::trace;

/// The oracle reported neither a model nor unsatisfiability.
#[derive(Debug)]
pub enum OracleError {
    Failed(String),
}

/// An incremental boolean satisfiability session. Assertions are
/// cumulative for the life of the session; there is no retraction.
///
/// The lazy loop takes the oracle as an explicit collaborator so tests can
/// substitute an instrumented or fake one; there is deliberately no
/// process-wide default session.
pub trait SatOracle {
    /// Allocates a fresh variable, distinct from all earlier ones.
    fn fresh_var(&mut self) -> Variable;

    /// Asserts an arbitrary propositional formula.
    fn assert_prop(&mut self, prop: &Prop);

    /// Asserts a single clause.
    fn assert_clause(&mut self, clause: Clause);

    /// Searches for an assignment satisfying everything asserted so far.
    fn solve(&mut self) -> Result<SatResult, OracleError>;
}

/// A [`SatOracle`] backed by the in-crate CDCL solver. Each `solve` call
/// runs the solver afresh over the accumulated clause set; models are
/// total over every variable allocated so far.
pub struct CdclOracle {
    clauses: Vec<Clause>,
    num_variables: usize,
}

impl CdclOracle {
    pub fn new() -> Self {
        Self {
            clauses: vec![],
            num_variables: 0,
        }
    }
}

impl Default for CdclOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl SatOracle for CdclOracle {
    fn fresh_var(&mut self) -> Variable {
        let v = Variable(self.num_variables);
        self.num_variables += 1;
        v
    }

    fn assert_prop(&mut self, prop: &Prop) {
        prop::assert_into(prop, &mut self.clauses, &mut self.num_variables);
    }

    fn assert_clause(&mut self, clause: Clause) {
        trace!("oracle: asserting {}", clause);
        self.clauses.push(clause);
    }

    fn solve(&mut self) -> Result<SatResult, OracleError> {
        trace!(
            "oracle: solving {} clauses over {} variables",
            self.clauses.len(),
            self.num_variables
        );
        let formula = Formula::new(self.num_variables, self.clauses.clone());
        Ok(Solver::new(formula).solve())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{Literal, Variable};

    #[test]
    fn fresh_vars_are_distinct() {
        let mut oracle = CdclOracle::new();
        let v0 = oracle.fresh_var();
        let v1 = oracle.fresh_var();
        assert_ne!(v0, v1);
        assert_eq!(v0, Variable(0));
        assert_eq!(v1, Variable(1));
    }

    #[test]
    fn assertions_accumulate() {
        let mut oracle = CdclOracle::new();
        let v = oracle.fresh_var();

        oracle.assert_clause(Clause::new(vec![Literal::Positive(v)]));
        match oracle.solve().unwrap() {
            SatResult::Satisfiable(model) => assert!(model.value_of(v)),
            SatResult::Unsatisfiable => panic!("expected sat"),
        }

        // the earlier assertion is still in force
        oracle.assert_clause(Clause::new(vec![Literal::Negative(v)]));
        assert_eq!(oracle.solve().unwrap(), SatResult::Unsatisfiable);
    }

    #[test]
    fn prop_assertions_reach_the_solver() {
        let mut oracle = CdclOracle::new();
        let v0 = oracle.fresh_var();
        let v1 = oracle.fresh_var();

        let prop = Prop::Or(vec![Prop::Var(v0), Prop::Var(v1)]);
        oracle.assert_prop(&prop);
        oracle.assert_clause(Clause::new(vec![Literal::Negative(v0)]));

        match oracle.solve().unwrap() {
            SatResult::Satisfiable(model) => {
                assert!(!model.value_of(v0));
                assert!(model.value_of(v1));
            }
            SatResult::Unsatisfiable => panic!("expected sat"),
        }
    }
}
