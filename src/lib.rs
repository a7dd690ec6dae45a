//! A small SMT solver for the theory of equality with uninterpreted
//! functions (EUF): a congruence-closure decision procedure for
//! conjunctions of equality literals, and a lazy abstraction-refinement
//! loop that extends it to arbitrary boolean combinations of equality
//! atoms by driving a CDCL boolean solver.

mod egraph;
mod euf;
mod expr;
mod lazy;
mod oracle;
mod sat;
mod term;

pub mod formula;

#[cfg(test)]
mod brute_force;

/// The outcome of a boolean satisfiability query.
#[derive(PartialEq, Clone, Debug)]
pub enum SatResult {
    Satisfiable(Model),
    Unsatisfiable,
}

/// The outcome of a theory satisfiability query. A satisfiable result
/// carries the witnessing conjunction of theory literals.
#[derive(PartialEq, Clone, Debug)]
pub enum SmtResult {
    Satisfiable(Vec<Expr>),
    Unsatisfiable,
}

pub use egraph::{EGraph, NodeId};
pub use euf::decide_euf;
pub use expr::Expr;
pub use formula::{Clause, Formula, Literal, Variable};
pub use lazy::{decide_lazy, decide_lazy_with};
pub use oracle::{CdclOracle, OracleError, SatOracle};
pub use sat::{Model, Solver};
pub use term::Term;
