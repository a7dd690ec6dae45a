use crate::euf::decide_euf;
use crate::expr::Expr;
use crate::formula::{Clause, Literal, Variable};
use crate::oracle::{CdclOracle, OracleError, SatOracle};
use crate::{SatResult, SmtResult};
use log::{debug, trace};
use std::collections::HashMap;

/// Decides satisfiability of an arbitrary boolean combination of equality
/// atoms with a fresh [`CdclOracle`] session.
pub fn decide_lazy(formula: &Expr) -> Result<SmtResult, OracleError> {
    let mut oracle = CdclOracle::new();
    decide_lazy_with(formula, &mut oracle)
}

/// The lazy abstraction-refinement loop. Each equality atom gets a fresh
/// placeholder variable; the purely propositional skeleton goes to the
/// oracle; every candidate model the oracle proposes is read back as a
/// conjunction of theory literals and validated by the EUF decision
/// procedure. A theory-inconsistent candidate is ruled out by asserting
/// the clause negating exactly that placeholder assignment, so each
/// iteration permanently excludes one boolean assignment and the loop
/// finishes after at most 2^k proposals for k atoms.
pub fn decide_lazy_with<O: SatOracle>(
    formula: &Expr,
    oracle: &mut O,
) -> Result<SmtResult, OracleError> {
    let atoms = formula.atoms();
    let placeholders: Vec<Variable> = atoms.iter().map(|_| oracle.fresh_var()).collect();
    let atom_to_var: HashMap<Expr, Variable> = atoms
        .iter()
        .cloned()
        .zip(placeholders.iter().copied())
        .collect();

    let skeleton = formula.abstracted(&atom_to_var);
    debug!("lazy: {} atoms, skeleton {}", atoms.len(), skeleton);
    oracle.assert_prop(&skeleton);

    loop {
        let model = match oracle.solve()? {
            SatResult::Unsatisfiable => {
                debug!("lazy: skeleton exhausted, unsat");
                return Ok(SmtResult::Unsatisfiable);
            }
            SatResult::Satisfiable(model) => model,
        };

        // true placeholder => the atom itself, false => its negation
        let candidate: Vec<Expr> = atoms
            .iter()
            .zip(placeholders.iter())
            .map(|(atom, &var)| {
                if model.value_of(var) {
                    atom.clone()
                } else {
                    Expr::not(atom.clone())
                }
            })
            .collect();
        trace!("lazy: candidate {}", Expr::and(candidate.clone()));

        match decide_euf(&Expr::and(candidate.clone())) {
            SmtResult::Satisfiable(_) => {
                debug!("lazy: candidate is theory-consistent, sat");
                return Ok(SmtResult::Satisfiable(candidate));
            }
            SmtResult::Unsatisfiable => {
                let blocking = Clause::new(placeholders.iter().map(|&var| {
                    if model.value_of(var) {
                        Literal::Negative(var)
                    } else {
                        Literal::Positive(var)
                    }
                }));
                trace!("lazy: blocking {}", blocking);
                oracle.assert_clause(blocking);
            }
        }
    }
}
