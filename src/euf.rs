use crate::egraph::EGraph;
use crate::expr::Expr;
use crate::term::Term;
use crate::SmtResult;
use log::{debug, trace};

/// Decides satisfiability of a conjunction of equality literals over
/// uninterpreted terms: collect every sub-term, build a congruence graph,
/// merge the asserted equalities, then check that no asserted disequality
/// has collapsed into a single class.
///
/// The input is expected to be a conjunction (possibly nested) of `Eq`
/// atoms and negated `Eq` atoms. Conjuncts of any other shape are skipped,
/// except a literal `false`, which makes the formula unsatisfiable
/// outright.
pub fn decide_euf(formula: &Expr) -> SmtResult {
    let mut equalities = vec![];
    let mut inequalities = vec![];
    if !split_literals(formula, &mut equalities, &mut inequalities) {
        return SmtResult::Unsatisfiable;
    }

    let terms = formula.terms();
    debug!(
        "euf: {} terms, {} equalities, {} disequalities",
        terms.len(),
        equalities.len(),
        inequalities.len()
    );

    let mut graph = EGraph::new(&terms);
    graph.merge_equalities(&equalities);

    if graph.check_consistency(&inequalities) {
        let witness = equalities
            .into_iter()
            .map(|(lhs, rhs)| Expr::eq(lhs, rhs))
            .chain(inequalities.into_iter().map(|(lhs, rhs)| Expr::neq(lhs, rhs)))
            .collect();
        SmtResult::Satisfiable(witness)
    } else {
        SmtResult::Unsatisfiable
    }
}

/// Flattens a conjunction into equality and disequality pairs. Returns
/// false if a literal `false` conjunct was found.
fn split_literals(
    formula: &Expr,
    equalities: &mut Vec<(Term, Term)>,
    inequalities: &mut Vec<(Term, Term)>,
) -> bool {
    match formula {
        Expr::True => true,
        Expr::False => false,
        Expr::Eq(lhs, rhs) => {
            equalities.push((lhs.clone(), rhs.clone()));
            true
        }
        Expr::Not(inner) => match &**inner {
            Expr::Eq(lhs, rhs) => {
                inequalities.push((lhs.clone(), rhs.clone()));
                true
            }
            Expr::False => true,
            Expr::True => false,
            other => {
                trace!("skipping non-literal conjunct !{}", other);
                true
            }
        },
        Expr::And(conjuncts) => conjuncts
            .iter()
            .all(|c| split_literals(c, equalities, inequalities)),
        other => {
            trace!("skipping non-literal conjunct {}", other);
            true
        }
    }
}
