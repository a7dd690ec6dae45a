use crate::formula::prop::Prop;
use crate::formula::Variable;
use crate::term::Term;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};

/// A boolean combination of equality atoms over uninterpreted terms. The
/// only atomic proposition is `Eq`; a disequality is `Not(Eq(..))`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Expr {
    True,
    False,
    Eq(Term, Term),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    pub fn eq(lhs: Term, rhs: Term) -> Expr {
        Expr::Eq(lhs, rhs)
    }

    pub fn neq(lhs: Term, rhs: Term) -> Expr {
        Expr::not(Expr::eq(lhs, rhs))
    }

    pub fn not(e: Expr) -> Expr {
        Expr::Not(Box::new(e))
    }

    pub fn and(conjuncts: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(conjuncts.into_iter().collect())
    }

    pub fn or(disjuncts: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(disjuncts.into_iter().collect())
    }

    /// The distinct equality atoms of this formula, in first-seen order.
    pub fn atoms(&self) -> Vec<Expr> {
        let mut out = vec![];
        let mut seen = HashSet::new();
        self.collect_atoms(&mut out, &mut seen);
        out
    }

    fn collect_atoms(&self, out: &mut Vec<Expr>, seen: &mut HashSet<Expr>) {
        match self {
            Expr::True | Expr::False => {}
            Expr::Eq(_, _) => {
                if seen.insert(self.clone()) {
                    out.push(self.clone());
                }
            }
            Expr::Not(inner) => inner.collect_atoms(out, seen),
            Expr::And(es) | Expr::Or(es) => {
                for e in es {
                    e.collect_atoms(out, seen);
                }
            }
        }
    }

    /// Every distinct term appearing in this formula, including all nested
    /// sub-terms, with children listed before their parents.
    pub fn terms(&self) -> Vec<Term> {
        let mut out = vec![];
        let mut seen = HashSet::new();
        for atom in self.atoms() {
            if let Expr::Eq(lhs, rhs) = atom {
                lhs.collect_subterms(&mut out, &mut seen);
                rhs.collect_subterms(&mut out, &mut seen);
            }
        }
        out
    }

    /// The boolean abstraction of this formula: every equality atom is
    /// replaced by its placeholder variable from `placeholders`, which must
    /// cover all atoms of the formula.
    pub fn abstracted(&self, placeholders: &HashMap<Expr, Variable>) -> Prop {
        match self {
            Expr::True => Prop::True,
            Expr::False => Prop::False,
            Expr::Eq(_, _) => Prop::Var(placeholders[self]),
            Expr::Not(inner) => Prop::not(inner.abstracted(placeholders)),
            Expr::And(es) => Prop::And(es.iter().map(|e| e.abstracted(placeholders)).collect()),
            Expr::Or(es) => Prop::Or(es.iter().map(|e| e.abstracted(placeholders)).collect()),
        }
    }

    /// Evaluates the formula under a truth assignment to its atoms. Atoms
    /// missing from the assignment evaluate to false.
    pub fn eval(&self, assignment: &HashMap<Expr, bool>) -> bool {
        match self {
            Expr::True => true,
            Expr::False => false,
            Expr::Eq(_, _) => assignment.get(self).copied().unwrap_or(false),
            Expr::Not(inner) => !inner.eval(assignment),
            Expr::And(es) => es.iter().all(|e| e.eval(assignment)),
            Expr::Or(es) => es.iter().any(|e| e.eval(assignment)),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Expr::True => f.write_str("true"),
            Expr::False => f.write_str("false"),
            Expr::Eq(lhs, rhs) => write!(f, "({} = {})", lhs, rhs),
            Expr::Not(inner) => write!(f, "!{}", inner),
            Expr::And(es) => write_connective(f, es, " & "),
            Expr::Or(es) => write_connective(f, es, " | "),
        }
    }
}

fn write_connective(f: &mut Formatter, es: &[Expr], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, e) in es.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", e)?;
    }
    f.write_str(")")
}
