use crate::formula::{Clause, Literal, Variable};
use std::fmt::{self, Display, Formatter};

/// A propositional formula with arbitrary connectives. This is what the
/// boolean abstraction of an equality formula produces; the solver itself
/// only understands CNF, so `assert_into` lowers a `Prop` with the Tseitin
/// encoding before it reaches the clause database.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Prop {
    True,
    False,
    Var(Variable),
    Not(Box<Prop>),
    And(Vec<Prop>),
    Or(Vec<Prop>),
}

impl Prop {
    pub fn not(p: Prop) -> Prop {
        Prop::Not(Box::new(p))
    }
}

/// Asserts `prop` by appending its Tseitin clauses to `clauses`, drawing
/// auxiliary variables from `next_var` (which must start past every
/// variable already in use).
pub fn assert_into(prop: &Prop, clauses: &mut Vec<Clause>, next_var: &mut usize) {
    let root = encode(prop, clauses, next_var);
    clauses.push(Clause::new(vec![root]));
}

/// Returns a literal equisatisfiably equivalent to `prop`, emitting the
/// defining clauses for any introduced auxiliary variable.
fn fresh(next_var: &mut usize) -> Variable {
    let v = Variable(*next_var);
    *next_var += 1;
    v
}

fn fresh_forced(clauses: &mut Vec<Clause>, next_var: &mut usize, value: bool) -> Variable {
    let v = fresh(next_var);
    let unit = if value {
        Literal::Positive(v)
    } else {
        Literal::Negative(v)
    };
    clauses.push(Clause::new(vec![unit]));
    v
}

fn encode(prop: &Prop, clauses: &mut Vec<Clause>, next_var: &mut usize) -> Literal {
    match prop {
        Prop::True => Literal::Positive(fresh_forced(clauses, next_var, true)),
        Prop::False => Literal::Positive(fresh_forced(clauses, next_var, false)),
        Prop::Var(v) => Literal::Positive(*v),
        Prop::Not(inner) => encode(inner, clauses, next_var).negated(),
        Prop::And(conjuncts) => {
            let literals: Vec<Literal> = conjuncts
                .iter()
                .map(|c| encode(c, clauses, next_var))
                .collect();
            let out = Literal::Positive(fresh(next_var));
            // out -> l_i for each conjunct, and (l_1 & ... & l_n) -> out
            for l in &literals {
                clauses.push(Clause::new(vec![out.negated(), l.clone()]));
            }
            let mut back = vec![out.clone()];
            back.extend(literals.iter().map(Literal::negated));
            clauses.push(Clause::new(back));
            out
        }
        Prop::Or(disjuncts) => {
            let literals: Vec<Literal> = disjuncts
                .iter()
                .map(|d| encode(d, clauses, next_var))
                .collect();
            let out = Literal::Positive(fresh(next_var));
            // l_i -> out for each disjunct, and out -> (l_1 | ... | l_n)
            for l in &literals {
                clauses.push(Clause::new(vec![out.clone(), l.negated()]));
            }
            let mut fwd = vec![out.negated()];
            fwd.extend(literals.iter().cloned());
            clauses.push(Clause::new(fwd));
            out
        }
    }
}

impl Display for Prop {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Prop::True => f.write_str("true"),
            Prop::False => f.write_str("false"),
            Prop::Var(Variable(x)) => write!(f, "b{}", x),
            Prop::Not(inner) => write!(f, "!{}", inner),
            Prop::And(ps) => write_connective(f, ps, " & "),
            Prop::Or(ps) => write_connective(f, ps, " | "),
        }
    }
}

fn write_connective(f: &mut Formatter, ps: &[Prop], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, p) in ps.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", p)?;
    }
    f.write_str(")")
}
