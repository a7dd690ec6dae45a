use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

/// An uninterpreted term: either a constant symbol or a function symbol
/// applied to an ordered list of argument terms. Terms compare and hash
/// structurally, so a `Term` can key a `HashMap` directly.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Term {
    Const(String),
    App(String, Vec<Term>),
}

impl Term {
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Const(name.into())
    }

    pub fn apply(symbol: impl Into<String>, args: impl IntoIterator<Item = Term>) -> Self {
        Term::App(symbol.into(), args.into_iter().collect())
    }

    pub fn is_application(&self) -> bool {
        match self {
            Term::Const(_) => false,
            Term::App(_, _) => true,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Term::Const(name) => name,
            Term::App(symbol, _) => symbol,
        }
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::Const(_) => &[],
            Term::App(_, args) => args,
        }
    }

    /// Nesting depth: 0 for a constant, 1 + max argument depth for an
    /// application (so a zero-argument application has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            Term::Const(_) => 0,
            Term::App(_, args) => 1 + args.iter().map(Term::depth).max().unwrap_or(0),
        }
    }

    /// Appends this term and every sub-term to `out`, skipping terms
    /// already in `seen`. Children are visited before their parent.
    pub(crate) fn collect_subterms(&self, out: &mut Vec<Term>, seen: &mut HashSet<Term>) {
        for arg in self.args() {
            arg.collect_subterms(out, seen);
        }
        if seen.insert(self.clone()) {
            out.push(self.clone());
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Term::Const(name) => f.write_str(name),
            Term::App(symbol, args) => {
                f.write_str(symbol)?;
                f.write_str("(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}
