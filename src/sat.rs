use crate::formula::{Clause, Formula, Literal, Variable};
use crate::SatResult;
use log::trace;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Assignment {
    True,
    False,
    Undecided,
}

/// A model is a total assignment: every variable of the formula gets a
/// value, including variables no clause constrains.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub fn value_of(&self, variable: Variable) -> bool {
        self.values[variable.0]
    }

    pub fn num_variables(&self) -> usize {
        self.values.len()
    }
}

/// A CDCL solver for a single CNF formula: unit propagation, naive
/// decisions, first-UIP conflict analysis, non-chronological backtracking.
pub struct Solver {
    clauses: Vec<Clause>,
    state: SolverState,
}

#[derive(Debug)]
struct SolverState {
    variables: Vec<VariableState>,
    trail: Vec<Variable>,
    decision_level: DecisionLevel,
}

#[derive(Debug, Clone)]
struct VariableState {
    assignment: Assignment,
    reason: Option<ClauseIdx>,
    decision_level: DecisionLevel,
}

impl VariableState {
    fn literal(&self, v: Variable) -> Literal {
        match self.assignment {
            Assignment::Undecided => panic!("cannot get literal for unassigned variable"),
            Assignment::True => Literal::Positive(v),
            Assignment::False => Literal::Negative(v),
        }
    }

    fn clear(&mut self) {
        self.assignment = Assignment::Undecided;
        self.reason = None;
        self.decision_level = DecisionLevel(0);
    }
}

impl Default for VariableState {
    fn default() -> Self {
        VariableState {
            assignment: Assignment::Undecided,
            reason: None,
            decision_level: DecisionLevel(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClauseIdx(usize);

impl SolverState {
    fn new(num_variables: usize) -> Self {
        Self {
            variables: vec![Default::default(); num_variables],
            trail: vec![],
            decision_level: DecisionLevel(0),
        }
    }

    fn assignment_for(&self, literal: &Literal) -> Assignment {
        match self.variables[literal.idx()].assignment {
            Assignment::True => {
                if literal.is_positive() {
                    Assignment::True
                } else {
                    Assignment::False
                }
            }
            Assignment::False => {
                if literal.is_positive() {
                    Assignment::False
                } else {
                    Assignment::True
                }
            }
            Assignment::Undecided => Assignment::Undecided,
        }
    }

    fn assign(&mut self, literal: &Literal, reason: Option<ClauseIdx>) {
        assert_eq!(self.assignment_for(literal), Assignment::Undecided);
        assert!(reason.is_some() || self.decision_level > DecisionLevel(0));

        trace!(
            "{} {} at level {}",
            match reason {
                Some(c) => format!("implied({})", c.0),
                None => "decision".to_string(),
            },
            literal,
            self.decision_level.0
        );

        self.trail.push(*literal.variable());
        let var = &mut self.variables[literal.idx()];
        var.assignment = if literal.is_positive() {
            Assignment::True
        } else {
            Assignment::False
        };
        var.reason = reason;
        var.decision_level = self.decision_level;
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
enum BcpResult {
    Conflict(ClauseIdx),
    NoConflict,
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
struct DecisionLevel(usize);

impl DecisionLevel {
    fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug)]
struct Backtrack {
    level: DecisionLevel,
    // The index of the first trail entry to drop during the backtrack
    decision_index: usize,
}

impl Solver {
    pub fn new(formula: Formula) -> Self {
        let state = SolverState::new(formula.num_variables());
        Self {
            clauses: formula.into_clauses(),
            state,
        }
    }

    pub fn solve(&mut self) -> SatResult {
        if let BcpResult::Conflict(_) = self.bcp() {
            return SatResult::Unsatisfiable;
        }
        loop {
            self.state.decision_level = self.state.decision_level.next();
            match self.decide() {
                None => break SatResult::Satisfiable(self.model()),
                Some(literal) => {
                    self.state.assign(&literal, None);
                    while let BcpResult::Conflict(reason) = self.bcp() {
                        match self.analyze_conflict(reason) {
                            None => return SatResult::Unsatisfiable,
                            Some(backtrack) => self.backtrack(backtrack),
                        }
                    }
                }
            }
        }
    }

    // Invariant: called only when decide() found no undecided variable,
    // so every variable has a value.
    fn model(&self) -> Model {
        Model {
            values: self
                .state
                .variables
                .iter()
                .map(|v| v.assignment == Assignment::True)
                .collect(),
        }
    }

    fn bcp(&mut self) -> BcpResult {
        let mut did_work = true;
        while did_work {
            did_work = false;
            'clauses: for (idx, clause) in self.clauses.iter().enumerate() {
                let mut last_literal = None;
                'literals: for literal in clause.literals() {
                    match self.state.assignment_for(literal) {
                        // true => this clause is satisfied
                        Assignment::True => continue 'clauses,
                        // false => need to look at more literals, but we can't change the assignment
                        Assignment::False => continue 'literals,
                        // undecided => we'll be assigning this literal if it's the only undecided one
                        Assignment::Undecided => {
                            if last_literal.is_none() {
                                last_literal = Some(literal);
                            } else {
                                // Second undecided literal, can't resolve this clause
                                continue 'clauses;
                            }
                        }
                    }
                }
                // if last_literal is none, every literal was false => we have a conflict
                // otherwise we can apply unit resolution and continue
                match last_literal {
                    Some(literal) => self.state.assign(literal, Some(ClauseIdx(idx))),
                    None => return BcpResult::Conflict(ClauseIdx(idx)),
                }
                did_work = true;
            }
        }
        BcpResult::NoConflict
    }

    fn decide(&self) -> Option<Literal> {
        // Enumerate variables looking for one that's unassigned. Always
        // deciding positive is complete: analyze_conflict learns a clause
        // that reverses the decision if it was involved in a conflict.
        for (i, state) in self.state.variables.iter().enumerate() {
            if state.assignment == Assignment::Undecided {
                return Some(Literal::Positive(Variable(i)));
            }
        }
        None
    }

    // First-UIP conflict analysis. Learns a clause and returns where to
    // backtrack to, or None if the conflict is at level 0 (unsatisfiable).
    fn analyze_conflict(&mut self, reason: ClauseIdx) -> Option<Backtrack> {
        if self.state.decision_level == DecisionLevel(0) {
            return None;
        }

        let mut reason = &self.clauses[reason.0];
        let mut conflict_clause = vec![];
        let mut seen = vec![false; self.state.variables.len()];
        let mut frontier = 0;
        let mut trail_end = self.state.trail.len() - 1;
        let first_uip = loop {
            for l in reason.literals() {
                if seen[l.idx()] {
                    continue;
                }
                seen[l.idx()] = true;

                let var = &self.state.variables[l.idx()];
                if var.decision_level < self.state.decision_level {
                    conflict_clause.push(l.clone());
                } else {
                    debug_assert_eq!(var.decision_level, self.state.decision_level);
                    frontier += 1;
                }
            }

            let uip = loop {
                let v = self.state.trail[trail_end];
                let old_end = trail_end;
                trail_end = trail_end.saturating_sub(1);
                if seen[v.0] {
                    break v;
                }
                debug_assert_ne!(old_end, 0);
            };

            debug_assert_eq!(self.state.variables[uip.0].decision_level, self.state.decision_level);

            frontier -= 1;
            if frontier == 0 {
                break self.state.variables[uip.0].literal(uip);
            } else {
                let clause_idx = self.state.variables[uip.0]
                    .reason
                    .expect("uip should be an implied variable");
                reason = &self.clauses[clause_idx.0];
            }
        };
        conflict_clause.push(first_uip.negated());
        let max_decision_level = self.state.variables[first_uip.idx()].decision_level;

        let decision_level = conflict_clause
            .iter()
            .map(|l| self.state.variables[l.idx()].decision_level)
            .filter(|l| *l < max_decision_level)
            .max()
            .unwrap_or(DecisionLevel(0));
        let decision_index = self
            .state
            .trail
            .iter()
            .position(|v| self.state.variables[v.0].decision_level > decision_level)
            .unwrap_or_else(|| self.state.trail.len());

        let conflict_clause = Clause::new(conflict_clause);
        trace!(
            "conflict clause {}, backtrack to level {}",
            conflict_clause,
            decision_level.0
        );
        self.clauses.push(conflict_clause);

        Some(Backtrack {
            level: decision_level,
            decision_index,
        })
    }

    fn backtrack(&mut self, backtrack: Backtrack) {
        trace!(
            "backtrack: dropping to {} from {}",
            backtrack.decision_index,
            self.state.trail.len()
        );
        assert!(backtrack.decision_index < self.state.trail.len());
        let dropped = self.state.trail.split_off(backtrack.decision_index);
        for variable in &dropped {
            self.state.variables[variable.0].clear();
        }
        self.state.decision_level = backtrack.level;
    }
}
