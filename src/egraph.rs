use crate::term::Term;
use log::trace;
use std::collections::{BTreeSet, HashMap, VecDeque};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(usize);

/// One node per distinct term observed at construction time.
#[derive(Clone, Debug)]
struct ENode {
    term: Term,
    /// Child node ids, in argument order; empty for constants.
    args: Vec<NodeId>,
    /// Union-find parent pointer; initially self.
    find: NodeId,
    /// Nodes that have this node as a direct argument. Built once at
    /// construction; never re-derived after merges.
    parents: BTreeSet<NodeId>,
}

/// A term DAG annotated with union-find equivalence classes, used to
/// compute the congruence closure of a set of equalities.
///
/// The graph is built once from a snapshot of terms, mutated only by
/// merges, and discarded after the consistency check. The direct
/// congruence propagation in [`merge`](EGraph::merge) is quadratic in the
/// parents touched per merge; that is fine for the small formulas this is
/// meant for and is not built for large-scale use.
#[derive(Debug)]
pub struct EGraph {
    nodes: Vec<ENode>,
    term_to_id: HashMap<Term, NodeId>,
}

impl EGraph {
    /// Builds the DAG for `terms`. Terms are interned in non-decreasing
    /// nesting-depth order, so a node's arguments always exist before the
    /// node itself.
    pub fn new(terms: &[Term]) -> Self {
        let mut graph = EGraph {
            nodes: vec![],
            term_to_id: HashMap::new(),
        };
        let mut sorted: Vec<&Term> = terms.iter().collect();
        sorted.sort_by_key(|t| t.depth());
        for term in sorted {
            graph.intern(term);
        }
        graph
    }

    fn intern(&mut self, term: &Term) -> NodeId {
        if let Some(&id) = self.term_to_id.get(term) {
            return id;
        }
        let args: Vec<NodeId> = term.args().iter().map(|arg| self.intern(arg)).collect();
        let id = NodeId(self.nodes.len());
        self.nodes.push(ENode {
            term: term.clone(),
            args: args.clone(),
            find: id,
            parents: BTreeSet::new(),
        });
        self.term_to_id.insert(term.clone(), id);
        for arg in args {
            self.nodes[arg.0].parents.insert(id);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_id(&self, term: &Term) -> Option<NodeId> {
        self.term_to_id.get(term).copied()
    }

    /// The representative of `id`'s equivalence class, compressing the
    /// pointers visited along the way.
    pub fn find(&mut self, id: NodeId) -> NodeId {
        let mut root = id;
        while self.nodes[root.0].find != root {
            root = self.nodes[root.0].find;
        }
        let mut current = id;
        while current != root {
            let next = self.nodes[current.0].find;
            self.nodes[current.0].find = root;
            current = next;
        }
        root
    }

    /// Merges the class of `id1` into the class of `id2`: the second
    /// argument's root becomes the representative. No balancing; path
    /// compression in `find` keeps lookups cheap enough. This does not
    /// propagate congruence; use [`merge`](EGraph::merge) for that.
    pub fn union(&mut self, id1: NodeId, id2: NodeId) {
        let root1 = self.find(id1);
        let root2 = self.find(id2);
        if root1 != root2 {
            self.nodes[root1.0].find = root2;
        }
    }

    /// The direct parents of every node currently in `id`'s equivalence
    /// class. Scans all nodes, so O(n) per call.
    pub fn parents_of(&mut self, id: NodeId) -> BTreeSet<NodeId> {
        let root = self.find(id);
        let mut parents = BTreeSet::new();
        for i in 0..self.nodes.len() {
            if self.find(NodeId(i)) == root {
                parents.extend(self.nodes[i].parents.iter().copied());
            }
        }
        parents
    }

    /// True iff both nodes are applications of the same function symbol
    /// with the same arity and pairwise same-class arguments. Constants
    /// are never congruent to anything.
    pub fn congruent(&mut self, id1: NodeId, id2: NodeId) -> bool {
        if !self.nodes[id1.0].term.is_application() || !self.nodes[id2.0].term.is_application() {
            return false;
        }
        if self.nodes[id1.0].term.symbol() != self.nodes[id2.0].term.symbol() {
            return false;
        }
        let args1 = self.nodes[id1.0].args.clone();
        let args2 = self.nodes[id2.0].args.clone();
        if args1.len() != args2.len() {
            return false;
        }
        args1
            .iter()
            .zip(args2.iter())
            .all(|(&a1, &a2)| self.find(a1) == self.find(a2))
    }

    /// Merges the classes of `id1` and `id2` and propagates congruence to
    /// a fixpoint through a worklist of pending pairs. Each processed pair
    /// either is already unified or strictly reduces the number of
    /// classes, so the loop terminates after at most n-1 unions.
    pub fn merge(&mut self, id1: NodeId, id2: NodeId) {
        let mut pending = VecDeque::new();
        pending.push_back((id1, id2));

        while let Some((x, y)) = pending.pop_front() {
            if self.find(x) == self.find(y) {
                continue;
            }

            // Collect both parent sets before the union loses the classes.
            let mut parents = self.parents_of(x);
            parents.extend(self.parents_of(y));

            trace!(
                "merging {} into {}",
                self.nodes[x.0].term,
                self.nodes[y.0].term
            );
            self.union(x, y);

            let parents: Vec<NodeId> = parents.into_iter().collect();
            for i in 0..parents.len() {
                for j in (i + 1)..parents.len() {
                    let (p1, p2) = (parents[i], parents[j]);
                    if self.find(p1) != self.find(p2) && self.congruent(p1, p2) {
                        pending.push_back((p1, p2));
                    }
                }
            }
        }
    }

    /// Merges each equality's two sides. Pairs whose sides are not
    /// registered terms are skipped.
    pub fn merge_equalities(&mut self, equalities: &[(Term, Term)]) {
        for (lhs, rhs) in equalities {
            match (self.node_id(lhs), self.node_id(rhs)) {
                (Some(id1), Some(id2)) => self.merge(id1, id2),
                _ => trace!("ignoring equality over unregistered terms: {} = {}", lhs, rhs),
            }
        }
    }

    /// True iff no disequality's two sides have collapsed into one class.
    /// Must be called after all equalities have been merged; the result is
    /// meaningless otherwise. Pairs whose sides are not registered terms
    /// are skipped.
    pub fn check_consistency(&mut self, inequalities: &[(Term, Term)]) -> bool {
        for (lhs, rhs) in inequalities {
            match (self.node_id(lhs), self.node_id(rhs)) {
                (Some(id1), Some(id2)) => {
                    if self.find(id1) == self.find(id2) {
                        trace!("disequality violated: {} != {}", lhs, rhs);
                        return false;
                    }
                }
                _ => trace!("ignoring disequality over unregistered terms: {} != {}", lhs, rhs),
            }
        }
        true
    }

    /// True iff both terms are registered and currently in the same
    /// equivalence class.
    pub fn in_same_class(&mut self, t1: &Term, t2: &Term) -> bool {
        match (self.node_id(t1), self.node_id(t2)) {
            (Some(id1), Some(id2)) => self.find(id1) == self.find(id2),
            _ => false,
        }
    }

    /// The current partition as a list of term classes, ordered by the
    /// representative's id.
    pub fn classes(&mut self) -> Vec<Vec<Term>> {
        let mut by_root: HashMap<NodeId, Vec<Term>> = HashMap::new();
        for i in 0..self.nodes.len() {
            let root = self.find(NodeId(i));
            by_root.entry(root).or_default().push(self.nodes[i].term.clone());
        }
        let mut roots: Vec<NodeId> = by_root.keys().copied().collect();
        roots.sort();
        roots.into_iter().map(|r| by_root.remove(&r).unwrap()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consts(names: &[&str]) -> Vec<Term> {
        names.iter().map(|name| Term::constant(*name)).collect()
    }

    #[test]
    fn build_interns_each_term_once() {
        let a = Term::constant("a");
        let fa = Term::apply("f", vec![a.clone()]);
        // a appears standalone and inside f(a)
        let graph = EGraph::new(&[a.clone(), fa.clone(), a.clone()]);
        assert_eq!(graph.len(), 2);
        assert!(graph.node_id(&a).is_some());
        assert!(graph.node_id(&fa).is_some());
    }

    #[test]
    fn build_creates_arguments_before_applications() {
        let a = Term::constant("a");
        let b = Term::constant("b");
        let gab = Term::apply("g", vec![a.clone(), b.clone()]);
        // only the application is listed; its arguments get nodes anyway
        let graph = EGraph::new(&[gab.clone()]);
        assert_eq!(graph.len(), 3);
        let ida = graph.node_id(&a).unwrap();
        let idb = graph.node_id(&b).unwrap();
        let idg = graph.node_id(&gab).unwrap();
        assert!(ida < idg);
        assert!(idb < idg);
    }

    #[test]
    fn find_compresses_paths() {
        let ts = consts(&["a", "b", "c"]);
        let mut graph = EGraph::new(&ts);
        let ids: Vec<NodeId> = ts.iter().map(|t| graph.node_id(t).unwrap()).collect();

        graph.merge(ids[0], ids[1]);
        graph.merge(ids[1], ids[2]);

        let root = graph.find(ids[0]);
        assert_eq!(root, graph.find(ids[1]));
        assert_eq!(root, graph.find(ids[2]));
        // merge-right bias: the last merge target's root wins
        assert_eq!(root, ids[2]);
    }

    #[test]
    fn constants_are_never_congruent() {
        let ts = consts(&["a", "b"]);
        let mut graph = EGraph::new(&ts);
        let ida = graph.node_id(&ts[0]).unwrap();
        let idb = graph.node_id(&ts[1]).unwrap();
        graph.merge(ida, idb);
        // same class, but congruence is about applications only
        assert!(!graph.congruent(ida, idb));
        assert!(!graph.congruent(ida, ida));
    }

    #[test]
    fn congruence_propagates_through_parents() {
        let a = Term::constant("a");
        let b = Term::constant("b");
        let c = Term::constant("c");
        let d = Term::constant("d");
        let fab = Term::apply("f", vec![a.clone(), b.clone()]);
        let fcd = Term::apply("f", vec![c.clone(), d.clone()]);

        let mut graph = EGraph::new(&[fab.clone(), fcd.clone()]);
        graph.merge_equalities(&[(a.clone(), c.clone()), (b.clone(), d.clone())]);

        // no equality between the applications was asserted directly
        assert!(graph.in_same_class(&fab, &fcd));
    }

    #[test]
    fn congruence_propagates_upward_through_nesting() {
        let a = Term::constant("a");
        let b = Term::constant("b");
        let fa = Term::apply("f", vec![a.clone()]);
        let fb = Term::apply("f", vec![b.clone()]);
        let ffa = Term::apply("f", vec![fa.clone()]);
        let ffb = Term::apply("f", vec![fb.clone()]);

        let mut graph = EGraph::new(&[ffa.clone(), ffb.clone()]);
        graph.merge_equalities(&[(a.clone(), b.clone())]);

        assert!(graph.in_same_class(&fa, &fb));
        assert!(graph.in_same_class(&ffa, &ffb));
    }

    #[test]
    fn different_symbols_do_not_propagate() {
        let a = Term::constant("a");
        let b = Term::constant("b");
        let fa = Term::apply("f", vec![a.clone()]);
        let gb = Term::apply("g", vec![b.clone()]);

        let mut graph = EGraph::new(&[fa.clone(), gb.clone()]);
        graph.merge_equalities(&[(a.clone(), b.clone())]);

        assert!(!graph.in_same_class(&fa, &gb));
    }

    #[test]
    fn merge_is_idempotent() {
        let ts = consts(&["a", "b", "c"]);
        let mut graph = EGraph::new(&ts);
        let ida = graph.node_id(&ts[0]).unwrap();
        let idb = graph.node_id(&ts[1]).unwrap();

        graph.merge(ida, idb);
        let before = graph.classes();
        graph.merge(ida, idb);
        graph.merge(idb, ida);
        assert_eq!(graph.classes(), before);
    }

    #[test]
    fn parents_cover_the_whole_class() {
        let a = Term::constant("a");
        let b = Term::constant("b");
        let fa = Term::apply("f", vec![a.clone()]);
        let gb = Term::apply("g", vec![b.clone()]);

        let mut graph = EGraph::new(&[fa.clone(), gb.clone()]);
        let ida = graph.node_id(&a).unwrap();
        let idb = graph.node_id(&b).unwrap();
        graph.merge(ida, idb);

        // after merging a and b, the class's parents are both f(a) and g(b)
        let parents = graph.parents_of(ida);
        assert_eq!(parents.len(), 2);
        assert!(parents.contains(&graph.node_id(&fa).unwrap()));
        assert!(parents.contains(&graph.node_id(&gb).unwrap()));
    }

    #[test]
    fn unregistered_terms_are_skipped() {
        let ts = consts(&["a", "b"]);
        let mut graph = EGraph::new(&ts);
        let unknown = Term::constant("z");

        graph.merge_equalities(&[(ts[0].clone(), unknown.clone())]);
        assert_eq!(graph.classes().len(), 2);

        // a skipped disequality can't make the graph inconsistent
        assert!(graph.check_consistency(&[(unknown.clone(), unknown.clone())]));
    }

    #[test]
    fn consistency_check() {
        let ts = consts(&["a", "b", "c"]);
        let mut graph = EGraph::new(&ts);
        graph.merge_equalities(&[(ts[0].clone(), ts[1].clone())]);

        assert!(graph.check_consistency(&[(ts[0].clone(), ts[2].clone())]));
        assert!(!graph.check_consistency(&[(ts[0].clone(), ts[1].clone())]));
    }

    #[test]
    fn classes_partition_the_nodes() {
        let ts = consts(&["a", "b", "c", "d"]);
        let mut graph = EGraph::new(&ts);
        graph.merge_equalities(&[(ts[0].clone(), ts[1].clone()), (ts[2].clone(), ts[3].clone())]);

        let classes = graph.classes();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes.iter().map(Vec::len).sum::<usize>(), 4);
    }
}
