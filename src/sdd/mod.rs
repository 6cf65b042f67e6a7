//! Sentential Decision Diagrams (spec.md §6): canonical, trimmed, compressed
//! decision nodes over a fixed [`Vtree`], with per-vtree-node hash-consing so
//! that structural equality of ids implies semantic equality.

pub mod apply;

use crate::lit::{Lit, Var};
use crate::vtree::{Vtree, VtreeId, VtreeNode};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// An opaque handle into a [`SddManager`]'s node arena. Two ids compare
/// equal iff they were produced by the same `intern`-ing call, which for a
/// canonicalized node implies semantic equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SddId(u32);

impl SddId {
    /// The id's raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A canonical SDD node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SddNode {
    /// The constant True, not tied to any vtree node.
    True,
    /// The constant False, not tied to any vtree node.
    False,
    /// A literal, implicitly at the vtree leaf for its variable.
    Literal(Lit),
    /// A decision node at `vtree`: an X-partition of (prime, sub) pairs
    /// whose primes are pairwise disjoint and disjoin to True.
    Decision { vtree: VtreeId, elements: Vec<(SddId, SddId)> },
}

/// Owns a fixed [`Vtree`] plus every SDD node built against it: the node
/// arena, the per-vtree-node unique tables used for hash-consing decision
/// nodes, and the apply/negate memoization caches. `DashMap` backs each
/// table so a manager can be shared across worker threads without an outer
/// lock, mirroring the concurrent node-dag pattern used for large DAG
/// workloads.
pub struct SddManager {
    vtree: Vtree,
    var_to_leaf: HashMap<Var, VtreeId>,
    arena: DashMap<SddId, SddNode>,
    next_id: AtomicU32,
    literal_table: DashMap<Lit, SddId>,
    unique_tables: DashMap<VtreeId, DashMap<Vec<(SddId, SddId)>, SddId>>,
    apply_cache: DashMap<(SddId, SddId), SddId>,
    negate_cache: DashMap<SddId, SddId>,
}

impl SddManager {
    /// Creates a manager over `vtree`, seeding the arena with the True and
    /// False constants.
    #[must_use]
    pub fn new(vtree: Vtree) -> Self {
        let arena = DashMap::new();
        arena.insert(SddId(0), SddNode::True);
        arena.insert(SddId(1), SddNode::False);

        let mut var_to_leaf = HashMap::new();
        for id in vtree.ids() {
            if let VtreeNode::Leaf(var) = vtree.node(id) {
                var_to_leaf.insert(*var, id);
            }
        }

        SddManager {
            vtree,
            var_to_leaf,
            arena,
            next_id: AtomicU32::new(2),
            literal_table: DashMap::new(),
            unique_tables: DashMap::new(),
            apply_cache: DashMap::new(),
            negate_cache: DashMap::new(),
        }
    }

    /// The vtree this manager's nodes are built over.
    #[must_use]
    pub fn tmgr(&self) -> &Vtree {
        &self.vtree
    }

    /// The canonical True node id.
    #[must_use]
    pub fn true_id(&self) -> SddId {
        SddId(0)
    }

    /// The canonical False node id.
    #[must_use]
    pub fn false_id(&self) -> SddId {
        SddId(1)
    }

    /// Whether `id` is the True constant.
    #[must_use]
    pub fn is_true(&self, id: SddId) -> bool {
        id == self.true_id()
    }

    /// Whether `id` is the False constant.
    #[must_use]
    pub fn is_false(&self, id: SddId) -> bool {
        id == self.false_id()
    }

    /// Looks up a node's content by id.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this manager.
    #[must_use]
    pub fn node(&self, id: SddId) -> SddNode {
        self.arena.get(&id).expect("SddId not present in this manager's arena").clone()
    }

    /// The vtree node a node is rooted at: `None` for the True/False
    /// constants, the leaf for `var` for a literal, or the decision's own
    /// vtree field.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this manager.
    #[must_use]
    pub fn node_vtree(&self, id: SddId) -> Option<VtreeId> {
        match self.node(id) {
            SddNode::True | SddNode::False => None,
            SddNode::Literal(lit) => Some(self.var_to_leaf[&lit.var()]),
            SddNode::Decision { vtree, .. } => Some(vtree),
        }
    }

    /// A decision node's elements.
    ///
    /// # Panics
    /// Panics if `id` is not a decision node.
    #[must_use]
    pub fn elements_of(&self, id: SddId) -> Vec<(SddId, SddId)> {
        match self.node(id) {
            SddNode::Decision { elements, .. } => elements,
            _ => panic!("elements_of called on a non-decision SDD node"),
        }
    }

    /// Interns a literal, returning the existing node if this literal was
    /// already built.
    pub fn literal(&self, lit: Lit) -> SddId {
        if let Some(existing) = self.literal_table.get(&lit) {
            return *existing;
        }
        let id = self.fresh_id();
        self.arena.insert(id, SddNode::Literal(lit));
        self.literal_table.insert(lit, id);
        id
    }

    /// Interns a decision node at `vtree` over `elements`, returning the
    /// existing node if an equal element list was already built at this
    /// vtree node. `elements` must already be compressed and trimmed;
    /// [`apply::canonicalize`] is responsible for that before calling this.
    pub(crate) fn intern_decision(&self, vtree: VtreeId, elements: Vec<(SddId, SddId)>) -> SddId {
        let table = self.unique_tables.entry(vtree).or_insert_with(DashMap::new);
        if let Some(existing) = table.get(&elements) {
            return *existing;
        }
        let id = self.fresh_id();
        self.arena.insert(id, SddNode::Decision { vtree, elements: elements.clone() });
        table.insert(elements, id);
        id
    }

    fn fresh_id(&self) -> SddId {
        SddId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// The memoized complement of `id`, built via De Morgan: a decision
    /// node's negation keeps its primes and negates only its subs, which
    /// preserves the X-partition's disjointness and exhaustiveness without
    /// needing to re-run compress/trim.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this manager.
    pub fn negate(&self, id: SddId) -> SddId {
        if let Some(cached) = self.negate_cache.get(&id) {
            return *cached;
        }
        let result = match self.node(id) {
            SddNode::True => self.false_id(),
            SddNode::False => self.true_id(),
            SddNode::Literal(lit) => self.literal(lit.negate()),
            SddNode::Decision { vtree, elements } => {
                let negated: Vec<(SddId, SddId)> =
                    elements.into_iter().map(|(p, s)| (p, self.negate(s))).collect();
                self.intern_decision(vtree, negated)
            }
        };
        self.negate_cache.insert(id, result);
        result
    }

    pub(crate) fn apply_cache_get(&self, key: (SddId, SddId)) -> Option<SddId> {
        self.apply_cache.get(&key).map(|v| *v)
    }

    pub(crate) fn apply_cache_insert(&self, key: (SddId, SddId), value: SddId) {
        self.apply_cache.insert(key, value);
    }

    /// Walks every decision node reachable from `id`, checking that each
    /// one's primes are pairwise disjoint and disjoin to True. The apply
    /// engine is supposed to guarantee this by construction; this is a
    /// debugging aid for catching a bug in `conjoin`/`disjoin`/`canonicalize`
    /// rather than a check callers are expected to run routinely.
    ///
    /// # Errors
    /// Returns [`crate::error::CanonicalityViolation`] describing the first
    /// broken decision node found.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this manager.
    pub fn check_canonicity(&self, id: SddId) -> Result<(), crate::error::CanonicalityViolation> {
        use crate::error::CanonicalityViolation;

        let mut seen = std::collections::HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let SddNode::Decision { vtree, elements } = self.node(current) else {
                continue;
            };
            for i in 0..elements.len() {
                for j in (i + 1)..elements.len() {
                    let (pi, _) = elements[i];
                    let (pj, _) = elements[j];
                    if !self.is_false(apply::conjoin(self, pi, pj)) {
                        let violation = CanonicalityViolation::PrimesNotDisjoint { vtree: vtree.index(), a: elements[i], b: elements[j] };
                        tracing::error!(%violation, "canonicality_violation");
                        return Err(violation);
                    }
                }
            }
            let union = elements.iter().fold(self.false_id(), |acc, &(p, _)| apply::disjoin(self, acc, p));
            if !self.is_true(union) {
                let violation = CanonicalityViolation::PrimesDoNotPartition { vtree: vtree.index() };
                tracing::error!(%violation, "canonicality_violation");
                return Err(violation);
            }
            for &(prime, sub) in &elements {
                stack.push(prime);
                stack.push(sub);
            }
        }
        Ok(())
    }
}
