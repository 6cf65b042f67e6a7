//! The conjoin/disjoin apply engine (spec.md §6): case dispatch on how two
//! nodes' vtrees relate, followed by compress + trim to keep every decision
//! node canonical.

use super::{SddId, SddManager, SddNode};
use crate::vtree::{VtreeId, VtreeNode};

fn cache_key(x: SddId, y: SddId) -> (SddId, SddId) {
    if x.index() <= y.index() { (x, y) } else { (y, x) }
}

/// Conjoins `x` and `y`, returning the canonical node for `x AND y`.
///
/// # Panics
/// Panics if `x` or `y` was not produced by `mgr`.
#[must_use]
pub fn conjoin(mgr: &SddManager, x: SddId, y: SddId) -> SddId {
    if x == y {
        return x;
    }
    if mgr.is_false(x) || mgr.is_false(y) {
        return mgr.false_id();
    }
    if mgr.is_true(x) {
        return y;
    }
    if mgr.is_true(y) {
        return x;
    }

    let key = cache_key(x, y);
    if let Some(cached) = mgr.apply_cache_get(key) {
        return cached;
    }
    let result = conjoin_uncached(mgr, x, y);
    mgr.apply_cache_insert(key, result);
    result
}

/// Disjoins `x` and `y` via De Morgan over [`conjoin`]: `x OR y = NOT(NOT x
/// AND NOT y)`. A compressed decision's negation only flips its subs
/// (its primes stay, see [`SddManager::negate`]), so this reuses
/// `conjoin`'s case dispatch rather than duplicating it with an
/// Or-specific (and structurally trickier) element construction.
///
/// # Panics
/// Panics if `x` or `y` was not produced by `mgr`.
#[must_use]
pub fn disjoin(mgr: &SddManager, x: SddId, y: SddId) -> SddId {
    mgr.negate(conjoin(mgr, mgr.negate(x), mgr.negate(y)))
}

fn conjoin_uncached(mgr: &SddManager, x: SddId, y: SddId) -> SddId {
    if let (SddNode::Literal(lx), SddNode::Literal(ly)) = (mgr.node(x), mgr.node(y)) {
        if lx.var() == ly.var() {
            // x != y was already checked; same variable, different
            // polarity is the only remaining possibility.
            return mgr.false_id();
        }
    }

    let vx = mgr.node_vtree(x).expect("non-constant node must have a vtree");
    let vy = mgr.node_vtree(y).expect("non-constant node must have a vtree");

    if vx == vy {
        return cartesian(mgr, x, y, vx);
    }
    if mgr.tmgr().is_descendant(vy, vx) {
        return descend(mgr, x, y, vx);
    }
    if mgr.tmgr().is_descendant(vx, vy) {
        return descend(mgr, y, x, vy);
    }
    independent(mgr, x, y, vx, vy)
}

/// Both `x` and `y` are decision nodes at the same vtree node: combine
/// every pair of elements, dropping any whose conjoined prime is False.
fn cartesian(mgr: &SddManager, x: SddId, y: SddId, vtree: VtreeId) -> SddId {
    let ex = mgr.elements_of(x);
    let ey = mgr.elements_of(y);
    let mut raw = Vec::with_capacity(ex.len() * ey.len());
    for &(p1, s1) in &ex {
        for &(p2, s2) in &ey {
            let prime = conjoin(mgr, p1, p2);
            if mgr.is_false(prime) {
                continue;
            }
            let sub = conjoin(mgr, s1, s2);
            raw.push((prime, sub));
        }
    }
    canonicalize(mgr, vtree, raw)
}

/// `other`'s vtree is strictly inside `decision`'s vtree node `v`. Since
/// `decision`'s primes live on one side of `v` and its subs on the other,
/// and `other` lives entirely within one side, conjoining `other` into
/// that side distributes across every element without disturbing the
/// other side (decomposability is preserved because the two sides never
/// share variables).
///
/// When `other` is conjoined into the prime side, the existing elements'
/// primes only partition the part of the universe where `other` holds
/// (their union was ⊤ before, so after conjoining with `other` it's just
/// `other`). A trailing `(¬other, ⊥)` element, the same catch-all
/// `independent` appends, restores the "primes partition ⊤" invariant by
/// covering the `¬other` remainder. Conjoining into the sub side needs no
/// such element: the primes themselves are untouched, so they still
/// partition ⊤ on their own.
fn descend(mgr: &SddManager, decision: SddId, other: SddId, v: VtreeId) -> SddId {
    let elements = mgr.elements_of(decision);
    let (left, _right) = match mgr.tmgr().node(v) {
        VtreeNode::Inner { left, right } => (*left, *right),
        VtreeNode::Leaf(_) => unreachable!("a decision node's vtree is never a leaf"),
    };
    let other_vtree = mgr.node_vtree(other).expect("non-constant node must have a vtree");
    let other_on_left = other_vtree == left || mgr.tmgr().is_descendant(other_vtree, left);

    let mut new_elements: Vec<(SddId, SddId)> = elements
        .into_iter()
        .map(|(p, s)| {
            if other_on_left {
                (conjoin(mgr, p, other), s)
            } else {
                (p, conjoin(mgr, s, other))
            }
        })
        .collect();
    if other_on_left {
        new_elements.push((mgr.negate(other), mgr.false_id()));
    }
    canonicalize(mgr, v, new_elements)
}

/// Neither `vx` nor `vy` is an ancestor of the other: `x` and `y` live in
/// different branches of their lowest common ancestor. The conjunction is
/// the 2-element partition `[(left, right), (NOT left, False)]` at the
/// LCA, where `left`/`right` are whichever of `x`/`y` sits on that side.
fn independent(mgr: &SddManager, x: SddId, y: SddId, vx: VtreeId, vy: VtreeId) -> SddId {
    let lca = mgr.tmgr().parentlca(vx, vy);
    let left_child = match mgr.tmgr().node(lca) {
        VtreeNode::Inner { left, .. } => *left,
        VtreeNode::Leaf(_) => unreachable!("lca of two distinct vtree nodes is never a leaf"),
    };
    let x_on_left = vx == left_child || mgr.tmgr().is_descendant(vx, left_child);
    let (left_val, right_val) = if x_on_left { (x, y) } else { (y, x) };

    let elements = vec![(left_val, right_val), (mgr.negate(left_val), mgr.false_id())];
    canonicalize(mgr, lca, elements)
}

/// Compresses `elements` (merging elements that share a sub by disjoining
/// their primes) and trims the result (collapsing a single `(True, sub)`
/// element down to `sub`), then interns whatever remains.
pub(crate) fn canonicalize(mgr: &SddManager, vtree: VtreeId, elements: Vec<(SddId, SddId)>) -> SddId {
    let mut by_sub: Vec<(SddId, SddId)> = Vec::new();
    for (prime, sub) in elements {
        if mgr.is_false(prime) {
            continue;
        }
        if let Some(entry) = by_sub.iter_mut().find(|(s, _)| *s == sub) {
            entry.1 = disjoin(mgr, entry.1, prime);
        } else {
            by_sub.push((sub, prime));
        }
    }
    let mut compressed: Vec<(SddId, SddId)> = by_sub.into_iter().map(|(sub, prime)| (prime, sub)).collect();
    compressed.sort_by_key(|&(prime, sub)| (prime.index(), sub.index()));

    if compressed.is_empty() {
        return mgr.false_id();
    }
    if compressed.len() == 1 && mgr.is_true(compressed[0].0) {
        return compressed[0].1;
    }
    mgr.intern_decision(vtree, compressed)
}
