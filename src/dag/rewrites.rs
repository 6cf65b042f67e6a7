//! Circuit-to-circuit rewrites (spec.md §4.4): each produces a fresh,
//! freshly linearized [`Circuit`] through a [`CircuitBuilder`] rather than
//! mutating the input, so unchanged sub-DAGs are shared by node id and the
//! rewritten circuit can be idempotence-tested against the input via
//! structural `PartialEq`.

use super::fold::foldup_all;
use super::queries::variable_scopes;
use super::{Circuit, CircuitBuilder, Node, NodeId};
use crate::lit::{Lit, Var};

/// Builds an And node in `builder` over already-mapped children, collapsing
/// away True children and short-circuiting to False on any False child.
fn build_and(builder: &mut CircuitBuilder, children: Vec<NodeId>) -> NodeId {
    let mut kept = Vec::with_capacity(children.len());
    for child in children {
        match builder.node(child) {
            Node::Constant(false) => return builder.constant(false),
            Node::Constant(true) => {}
            _ => kept.push(child),
        }
    }
    match kept.len() {
        0 => builder.constant(true),
        1 => kept[0],
        _ => builder.and(kept),
    }
}

/// Builds an Or node in `builder` over already-mapped children, collapsing
/// away False children and short-circuiting to True on any True child.
fn build_or(builder: &mut CircuitBuilder, children: Vec<NodeId>) -> NodeId {
    let mut kept = Vec::with_capacity(children.len());
    for child in children {
        match builder.node(child) {
            Node::Constant(true) => return builder.constant(true),
            Node::Constant(false) => {}
            _ => kept.push(child),
        }
    }
    match kept.len() {
        0 => builder.constant(false),
        1 => kept[0],
        _ => builder.or(kept),
    }
}

/// Simplifies away constant leaves: an And with a False child collapses to
/// False, an Or with a True child collapses to True, and True/False
/// children are otherwise dropped from their parent's child list
/// (spec.md §4.4). Idempotent: re-running on the result is a no-op.
#[must_use]
pub fn propagate_constants(circuit: &Circuit) -> Circuit {
    let mut builder = CircuitBuilder::new();
    let mapped = foldup_all(
        circuit,
        |b| builder.constant(b),
        |lit| builder.literal(lit),
        |children, call| {
            let mapped: Vec<NodeId> = children.iter().map(|&c| call(c)).collect();
            build_and(&mut builder, mapped)
        },
        |children, call| {
            let mapped: Vec<NodeId> = children.iter().map(|&c| call(c)).collect();
            build_or(&mut builder, mapped)
        },
    );
    let root = mapped[circuit.root().index()];
    builder.finish(root).expect("rewrite preserves linearization")
}

/// Existentially quantifies out every variable for which `should_forget`
/// returns true, by replacing both polarities of its literal with the True
/// constant and then constant-propagating (spec.md §4.4). The result no
/// longer mentions the forgotten variables in its scope.
#[must_use]
pub fn forget(circuit: &Circuit, should_forget: impl Fn(Var) -> bool) -> Circuit {
    let mut builder = CircuitBuilder::new();
    let mapped = foldup_all(
        circuit,
        |b| builder.constant(b),
        |lit| {
            if should_forget(lit.var()) {
                builder.constant(true)
            } else {
                builder.literal(lit)
            }
        },
        |children, call| {
            let mapped: Vec<NodeId> = children.iter().map(|&c| call(c)).collect();
            build_and(&mut builder, mapped)
        },
        |children, call| {
            let mapped: Vec<NodeId> = children.iter().map(|&c| call(c)).collect();
            build_or(&mut builder, mapped)
        },
    );
    let root = mapped[circuit.root().index()];
    builder.finish(root).expect("rewrite preserves linearization")
}

/// Makes every Or node's children share its full variable scope, by
/// conjoining each child with a `v OR NOT v` tautology for every variable
/// `v` the child is missing relative to its siblings (spec.md §4.4).
///
/// Runs in two passes: first computing every node's *original* variable
/// scope (before any smoothing), then rebuilding bottom-up using those
/// original scopes to decide what each Or child is missing. Using the
/// pre-smoothing scopes (rather than the partially-smoothed scopes being
/// built up during the same pass) keeps the algorithm a direct reading of
/// "add back what a child structurally lacks", with no risk of a node's
/// own smoothing feeding back into its siblings' missing-variable
/// computation.
#[must_use]
pub fn smooth(circuit: &Circuit) -> Circuit {
    let original_scopes = variable_scopes(circuit);
    let mut builder = CircuitBuilder::new();
    let mapped = foldup_all(
        circuit,
        |b| builder.constant(b),
        |lit| builder.literal(lit),
        |children, call| {
            let mapped: Vec<NodeId> = children.iter().map(|&c| call(c)).collect();
            build_and(&mut builder, mapped)
        },
        |children, call| {
            let own_scope: std::collections::HashSet<Var> =
                children.iter().flat_map(|c| original_scopes[c.index()].iter().copied()).collect();
            let smoothed: Vec<NodeId> = children
                .iter()
                .map(|&c| {
                    let mapped_child = call(c);
                    let child_scope = &original_scopes[c.index()];
                    let missing: Vec<Var> = own_scope.difference(child_scope).copied().collect();
                    if missing.is_empty() {
                        return mapped_child;
                    }
                    let mut conjuncts = Vec::with_capacity(missing.len() + 1);
                    conjuncts.push(mapped_child);
                    for v in missing {
                        let pos = builder.literal(Lit::positive(v));
                        let neg = builder.literal(Lit::negative(v));
                        conjuncts.push(builder.or(vec![pos, neg]));
                    }
                    builder.and(conjuncts)
                })
                .collect();
            build_or(&mut builder, smoothed)
        },
    );
    let root = mapped[circuit.root().index()];
    builder.finish(root).expect("rewrite preserves linearization")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::queries::{is_smooth, variable_scope};

    #[test]
    fn propagate_constants_collapses_false_and() {
        let mut b = CircuitBuilder::new();
        let p1 = b.literal(Lit::positive(Var::new(1)));
        let f = b.constant(false);
        let and = b.and(vec![p1, f]);
        let circuit = b.finish(and).unwrap();
        let result = propagate_constants(&circuit);
        assert_eq!(result.node(result.root()), &Node::Constant(false));
    }

    #[test]
    fn propagate_constants_drops_true_or_child() {
        let mut b = CircuitBuilder::new();
        let p1 = b.literal(Lit::positive(Var::new(1)));
        let t = b.constant(true);
        let or = b.or(vec![p1, t]);
        let circuit = b.finish(or).unwrap();
        let result = propagate_constants(&circuit);
        assert_eq!(result.node(result.root()), &Node::Constant(true));
    }

    #[test]
    fn propagate_constants_is_idempotent() {
        let mut b = CircuitBuilder::new();
        let p1 = b.literal(Lit::positive(Var::new(1)));
        let p2 = b.literal(Lit::positive(Var::new(2)));
        let t = b.constant(true);
        let and = b.and(vec![p1, t]);
        let or = b.or(vec![and, p2]);
        let circuit = b.finish(or).unwrap();
        let once = propagate_constants(&circuit);
        let twice = propagate_constants(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn forget_removes_variable_from_scope() {
        let mut b = CircuitBuilder::new();
        let x1 = Var::new(1);
        let x2 = Var::new(2);
        let p1 = b.literal(Lit::positive(x1));
        let p2 = b.literal(Lit::positive(x2));
        let and = b.and(vec![p1, p2]);
        let circuit = b.finish(and).unwrap();

        let forgotten = forget(&circuit, |v| v == x1);
        let scope = variable_scope(&forgotten);
        assert!(!scope.contains(&x1));
        assert!(scope.contains(&x2));
    }

    #[test]
    fn smooth_makes_or_children_share_scope() {
        // OR(x1, x2) is not smooth: each disjunct is missing the other's variable.
        let mut b = CircuitBuilder::new();
        let x1 = Var::new(1);
        let x2 = Var::new(2);
        let p1 = b.literal(Lit::positive(x1));
        let p2 = b.literal(Lit::positive(x2));
        let or = b.or(vec![p1, p2]);
        let circuit = b.finish(or).unwrap();
        assert!(!is_smooth(&circuit));

        let smoothed = smooth(&circuit);
        assert!(is_smooth(&smoothed));
        assert_eq!(variable_scope(&smoothed), variable_scope(&circuit));
    }

    #[test]
    fn smooth_is_idempotent() {
        let mut b = CircuitBuilder::new();
        let x1 = Var::new(1);
        let x2 = Var::new(2);
        let p1 = b.literal(Lit::positive(x1));
        let p2 = b.literal(Lit::positive(x2));
        let or = b.or(vec![p1, p2]);
        let circuit = b.finish(or).unwrap();
        let once = smooth(&circuit);
        let twice = smooth(&once);
        assert_eq!(once, twice);
    }
}
