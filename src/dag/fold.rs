//! The `foldup`/`foldup_aggregate` traversal kernel (spec.md §4.1).
//!
//! Because a [`Circuit`] is already linearized (every node's children
//! precede it in the node sequence), a single forward pass over the node
//! sequence already visits children before parents, exactly once — there is
//! no need for an explicit recursive descent or work stack to *discover*
//! traversal order. This sidesteps the native-stack-depth concern spec.md
//! §9 raises for deep circuits entirely, rather than working around it with
//! an explicit stack: the "stack" is simply the node sequence itself.

use super::{Circuit, Node, NodeId};
use crate::lit::Lit;

/// Runs a bottom-up fold where each inner-node visitor receives a lookup
/// closure for already-computed child results, and returns the per-node
/// memo table indexed by [`NodeId`].
pub fn foldup_all<T, FC, FL, FA, FO>(
    circuit: &Circuit,
    mut f_const: FC,
    mut f_lit: FL,
    mut f_and: FA,
    mut f_or: FO,
) -> Vec<T>
where
    T: Clone,
    FC: FnMut(bool) -> T,
    FL: FnMut(Lit) -> T,
    FA: FnMut(&[NodeId], &dyn Fn(NodeId) -> T) -> T,
    FO: FnMut(&[NodeId], &dyn Fn(NodeId) -> T) -> T,
{
    let mut memo: Vec<Option<T>> = vec![None; circuit.len()];
    for id in circuit.ids() {
        let value = match circuit.node(id) {
            Node::Constant(b) => f_const(*b),
            Node::Literal(l) => f_lit(*l),
            Node::And(children) => {
                let lookup = |c: NodeId| {
                    memo[c.index()]
                        .clone()
                        .expect("children precede parents in a linearized circuit")
                };
                f_and(children, &lookup)
            }
            Node::Or(children) => {
                let lookup = |c: NodeId| {
                    memo[c.index()]
                        .clone()
                        .expect("children precede parents in a linearized circuit")
                };
                f_or(children, &lookup)
            }
        };
        memo[id.index()] = Some(value);
    }
    memo.into_iter()
        .map(|v| v.expect("every node is visited exactly once"))
        .collect()
}

/// [`foldup_all`], returning only the result at the circuit's root.
pub fn foldup<T, FC, FL, FA, FO>(circuit: &Circuit, f_const: FC, f_lit: FL, f_and: FA, f_or: FO) -> T
where
    T: Clone,
    FC: FnMut(bool) -> T,
    FL: FnMut(Lit) -> T,
    FA: FnMut(&[NodeId], &dyn Fn(NodeId) -> T) -> T,
    FO: FnMut(&[NodeId], &dyn Fn(NodeId) -> T) -> T,
{
    let all = foldup_all(circuit, f_const, f_lit, f_and, f_or);
    all[circuit.root().index()].clone()
}

/// Like [`foldup_all`], but inner-node visitors receive the already
/// materialized ordered sequence of child results rather than a lookup
/// closure.
pub fn foldup_aggregate_all<T, FC, FL, FA, FO>(
    circuit: &Circuit,
    f_const: FC,
    f_lit: FL,
    mut f_and: FA,
    mut f_or: FO,
) -> Vec<T>
where
    T: Clone,
    FC: FnMut(bool) -> T,
    FL: FnMut(Lit) -> T,
    FA: FnMut(&[T]) -> T,
    FO: FnMut(&[T]) -> T,
{
    foldup_all(
        circuit,
        f_const,
        f_lit,
        |children, call| {
            let values: Vec<T> = children.iter().map(|&c| call(c)).collect();
            f_and(&values)
        },
        |children, call| {
            let values: Vec<T> = children.iter().map(|&c| call(c)).collect();
            f_or(&values)
        },
    )
}

/// [`foldup_aggregate_all`], returning only the result at the circuit's root.
pub fn foldup_aggregate<T, FC, FL, FA, FO>(
    circuit: &Circuit,
    f_const: FC,
    f_lit: FL,
    f_and: FA,
    f_or: FO,
) -> T
where
    T: Clone,
    FC: FnMut(bool) -> T,
    FL: FnMut(Lit) -> T,
    FA: FnMut(&[T]) -> T,
    FO: FnMut(&[T]) -> T,
{
    let all = foldup_aggregate_all(circuit, f_const, f_lit, f_and, f_or);
    all[circuit.root().index()].clone()
}
