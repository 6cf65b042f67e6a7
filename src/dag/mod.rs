//! The immutable logical-circuit DAG: tagged And/Or/Literal/Constant nodes,
//! linearized children-before-parents, plus the `foldup`/`foldup_aggregate`
//! traversal kernel every query and rewrite is built from.

pub mod evaluate;
pub mod fold;
pub mod queries;
pub mod rewrites;

use crate::error::{CircuitError, CircuitResult};
use crate::lit::Lit;
use std::collections::HashMap;

/// An index into a [`Circuit`]'s node sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(u32::try_from(index).expect("circuit larger than u32::MAX nodes"))
    }

    /// The node's position in the circuit's linearized sequence.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A tagged logical-DAG node. And/Or children are stored in construction
/// order, which is structurally significant for canonicalization of a
/// circuit but set-equivalent for its semantics (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A Boolean constant leaf.
    Constant(bool),
    /// A literal leaf.
    Literal(Lit),
    /// A conjunction over an ordered, non-empty sequence of children.
    And(Vec<NodeId>),
    /// A disjunction over an ordered, non-empty sequence of children.
    Or(Vec<NodeId>),
}

/// An immutable, linearized logical-circuit DAG: every node's children
/// precede it in `nodes`, and the final reachable node from `root` is the
/// circuit's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Circuit {
    /// The number of nodes in the circuit.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the circuit has no nodes (only possible for a circuit that
    /// was never given a root, which [`CircuitBuilder::finish`] rejects).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The circuit's root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Iterates node ids in linearized (children-before-parents) order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Checks the "at most one node per literal value" invariant. Violations
    /// are non-fatal per spec.md §7: this is a query, not a constructor
    /// precondition.
    #[must_use]
    pub fn has_unique_literal_nodes(&self) -> bool {
        let mut seen = HashMap::new();
        for id in self.ids() {
            if let Node::Literal(lit) = self.node(id) {
                if seen.insert(*lit, id).is_some() {
                    return false;
                }
            }
        }
        true
    }

    /// Checks the "at most one True node and one False node" invariant.
    #[must_use]
    pub fn has_unique_constant_nodes(&self) -> bool {
        let (mut seen_true, mut seen_false) = (false, false);
        for id in self.ids() {
            if let Node::Constant(value) = self.node(id) {
                let seen = if *value { &mut seen_true } else { &mut seen_false };
                if *seen {
                    return false;
                }
                *seen = true;
            }
        }
        true
    }

    /// Hard-fails where [`Circuit::has_unique_literal_nodes`]/
    /// [`Circuit::has_unique_constant_nodes`] merely report: for callers
    /// that want a violation treated as an error rather than a query they
    /// can choose to ignore.
    ///
    /// # Errors
    /// Returns [`CircuitError::StructuralViolation`] naming whichever
    /// uniqueness invariant is broken.
    pub fn validate_structure(&self) -> CircuitResult<()> {
        if !self.has_unique_literal_nodes() {
            return Err(CircuitError::StructuralViolation("duplicate literal node".to_string()));
        }
        if !self.has_unique_constant_nodes() {
            return Err(CircuitError::StructuralViolation("duplicate constant node".to_string()));
        }
        Ok(())
    }

    /// Checks that every `Or` node's children are 2-ary `And` nodes, the
    /// decision-element shape the SDD text format's `compile`/`serialize`
    /// pair assumes (spec.md §4.6).
    ///
    /// # Errors
    /// Returns [`CircuitError::Unsupported`] naming the first node whose
    /// children don't fit that shape.
    pub fn validate_sdd_shape(&self) -> CircuitResult<()> {
        for id in self.ids() {
            if let Node::Or(children) = self.node(id) {
                for &child in children {
                    match self.node(child) {
                        Node::And(pair) if pair.len() == 2 => {}
                        _ => {
                            return Err(CircuitError::Unsupported(format!(
                                "node {}'s child {} is not a 2-ary And, not a decision shape",
                                id.index(),
                                child.index()
                            )))
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Incrementally constructs a [`Circuit`], hash-consing constant and literal
/// leaves so that at most one node exists per value (spec.md §3, §9).
/// And/Or nodes are not hash-consed: their order is structurally significant
/// and rewrites intentionally produce fresh nodes sharing unchanged
/// sub-DAGs through child ids, not through And/Or deduplication.
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    nodes: Vec<Node>,
    constants: [Option<NodeId>; 2],
    literals: HashMap<Lit, NodeId>,
}

impl CircuitBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a constant leaf, returning the existing node if one was
    /// already built for this value.
    pub fn constant(&mut self, value: bool) -> NodeId {
        let slot = usize::from(value);
        if let Some(id) = self.constants[slot] {
            return id;
        }
        let id = self.push(Node::Constant(value));
        self.constants[slot] = Some(id);
        id
    }

    /// Interns a literal leaf, returning the existing node if one was
    /// already built for this literal.
    pub fn literal(&mut self, lit: Lit) -> NodeId {
        if let Some(&id) = self.literals.get(&lit) {
            return id;
        }
        let id = self.push(Node::Literal(lit));
        self.literals.insert(lit, id);
        id
    }

    /// Builds a conjunction. `children` must already have been built by this
    /// same builder, which is guaranteed by the type (`NodeId`s can only
    /// come from this builder's own `push`).
    ///
    /// # Panics
    /// Panics if `children` is empty: a nullary And has no natural
    /// representation other than the True constant, which callers should
    /// build directly when they intend it.
    pub fn and(&mut self, children: Vec<NodeId>) -> NodeId {
        assert!(!children.is_empty(), "And requires at least one child");
        self.push(Node::And(children))
    }

    /// Builds a disjunction. See [`CircuitBuilder::and`] for the emptiness
    /// panic rationale (mirrored here for Or/False).
    pub fn or(&mut self, children: Vec<NodeId>) -> NodeId {
        assert!(!children.is_empty(), "Or requires at least one child");
        self.push(Node::Or(children))
    }

    /// Reads back a node already built in this builder, e.g. to inspect
    /// whether a mapped child collapsed to a constant during a rewrite.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Finalizes the circuit with the given root, checking the linearization
    /// invariant (every node's children precede it in the sequence) and the
    /// implied reachability (the root must itself be a valid node id).
    ///
    /// # Errors
    /// Returns [`CircuitError::NotLinearized`] if any And/Or node's child id
    /// is not strictly less than the node's own index. This can only happen
    /// if a caller fabricates `NodeId`s outside the builder; ordinary use
    /// through [`CircuitBuilder::and`]/[`CircuitBuilder::or`] cannot trigger
    /// it, since every `NodeId` handed to those methods was returned by an
    /// earlier call on this same builder.
    pub fn finish(self, root: NodeId) -> CircuitResult<Circuit> {
        for (index, node) in self.nodes.iter().enumerate() {
            let children: &[NodeId] = match node {
                Node::And(c) | Node::Or(c) => c,
                Node::Constant(_) | Node::Literal(_) => &[],
            };
            for &child in children {
                if child.index() >= index {
                    return Err(CircuitError::NotLinearized { node: index, child: child.index() });
                }
            }
        }
        assert!(root.index() < self.nodes.len(), "root must be a node built by this builder");
        Ok(Circuit { nodes: self.nodes, root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::Var;

    #[test]
    fn literal_and_constant_interning() {
        let mut b = CircuitBuilder::new();
        let v1 = Var::new(1);
        let l1a = b.literal(Lit::positive(v1));
        let l1b = b.literal(Lit::positive(v1));
        assert_eq!(l1a, l1b);
        let t1 = b.constant(true);
        let t2 = b.constant(true);
        assert_eq!(t1, t2);
        let f1 = b.constant(false);
        assert_ne!(t1, f1);
    }

    #[test]
    fn finish_detects_forward_reference() {
        // Constructing a NodeId out of thin air to simulate misuse.
        let mut b = CircuitBuilder::new();
        let lit = b.literal(Lit::positive(Var::new(1)));
        let forward = NodeId::new(lit.index() + 5);
        let and = b.push(Node::And(vec![forward]));
        let result = b.finish(and);
        assert!(matches!(result, Err(CircuitError::NotLinearized { .. })));
    }

    #[test]
    fn unique_node_checks() {
        let mut b = CircuitBuilder::new();
        let l1 = b.literal(Lit::positive(Var::new(1)));
        let l2 = b.literal(Lit::negative(Var::new(1)));
        let and = b.and(vec![l1, l2]);
        let circuit = b.finish(and).unwrap();
        assert!(circuit.has_unique_literal_nodes());
        assert!(circuit.has_unique_constant_nodes());
        assert!(circuit.validate_structure().is_ok());
    }

    #[test]
    fn validate_structure_rejects_a_duplicate_literal_node() {
        // Bypassing the builder's own interning to simulate a hand-built
        // circuit that violates the uniqueness invariant.
        let mut b = CircuitBuilder::new();
        let l1 = b.push(Node::Literal(Lit::positive(Var::new(1))));
        let l2 = b.push(Node::Literal(Lit::positive(Var::new(1))));
        let and = b.and(vec![l1, l2]);
        let circuit = b.finish(and).unwrap();
        assert!(!circuit.has_unique_literal_nodes());
        assert!(matches!(circuit.validate_structure(), Err(CircuitError::StructuralViolation(_))));
    }

    #[test]
    fn validate_sdd_shape_accepts_decision_shaped_or_of_and_pairs() {
        let mut b = CircuitBuilder::new();
        let l1 = b.literal(Lit::positive(Var::new(1)));
        let l2 = b.literal(Lit::positive(Var::new(2)));
        let and = b.and(vec![l1, l2]);
        let or = b.or(vec![and]);
        let circuit = b.finish(or).unwrap();
        assert!(circuit.validate_sdd_shape().is_ok());
    }

    #[test]
    fn validate_sdd_shape_rejects_an_or_child_that_is_not_a_pair() {
        let mut b = CircuitBuilder::new();
        let l1 = b.literal(Lit::positive(Var::new(1)));
        let l2 = b.literal(Lit::positive(Var::new(2)));
        let l3 = b.literal(Lit::positive(Var::new(3)));
        let and = b.and(vec![l1, l2, l3]);
        let or = b.or(vec![and]);
        let circuit = b.finish(or).unwrap();
        assert!(matches!(circuit.validate_sdd_shape(), Err(CircuitError::Unsupported(_))));
    }
}
