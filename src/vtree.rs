//! Vtrees: binary trees over a circuit's variables that fix, for an SDD, the
//! variable order and the And-children's left/right split (spec.md §5).

use crate::lit::Var;
use std::collections::HashSet;
use std::rc::Rc;

/// An index into a [`Vtree`]'s linearized node sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VtreeId(u32);

impl VtreeId {
    pub(crate) fn new(index: usize) -> Self {
        VtreeId(u32::try_from(index).expect("vtree larger than u32::MAX nodes"))
    }

    /// The node's position in the vtree's linearized sequence.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A vtree node: either a single-variable leaf, or an inner node splitting
/// its scope between a left and right subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VtreeNode {
    /// A leaf over a single variable.
    Leaf(Var),
    /// An inner node over the union of its children's variables.
    Inner { left: VtreeId, right: VtreeId },
}

/// An immutable, linearized vtree: every node's children precede it in the
/// node sequence, mirroring [`crate::dag::Circuit`]'s layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vtree {
    nodes: Vec<VtreeNode>,
    parents: Vec<Option<VtreeId>>,
    scopes: Vec<Rc<HashSet<Var>>>,
    root: VtreeId,
}

impl Vtree {
    /// The number of nodes in the vtree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the vtree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The vtree's root node id.
    #[must_use]
    pub fn root(&self) -> VtreeId {
        self.root
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: VtreeId) -> &VtreeNode {
        &self.nodes[id.index()]
    }

    /// The node's parent, or `None` for the root.
    #[must_use]
    pub fn parent(&self, id: VtreeId) -> Option<VtreeId> {
        self.parents[id.index()]
    }

    /// Iterates node ids in linearized (children-before-parents) order.
    pub fn ids(&self) -> impl Iterator<Item = VtreeId> {
        (0..self.nodes.len()).map(VtreeId::new)
    }

    /// The variables in `id`'s subtree.
    #[must_use]
    pub fn scope(&self, id: VtreeId) -> &HashSet<Var> {
        &self.scopes[id.index()]
    }

    /// The number of variables in `id`'s subtree.
    #[must_use]
    pub fn var_count(&self, id: VtreeId) -> usize {
        self.scopes[id.index()].len()
    }

    /// Whether every variable in `vars` is in `id`'s subtree.
    #[must_use]
    pub fn varsubset(&self, vars: &HashSet<Var>, id: VtreeId) -> bool {
        vars.is_subset(self.scope(id))
    }

    /// Whether every variable in `vars` is in `id`'s left child's subtree.
    ///
    /// # Panics
    /// Panics if `id` is a leaf.
    #[must_use]
    pub fn varsubset_left(&self, vars: &HashSet<Var>, id: VtreeId) -> bool {
        match self.node(id) {
            VtreeNode::Inner { left, .. } => self.varsubset(vars, *left),
            VtreeNode::Leaf(_) => panic!("varsubset_left called on a leaf vtree node"),
        }
    }

    /// Whether every variable in `vars` is in `id`'s right child's subtree.
    ///
    /// # Panics
    /// Panics if `id` is a leaf.
    #[must_use]
    pub fn varsubset_right(&self, vars: &HashSet<Var>, id: VtreeId) -> bool {
        match self.node(id) {
            VtreeNode::Inner { right, .. } => self.varsubset(vars, *right),
            VtreeNode::Leaf(_) => panic!("varsubset_right called on a leaf vtree node"),
        }
    }

    /// Whether `id` lies within `ancestor`'s subtree (including `id ==
    /// ancestor`).
    #[must_use]
    pub fn is_descendant(&self, id: VtreeId, ancestor: VtreeId) -> bool {
        let mut cur = Some(id);
        while let Some(current) = cur {
            if current == ancestor {
                return true;
            }
            cur = self.parent(current);
        }
        false
    }

    /// The lowest common ancestor of `a` and `b` (spec.md §5 notes the
    /// original `#TODO replace by find_inner to be correct?` prototype;
    /// this walks genuine ancestor chains via parent back-pointers rather
    /// than approximating).
    #[must_use]
    pub fn parentlca(&self, a: VtreeId, b: VtreeId) -> VtreeId {
        let mut ancestors = HashSet::new();
        let mut cur = Some(a);
        while let Some(id) = cur {
            ancestors.insert(id);
            cur = self.parent(id);
        }
        let mut cur = Some(b);
        while let Some(id) = cur {
            if ancestors.contains(&id) {
                return id;
            }
            cur = self.parent(id);
        }
        unreachable!("a and b must share a root in the same vtree")
    }
}

/// Incrementally constructs a [`Vtree`], recording parent back-pointers and
/// each node's variable scope as it is built.
#[derive(Debug, Default)]
pub struct VtreeBuilder {
    nodes: Vec<VtreeNode>,
    parents: Vec<Option<VtreeId>>,
    scopes: Vec<Rc<HashSet<Var>>>,
}

impl VtreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a leaf over `var`.
    pub fn leaf(&mut self, var: Var) -> VtreeId {
        self.push(VtreeNode::Leaf(var), Rc::new(HashSet::from([var])))
    }

    /// Builds an inner node splitting its scope between `left` and `right`.
    /// Both must already have been built by this same builder.
    pub fn inner(&mut self, left: VtreeId, right: VtreeId) -> VtreeId {
        let mut scope = (*self.scopes[left.index()]).clone();
        scope.extend(self.scopes[right.index()].iter().copied());
        let id = self.push(VtreeNode::Inner { left, right }, Rc::new(scope));
        self.parents[left.index()] = Some(id);
        self.parents[right.index()] = Some(id);
        id
    }

    fn push(&mut self, node: VtreeNode, scope: Rc<HashSet<Var>>) -> VtreeId {
        let id = VtreeId::new(self.nodes.len());
        self.nodes.push(node);
        self.parents.push(None);
        self.scopes.push(scope);
        id
    }

    /// Finalizes the vtree with the given root.
    ///
    /// # Panics
    /// Panics if `root` was not built by this builder.
    #[must_use]
    pub fn finish(self, root: VtreeId) -> Vtree {
        assert!(root.index() < self.nodes.len(), "root must be a node built by this builder");
        Vtree { nodes: self.nodes, parents: self.parents, scopes: self.scopes, root }
    }
}
