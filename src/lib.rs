//! circuitkit: hash-consed logical circuits, vtrees, and canonical SDDs.
//!
//! [`dag`] is the immutable logical-circuit DAG and the queries/rewrites/
//! evaluation built on its `foldup` traversal kernel. [`vtree`] is the
//! binary variable-order tree an SDD is built over. [`sdd`] is the
//! canonical, trimmed, compressed Sentential Decision Diagram
//! representation with its conjoin/disjoin apply engine. [`format`] is the
//! textual line-record contract (SDD, vtree, CNF/DNF, DOT) this crate's CLI
//! and fixtures read and write. [`config`] is the hierarchical runtime
//! configuration layer.

pub mod config;
pub mod dag;
pub mod error;
pub mod format;
pub mod lit;
pub mod sdd;
pub mod vtree;

pub use dag::{Circuit, CircuitBuilder, Node, NodeId};
pub use error::{CanonicalityViolation, CircuitError, CircuitResult};
pub use lit::{Lit, Var};
pub use sdd::{SddId, SddManager, SddNode};
pub use vtree::{Vtree, VtreeBuilder, VtreeId, VtreeNode};
