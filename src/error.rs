//! Crate-wide error types.
//!
//! Follows the teacher's pattern of one flat `#[derive(Error, Debug)]` enum
//! per module boundary rather than a single monolithic error type: parsing
//! errors live in [`crate::format`], these are the errors surfaced by the
//! DAG and SDD layers themselves.

use crate::sdd::SddId;
use thiserror::Error;

/// Errors raised by the logical-DAG layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    /// A node's children did not all precede it in the node sequence.
    #[error("node {node} references child {child} which does not precede it")]
    NotLinearized { node: usize, child: usize },

    /// A parsed or rewritten circuit has more than one node for the same
    /// literal. Non-fatal: the circuit is still usable, callers decide
    /// whether to reject it.
    #[error("duplicate literal node for literal {0}")]
    StructuralViolation(String),

    /// An SDD-only operation was requested on a circuit or node that isn't
    /// part of an SDD structure.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

/// Result alias for the logical-DAG layer.
pub type CircuitResult<T> = Result<T, CircuitError>;

/// A fatal breach of an SDD invariant detected during canonicalization.
///
/// Spec marks this abort-worthy: unlike [`CircuitError::StructuralViolation`]
/// it is never silently tolerated, since it means the apply engine produced
/// a decision node whose elements do not partition ⊤.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalityViolation {
    /// Two elements of a decision node share a prime after compression
    /// should have merged them.
    #[error("decision elements at vtree node {vtree} have non-disjoint primes: {a:?} and {b:?}")]
    PrimesNotDisjoint {
        vtree: usize,
        a: (SddId, SddId),
        b: (SddId, SddId),
    },

    /// A decision node's primes do not disjoin to ⊤.
    #[error("decision at vtree node {vtree} has primes that do not partition the universe")]
    PrimesDoNotPartition { vtree: usize },

    /// Two elements of a decision node share a sub after the compress pass,
    /// which should be impossible.
    #[error("decision at vtree node {vtree} has duplicate subs after compression")]
    NotCompressed { vtree: usize },
}
