//! Structural queries over a [`Circuit`] (spec.md §4.2): variable scope,
//! decomposability, smoothness, exact satisfying-assignment probability,
//! model counting, and probabilistic-equivalence signatures.

use super::fold::{foldup_aggregate, foldup_aggregate_all};
use super::Circuit;
use crate::lit::Var;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Pow, Zero};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// A node or variable's variable scope: reference-counted so that unioning
/// scopes up a deep circuit is O(1) per fold step rather than re-copying a
/// growing set at every node.
pub type Scope = Rc<HashSet<Var>>;

fn union_scopes<'a>(scopes: impl Iterator<Item = &'a Scope>) -> Scope {
    let mut set = HashSet::new();
    for s in scopes {
        set.extend(s.iter().copied());
    }
    Rc::new(set)
}

/// Detects whether any variable appears in more than one of `scopes`,
/// i.e. whether `scopes` are *not* pairwise disjoint.
fn pairwise_disjoint(scopes: impl Iterator<Item = impl AsRef<HashSet<Var>>>) -> bool {
    let mut seen: HashSet<Var> = HashSet::new();
    for scope in scopes {
        for &v in scope.as_ref() {
            if !seen.insert(v) {
                return false;
            }
        }
    }
    true
}

/// The variable scope of every reachable node, indexed by [`super::NodeId`].
#[must_use]
pub fn variable_scopes(circuit: &Circuit) -> Vec<Scope> {
    foldup_aggregate_all(
        circuit,
        |_| Rc::new(HashSet::new()),
        |lit| Rc::new(HashSet::from([lit.var()])),
        |children: &[Scope]| union_scopes(children.iter()),
        |children: &[Scope]| union_scopes(children.iter()),
    )
}

/// The variable scope of the circuit's root.
#[must_use]
pub fn variable_scope(circuit: &Circuit) -> HashSet<Var> {
    (*variable_scopes(circuit)[circuit.root().index()]).clone()
}

#[derive(Clone)]
struct ScopeCheck {
    scope: Scope,
    ok: bool,
}

/// Whether every And node's children have pairwise-disjoint variable
/// scopes. A single violation anywhere in the circuit is "sticky": it
/// propagates to every ancestor (spec.md §4.2).
#[must_use]
pub fn is_decomposable(circuit: &Circuit) -> bool {
    let results = foldup_aggregate_all(
        circuit,
        |_| ScopeCheck { scope: Rc::new(HashSet::new()), ok: true },
        |lit| ScopeCheck { scope: Rc::new(HashSet::from([lit.var()])), ok: true },
        |children: &[ScopeCheck]| {
            let ok = children.iter().all(|c| c.ok)
                && pairwise_disjoint(children.iter().map(|c| c.scope.as_ref()));
            let scope = union_scopes(children.iter().map(|c| &c.scope));
            ScopeCheck { scope, ok }
        },
        |children: &[ScopeCheck]| {
            let ok = children.iter().all(|c| c.ok);
            let scope = union_scopes(children.iter().map(|c| &c.scope));
            ScopeCheck { scope, ok }
        },
    );
    results[circuit.root().index()].ok
}

/// Whether every Or node's children all share the Or's own variable scope.
#[must_use]
pub fn is_smooth(circuit: &Circuit) -> bool {
    let results = foldup_aggregate_all(
        circuit,
        |_| ScopeCheck { scope: Rc::new(HashSet::new()), ok: true },
        |lit| ScopeCheck { scope: Rc::new(HashSet::from([lit.var()])), ok: true },
        |children: &[ScopeCheck]| {
            let ok = children.iter().all(|c| c.ok);
            let scope = union_scopes(children.iter().map(|c| &c.scope));
            ScopeCheck { scope, ok }
        },
        |children: &[ScopeCheck]| {
            let scope = union_scopes(children.iter().map(|c| &c.scope));
            let ok = children.iter().all(|c| c.ok) && children.iter().all(|c| *c.scope == *scope);
            ScopeCheck { scope, ok }
        },
    );
    results[circuit.root().index()].ok
}

/// The uniform ½-probability prior used by [`sat_prob`]/[`model_count`] when
/// the caller supplies none.
#[must_use]
pub fn uniform_prior(_: Var) -> BigRational {
    BigRational::new(BigInt::one(), BigInt::from(2))
}

/// The exact probability that `circuit` is satisfied, under the independent
/// per-variable prior `prior`. And is product, Or is sum, a constant maps
/// to 0 or 1, and a literal maps to `p` or `1 - p`.
#[must_use]
pub fn sat_prob(circuit: &Circuit, prior: &dyn Fn(Var) -> BigRational) -> BigRational {
    foldup_aggregate(
        circuit,
        |b| if b { BigRational::one() } else { BigRational::zero() },
        |lit| {
            let p = prior(lit.var());
            if lit.is_positive() { p } else { BigRational::one() - p }
        },
        |children: &[BigRational]| {
            children.iter().fold(BigRational::one(), |acc, x| acc * x)
        },
        |children: &[BigRational]| {
            children.iter().fold(BigRational::zero(), |acc, x| acc + x)
        },
    )
}

/// `sat_prob(circuit) * 2^n`, where `n` defaults to `|variable_scope(circuit)|`
/// and may be supplied larger (spec.md §4.2).
#[must_use]
pub fn model_count(circuit: &Circuit, n: Option<u32>) -> BigInt {
    let num_vars = n.unwrap_or_else(|| u32::try_from(variable_scope(circuit).len()).unwrap_or(u32::MAX));
    let prob = sat_prob(circuit, &uniform_prior);
    let scale = BigRational::from_integer(Pow::pow(BigInt::from(2), num_vars));
    (prob * scale).to_integer()
}

/// The smallest prime spec.md §4.2 allows as the upper bound for
/// `prob_equiv_signature`'s uniform draws.
pub const MIN_SIGNATURE_PRIME: u64 = 7919;

/// Holds the per-run random state for [`prob_equiv_signature`]: each
/// variable's random vector is drawn once and memoized here, so repeated
/// calls against the same context (e.g. to compare two circuits) use
/// consistent per-variable vectors.
pub struct SignatureContext {
    k: usize,
    prime: u64,
    rng: RefCell<StdRng>,
    var_vectors: RefCell<HashMap<Var, Vec<BigRational>>>,
}

impl SignatureContext {
    /// Creates a context drawing `k`-length vectors with entries `1/u` for
    /// `u` uniform in `[1, prime]`. `prime` must be at least
    /// [`MIN_SIGNATURE_PRIME`]. `seed` fixes the RNG for reproducible runs;
    /// `None` seeds from the OS entropy source.
    ///
    /// # Panics
    /// Panics if `prime < MIN_SIGNATURE_PRIME`.
    #[must_use]
    pub fn new(k: usize, prime: u64, seed: Option<u64>) -> Self {
        assert!(prime >= MIN_SIGNATURE_PRIME, "signature prime must be >= {MIN_SIGNATURE_PRIME}");
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        SignatureContext { k, prime, rng: RefCell::new(rng), var_vectors: RefCell::new(HashMap::new()) }
    }

    fn fresh_vector(&self) -> Vec<BigRational> {
        let mut rng = self.rng.borrow_mut();
        (0..self.k)
            .map(|_| {
                let u = rng.gen_range(1..=self.prime);
                BigRational::new(BigInt::one(), BigInt::from(u))
            })
            .collect()
    }

    fn vector_for(&self, var: Var) -> Vec<BigRational> {
        if let Some(v) = self.var_vectors.borrow().get(&var) {
            return v.clone();
        }
        let v = self.fresh_vector();
        self.var_vectors.borrow_mut().insert(var, v.clone());
        v
    }
}

/// The result of [`prob_equiv_signature`]: each variable's random vector,
/// plus the propagated signature at every reachable node.
pub struct Signature {
    /// Each variable's random `(0,1]^k` vector.
    pub variables: HashMap<Var, Vec<BigRational>>,
    /// Each node's signature, indexed by [`super::NodeId`].
    pub nodes: Vec<Vec<BigRational>>,
}

/// Computes a probabilistic-equivalence signature for every node of
/// `circuit` under `ctx`: two semantically equivalent nodes (anywhere,
/// including across different circuits sharing a context) get equal
/// signatures with probability approaching 1 as `k` grows (spec.md §4.2).
#[must_use]
pub fn prob_equiv_signature(circuit: &Circuit, ctx: &SignatureContext) -> Signature {
    let k = ctx.k;
    let nodes = foldup_aggregate_all(
        circuit,
        |b| vec![if b { BigRational::one() } else { BigRational::zero() }; k],
        |lit| {
            let base = ctx.vector_for(lit.var());
            if lit.is_positive() {
                base
            } else {
                base.iter().map(|v| BigRational::one() - v).collect()
            }
        },
        |children: &[Vec<BigRational>]| {
            let mut acc = vec![BigRational::one(); k];
            for child in children {
                for (slot, value) in acc.iter_mut().zip(child) {
                    *slot = &*slot * value;
                }
            }
            acc
        },
        |children: &[Vec<BigRational>]| {
            let mut acc = vec![BigRational::zero(); k];
            for child in children {
                for (slot, value) in acc.iter_mut().zip(child) {
                    *slot = &*slot + value;
                }
            }
            acc
        },
    );
    let variables = ctx.var_vectors.borrow().clone();
    Signature { variables, nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::CircuitBuilder;
    use crate::lit::Lit;

    fn small_decomposable_smooth_circuit() -> Circuit {
        // (x1 AND x2) OR (NOT x1 AND x2)  — smooth (both disjuncts mention x1,x2)
        let mut b = CircuitBuilder::new();
        let x1 = Var::new(1);
        let x2 = Var::new(2);
        let p1 = b.literal(Lit::positive(x1));
        let n1 = b.literal(Lit::negative(x1));
        let p2 = b.literal(Lit::positive(x2));
        let and1 = b.and(vec![p1, p2]);
        let and2 = b.and(vec![n1, p2]);
        let or = b.or(vec![and1, and2]);
        b.finish(or).unwrap()
    }

    #[test]
    fn scope_union_through_and_or() {
        let c = small_decomposable_smooth_circuit();
        let scope = variable_scope(&c);
        assert_eq!(scope, HashSet::from([Var::new(1), Var::new(2)]));
    }

    #[test]
    fn decomposable_and_smooth_detection() {
        let c = small_decomposable_smooth_circuit();
        assert!(is_decomposable(&c));
        assert!(is_smooth(&c));
    }

    #[test]
    fn non_decomposable_and_is_detected() {
        // AND(x1, x1) shares a variable between children.
        let mut b = CircuitBuilder::new();
        let x1 = Var::new(1);
        let p1 = b.literal(Lit::positive(x1));
        let p1b = b.literal(Lit::positive(x1));
        assert_eq!(p1, p1b); // interned: same node
        // Force a non-decomposable shape using distinct wrapper ORs so the
        // two And children still reference the same variable.
        let x2 = Var::new(2);
        let p2 = b.literal(Lit::positive(x2));
        let or_a = b.or(vec![p1, p2]);
        let and = b.and(vec![p1, or_a]);
        let c = b.finish(and).unwrap();
        assert!(!is_decomposable(&c));
    }

    #[test]
    fn sat_prob_matches_hand_computation() {
        // x1 AND x2 under uniform ½ prior => ¼.
        let mut b = CircuitBuilder::new();
        let p1 = b.literal(Lit::positive(Var::new(1)));
        let p2 = b.literal(Lit::positive(Var::new(2)));
        let and = b.and(vec![p1, p2]);
        let c = b.finish(and).unwrap();
        let prob = sat_prob(&c, &uniform_prior);
        assert_eq!(prob, BigRational::new(BigInt::one(), BigInt::from(4)));
    }

    #[test]
    fn model_count_matches_brute_force() {
        let c = small_decomposable_smooth_circuit();
        let count = model_count(&c, None);
        // Brute force over {x1,x2} in {0,1}^2.
        let mut brute = 0u32;
        for x1 in [false, true] {
            for x2 in [false, true] {
                if (x1 && x2) || (!x1 && x2) {
                    brute += 1;
                }
            }
        }
        assert_eq!(count, BigInt::from(brute));
    }

    #[test]
    fn signature_is_stable_within_a_context() {
        let c = small_decomposable_smooth_circuit();
        let ctx = SignatureContext::new(4, MIN_SIGNATURE_PRIME, Some(42));
        let sig1 = prob_equiv_signature(&c, &ctx);
        let sig2 = prob_equiv_signature(&c, &ctx);
        assert_eq!(sig1.nodes, sig2.nodes);
    }
}
