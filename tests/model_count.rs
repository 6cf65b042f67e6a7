//! Exact model counting and satisfaction probability, including their
//! interaction with `forget` and a non-decomposable circuit.

use circuitkit::dag::queries::{model_count, prob_equiv_signature, sat_prob, uniform_prior, SignatureContext};
use circuitkit::dag::rewrites::forget;
use circuitkit::lit::{Lit, Var};
use circuitkit::CircuitBuilder;
use num_bigint::BigInt;
use num_rational::BigRational;

fn xor_like_circuit() -> circuitkit::Circuit {
    // (x1 AND x2) OR (NOT x1 AND NOT x2): true for 2 of the 4 assignments.
    let mut b = CircuitBuilder::new();
    let x1 = Var::new(1);
    let x2 = Var::new(2);
    let both = b.and(vec![b.literal(Lit::positive(x1)), b.literal(Lit::positive(x2))]);
    let neither = b.and(vec![b.literal(Lit::negative(x1)), b.literal(Lit::negative(x2))]);
    let or = b.or(vec![both, neither]);
    b.finish(or).unwrap()
}

#[test]
fn model_count_matches_hand_enumeration() {
    let circuit = xor_like_circuit();
    assert_eq!(model_count(&circuit, Some(2)), BigInt::from(2));
}

#[test]
fn sat_prob_under_uniform_prior_matches_model_count_over_total() {
    let circuit = xor_like_circuit();
    let prob = sat_prob(&circuit, &uniform_prior);
    assert_eq!(prob, BigRational::new(BigInt::from(1), BigInt::from(2)));
}

#[test]
fn forgetting_a_variable_can_only_grow_or_preserve_model_count() {
    let circuit = xor_like_circuit();
    let before = model_count(&circuit, Some(2));
    let x1 = Var::new(1);
    let forgotten = forget(&circuit, |v| v == x1);
    let after = model_count(&forgotten, Some(1));
    assert!(after >= before);
}

#[test]
fn single_literal_has_half_of_all_models() {
    let mut b = CircuitBuilder::new();
    let x1 = Var::new(1);
    let lit = b.literal(Lit::positive(x1));
    let circuit = b.finish(lit).unwrap();
    assert_eq!(model_count(&circuit, Some(1)), BigInt::from(1));
    assert_eq!(model_count(&circuit, Some(3)), BigInt::from(4));
}

#[test]
fn prob_equiv_signature_matches_for_semantically_equal_circuits() {
    let a = xor_like_circuit();

    // Build the same formula with operands swapped at every level.
    let mut b = CircuitBuilder::new();
    let x1 = Var::new(1);
    let x2 = Var::new(2);
    let neither = b.and(vec![b.literal(Lit::negative(x2)), b.literal(Lit::negative(x1))]);
    let both = b.and(vec![b.literal(Lit::positive(x2)), b.literal(Lit::positive(x1))]);
    let swapped = b.or(vec![neither, both]);
    let c = b.finish(swapped).unwrap();

    let ctx = SignatureContext::new(8, 1_000_003, Some(42));
    let sig_a = prob_equiv_signature(&a, &ctx);
    let sig_c = prob_equiv_signature(&c, &ctx);
    assert_eq!(sig_a.nodes[a.root().index()], sig_c.nodes[c.root().index()]);
}
