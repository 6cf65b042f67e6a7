//! Canonicity of the SDD apply engine: structural equality of ids should
//! imply semantic equality, independent of how a formula was built up.

use circuitkit::lit::{Lit, Var};
use circuitkit::sdd::apply::{conjoin, disjoin};
use circuitkit::sdd::SddManager;
use circuitkit::vtree::VtreeBuilder;

fn manager_over(vars: &[u32]) -> SddManager {
    let mut b = VtreeBuilder::new();
    let mut ids = vars.iter().map(|&v| b.leaf(Var::new(v)));
    let mut acc = ids.next().expect("at least one variable");
    for id in ids {
        acc = b.inner(acc, id);
    }
    SddManager::new(b.finish(acc))
}

#[test]
fn conjunction_built_in_either_order_is_the_same_node() {
    let mgr = manager_over(&[1, 2, 3]);
    let x1 = mgr.literal(Lit::positive(Var::new(1)));
    let x2 = mgr.literal(Lit::positive(Var::new(2)));
    let x3 = mgr.literal(Lit::positive(Var::new(3)));

    let left_first = conjoin(&mgr, conjoin(&mgr, x1, x2), x3);
    let right_first = conjoin(&mgr, x1, conjoin(&mgr, x2, x3));
    assert_eq!(left_first, right_first);
    assert!(mgr.check_canonicity(left_first).is_ok());
}

#[test]
fn disjunction_distributes_over_conjunction_structurally() {
    let mgr = manager_over(&[1, 2]);
    let x1 = mgr.literal(Lit::positive(Var::new(1)));
    let x2 = mgr.literal(Lit::positive(Var::new(2)));
    let not_x1 = mgr.literal(Lit::negative(Var::new(1)));

    // (x1 AND x2) OR (NOT x1 AND x2) == x2
    let a = conjoin(&mgr, x1, x2);
    let b = conjoin(&mgr, not_x1, x2);
    let result = disjoin(&mgr, a, b);
    assert_eq!(result, x2);
}

#[test]
fn negation_is_involutive_for_a_built_up_decision() {
    let mgr = manager_over(&[1, 2]);
    let x1 = mgr.literal(Lit::positive(Var::new(1)));
    let x2 = mgr.literal(Lit::positive(Var::new(2)));
    let conj = conjoin(&mgr, x1, x2);
    assert_eq!(mgr.negate(mgr.negate(conj)), conj);
}

#[test]
fn tautology_and_contradiction_collapse_to_constants() {
    let mgr = manager_over(&[1]);
    let x1 = mgr.literal(Lit::positive(Var::new(1)));
    let not_x1 = mgr.literal(Lit::negative(Var::new(1)));

    assert_eq!(disjoin(&mgr, x1, not_x1), mgr.true_id());
    assert_eq!(conjoin(&mgr, x1, not_x1), mgr.false_id());
}

#[test]
fn every_node_built_through_apply_remains_canonical() {
    let mgr = manager_over(&[1, 2, 3, 4]);
    let lits: Vec<_> = [1u32, 2, 3, 4].iter().map(|&v| mgr.literal(Lit::positive(Var::new(v)))).collect();

    let mut acc = lits[0];
    for &lit in &lits[1..] {
        acc = conjoin(&mgr, acc, lit);
        assert!(mgr.check_canonicity(acc).is_ok());
    }
}
