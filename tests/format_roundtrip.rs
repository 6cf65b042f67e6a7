//! Parse -> serialize -> reparse round trips for the vtree and SDD text
//! formats, plus CNF/DNF reading and the DOT serializer's basic shape.

use circuitkit::dag::queries::model_count;
use circuitkit::format::{
    compile_sdd, compile_vtree, parse_cnf, parse_dnf, parse_sdd, parse_vtree, render_sdd_lines, render_vtree_lines,
    serialize_sdd, serialize_vtree, to_dot, FormatError,
};

const VTREE_TEXT: &str = "vtree 5\nL 0 1\nL 1 2\nI 2 0 1\nL 3 3\nI 4 2 3\n";
const SDD_TEXT: &str = "sdd 4\nT 0\nL 1 0 1\nL 2 0 -1\nD 3 0 2 1 0 2 0\n";

#[test]
fn vtree_parse_serialize_reparse_preserves_shape() {
    let vtree = compile_vtree(&parse_vtree(VTREE_TEXT).unwrap()).unwrap();
    let rendered = render_vtree_lines(&serialize_vtree(&vtree));
    let reparsed = compile_vtree(&parse_vtree(&rendered).unwrap()).unwrap();

    assert_eq!(reparsed.len(), vtree.len());
    assert_eq!(reparsed.var_count(reparsed.root()), vtree.var_count(vtree.root()));
}

#[test]
fn sdd_parse_serialize_reparse_preserves_model_count() {
    let circuit = compile_sdd(&parse_sdd(SDD_TEXT).unwrap()).unwrap();
    let rendered = render_sdd_lines(&serialize_sdd(&circuit).unwrap());
    let reparsed = compile_sdd(&parse_sdd(&rendered).unwrap()).unwrap();

    assert_eq!(model_count(&reparsed, Some(1)), model_count(&circuit, Some(1)));
}

#[test]
fn cnf_and_dnf_of_the_same_models_agree_on_count() {
    let cnf = parse_cnf("p cnf 2 2\n1 2 0\n-1 -2 0\n").unwrap();
    let dnf = parse_dnf("p dnf 2 2\n1 2 0\n-1 -2 0\n").unwrap();
    assert_eq!(model_count(&cnf, Some(2)), model_count(&dnf, Some(2)));
}

#[test]
fn malformed_decision_arity_is_a_parse_error() {
    // Declares 2 elements but only supplies one pair.
    let text = "sdd 1\nD 0 0 2 1 1\n";
    let err = parse_sdd(text).unwrap_err();
    assert!(matches!(err, FormatError::ParseError { line: 2, .. }));
}

#[test]
fn dot_output_mentions_every_node() {
    let circuit = parse_cnf("p cnf 2 1\n1 2 0\n").unwrap();
    let dot = to_dot(&circuit, "g");
    assert!(dot.starts_with("digraph g {"));
    for id in circuit.ids() {
        assert!(dot.contains(&format!("n{}", id.index())));
    }
}
