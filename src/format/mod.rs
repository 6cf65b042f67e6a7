//! Textual line formats for vtrees and circuits (spec.md §4.6 / §6).
//!
//! The core's only real obligation here is the `CircuitFormatLine`/
//! `VtreeFormatLine` contract and the `compile` step that resolves a line
//! sequence into a [`Circuit`] or [`Vtree`]: this module owns that, plus
//! concrete parsers for the SDD/vtree text formats and CNF/DNF DIMACS-like
//! input the crate's own fixtures and CLI need to be runnable end-to-end.
//! PSDD and Logistic-Circuit lines are modeled as
//! [`CircuitFormatLine`] variants for downstream consumers but carry no
//! Boolean circuit semantics of their own.

use crate::dag::{Circuit, CircuitBuilder, Node, NodeId};
use crate::lit::Lit;
use crate::vtree::{Vtree, VtreeBuilder, VtreeId, VtreeNode};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use thiserror::Error;

/// Errors raised while parsing or serializing a textual line format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A line was malformed: unrecognized prefix, missing or non-numeric
    /// token, or wrong arity.
    #[error("line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// The requested operation doesn't apply to the shape of line or node
    /// given (e.g. serializing a circuit with an And node that isn't a
    /// 2-ary prime/sub pair, or compiling a parameterized PSDD line to a
    /// plain Boolean circuit).
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Result alias for this module.
pub type FormatResult<T> = Result<T, FormatError>;

/// One record of a vtree text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VtreeFormatLine {
    /// A `c ...` comment line.
    Comment(String),
    /// The `vtree <count>` header.
    Header { node_count: usize },
    /// `L <id> <var>`: a leaf over `var`.
    Leaf { id: u32, var: u32 },
    /// `I <id> <left> <right>`: an inner node over two already-defined ids.
    Inner { id: u32, left: u32, right: u32 },
}

/// One record of an SDD-shaped circuit text file.
#[derive(Debug, Clone, PartialEq)]
pub enum CircuitFormatLine {
    /// A `c ...` comment line.
    Comment(String),
    /// The `sdd <count>` header.
    Header { node_count: usize },
    /// `T <id>`: the True constant.
    True { id: u32 },
    /// `F <id>`: the False constant.
    False { id: u32 },
    /// `L <id> <vtree> <lit>`: a literal, annotated with its vtree leaf.
    Literal { id: u32, vtree: u32, lit: i64 },
    /// `D <id> <vtree> <count> <p1> <s1> ...`: a decision node's
    /// (prime, sub) element pairs, referencing earlier ids.
    Decision { id: u32, vtree: u32, elements: Vec<(u32, u32)> },
    /// `P <id> <vtree> <lit> <log_prob>`: a PSDD literal parameter line.
    /// Line-shape only; [`compile_sdd`] rejects it.
    PsddLiteral { id: u32, vtree: u32, lit: i64, log_prob: f64 },
    /// `Q <id> <vtree> <count> <p1> <s1> <w1> ...`: a PSDD decision's
    /// (prime, sub, weight) triples. Line-shape only.
    PsddDecision { id: u32, vtree: u32, elements: Vec<(u32, u32, f64)> },
    /// `W <id> <vtree> <lit> <weight>`: a Logistic-Circuit weighted
    /// literal. Line-shape only.
    LogisticLiteral { id: u32, vtree: u32, lit: i64, weight: f64 },
}

fn parse_token<T: std::str::FromStr>(tok: Option<&&str>, line: usize, what: &str) -> FormatResult<T> {
    let raw = tok.ok_or_else(|| FormatError::ParseError { line, message: format!("missing {what}") })?;
    raw.parse::<T>().map_err(|_| FormatError::ParseError { line, message: format!("malformed {what}: '{raw}'") })
}

/// Parses a vtree text file into its line records.
pub fn parse_vtree(input: &str) -> FormatResult<Vec<VtreeFormatLine>> {
    let mut lines = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let lineno = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let record = match tokens[0] {
            "c" => VtreeFormatLine::Comment(line.trim_start_matches('c').trim().to_string()),
            "vtree" => VtreeFormatLine::Header { node_count: parse_token(tokens.get(1), lineno, "vtree node count")? },
            "L" => VtreeFormatLine::Leaf {
                id: parse_token(tokens.get(1), lineno, "leaf id")?,
                var: parse_token(tokens.get(2), lineno, "leaf variable")?,
            },
            "I" => VtreeFormatLine::Inner {
                id: parse_token(tokens.get(1), lineno, "inner id")?,
                left: parse_token(tokens.get(2), lineno, "inner left child")?,
                right: parse_token(tokens.get(3), lineno, "inner right child")?,
            },
            other => {
                return Err(FormatError::ParseError { line: lineno, message: format!("unrecognized vtree line prefix '{other}'") })
            }
        };
        lines.push(record);
    }
    Ok(lines)
}

/// Resolves a vtree's line records (children-before-parents) into a
/// [`Vtree`], taking the last node built as the root.
pub fn compile_vtree(lines: &[VtreeFormatLine]) -> FormatResult<Vtree> {
    let mut builder = VtreeBuilder::new();
    let mut id_map: HashMap<u32, VtreeId> = HashMap::new();
    let mut last: Option<VtreeId> = None;
    for line in lines {
        match line {
            VtreeFormatLine::Comment(_) | VtreeFormatLine::Header { .. } => {}
            VtreeFormatLine::Leaf { id, var } => {
                let vid = builder.leaf(crate::lit::Var::new(*var));
                id_map.insert(*id, vid);
                last = Some(vid);
            }
            VtreeFormatLine::Inner { id, left, right } => {
                let &l = id_map
                    .get(left)
                    .ok_or_else(|| FormatError::Unsupported(format!("inner node {id} references undefined left child {left}")))?;
                let &r = id_map
                    .get(right)
                    .ok_or_else(|| FormatError::Unsupported(format!("inner node {id} references undefined right child {right}")))?;
                let vid = builder.inner(l, r);
                id_map.insert(*id, vid);
                last = Some(vid);
            }
        }
    }
    let root = last.ok_or_else(|| FormatError::Unsupported("vtree file defines no nodes".to_string()))?;
    Ok(builder.finish(root))
}

/// Serializes a vtree back to line records, in children-before-parents
/// order with ids taken from each node's linearized index.
#[must_use]
pub fn serialize_vtree(vtree: &Vtree) -> Vec<VtreeFormatLine> {
    let mut lines = Vec::with_capacity(vtree.len() + 1);
    lines.push(VtreeFormatLine::Header { node_count: vtree.len() });
    for id in vtree.ids() {
        let line = match vtree.node(id) {
            VtreeNode::Leaf(var) => VtreeFormatLine::Leaf { id: id.index() as u32, var: var.index() },
            VtreeNode::Inner { left, right } => {
                VtreeFormatLine::Inner { id: id.index() as u32, left: left.index() as u32, right: right.index() as u32 }
            }
        };
        lines.push(line);
    }
    lines
}

/// Renders vtree line records back to their textual form.
#[must_use]
pub fn render_vtree_lines(lines: &[VtreeFormatLine]) -> String {
    let mut out = String::new();
    for line in lines {
        match line {
            VtreeFormatLine::Comment(text) => {
                let _ = writeln!(out, "c {text}");
            }
            VtreeFormatLine::Header { node_count } => {
                let _ = writeln!(out, "vtree {node_count}");
            }
            VtreeFormatLine::Leaf { id, var } => {
                let _ = writeln!(out, "L {id} {var}");
            }
            VtreeFormatLine::Inner { id, left, right } => {
                let _ = writeln!(out, "I {id} {left} {right}");
            }
        }
    }
    out
}

/// Parses an SDD text file into its line records.
pub fn parse_sdd(input: &str) -> FormatResult<Vec<CircuitFormatLine>> {
    let mut lines = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let lineno = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let record = match tokens[0] {
            "c" => CircuitFormatLine::Comment(line.trim_start_matches('c').trim().to_string()),
            "sdd" => CircuitFormatLine::Header { node_count: parse_token(tokens.get(1), lineno, "sdd node count")? },
            "T" => CircuitFormatLine::True { id: parse_token(tokens.get(1), lineno, "true node id")? },
            "F" => CircuitFormatLine::False { id: parse_token(tokens.get(1), lineno, "false node id")? },
            "L" => CircuitFormatLine::Literal {
                id: parse_token(tokens.get(1), lineno, "literal id")?,
                vtree: parse_token(tokens.get(2), lineno, "literal vtree id")?,
                lit: parse_token(tokens.get(3), lineno, "literal value")?,
            },
            "D" => {
                let id = parse_token(tokens.get(1), lineno, "decision id")?;
                let vtree = parse_token(tokens.get(2), lineno, "decision vtree id")?;
                let count: usize = parse_token(tokens.get(3), lineno, "decision element count")?;
                let rest = &tokens[4.min(tokens.len())..];
                if rest.len() != count * 2 {
                    return Err(FormatError::ParseError {
                        line: lineno,
                        message: format!("decision {id} declares {count} elements but has {} id tokens", rest.len()),
                    });
                }
                let mut elements = Vec::with_capacity(count);
                for pair in rest.chunks_exact(2) {
                    let prime: u32 = pair[0]
                        .parse()
                        .map_err(|_| FormatError::ParseError { line: lineno, message: format!("malformed prime id '{}'", pair[0]) })?;
                    let sub: u32 = pair[1]
                        .parse()
                        .map_err(|_| FormatError::ParseError { line: lineno, message: format!("malformed sub id '{}'", pair[1]) })?;
                    elements.push((prime, sub));
                }
                CircuitFormatLine::Decision { id, vtree, elements }
            }
            "P" => CircuitFormatLine::PsddLiteral {
                id: parse_token(tokens.get(1), lineno, "psdd literal id")?,
                vtree: parse_token(tokens.get(2), lineno, "psdd literal vtree id")?,
                lit: parse_token(tokens.get(3), lineno, "psdd literal value")?,
                log_prob: parse_token(tokens.get(4), lineno, "psdd literal log-probability")?,
            },
            "Q" => {
                let id = parse_token(tokens.get(1), lineno, "psdd decision id")?;
                let vtree = parse_token(tokens.get(2), lineno, "psdd decision vtree id")?;
                let count: usize = parse_token(tokens.get(3), lineno, "psdd decision element count")?;
                let rest = &tokens[4.min(tokens.len())..];
                if rest.len() != count * 3 {
                    return Err(FormatError::ParseError {
                        line: lineno,
                        message: format!("psdd decision {id} declares {count} elements but has {} tokens", rest.len()),
                    });
                }
                let mut elements = Vec::with_capacity(count);
                for triple in rest.chunks_exact(3) {
                    let prime: u32 = triple[0]
                        .parse()
                        .map_err(|_| FormatError::ParseError { line: lineno, message: format!("malformed prime id '{}'", triple[0]) })?;
                    let sub: u32 = triple[1]
                        .parse()
                        .map_err(|_| FormatError::ParseError { line: lineno, message: format!("malformed sub id '{}'", triple[1]) })?;
                    let weight: f64 = triple[2]
                        .parse()
                        .map_err(|_| FormatError::ParseError { line: lineno, message: format!("malformed weight '{}'", triple[2]) })?;
                    elements.push((prime, sub, weight));
                }
                CircuitFormatLine::PsddDecision { id, vtree, elements }
            }
            "W" => CircuitFormatLine::LogisticLiteral {
                id: parse_token(tokens.get(1), lineno, "logistic literal id")?,
                vtree: parse_token(tokens.get(2), lineno, "logistic literal vtree id")?,
                lit: parse_token(tokens.get(3), lineno, "logistic literal value")?,
                weight: parse_token(tokens.get(4), lineno, "logistic literal weight")?,
            },
            other => return Err(FormatError::ParseError { line: lineno, message: format!("unrecognized sdd line prefix '{other}'") }),
        };
        lines.push(record);
    }
    Ok(lines)
}

/// Resolves an SDD's line records into a plain [`Circuit`]: a decision's
/// elements become `Or` of `And(prime, sub)` pairs. This reads the *shape*
/// of an SDD file as a decomposable logical DAG; it does not reconstruct an
/// [`crate::sdd::SddManager`], since trusting a file's claimed canonicity
/// would defeat the point of the apply engine rebuilding it honestly.
///
/// # Errors
/// Returns [`FormatError::Unsupported`] on a PSDD/Logistic-Circuit line,
/// which carries parameters with no Boolean circuit semantics.
pub fn compile_sdd(lines: &[CircuitFormatLine]) -> FormatResult<Circuit> {
    let mut builder = CircuitBuilder::new();
    let mut id_map: HashMap<u32, NodeId> = HashMap::new();
    let mut last: Option<NodeId> = None;
    for line in lines {
        let nid = match line {
            CircuitFormatLine::Comment(_) | CircuitFormatLine::Header { .. } => continue,
            CircuitFormatLine::True { .. } => builder.constant(true),
            CircuitFormatLine::False { .. } => builder.constant(false),
            CircuitFormatLine::Literal { lit, .. } => builder.literal(Lit::from_raw(*lit)),
            CircuitFormatLine::Decision { id, elements, .. } => {
                let mut conjuncts = Vec::with_capacity(elements.len());
                for &(prime, sub) in elements {
                    let p = *id_map
                        .get(&prime)
                        .ok_or_else(|| FormatError::Unsupported(format!("decision {id} references undefined prime {prime}")))?;
                    let s = *id_map
                        .get(&sub)
                        .ok_or_else(|| FormatError::Unsupported(format!("decision {id} references undefined sub {sub}")))?;
                    conjuncts.push(builder.and(vec![p, s]));
                }
                if conjuncts.len() == 1 {
                    conjuncts[0]
                } else {
                    builder.or(conjuncts)
                }
            }
            CircuitFormatLine::PsddLiteral { .. } | CircuitFormatLine::PsddDecision { .. } | CircuitFormatLine::LogisticLiteral { .. } => {
                return Err(FormatError::Unsupported(
                    "PSDD/Logistic-Circuit lines carry parameters with no Boolean circuit semantics".to_string(),
                ));
            }
        };
        let id = match line {
            CircuitFormatLine::True { id } | CircuitFormatLine::False { id } | CircuitFormatLine::Literal { id, .. } | CircuitFormatLine::Decision { id, .. } => *id,
            _ => unreachable!("psdd/logistic lines already returned above"),
        };
        id_map.insert(id, nid);
        last = Some(nid);
    }
    let root = last.ok_or_else(|| FormatError::Unsupported("sdd file defines no nodes".to_string()))?;
    builder.finish(root).map_err(|e| FormatError::Unsupported(e.to_string()))
}

/// Serializes a circuit back to SDD-shaped line records, provided every
/// `And` node has exactly two children (a prime/sub pair) — the shape
/// [`compile_sdd`] always produces.
///
/// # Errors
/// Returns [`FormatError::Unsupported`] if any And/Or node isn't in that
/// shape.
pub fn serialize_sdd(circuit: &Circuit) -> FormatResult<Vec<CircuitFormatLine>> {
    // Per-pair And nodes consumed directly by a parent Or's decision
    // element don't get their own line: their (prime, sub) ids are read
    // straight off the Circuit, not round-tripped through a separate
    // single-element decision line.
    let mut absorbed: HashSet<NodeId> = HashSet::new();
    for id in circuit.ids() {
        if let Node::Or(children) = circuit.node(id) {
            for &child in children {
                if let Node::And(pair) = circuit.node(child) {
                    if pair.len() == 2 {
                        absorbed.insert(child);
                    }
                }
            }
        }
    }

    let mut lines = Vec::with_capacity(circuit.len());
    for id in circuit.ids() {
        if absorbed.contains(&id) {
            continue;
        }
        let line = match circuit.node(id) {
            Node::Constant(true) => CircuitFormatLine::True { id: id.index() as u32 },
            Node::Constant(false) => CircuitFormatLine::False { id: id.index() as u32 },
            Node::Literal(lit) => CircuitFormatLine::Literal { id: id.index() as u32, vtree: 0, lit: lit.raw() },
            Node::And(children) => {
                if children.len() != 2 {
                    return Err(FormatError::Unsupported(format!(
                        "node {} is an And with {} children, not a prime/sub pair",
                        id.index(),
                        children.len()
                    )));
                }
                CircuitFormatLine::Decision {
                    id: id.index() as u32,
                    vtree: 0,
                    elements: vec![(children[0].index() as u32, children[1].index() as u32)],
                }
            }
            Node::Or(children) => {
                let mut elements = Vec::with_capacity(children.len());
                for &child in children {
                    match circuit.node(child) {
                        Node::And(pair) if pair.len() == 2 => elements.push((pair[0].index() as u32, pair[1].index() as u32)),
                        _ => {
                            return Err(FormatError::Unsupported(format!(
                                "node {}'s child {} is not a 2-ary And; not a decision shape",
                                id.index(),
                                child.index()
                            )))
                        }
                    }
                }
                CircuitFormatLine::Decision { id: id.index() as u32, vtree: 0, elements }
            }
        };
        lines.push(line);
    }
    Ok(lines)
}

/// Renders SDD line records back to their textual form.
#[must_use]
pub fn render_sdd_lines(lines: &[CircuitFormatLine]) -> String {
    let mut out = String::new();
    for line in lines {
        match line {
            CircuitFormatLine::Comment(text) => {
                let _ = writeln!(out, "c {text}");
            }
            CircuitFormatLine::Header { node_count } => {
                let _ = writeln!(out, "sdd {node_count}");
            }
            CircuitFormatLine::True { id } => {
                let _ = writeln!(out, "T {id}");
            }
            CircuitFormatLine::False { id } => {
                let _ = writeln!(out, "F {id}");
            }
            CircuitFormatLine::Literal { id, vtree, lit } => {
                let _ = writeln!(out, "L {id} {vtree} {lit}");
            }
            CircuitFormatLine::Decision { id, vtree, elements } => {
                let _ = write!(out, "D {id} {vtree} {}", elements.len());
                for (p, s) in elements {
                    let _ = write!(out, " {p} {s}");
                }
                let _ = writeln!(out);
            }
            CircuitFormatLine::PsddLiteral { id, vtree, lit, log_prob } => {
                let _ = writeln!(out, "P {id} {vtree} {lit} {log_prob}");
            }
            CircuitFormatLine::PsddDecision { id, vtree, elements } => {
                let _ = write!(out, "Q {id} {vtree} {}", elements.len());
                for (p, s, w) in elements {
                    let _ = write!(out, " {p} {s} {w}");
                }
                let _ = writeln!(out);
            }
            CircuitFormatLine::LogisticLiteral { id, vtree, lit, weight } => {
                let _ = writeln!(out, "W {id} {vtree} {lit} {weight}");
            }
        }
    }
    out
}

fn parse_clauses(input: &str) -> FormatResult<Vec<Vec<i64>>> {
    let mut clauses = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        let lineno = idx + 1;
        if line.is_empty() || line.starts_with('c') || line.starts_with('p') {
            continue;
        }
        let mut clause = Vec::new();
        for tok in line.split_whitespace() {
            let value: i64 =
                tok.parse().map_err(|_| FormatError::ParseError { line: lineno, message: format!("malformed literal token '{tok}'") })?;
            if value == 0 {
                break;
            }
            clause.push(value);
        }
        if !clause.is_empty() {
            clauses.push(clause);
        }
    }
    Ok(clauses)
}

/// Parses DIMACS-CNF text into an `And`-of-clauses `Circuit`, each clause an
/// `Or` of literals.
pub fn parse_cnf(input: &str) -> FormatResult<Circuit> {
    let clauses = parse_clauses(input)?;
    let mut builder = CircuitBuilder::new();
    let mut terms = Vec::with_capacity(clauses.len());
    for clause in &clauses {
        let lits: Vec<NodeId> = clause.iter().map(|&raw| builder.literal(Lit::from_raw(raw))).collect();
        terms.push(if lits.len() == 1 { lits[0] } else { builder.or(lits) });
    }
    let root = match terms.len() {
        0 => builder.constant(true),
        1 => terms[0],
        _ => builder.and(terms),
    };
    builder.finish(root).map_err(|e| FormatError::Unsupported(e.to_string()))
}

/// Parses a DIMACS-DNF-like text (same token grammar as CNF, dual
/// semantics) into an `Or`-of-terms `Circuit`, each term an `And` of
/// literals.
pub fn parse_dnf(input: &str) -> FormatResult<Circuit> {
    let clauses = parse_clauses(input)?;
    let mut builder = CircuitBuilder::new();
    let mut terms = Vec::with_capacity(clauses.len());
    for clause in &clauses {
        let lits: Vec<NodeId> = clause.iter().map(|&raw| builder.literal(Lit::from_raw(raw))).collect();
        terms.push(if lits.len() == 1 { lits[0] } else { builder.and(lits) });
    }
    let root = match terms.len() {
        0 => builder.constant(false),
        1 => terms[0],
        _ => builder.or(terms),
    };
    builder.finish(root).map_err(|e| FormatError::Unsupported(e.to_string()))
}

/// Renders a circuit as a Graphviz DOT digraph, the one third-party-free
/// visual sanity check this crate always has available.
#[must_use]
pub fn to_dot(circuit: &Circuit, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph {name} {{");
    for id in circuit.ids() {
        let (label, children): (String, &[NodeId]) = match circuit.node(id) {
            Node::Constant(true) => ("T".to_string(), &[]),
            Node::Constant(false) => ("F".to_string(), &[]),
            Node::Literal(lit) => (lit.to_string(), &[]),
            Node::And(c) => ("AND".to_string(), c),
            Node::Or(c) => ("OR".to_string(), c),
        };
        let _ = writeln!(out, "  n{} [label=\"{}\"];", id.index(), label);
        for &child in children {
            let _ = writeln!(out, "  n{} -> n{};", id.index(), child.index());
        }
    }
    let _ = writeln!(out, "}}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::queries::{is_decomposable, model_count};

    #[test]
    fn vtree_round_trips_through_text() {
        let text = "vtree 3\nL 0 1\nL 1 2\nI 2 0 1\n";
        let lines = parse_vtree(text).unwrap();
        let vtree = compile_vtree(&lines).unwrap();
        assert_eq!(vtree.len(), 3);

        let reserialized = serialize_vtree(&vtree);
        let rendered = render_vtree_lines(&reserialized);
        let reparsed = compile_vtree(&parse_vtree(&rendered).unwrap()).unwrap();
        assert_eq!(reparsed.len(), vtree.len());
    }

    #[test]
    fn sdd_text_compiles_to_expected_circuit() {
        // ⊤ at 0, literal x1 at 1, literal ¬x1 at 2, decision (1,0)(2,0) at 3
        // i.e. (x1 AND T) OR (NOT x1 AND T) == T.
        let text = "sdd 4\nT 0\nL 1 0 1\nL 2 0 -1\nD 3 0 2 1 0 2 0\n";
        let lines = parse_sdd(text).unwrap();
        let circuit = compile_sdd(&lines).unwrap();
        assert_eq!(model_count(&circuit, Some(1)), num_bigint::BigInt::from(2));
    }

    #[test]
    fn sdd_round_trips_through_serialize_and_reparse() {
        let text = "sdd 4\nT 0\nL 1 0 1\nL 2 0 -1\nD 3 0 2 1 0 2 0\n";
        let circuit = compile_sdd(&parse_sdd(text).unwrap()).unwrap();

        let lines = serialize_sdd(&circuit).unwrap();
        let rendered = render_sdd_lines(&lines);
        let reparsed = compile_sdd(&parse_sdd(&rendered).unwrap()).unwrap();

        assert_eq!(model_count(&reparsed, Some(1)), model_count(&circuit, Some(1)));
    }

    #[test]
    fn cnf_parses_as_and_of_or_clauses() {
        let text = "p cnf 2 2\n1 2 0\n-1 -2 0\n";
        let circuit = parse_cnf(text).unwrap();
        // (x1 OR x2) AND (NOT x1 OR NOT x2): satisfied by exactly 2 of 4 rows.
        assert_eq!(model_count(&circuit, Some(2)), num_bigint::BigInt::from(2));
    }

    #[test]
    fn dnf_parses_as_or_of_and_terms_and_is_decomposable_per_term() {
        let text = "p dnf 2 2\n1 2 0\n-1 -2 0\n";
        let circuit = parse_dnf(text).unwrap();
        assert_eq!(model_count(&circuit, Some(2)), num_bigint::BigInt::from(2));
        // Each AND term's literals are over distinct variables, so every
        // And node's children have pairwise-disjoint scope.
        assert!(is_decomposable(&circuit));
    }

    #[test]
    fn unrecognized_prefix_is_a_parse_error() {
        let err = parse_sdd("Z 0\n").unwrap_err();
        assert!(matches!(err, FormatError::ParseError { line: 1, .. }));
    }
}
