//! Evaluating a circuit over a batch of examples at once (spec.md §4.3):
//! each node's truth value across all examples is packed into a bitvector,
//! so And/Or fold to word-level bitwise ops instead of per-example branches.

use super::fold::foldup_aggregate;
use super::Circuit;
use crate::lit::Var;
use rayon::prelude::*;
use std::collections::HashMap;

/// Above this many 64-bit words, combining columns switches to a
/// `rayon` parallel iterator; below it the per-thread dispatch overhead
/// would dominate the word-level work itself.
const PARALLEL_WORD_THRESHOLD: usize = 1024;

/// A column of per-example bits, packed 64 to a word.
#[derive(Debug, Clone)]
pub struct BitVec {
    words: Vec<u64>,
    len: usize,
}

impl BitVec {
    /// Packs an explicit per-example bool sequence.
    #[must_use]
    pub fn from_bools(bits: &[bool]) -> Self {
        let len = bits.len();
        let mut words = vec![0u64; len.div_ceil(64)];
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                words[i / 64] |= 1u64 << (i % 64);
            }
        }
        BitVec { words, len }
    }

    /// All-false vector of `len` examples.
    #[must_use]
    pub fn all_false(len: usize) -> Self {
        BitVec { words: vec![0u64; len.div_ceil(64)], len }
    }

    /// All-true vector of `len` examples.
    #[must_use]
    pub fn all_true(len: usize) -> Self {
        let mut v = BitVec { words: vec![u64::MAX; len.div_ceil(64)], len };
        v.mask_tail();
        v
    }

    /// Clears any bits in the final word beyond `len`, so that word-level
    /// ops (which operate on whole words) never leak spurious set bits into
    /// [`BitVec::to_bools`].
    fn mask_tail(&mut self) {
        let rem = self.len % 64;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }

    /// Bitwise negation.
    #[must_use]
    pub fn not(&self) -> Self {
        let mut v = BitVec { words: self.words.iter().map(|w| !w).collect(), len: self.len };
        v.mask_tail();
        v
    }

    /// The example count this vector covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this vector covers zero examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn get(&self, i: usize) -> bool {
        (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    /// Unpacks back to one bool per example.
    #[must_use]
    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.len).map(|i| self.get(i)).collect()
    }

    fn combine(vecs: &[BitVec], identity: u64, op: fn(u64, u64) -> u64) -> BitVec {
        let len = vecs[0].len;
        let word_count = vecs[0].words.len();
        let words: Vec<u64> = if word_count > PARALLEL_WORD_THRESHOLD {
            (0..word_count)
                .into_par_iter()
                .map(|w| vecs.iter().fold(identity, |acc, v| op(acc, v.words[w])))
                .collect()
        } else {
            (0..word_count).map(|w| vecs.iter().fold(identity, |acc, v| op(acc, v.words[w]))).collect()
        };
        let mut result = BitVec { words, len };
        result.mask_tail();
        result
    }

    /// Word-wise AND across all of `vecs`. Panics if `vecs` is empty.
    #[must_use]
    pub fn and_many(vecs: &[BitVec]) -> Self {
        Self::combine(vecs, u64::MAX, |a, b| a & b)
    }

    /// Word-wise OR across all of `vecs`. Panics if `vecs` is empty.
    #[must_use]
    pub fn or_many(vecs: &[BitVec]) -> Self {
        Self::combine(vecs, 0, |a, b| a | b)
    }
}

/// A batch of examples, one bit-packed column per variable the circuit
/// being evaluated can reference.
pub struct ExampleMatrix {
    len: usize,
    columns: HashMap<Var, BitVec>,
}

impl ExampleMatrix {
    /// Builds a matrix from row-major data: `variables[i]` names the
    /// variable for column `i`, and `rows[r][i]` is that variable's value
    /// in example `r`.
    #[must_use]
    pub fn from_rows(variables: &[Var], rows: &[Vec<bool>]) -> Self {
        let len = rows.len();
        let mut columns = HashMap::with_capacity(variables.len());
        for (ci, &var) in variables.iter().enumerate() {
            let bits: Vec<bool> = rows.iter().map(|r| r[ci]).collect();
            columns.insert(var, BitVec::from_bools(&bits));
        }
        ExampleMatrix { len, columns }
    }

    /// The number of examples (rows) in the matrix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the matrix has zero examples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Evaluates `circuit` across every example in `data` at once, returning one
/// bool per example (spec.md §4.3).
///
/// # Panics
/// Panics if `circuit` references a variable with no column in `data`.
#[must_use]
pub fn evaluate(circuit: &Circuit, data: &ExampleMatrix) -> Vec<bool> {
    let result = foldup_aggregate(
        circuit,
        |b| if b { BitVec::all_true(data.len) } else { BitVec::all_false(data.len) },
        |lit| {
            let col = data
                .columns
                .get(&lit.var())
                .expect("example matrix is missing a column for a variable the circuit references");
            if lit.is_positive() { col.clone() } else { col.not() }
        },
        |children: &[BitVec]| BitVec::and_many(children),
        |children: &[BitVec]| BitVec::or_many(children),
    );
    result.to_bools()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::CircuitBuilder;
    use crate::lit::Lit;

    #[test]
    fn bitvec_roundtrips_through_words() {
        let bits = vec![true, false, true, true, false];
        let v = BitVec::from_bools(&bits);
        assert_eq!(v.to_bools(), bits);
    }

    #[test]
    fn not_masks_tail_bits() {
        let v = BitVec::all_true(5).not();
        assert_eq!(v.to_bools(), vec![false; 5]);
    }

    #[test]
    fn and_many_matches_per_example_and() {
        let a = BitVec::from_bools(&[true, true, false]);
        let b = BitVec::from_bools(&[true, false, false]);
        let c = BitVec::from_bools(&[true, true, true]);
        let result = BitVec::and_many(&[a, b, c]);
        assert_eq!(result.to_bools(), vec![true, false, false]);
    }

    #[test]
    fn evaluate_matches_per_example_semantics() {
        let mut b = CircuitBuilder::new();
        let x1 = Var::new(1);
        let x2 = Var::new(2);
        let p1 = b.literal(Lit::positive(x1));
        let n2 = b.literal(Lit::negative(x2));
        let and = b.and(vec![p1, n2]);
        let circuit = b.finish(and).unwrap();

        let data = ExampleMatrix::from_rows(
            &[x1, x2],
            &[vec![true, false], vec![true, true], vec![false, false]],
        );
        let result = evaluate(&circuit, &data);
        assert_eq!(result, vec![true, false, false]);
    }

    #[test]
    fn evaluate_handles_large_batches_via_parallel_path() {
        // Exceeds PARALLEL_WORD_THRESHOLD words to exercise the rayon path.
        let n = (PARALLEL_WORD_THRESHOLD + 10) * 64;
        let mut b = CircuitBuilder::new();
        let x1 = Var::new(1);
        let p1 = b.literal(Lit::positive(x1));
        let circuit = b.finish(p1).unwrap();

        let rows: Vec<Vec<bool>> = (0..n).map(|i| vec![i % 2 == 0]).collect();
        let data = ExampleMatrix::from_rows(&[x1], &rows);
        let result = evaluate(&circuit, &data);
        assert_eq!(result.len(), n);
        assert!(result[0]);
        assert!(!result[1]);
    }
}
