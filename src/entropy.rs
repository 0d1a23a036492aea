
// imports
use crate::space::{RowSums, Space};

use fnv::FnvHashMap;
use rayon::prelude::*;

// First-order word entropy over the context distribution:
// -sum p(c|word) * log2 p(c|word) with p(c|word) = count / rowSum.
// A pure function of the immutable model, so results can be cached for the
// duration of a batch run. The row iterates in a fixed order for a given
// model, which keeps the floating point accumulation bit-identical across
// repeated calls.
pub fn entropy(space: &Space, row_sums: &RowSums, word: u32) -> f64 {
    let total = row_sums[word as usize];
    if total == 0 {
        return 0.0;
    }
    let mut h = 0.0;
    for freq in space.row(word).values() {
        let p = *freq as f64 / total as f64;
        h += p * p.log2();
    }
    -h
}

// batch entropy for a set of words, one rayon task per word. Each entry is
// independent, so this is plain data parallelism with no shared state.
pub fn entropies_for(space: &Space, row_sums: &RowSums, words: &[u32]) -> FnvHashMap<u32, f64> {
    words
        .par_iter()
        .map(|word| (*word, entropy(space, row_sums, *word)))
        .collect()
}

// median with the usual midpoint average for even length, 0 for empty input
// (the empty case is the "no usable top contexts" outcome of SLQS)
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

// The shared SLQS ratio rule, for first order (SLQS Row) and second order
// (SLQS) entropies alike. Returns (score(hypo, hyper), score(hyper, hypo)).
// One zero entropy pins the scores to the +-1 sentinels; both zero is
// undefined and reported as NaN instead of letting one sentinel rule
// overwrite the other.
pub fn slqs_scores(entropy_hypo: f64, entropy_hyper: f64) -> (f64, f64) {
    if entropy_hypo == 0.0 && entropy_hyper == 0.0 {
        (f64::NAN, f64::NAN)
    } else if entropy_hypo == 0.0 {
        (1.0, -1.0)
    } else if entropy_hyper == 0.0 {
        (-1.0, 1.0)
    } else {
        (
            1.0 - entropy_hypo / entropy_hyper,
            1.0 - entropy_hyper / entropy_hypo,
        )
    }
}

#[cfg(test)]
mod tests {

    use super::{entropies_for, entropy, median, slqs_scores};
    use crate::space::Space;

    fn fixture() -> Space {
        let mut space = Space::new();
        space.bump("a n", "b n", 2);
        space.bump("a n", "c n", 2);
        space.bump("b n", "a n", 1);
        space.bump("b n", "c n", 1);
        space.bump("b n", "d n", 1);
        space.bump("b n", "e n", 1);
        space.bump("c n", "a n", 7);
        space
    }

    #[test]
    fn uniform_distributions_have_log2_n_entropy() {
        let space = fixture();
        let row_sums = space.row_sums();
        let a = space.vocab().get("a n").unwrap();
        let b = space.vocab().get("b n").unwrap();

        assert_eq!(entropy(&space, &row_sums, a), 1.0); // two equal contexts
        assert_eq!(entropy(&space, &row_sums, b), 2.0); // four equal contexts
    }

    #[test]
    fn single_context_and_empty_rows_have_zero_entropy() {
        let space = fixture();
        let row_sums = space.row_sums();
        let c = space.vocab().get("c n").unwrap();
        let e = space.vocab().get("e n").unwrap(); // context only, empty row

        assert_eq!(entropy(&space, &row_sums, c), 0.0);
        assert_eq!(entropy(&space, &row_sums, e), 0.0);
    }

    #[test]
    fn entropy_is_bit_identical_across_calls() {
        let space = fixture();
        let row_sums = space.row_sums();

        for word in 0..space.n_targets() as u32 {
            let first = entropy(&space, &row_sums, word);
            for _ in 0..5 {
                assert_eq!(entropy(&space, &row_sums, word).to_bits(), first.to_bits());
            }
        }
    }

    #[test]
    fn batch_entropies_match_single_calls() {
        let space = fixture();
        let row_sums = space.row_sums();
        let words: Vec<u32> = (0..space.n_targets() as u32).collect();

        let batch = entropies_for(&space, &row_sums, &words);
        for word in words {
            assert_eq!(
                batch[&word].to_bits(),
                entropy(&space, &row_sums, word).to_bits()
            );
        }
    }

    #[test]
    fn median_odd_even_and_empty() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 2.0, 3.0]), 2.5);
        assert_eq!(median(&mut []), 0.0);
    }

    #[test]
    fn ratio_scores_for_positive_entropies() {
        let (forward, backward) = slqs_scores(1.0, 2.0);
        assert_eq!(forward, 0.5);
        assert_eq!(backward, -1.0);
    }

    #[test]
    fn zero_entropy_sentinels() {
        assert_eq!(slqs_scores(0.0, 2.0), (1.0, -1.0));
        assert_eq!(slqs_scores(2.0, 0.0), (-1.0, 1.0));
    }

    #[test]
    fn both_zero_is_undefined() {
        let (forward, backward) = slqs_scores(0.0, 0.0);
        assert!(forward.is_nan());
        assert!(backward.is_nan());
    }
}
