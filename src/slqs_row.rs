
// imports
use crate::entropy::{entropies_for, slqs_scores};
use crate::space::{RowSums, Space};

use fnv::FnvHashMap;

// SLQS Row (Shwartz et al. 2016): compares the first-order context
// entropies of the two pair members directly. Hypernyms tend to appear in
// less informative contexts, so a more general word gets the higher
// entropy and the forward score goes positive.
pub fn slqs_row(
    space: &Space,
    row_sums: &RowSums,
    pairs: &[(u32, u32)],
) -> FnvHashMap<(u32, u32), f64> {
    // entropy once per distinct word, in parallel; the pair loop itself is
    // a cheap deterministic fill
    let mut words: Vec<u32> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
    words.sort_unstable();
    words.dedup();
    let entropies = entropies_for(space, row_sums, &words);

    let mut results = FnvHashMap::default();
    for &(hypo, hyper) in pairs {
        let (forward, backward) = slqs_scores(entropies[&hypo], entropies[&hyper]);
        results.insert((hypo, hyper), forward);
        results.insert((hyper, hypo), backward);
    }
    results
}

#[cfg(test)]
mod tests {

    use super::slqs_row;
    use crate::space::Space;

    fn fixture() -> Space {
        let mut space = Space::new();
        // "a n": two equal contexts, entropy 1.0
        space.bump("a n", "x n", 2);
        space.bump("a n", "y n", 2);
        // "b n": four equal contexts, entropy 2.0
        space.bump("b n", "x n", 1);
        space.bump("b n", "y n", 1);
        space.bump("b n", "z n", 1);
        space.bump("b n", "w n", 1);
        // "c n": single context, entropy 0.0
        space.bump("c n", "x n", 7);
        // "d n": single context, entropy 0.0
        space.bump("d n", "y n", 3);
        space
    }

    fn id(space: &Space, lemma: &str) -> u32 {
        space.vocab().get(lemma).unwrap()
    }

    #[test]
    fn ratio_scores_for_nonzero_entropies() {
        let space = fixture();
        let row_sums = space.row_sums();
        let pair = (id(&space, "a n"), id(&space, "b n"));

        let results = slqs_row(&space, &row_sums, &[pair]);
        assert_eq!(results[&pair], 1.0 - 1.0 / 2.0);
        assert_eq!(results[&(pair.1, pair.0)], 1.0 - 2.0 / 1.0);
    }

    #[test]
    fn zero_entropy_hyponym_pins_the_sentinels() {
        let space = fixture();
        let row_sums = space.row_sums();
        let pair = (id(&space, "c n"), id(&space, "b n"));

        let results = slqs_row(&space, &row_sums, &[pair]);
        assert_eq!(results[&pair], 1.0);
        assert_eq!(results[&(pair.1, pair.0)], -1.0);
    }

    #[test]
    fn zero_entropy_hypernym_pins_the_sentinels() {
        let space = fixture();
        let row_sums = space.row_sums();
        let pair = (id(&space, "b n"), id(&space, "c n"));

        let results = slqs_row(&space, &row_sums, &[pair]);
        assert_eq!(results[&pair], -1.0);
        assert_eq!(results[&(pair.1, pair.0)], 1.0);
    }

    #[test]
    fn both_entropies_zero_is_undefined() {
        let space = fixture();
        let row_sums = space.row_sums();
        let pair = (id(&space, "c n"), id(&space, "d n"));

        let results = slqs_row(&space, &row_sums, &[pair]);
        assert!(results[&pair].is_nan());
        assert!(results[&(pair.1, pair.0)].is_nan());
    }
}
