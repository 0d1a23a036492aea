
// imports
use crate::entropy::{entropies_for, median, slqs_scores};
use crate::plmi::PlmiTable;
use crate::space::{RowSums, Space};

use std::collections::BTreeSet;
use std::error::Error;

use fnv::FnvHashMap;
use rayon::prelude::*;

// SLQS (Santus et al. 2014): instead of a word's own entropy, uses the
// median first-order entropy of its N most associated contexts by PLMI
// weight, the "second-order" entropy. The caches built inside run() live
// for exactly one batch call, so nothing leaks across runs and reusing the
// engine concurrently stays safe.
pub struct Slqs<'a> {
    space: &'a Space,
    row_sums: &'a RowSums,
    plmi: &'a PlmiTable,
    top_n: usize,
}

impl<'a> Slqs<'a> {
    pub fn new(space: &'a Space, row_sums: &'a RowSums, plmi: &'a PlmiTable, top_n: usize) -> Self {
        Self {
            space,
            row_sums,
            plmi,
            top_n,
        }
    }

    // the word's top N contexts by PLMI weight, zero weights dropped.
    // Ties break on the lower vocabulary id so the selection is fully
    // defined rather than inherited from map iteration order.
    fn top_contexts(&self, word: u32) -> Result<Vec<u32>, String> {
        let row = self
            .plmi
            .row(word)
            .ok_or_else(|| {
                format!(
                    "no PLMI row for '{}', pairs must be pre-filtered",
                    self.space.vocab().lemma(word)
                )
            })?;

        let mut weighted: Vec<(u32, f64)> = row
            .iter()
            .filter(|(_, value)| *value > 0.0)
            .copied()
            .collect();
        weighted.sort_by(|(id_a, value_a), (id_b, value_b)| {
            value_b.total_cmp(value_a).then_with(|| id_a.cmp(id_b))
        });
        weighted.truncate(self.top_n);

        Ok(weighted.into_iter().map(|(context, _)| context).collect())
    }

    pub fn run(&self, pairs: &[(u32, u32)]) -> Result<FnvHashMap<(u32, u32), f64>, Box<dyn Error>> {
        let mut words: Vec<u32> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        words.sort_unstable();
        words.dedup();

        // per-run cache 1: the top context set of every distinct word
        let top_sets: Vec<(u32, Vec<u32>)> = words
            .par_iter()
            .map(|word| self.top_contexts(*word).map(|contexts| (*word, contexts)))
            .collect::<Result<_, String>>()?;

        // per-run cache 2: first-order entropy of every context referenced
        // by any top set, computed once
        let needed: BTreeSet<u32> = top_sets
            .iter()
            .flat_map(|(_, contexts)| contexts.iter().copied())
            .collect();
        let needed: Vec<u32> = needed.into_iter().collect();
        let context_entropies = entropies_for(self.space, self.row_sums, &needed);

        // per-run cache 3: second-order entropy per word, the median over
        // its top set, 0 when the set is empty
        let second_order: FnvHashMap<u32, f64> = top_sets
            .par_iter()
            .map(|(word, contexts)| {
                let mut entropies: Vec<f64> = contexts
                    .iter()
                    .map(|context| context_entropies[context])
                    .collect();
                (*word, median(&mut entropies))
            })
            .collect();

        let mut results = FnvHashMap::default();
        for &(hypo, hyper) in pairs {
            let (forward, backward) = slqs_scores(second_order[&hypo], second_order[&hyper]);
            results.insert((hypo, hyper), forward);
            results.insert((hyper, hypo), backward);
        }
        Ok(results)
    }
}
