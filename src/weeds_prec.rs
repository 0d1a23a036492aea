
// imports
use crate::space::{RowSums, Space};

use std::error::Error;

use fnv::FnvHashMap;
use rayon::prelude::*;

// sum of the hyponym's counts over the contexts shared with the hypernym.
// Exact in u64, so the result does not depend on iteration order.
fn inclusion_numerator(space: &Space, hypo: u32, hyper: u32) -> u64 {
    let hyper_row = space.row(hyper);
    space
        .row(hypo)
        .iter()
        .filter(|(context, _)| hyper_row.contains_key(context))
        .map(|(_, count)| *count as u64)
        .sum()
}

// WeedsPrec: the share of the hyponym's co-occurrence mass that falls on
// contexts also used by the candidate hypernym. Both directions are scored
// per pair. Callers must pre-filter pairs against the row sums; a missing
// or zero row sum here is a contract violation, not a recoverable state.
pub fn weeds_prec(
    space: &Space,
    row_sums: &RowSums,
    pairs: &[(u32, u32)],
) -> Result<FnvHashMap<(u32, u32), f64>, Box<dyn Error>> {
    for (hypo, hyper) in pairs {
        for word in [hypo, hyper] {
            if row_sums[*word as usize] == 0 {
                return Err(format!(
                    "zero row sum for '{}', pairs must be pre-filtered",
                    space.vocab().lemma(*word)
                )
                .into());
            }
        }
    }

    let results = pairs
        .par_iter()
        .flat_map_iter(|&(hypo, hyper)| {
            let forward = inclusion_numerator(space, hypo, hyper) as f64
                / row_sums[hypo as usize] as f64;
            let backward = inclusion_numerator(space, hyper, hypo) as f64
                / row_sums[hyper as usize] as f64;
            [((hypo, hyper), forward), ((hyper, hypo), backward)]
        })
        .collect();

    Ok(results)
}
