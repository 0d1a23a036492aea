
// imports
use crate::space::{RowSums, Space};

use std::error::Error;

use fnv::FnvHashMap;
use rayon::prelude::*;

// sum of min(count_a, count_b) over the shared contexts; symmetric in its
// arguments, exact in u64
fn min_numerator(space: &Space, a: u32, b: u32) -> u64 {
    let row_b = space.row(b);
    space
        .row(a)
        .iter()
        .filter_map(|(context, count_a)| {
            row_b
                .get(context)
                .map(|count_b| (*count_a).min(*count_b) as u64)
        })
        .sum()
}

// invCL (Lenci & Benotto): combines Clarke's degree of inclusion of the
// hyponym in the hypernym with the degree of non-inclusion the other way
// round. Both directions are scored per pair. Same contract as WeedsPrec:
// pairs arrive pre-filtered, zero row sums are a caller bug.
pub fn inv_cl(
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
            let numerator = min_numerator(space, hypo, hyper) as f64;
            let clarke_forward = numerator / row_sums[hypo as usize] as f64;
            let clarke_backward = numerator / row_sums[hyper as usize] as f64;
            [
                ((hypo, hyper), (clarke_forward * (1.0 - clarke_backward)).sqrt()),
                ((hyper, hypo), (clarke_backward * (1.0 - clarke_forward)).sqrt()),
            ]
        })
        .collect();

    Ok(results)
}
