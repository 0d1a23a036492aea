
// imports
use crate::space::{sample_size, RowSums, Space};

use std::collections::HashSet;

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

// Positive Local Mutual Information weights, populated only for the lemmas
// that appear in the requested pair set. Demand driven on purpose: a full
// vocabulary PLMI table would dwarf the co-occurrence model itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlmiTable {
    rows: FnvHashMap<u32, Vec<(u32, f64)>>,
}

impl PlmiTable {
    pub fn row(&self, target: u32) -> Option<&[(u32, f64)]> {
        self.rows.get(&target).map(|row| row.as_slice())
    }

    pub fn insert_row(&mut self, target: u32, row: Vec<(u32, f64)>) {
        self.rows.insert(target, row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// observed * log10(observed / expected), clipped to zero from below
fn plmi_value(observed: u32, target_total: u64, context_total: u64, sample: u64) -> f64 {
    if sample == 0 {
        return 0.0;
    }
    let expected = (target_total as f64) * (context_total as f64) / (sample as f64);
    if expected == 0.0 {
        return 0.0;
    }
    let value = (observed as f64) * ((observed as f64) / expected).log10();
    if value < 0.0 {
        0.0
    } else {
        value
    }
}

// Builds the PLMI table for every lemma appearing in the pair set, as either
// member. Lemmas missing from the model are reported and skipped, they
// simply end up without a row; not every dataset word survives counting and
// that must not abort a batch run.
pub fn build_plmi(
    space: &Space,
    row_sums: &RowSums,
    pairs: &HashSet<(String, String)>,
) -> PlmiTable {
    let sample = sample_size(row_sums);
    let mut table = PlmiTable::default();

    for (hypo, hyper) in pairs {
        for lemma in [hypo, hyper] {
            let id = match space.vocab().get(lemma) {
                Some(id) => id,
                None => {
                    println!("{} not in the model, no PLMI row built", lemma);
                    continue;
                }
            };
            if table.rows.contains_key(&id) {
                continue;
            }
            let target_total = row_sums[id as usize];
            let row: Vec<(u32, f64)> = space
                .row(id)
                .iter()
                .map(|(context, observed)| {
                    let context_total = row_sums[*context as usize];
                    (*context, plmi_value(*observed, target_total, context_total, sample))
                })
                .collect();
            table.rows.insert(id, row);
        }
    }

    table
}
