
// imports
use crate::config::Config;
use crate::cooccurrence::{Counts, TagScheme};
use crate::files_handling;
use crate::invcl::inv_cl;
use crate::plmi::{build_plmi, PlmiTable};
use crate::slqs::Slqs;
use crate::slqs_row::slqs_row;
use crate::space::{RowSums, Space};
use crate::weeds_prec::weeds_prec;

use core::panic;
use std::collections::{HashMap, HashSet};
use std::env;
use std::error::Error;
use std::time::Instant;

use fnv::FnvHashMap;
use rayon::ThreadPoolBuilder;

pub struct Pipeline {}

impl Pipeline {
    // runs the main procedure of 4 steps -
    // -> configuration of arguments
    // -> co-occurrence counting over the corpus shards (or reload)
    // -> row sums, dataset filtering, PLMI
    // -> the requested hypernymy measures, each saved as a result table

    pub fn run() {
        println!("entering program...");
        let args: Vec<String> = env::args().collect();

        println!("building parameters...");
        let params = match Config::new(&args) {
            Ok(config) => config.get_params(),
            Err(e) => panic!("{}", e),
        };
        println!("{}", params);

        if let Err(e) = ThreadPoolBuilder::new()
            .num_threads(params.num_threads)
            .build_global()
        {
            panic!("{}", e)
        }

        let scheme: TagScheme = match params.corpus_format.parse() {
            Ok(scheme) => scheme,
            Err(e) => panic!("{}", e),
        };

        // count the corpus shards if not saved and given already
        let space = if params.saved_space.unwrap_or(false) {
            println!("loading saved space...");
            match files_handling::read_input::<Space>(&(params.output_dir.clone() + "/space")) {
                Ok(space) => space,
                Err(e) => panic!("{}", e),
            }
        } else {
            let timer = Instant::now();
            println!("starting corpus counting...");
            let space = match Counts::count_shards(&params.corpus_files, params.window_size, scheme)
            {
                Ok(space) => space,
                Err(e) => panic!("{}", e),
            };
            if let Err(e) = files_handling::save_output(&params.output_dir, "space", &space) {
                panic!("{}", e)
            }
            println!(
                "finished counting and saved space, {} lemmas, took {} seconds ...",
                space.vocab().len(),
                timer.elapsed().as_secs()
            );
            space
        };

        let row_sums = space.row_sums();
        if let Err(e) = files_handling::save_output(&params.output_dir, "rowSums", &row_sums) {
            panic!("{}", e)
        }

        // union of all given datasets
        println!("loading data set(s)...");
        let mut pairs: HashSet<(String, String)> = HashSet::new();
        for dataset_file in &params.dataset_files {
            match files_handling::read_input::<HashSet<(String, String)>>(dataset_file) {
                Ok(dataset) => pairs.extend(dataset),
                Err(e) => panic!("{}", e),
            }
        }
        println!("loaded {} unique pairs", pairs.len());

        let id_pairs = Pipeline::filter_pairs(&space, &row_sums, &pairs);

        // PLMI is only needed by second-order SLQS
        let plmi = if params.measures.iter().any(|m| m == "slqs") {
            let timer = Instant::now();
            println!("calculating PLMI values...");
            let plmi = build_plmi(&space, &row_sums, &pairs);
            if let Err(e) = files_handling::save_output(&params.output_dir, "plmi", &plmi) {
                panic!("{}", e)
            }
            println!(
                "calculated PLMI for {} lemmas, took {} seconds ...",
                plmi.len(),
                timer.elapsed().as_secs()
            );
            Some(plmi)
        } else {
            None
        };

        for measure in &params.measures {
            let timer = Instant::now();
            println!("calculating {}...", measure);
            let results =
                match Pipeline::run_measure(measure, &space, &row_sums, plmi.as_ref(), &id_pairs, params.top_n) {
                    Ok(results) => results,
                    Err(e) => panic!("{}", e),
                };
            let named = Pipeline::to_lemma_keys(&space, results);
            if let Err(e) = files_handling::save_output(&params.output_dir, measure, &named) {
                panic!("{}", e)
            }
            println!(
                "calculated and saved {}, {} scored directions, took {} seconds ...",
                measure,
                named.len(),
                timer.elapsed().as_secs()
            );
        }
    }

    // Drops pairs with an out-of-vocabulary member, or a member without any
    // co-occurrences, before any measure runs; the measures themselves
    // treat such words as contract violations. Sorting the survivors keeps
    // every downstream evaluation order deterministic.
    fn filter_pairs(
        space: &Space,
        row_sums: &RowSums,
        pairs: &HashSet<(String, String)>,
    ) -> Vec<(u32, u32)> {
        let mut id_pairs: Vec<(u32, u32)> = Vec::with_capacity(pairs.len());
        let mut dropped = 0usize;
        for (hypo, hyper) in pairs {
            match (space.vocab().get(hypo), space.vocab().get(hyper)) {
                (Some(hypo_id), Some(hyper_id))
                    if row_sums[hypo_id as usize] > 0 && row_sums[hyper_id as usize] > 0 =>
                {
                    id_pairs.push((hypo_id, hyper_id))
                }
                _ => {
                    println!(
                        "dropping pair ({}, {}), member not in the model or without co-occurrences",
                        hypo, hyper
                    );
                    dropped += 1;
                }
            }
        }
        if dropped > 0 {
            println!("dropped {} of {} pairs", dropped, pairs.len());
        }
        id_pairs.sort_unstable();
        id_pairs
    }

    fn run_measure(
        measure: &str,
        space: &Space,
        row_sums: &RowSums,
        plmi: Option<&PlmiTable>,
        id_pairs: &[(u32, u32)],
        top_n: usize,
    ) -> Result<FnvHashMap<(u32, u32), f64>, Box<dyn Error>> {
        match measure {
            "weedsprec" => weeds_prec(space, row_sums, id_pairs),
            "invcl" => inv_cl(space, row_sums, id_pairs),
            "slqsrow" => Ok(slqs_row(space, row_sums, id_pairs)),
            "slqs" => {
                let plmi = plmi.ok_or("slqs requested without a PLMI table")?;
                Slqs::new(space, row_sums, plmi, top_n).run(id_pairs)
            }
            _ => Err(format!("unrecognized measure: {}", measure).into()),
        }
    }

    fn to_lemma_keys(
        space: &Space,
        results: FnvHashMap<(u32, u32), f64>,
    ) -> HashMap<(String, String), f64> {
        results
            .into_iter()
            .map(|((word1, word2), score)| {
                (
                    (
                        space.vocab().lemma(word1).to_owned(),
                        space.vocab().lemma(word2).to_owned(),
                    ),
                    score,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {

    use super::Pipeline;
    use crate::space::Space;
    use std::collections::HashSet;

    #[test]
    fn filtering_drops_out_of_vocabulary_pairs_and_sorts() {
        let mut space = Space::new();
        space.bump("cat n", "fur n", 1);
        space.bump("animal n", "fur n", 1);
        space.bump("dog n", "fur n", 1);
        let row_sums = space.row_sums();

        let mut pairs = HashSet::new();
        pairs.insert(("dog n".to_string(), "animal n".to_string()));
        pairs.insert(("cat n".to_string(), "animal n".to_string()));
        pairs.insert(("unicorn n".to_string(), "animal n".to_string()));

        let id_pairs = Pipeline::filter_pairs(&space, &row_sums, &pairs);
        assert_eq!(id_pairs.len(), 2);
        let mut sorted = id_pairs.clone();
        sorted.sort_unstable();
        assert_eq!(id_pairs, sorted);
    }

    #[test]
    fn filtering_drops_pairs_with_a_zero_row_sum_member() {
        // a word seen only in one-token sentences is in the vocabulary with
        // an empty row; its pairs must never reach the measures
        let mut space = Space::new();
        space.bump("cat n", "fur n", 1);
        space.bump("fur n", "cat n", 1);
        let lonely = space.intern("lonely n");
        space.add_occurrence(lonely);
        let row_sums = space.row_sums();
        assert_eq!(row_sums[lonely as usize], 0);

        let mut pairs = HashSet::new();
        pairs.insert(("lonely n".to_string(), "cat n".to_string()));
        pairs.insert(("cat n".to_string(), "fur n".to_string()));

        let id_pairs = Pipeline::filter_pairs(&space, &row_sums, &pairs);
        assert_eq!(id_pairs.len(), 1);
        let cat = space.vocab().get("cat n").unwrap();
        let fur = space.vocab().get("fur n").unwrap();
        assert_eq!(id_pairs[0], (cat, fur));

        // the surviving pairs go through every measure without a
        // contract violation
        let plmi = crate::plmi::build_plmi(&space, &row_sums, &pairs);
        for measure in crate::config::ALL_MEASURES {
            assert!(Pipeline::run_measure(
                measure,
                &space,
                &row_sums,
                Some(&plmi),
                &id_pairs,
                10
            )
            .is_ok());
        }
    }

    #[test]
    fn measure_dispatch_covers_every_configured_name() {
        let mut space = Space::new();
        space.bump("cat n", "fur n", 2);
        space.bump("cat n", "pet n", 2);
        space.bump("animal n", "fur n", 1);
        space.bump("animal n", "wild n", 3);
        let row_sums = space.row_sums();

        let mut pairs = HashSet::new();
        pairs.insert(("cat n".to_string(), "animal n".to_string()));
        let id_pairs = Pipeline::filter_pairs(&space, &row_sums, &pairs);
        let plmi = crate::plmi::build_plmi(&space, &row_sums, &pairs);

        for measure in crate::config::ALL_MEASURES {
            let results =
                Pipeline::run_measure(measure, &space, &row_sums, Some(&plmi), &id_pairs, 10)
                    .unwrap();
            assert_eq!(results.len(), 2);
            let named = Pipeline::to_lemma_keys(&space, results);
            assert!(named.contains_key(&("cat n".to_string(), "animal n".to_string())));
        }
        assert!(
            Pipeline::run_measure("cosine", &space, &row_sums, None, &id_pairs, 10).is_err()
        );
    }
}
