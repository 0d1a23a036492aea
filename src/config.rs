

use serde_json::Value;
use std::error::Error;
use std::fmt::Display;
use std::fs;

pub const ALL_MEASURES: [&str; 4] = ["weedsprec", "invcl", "slqsrow", "slqs"];

#[derive(Clone, Debug)]
pub struct Params {
    pub corpus_files: Vec<String>,
    pub corpus_format: String,
    pub window_size: usize,
    pub output_dir: String,
    pub dataset_files: Vec<String>,
    pub measures: Vec<String>,
    pub top_n: usize,
    pub num_threads: usize,
    pub saved_space: Option<bool>,
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "using hyper-params:
        corpus_files: {:?}
        corpus_format: {}
        window_size: {}
        output_dir: {}
        dataset_files: {:?}
        measures: {:?}
        top_n: {}
        num_threads: {}
        saved_space: {:?}",
            self.corpus_files,
            self.corpus_format,
            self.window_size,
            self.output_dir,
            self.dataset_files,
            self.measures,
            self.top_n,
            self.num_threads,
            self.saved_space
        )
    }
}

pub struct Config {
    params: Params,
}

impl Config {
    pub fn get_params(&self) -> Params {
        return self.params.clone();
    }

    pub fn new(args: &[String]) -> Result<Config, Box<dyn Error>> {
        if args.len() != 2 {
            return Err(format!("input should be a path to json file only").into());
        }

        // parse input json
        let f = fs::File::open(&args[1]).expect("cannot open json file");
        let json: Value = serde_json::from_reader(f).expect("cannot read json file");

        // validate required input and output entries
        let corpus_files = string_array(&json, "corpus_files")
            .expect("corpus_files was not supplied through json");
        let output_dir = json
            .get("output_dir")
            .expect("output_dir was not supplied through json")
            .as_str()
            .expect("cannot cast output path to string")
            .to_owned();
        let dataset_files = string_array(&json, "dataset_files")
            .expect("dataset_files was not supplied through json");

        // handle default vs input parameters
        let corpus_format = match json.get("corpus_format") {
            Some(corpus_format) => corpus_format
                .as_str()
                .expect("panic since given corpus_format is not a string")
                .to_owned(),
            None => "pukwac".to_owned(),
        };
        let window_size = match json.get("window_size") {
            Some(window_size) => window_size
                .as_i64()
                .expect("panic since given window_size is not numeric"),
            None => 5,
        };
        let top_n = match json.get("top_n") {
            Some(top_n) => top_n
                .as_i64()
                .expect("panic since given top_n is not numeric"),
            None => 50,
        };
        let num_threads = match json.get("num_threads") {
            Some(num_threads) => num_threads
                .as_i64()
                .expect("panic since given num_threads is not numeric"),
            None => 4,
        };
        let measures = match string_array(&json, "measures") {
            Some(measures) => measures,
            None => ALL_MEASURES.iter().map(|m| m.to_string()).collect(),
        };
        let saved_space = match json.get("saved_space") {
            Some(saved_space) => Some(
                saved_space
                    .as_bool()
                    .expect("panic since given saved_space is not boolean"),
            ),
            None => None,
        };

        if window_size <= 0 {
            return Err(format!("window_size must be positive, got {}", window_size).into());
        }
        if top_n <= 0 {
            return Err(format!("top_n must be positive, got {}", top_n).into());
        }
        if num_threads <= 0 {
            return Err(format!("num_threads must be positive, got {}", num_threads).into());
        }
        for measure in &measures {
            if !ALL_MEASURES.contains(&measure.as_str()) {
                return Err(format!("unrecognized measure: {}", measure).into());
            }
        }

        let params = Params {
            corpus_files: corpus_files,
            corpus_format: corpus_format,
            window_size: window_size as usize,
            output_dir: output_dir,
            dataset_files: dataset_files,
            measures: measures,
            top_n: top_n as usize,
            num_threads: num_threads as usize,
            saved_space: saved_space,
        };

        Ok(Self { params: params })
    }
}

fn string_array(json: &Value, key: &str) -> Option<Vec<String>> {
    json.get(key).map(|value| {
        value
            .as_array()
            .unwrap_or_else(|| panic!("panic since given {} is not an array", key))
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .unwrap_or_else(|| panic!("panic since {} entries must be strings", key))
                    .to_owned()
            })
            .collect()
    })
}
