
// imports
use crate::plmi::PlmiTable;
use crate::space::Space;

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

// The persistence seam of the pipeline: every intermediate structure knows
// how to save and load itself under a path stem, the callers never deal
// with formats. Binary artifacts go through gzipped bincode, result tables
// through CSV, datasets come in as TSV pair files.

pub fn read_input<R: ReadFile>(file_path: &str) -> Result<<R as ReadFile>::Item, Box<dyn Error>> {
    let input = <R as ReadFile>::read_file(file_path)?;
    Ok(input)
}

pub fn save_output<S: SaveFile>(
    output_dir: &str,
    file_name: &str,
    item: &S,
) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(output_dir)?;
    item.save_file(output_dir, file_name)?;
    return Ok(());
}

pub trait ReadFile {
    type Item;
    fn read_file(file_path: &str) -> Result<Self::Item, Box<dyn Error>>;
}

pub trait SaveFile {
    fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), Box<dyn Error>>;
}

fn save_bin_gz<T: serde::Serialize>(
    item: &T,
    output_dir: &str,
    file_name: &str,
) -> Result<(), Box<dyn Error>> {
    let out = output_dir.to_string() + "/" + file_name + ".bin.gz";
    let f = BufWriter::new(File::create(out)?);
    let mut writer = GzEncoder::new(f, Compression::default());
    bincode::serialize_into(&mut writer, item)?;
    writer.finish()?;
    Ok(())
}

fn read_bin_gz<T: serde::de::DeserializeOwned>(file_path: &str) -> Result<T, Box<dyn Error>> {
    let in_file = file_path.to_string() + ".bin.gz";
    let f = BufReader::new(File::open(in_file)?);
    let reader = GzDecoder::new(f);
    let item = bincode::deserialize_from(reader)?;
    Ok(item)
}

impl SaveFile for Space {
    fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), Box<dyn Error>> {
        save_bin_gz(self, output_dir, file_name)
    }
}

impl ReadFile for Space {
    type Item = Self;
    fn read_file(file_path: &str) -> Result<Self::Item, Box<dyn Error>> {
        read_bin_gz(file_path)
    }
}

impl SaveFile for Vec<u64> {
    fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), Box<dyn Error>> {
        save_bin_gz(self, output_dir, file_name)
    }
}

impl ReadFile for Vec<u64> {
    type Item = Self;
    fn read_file(file_path: &str) -> Result<Self::Item, Box<dyn Error>> {
        read_bin_gz(file_path)
    }
}

impl SaveFile for PlmiTable {
    fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), Box<dyn Error>> {
        save_bin_gz(self, output_dir, file_name)
    }
}

impl ReadFile for PlmiTable {
    type Item = Self;
    fn read_file(file_path: &str) -> Result<Self::Item, Box<dyn Error>> {
        read_bin_gz(file_path)
    }
}

// a measure result table, one row per scored ordered pair
impl SaveFile for HashMap<(String, String), f64> {
    fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), Box<dyn Error>> {
        let out = output_dir.to_string() + "/" + file_name + ".csv";
        let mut wrt = csv::WriterBuilder::new().from_path(out)?;
        wrt.write_record(&["Word1", "Word2", "Score"])?;

        for ((word1, word2), score) in self {
            wrt.serialize((word1, word2, score))?;
        }
        wrt.flush()?;
        Ok(())
    }
}

impl ReadFile for HashMap<(String, String), f64> {
    type Item = Self;
    fn read_file(file_path: &str) -> Result<Self::Item, Box<dyn Error>> {
        let in_file = file_path.to_string() + ".csv";
        let mut rdr = csv::ReaderBuilder::new().from_path(in_file)?;
        let mut results = HashMap::new();
        for record in rdr.deserialize() {
            let (word1, word2, score): (String, String, f64) = record?;
            results.insert((word1, word2), score);
        }
        Ok(results)
    }
}

// a dataset of (hyponym, hypernym) lemma pairs, one tab separated pair per
// line; lines with fewer than two fields are skipped like malformed corpus
// tokens
impl ReadFile for HashSet<(String, String)> {
    type Item = Self;
    fn read_file(file_path: &str) -> Result<Self::Item, Box<dyn Error>> {
        let f = BufReader::new(File::open(file_path)?);
        let mut pairs = HashSet::new();
        for line in f.lines() {
            let line = line?;
            let mut fields = line.split('\t');
            match (fields.next(), fields.next()) {
                (Some(hypo), Some(hyper)) => {
                    pairs.insert((hypo.trim().to_owned(), hyper.trim().to_owned()));
                }
                _ => {}
            }
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {

    use super::{read_input, save_output};
    use crate::space::Space;
    use std::collections::{HashMap, HashSet};
    use std::fs;
    use std::io::Write;

    fn temp_dir(name: &str) -> String {
        let dir = std::env::temp_dir().join("hyperdsm_files_tests").join(name);
        fs::create_dir_all(&dir).unwrap();
        dir.display().to_string()
    }

    #[test]
    fn space_roundtrips_through_gzipped_bincode() {
        let dir = temp_dir("space");
        let mut space = Space::new();
        space.bump("cat n", "animal n", 5);
        space.bump("animal n", "cat n", 5);

        save_output(&dir, "space", &space).unwrap();
        let loaded = read_input::<Space>(&(dir.clone() + "/space")).unwrap();

        let cat = loaded.vocab().get("cat n").unwrap();
        let animal = loaded.vocab().get("animal n").unwrap();
        assert_eq!(loaded.row(cat).get(&animal), Some(&5));
        assert_eq!(loaded.row_sums(), space.row_sums());
    }

    #[test]
    fn row_sums_roundtrip() {
        let dir = temp_dir("rowsums");
        let row_sums: Vec<u64> = vec![8, 9, 0, 3];

        save_output(&dir, "rowSums", &row_sums).unwrap();
        let loaded = read_input::<Vec<u64>>(&(dir.clone() + "/rowSums")).unwrap();
        assert_eq!(loaded, row_sums);
    }

    #[test]
    fn result_tables_roundtrip_through_csv() {
        let dir = temp_dir("results");
        let mut results = HashMap::new();
        results.insert(("cat n".to_string(), "animal n".to_string()), 0.75);
        results.insert(("animal n".to_string(), "cat n".to_string()), -1.0);

        save_output(&dir, "weedsprec", &results).unwrap();
        let loaded =
            read_input::<HashMap<(String, String), f64>>(&(dir.clone() + "/weedsprec")).unwrap();
        assert_eq!(loaded, results);
    }

    #[test]
    fn datasets_parse_tab_separated_pairs() {
        let dir = temp_dir("dataset");
        let path = dir.clone() + "/pairs.tsv";
        let mut f = fs::File::create(&path).unwrap();
        write!(f, "cat n\tanimal n\ndog n\tanimal n\nmalformed line\n").unwrap();

        let pairs = read_input::<HashSet<(String, String)>>(&path).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&("cat n".to_string(), "animal n".to_string())));
    }
}
