
// imports
use crate::space::Space;

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::str::FromStr;

use flate2::read::GzDecoder;
use rayon::prelude::*;

const SENTENCE_START: &str = "<s>";
const SENTENCE_END: &str = "</s>";
const UNKNOWN_LEMMA: &str = "<unknown>";

// The two supported tagged-corpus layouts. Both are tab separated with at
// least three columns per token line, they differ in column order and in the
// POS prefixes that mark nouns / verbs / adjectives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagScheme {
    // surface TAB tag TAB lemma (deWaC, STTS tags)
    DeWac,
    // surface TAB lemma TAB tag (pUkWaC, Penn tags)
    PUkWac,
}

impl FromStr for TagScheme {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dewac" => Ok(TagScheme::DeWac),
            "pukwac" => Ok(TagScheme::PUkWac),
            _ => Err(format!("unrecognized corpus format: {}", s).into()),
        }
    }
}

// outcome of looking at one token line
enum Token {
    // "<lemma> <pos-initial>" key of a retained noun/verb/adjective
    Lemma(String),
    // retained position whose lemma is unknown: occupies a window slot
    // but is never counted
    Unknown,
}

impl TagScheme {
    // parses one token line; None for malformed lines and non-content tags,
    // both dropped silently
    fn parse(&self, line: &str) -> Option<Token> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 {
            return None;
        }
        let (lemma, tag) = match self {
            TagScheme::DeWac => (fields[2], fields[1]),
            TagScheme::PUkWac => (fields[1], fields[2]),
        };
        let retained = match self {
            TagScheme::DeWac => {
                tag.starts_with('N') || tag.starts_with('V') || tag.starts_with("ADJ")
            }
            TagScheme::PUkWac => {
                tag.starts_with('N') || tag.starts_with('V') || tag.starts_with('J')
            }
        };
        if !retained {
            return None;
        }
        if lemma.starts_with(UNKNOWN_LEMMA) {
            return Some(Token::Unknown);
        }
        let pos_initial = tag[..1].to_lowercase();
        Some(Token::Lemma(format!("{} {}", lemma, pos_initial)))
    }
}

pub struct Counts {}

impl Counts {
    fn open_corpus(file_path: &str) -> Result<Box<dyn BufRead>, Box<dyn Error>> {
        let f = File::open(file_path)?;
        if file_path.ends_with(".gz") {
            Ok(Box::new(BufReader::new(GzDecoder::new(f))))
        } else {
            Ok(Box::new(BufReader::new(f)))
        }
    }

    // counts one finished sentence into the space. Every retained position
    // pairs with every other retained position at distance 1..=window, left
    // and right scans independently, no cross-sentence pairs. Unknown
    // positions are holes: they widen distances but contribute nothing.
    fn count_sentence(space: &mut Space, sentence: &[Option<u32>], window: usize) {
        let n = sentence.len();
        for i in 0..n {
            let target = match sentence[i] {
                Some(id) => id,
                None => continue,
            };

            // corpus frequency, once per token occurrence
            space.add_occurrence(target);

            // left scan
            for j in (i.saturating_sub(window)..i).rev() {
                if let Some(context) = sentence[j] {
                    space.add_cooccurrence(target, context, 1);
                }
            }
            // right scan
            for j in i + 1..n.min(i + window + 1) {
                if let Some(context) = sentence[j] {
                    space.add_cooccurrence(target, context, 1);
                }
            }
        }
    }

    // Single streaming pass over one tagged corpus stream. Memory grows with
    // the accumulated vocabulary and context breadth, not with corpus size.
    // Lines are read as bytes and decoded lossily: the wac corpora are not
    // clean UTF-8 throughout, and a stray byte must not fail the shard.
    pub fn count_stream<R: BufRead>(
        mut reader: R,
        window: usize,
        scheme: TagScheme,
    ) -> Result<Space, Box<dyn Error>> {
        let mut space = Space::new();
        let mut sentence: Vec<Option<u32>> = Vec::new();
        let mut buf: Vec<u8> = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim();

            if line == SENTENCE_START {
                sentence.clear();
                continue;
            }
            if line == SENTENCE_END {
                Counts::count_sentence(&mut space, &sentence, window);
                sentence.clear();
                continue;
            }

            match scheme.parse(line) {
                Some(Token::Lemma(key)) => {
                    let id = space.intern(&key);
                    sentence.push(Some(id));
                }
                Some(Token::Unknown) => sentence.push(None),
                None => {}
            }
        }

        Ok(space)
    }

    pub fn count_file(
        file_path: &str,
        window: usize,
        scheme: TagScheme,
    ) -> Result<Space, Box<dyn Error>> {
        let reader = Counts::open_corpus(file_path)?;
        Counts::count_stream(reader, window, scheme)
    }

    // counts every shard in parallel and combines the partial spaces. The
    // combine step is order free (see space::merge), so the shards are just
    // a partition of the corpus.
    pub fn count_shards(
        file_paths: &[String],
        window: usize,
        scheme: TagScheme,
    ) -> Result<Space, Box<dyn Error>> {
        let shards: Result<Vec<Space>, String> = file_paths
            .par_iter()
            .map(|path| {
                println!("counting shard {}", path);
                Counts::count_file(path, window, scheme).map_err(|e| format!("{}: {}", path, e))
            })
            .collect();

        Ok(Space::combine(shards?))
    }
}
