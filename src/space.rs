
// imports
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

// a sparse context vector: context id -> co-occurrence count
pub type Row = FnvHashMap<u32, u32>;

// derived marginals, indexed by target id like the rows of the space
pub type RowSums = Vec<u64>;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Vocab {
    t2i: FnvHashMap<String, u32>,
    i2t: Vec<String>,
}

impl Vocab {
    pub fn new() -> Vocab {
        Vocab::default()
    }

    // returns the id of the lemma, interning it first if it is new
    pub fn intern(&mut self, lemma: &str) -> u32 {
        match self.t2i.get(lemma) {
            Some(id) => *id,
            None => {
                let id = self.i2t.len() as u32;
                self.t2i.insert(lemma.to_owned(), id);
                self.i2t.push(lemma.to_owned());
                id
            }
        }
    }

    pub fn get(&self, lemma: &str) -> Option<u32> {
        self.t2i.get(lemma).copied()
    }

    pub fn lemma(&self, id: u32) -> &str {
        &self.i2t[id as usize]
    }

    pub fn len(&self) -> usize {
        self.i2t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i2t.is_empty()
    }
}

// The distributional model of one corpus (or one corpus shard): an interned
// vocabulary, one sparse context row per target id, and the plain corpus
// frequency of every lemma. Frequencies count token occurrences and are
// related to, but not the same as, the row sums.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Space {
    vocab: Vocab,
    rows: Vec<Row>,
    word_freq: Vec<u64>,
}

impl Space {
    pub fn new() -> Space {
        Space::default()
    }

    pub fn vocab(&self) -> &Vocab {
        &self.vocab
    }

    pub fn intern(&mut self, lemma: &str) -> u32 {
        let id = self.vocab.intern(lemma);
        if id as usize == self.rows.len() {
            self.rows.push(Row::default());
            self.word_freq.push(0);
        }
        id
    }

    pub fn add_occurrence(&mut self, id: u32) {
        self.word_freq[id as usize] += 1;
    }

    pub fn add_cooccurrence(&mut self, target: u32, context: u32, count: u32) {
        *self.rows[target as usize].entry(context).or_insert(0) += count;
    }

    pub fn row(&self, target: u32) -> &Row {
        &self.rows[target as usize]
    }

    pub fn word_freq(&self, id: u32) -> u64 {
        self.word_freq[id as usize]
    }

    pub fn n_targets(&self) -> usize {
        self.rows.len()
    }

    // test-friendly entry point working on lemma strings directly, the
    // counter itself goes through the id based methods above
    pub fn bump(&mut self, target: &str, context: &str, count: u32) {
        let t = self.intern(target);
        let c = self.intern(context);
        self.add_cooccurrence(t, c, count);
    }

    // Fold `other` into self at (target, context) granularity, frequencies
    // summed on matching lemma and unioned otherwise. Ids of `other` are
    // remapped through this space's vocabulary, so shards can be counted
    // independently and combined in any order with an identical result.
    pub fn merge(&mut self, other: Space) {
        let mut remap: Vec<u32> = Vec::with_capacity(other.vocab.len());
        for id in 0..other.vocab.len() as u32 {
            remap.push(self.intern(other.vocab.lemma(id)));
        }

        for (id, freq) in other.word_freq.iter().enumerate() {
            self.word_freq[remap[id] as usize] += freq;
        }

        for (id, row) in other.rows.into_iter().enumerate() {
            let target = remap[id];
            for (context, count) in row {
                self.add_cooccurrence(target, remap[context as usize], count);
            }
        }
    }

    // n-ary combine over shard results, used after parallel counting
    pub fn combine(spaces: Vec<Space>) -> Space {
        let mut iter = spaces.into_iter();
        let mut combined = iter.next().unwrap_or_default();
        for space in iter {
            combined.merge(space);
        }
        combined
    }

    // rowSum[t] = sum over all context counts of t, for every target id
    pub fn row_sums(&self) -> RowSums {
        self.rows
            .iter()
            .map(|row| row.values().map(|c| *c as u64).sum())
            .collect()
    }
}

// total co-occurrence mass of the model, the PLMI sample size
pub fn sample_size(row_sums: &RowSums) -> u64 {
    row_sums.iter().sum()
}
