//! Term-weight (TF-IDF) index over film synopses
//!
//! Tokens are runs of two or more word characters after lower-casing, with
//! English stop-words removed. Weights are raw term frequency times the
//! smoothed inverse document frequency `ln((1 + n) / (1 + df)) + 1`, and
//! every vector is L2-normalized. Vocabulary columns follow sorted term
//! order, so two builds over the same corpus are bit-identical.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\b\w\w+\b").expect("valid regex");
    static ref ENGLISH_STOP_WORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","across","after","afterwards","again","against","all","almost","alone","along",
            "already","also","although","always","am","among","amongst","amoungst","amount","an","and","another",
            "any","anyhow","anyone","anything","anyway","anywhere","are","around","as","at",
            "back","be","became","because","become","becomes","becoming","been","before","beforehand","behind",
            "being","below","beside","besides","between","beyond","bill","both","bottom","but","by",
            "call","can","cannot","cant","co","con","could","couldnt","cry",
            "de","describe","detail","do","done","down","due","during",
            "each","eg","eight","either","eleven","else","elsewhere","empty","enough","etc","even","ever","every",
            "everyone","everything","everywhere","except",
            "few","fifteen","fifty","fill","find","fire","first","five","for","former","formerly","forty","found",
            "four","from","front","full","further",
            "get","give","go",
            "had","has","hasnt","have","he","hence","her","here","hereafter","hereby","herein","hereupon","hers",
            "herself","him","himself","his","how","however","hundred",
            "i","ie","if","in","inc","indeed","interest","into","is","it","its","itself",
            "keep",
            "last","latter","latterly","least","less","ltd",
            "made","many","may","me","meanwhile","might","mill","mine","more","moreover","most","mostly","move",
            "much","must","my","myself",
            "name","namely","neither","never","nevertheless","next","nine","no","nobody","none","noone","nor",
            "not","nothing","now","nowhere",
            "of","off","often","on","once","one","only","onto","or","other","others","otherwise","our","ours",
            "ourselves","out","over","own",
            "part","per","perhaps","please","put",
            "rather","re",
            "same","see","seem","seemed","seeming","seems","serious","several","she","should","show","side",
            "since","sincere","six","sixty","so","some","somehow","someone","something","sometime","sometimes",
            "somewhere","still","such","system",
            "take","ten","than","that","the","their","them","themselves","then","thence","there","thereafter",
            "thereby","therefore","therein","thereupon","these","they","thick","thin","third","this","those",
            "though","three","through","throughout","thru","thus","to","together","too","top","toward","towards",
            "twelve","twenty","two",
            "un","under","until","up","upon","us",
            "very","via",
            "was","we","well","were","what","whatever","when","whence","whenever","where","whereafter","whereas",
            "whereby","wherein","whereupon","wherever","whether","which","while","whither","who","whoever",
            "whole","whom","whose","why","will","with","within","without","would",
            "yet","you","your","yours","yourself","yourselves",
        ];
        words.iter().copied().collect()
    };
}

/// Splits text into index terms
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: HashSet<String>,
}

impl Tokenizer {
    /// Tokenizer with the English stop-word list
    pub fn english() -> Self {
        Self::with_stop_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    pub fn with_stop_words<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stop_words: stop_words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TOKEN_RE
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::english()
    }
}

/// Sorted set of terms; a term's column is its rank in that order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    fn from_terms(terms: BTreeSet<String>) -> Self {
        Self {
            terms: terms.into_iter().collect(),
        }
    }

    pub fn column(&self, term: &str) -> Option<u32> {
        self.terms
            .binary_search_by(|candidate| candidate.as_str().cmp(term))
            .ok()
            .map(|column| column as u32)
    }

    pub fn term(&self, column: u32) -> Option<&str> {
        self.terms.get(column as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Sparse weight vector, entries sorted by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermWeightVector {
    entries: Vec<(u32, f64)>,
}

impl TermWeightVector {
    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    pub fn weight(&self, column: u32) -> f64 {
        self.entries
            .binary_search_by_key(&column, |&(c, _)| c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// True for synopses with no indexable terms
    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, w)| w == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &TermWeightVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ca, wa) = self.entries[i];
            let (cb, wb) = other.entries[j];
            match ca.cmp(&cb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// One normalized vector per corpus position, plus the shared vocabulary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermWeightIndex {
    vocabulary: Vocabulary,
    vectors: Vec<TermWeightVector>,
}

impl TermWeightIndex {
    pub fn build<S: AsRef<str>>(corpus: &[S]) -> Self {
        Self::build_with(corpus, &Tokenizer::english())
    }

    pub fn build_with<S: AsRef<str>>(corpus: &[S], tokenizer: &Tokenizer) -> Self {
        let documents: Vec<Vec<String>> = corpus
            .iter()
            .map(|text| tokenizer.tokenize(text.as_ref()))
            .collect();

        let vocabulary = Vocabulary::from_terms(documents.iter().flatten().cloned().collect());

        let counts: Vec<BTreeMap<u32, u32>> = documents
            .iter()
            .map(|tokens| {
                let mut counts = BTreeMap::new();
                for token in tokens {
                    if let Some(column) = vocabulary.column(token) {
                        *counts.entry(column).or_insert(0) += 1;
                    }
                }
                counts
            })
            .collect();

        let mut document_frequency = vec![0u32; vocabulary.len()];
        for doc in &counts {
            for &column in doc.keys() {
                document_frequency[column as usize] += 1;
            }
        }

        let n = corpus.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = counts
            .into_iter()
            .map(|doc| {
                let mut entries: Vec<(u32, f64)> = doc
                    .into_iter()
                    .map(|(column, tf)| (column, tf as f64 * idf[column as usize]))
                    .collect();
                let norm = entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for entry in entries.iter_mut() {
                        entry.1 /= norm;
                    }
                }
                TermWeightVector { entries }
            })
            .collect();

        Self { vocabulary, vectors }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vector(&self, position: usize) -> Option<&TermWeightVector> {
        self.vectors.get(position)
    }

    pub fn vectors(&self) -> &[TermWeightVector] {
        &self.vectors
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}
