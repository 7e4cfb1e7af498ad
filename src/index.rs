use std::collections::HashMap;

use crate::document::{Document, DocumentId};

/// Fixed window length for index terms.
const TERM_LEN: usize = 3;

/// Maximum number of results returned by a search.
pub const MAX_RESULTS: usize = 5;

type Term = [u8; TERM_LEN];

/// Lowercase `text` and feed every overlapping 3-byte window to `f`.
///
/// Windows advance one byte at a time, so a single character edit shifts but
/// does not invalidate most surrounding trigrams. Fields shorter than the
/// window produce no terms at all.
fn for_each_term(text: &str, mut f: impl FnMut(Term)) {
    let lowered = text.to_lowercase();
    for window in lowered.as_bytes().windows(TERM_LEN) {
        let mut term = [0u8; TERM_LEN];
        term.copy_from_slice(window);
        f(term);
    }
}

/// In-memory trigram inverted index over the catalog.
///
/// Never persisted; the catalog rebuilds it from the store at startup. Scoring
/// is augmented term frequency times inverse document frequency, and every
/// search is a full scan over the known documents, which is fine at
/// personal-library scale.
#[derive(Debug, Default)]
pub struct TextIndex {
    /// Per-document term occurrence counts.
    term_counts: HashMap<DocumentId, HashMap<Term, u32>>,
    /// How many documents contain each term at least once.
    doc_freqs: HashMap<Term, u32>,
    /// Highest single-term count within each document, for TF normalization.
    max_counts: HashMap<DocumentId, u32>,
}

impl TextIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents known to the index.
    pub fn len(&self) -> usize {
        self.max_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.max_counts.is_empty()
    }

    /// Index a document's title, authors, and keywords.
    ///
    /// Each field is tokenized independently, so trigrams never span a field
    /// boundary. A document whose fields are all shorter than 3 bytes still
    /// becomes known (with a max count of 0) but can never match a query.
    pub fn insert(&mut self, id: DocumentId, document: &Document) {
        let mut counts: HashMap<Term, u32> = HashMap::new();

        let mut record = |term: Term| {
            *counts.entry(term).or_insert(0) += 1;
        };
        for_each_term(&document.title, &mut record);
        for author in &document.authors {
            for_each_term(author, &mut record);
        }
        for keyword in &document.keywords {
            for_each_term(keyword, &mut record);
        }

        let mut max_count = 0;
        for (&term, &count) in &counts {
            *self.doc_freqs.entry(term).or_insert(0) += 1;
            max_count = max_count.max(count);
        }

        self.term_counts.insert(id, counts);
        self.max_counts.insert(id, max_count);
    }

    /// Retract a document, reversing everything `insert` recorded.
    ///
    /// Document frequencies are decremented for every term the document
    /// contributed so IDF statistics stay accurate. Returns whether the id
    /// was known.
    pub fn delete(&mut self, id: DocumentId) -> bool {
        let Some(counts) = self.term_counts.remove(&id) else {
            return false;
        };

        for term in counts.keys() {
            if let Some(freq) = self.doc_freqs.get_mut(term) {
                *freq -= 1;
                if *freq == 0 {
                    self.doc_freqs.remove(term);
                }
            }
        }

        self.max_counts.remove(&id);
        true
    }

    /// Rank every known document against `query` and return at most
    /// [`MAX_RESULTS`] IDs by descending score.
    ///
    /// A query shorter than 3 bytes matches nothing. Query trigrams absent
    /// from the corpus contribute nothing, and only strictly positive scores
    /// make the shortlist. Equal scores are broken by preferring the lower
    /// document ID, so results are deterministic.
    ///
    /// Two consequences of the augmented-TF formula are worth knowing: a
    /// document containing none of the query's trigrams still earns the 0.5
    /// TF floor for every trigram the corpus does contain, so it can appear
    /// (low-ranked) in the shortlist; and a trigram present in every known
    /// document has an IDF of ln(1) = 0, which means a single-document
    /// corpus can never be retrieved at all.
    pub fn search(&self, query: &str) -> Vec<DocumentId> {
        if query.len() < TERM_LEN {
            return Vec::new();
        }

        let mut query_terms = Vec::new();
        for_each_term(query, |term| query_terms.push(term));

        let total = self.max_counts.len() as f32;
        let mut top: Vec<(f32, DocumentId)> = Vec::with_capacity(MAX_RESULTS);

        for (&id, &max_count) in &self.max_counts {
            if max_count == 0 {
                continue;
            }
            let counts = &self.term_counts[&id];

            let mut score = 0.0f32;
            for term in &query_terms {
                let Some(&doc_freq) = self.doc_freqs.get(term) else {
                    continue;
                };
                let term_count =
                    counts.get(term).copied().unwrap_or(0) as f32;
                let tf = 0.5 + 0.5 * (term_count / max_count as f32);
                let idf = (total / doc_freq as f32).ln();
                score += tf * idf;
            }

            if score <= 0.0 {
                continue;
            }

            let pos = top
                .iter()
                .position(|&(s, other)| {
                    score > s || (score == s && id < other)
                })
                .unwrap_or(top.len());
            if pos < MAX_RESULTS {
                top.insert(pos, (score, id));
                top.truncate(MAX_RESULTS);
            }
        }

        top.into_iter().map(|(_, id)| id).collect()
    }
}
