//! Word frequency extraction over article bodies.

use crate::dataset::Dataset;
use crate::models::WordCount;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Tokens must occur strictly more often than this to be kept.
pub const MIN_TOKEN_COUNT: usize = 5;

/// Token → occurrence count, thresholded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WordFrequencies(BTreeMap<String, usize>);

impl WordFrequencies {
    #[allow(dead_code)] // Lookup utility
    pub fn get(&self, word: &str) -> Option<usize> {
        self.0.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Words by descending count (ties alphabetical), without stopwords,
    /// capped at `limit`.
    pub fn ranked(&self, limit: usize, stopwords: &[String]) -> Vec<WordCount> {
        let stop: HashSet<String> = stopwords.iter().map(|w| w.to_lowercase()).collect();

        let mut words: Vec<WordCount> = self
            .0
            .iter()
            .filter(|(word, _)| !stop.contains(word.as_str()))
            .map(|(word, count)| WordCount {
                word: word.clone(),
                count: *count,
            })
            .collect();

        // BTreeMap iteration is alphabetical and the sort is stable.
        words.sort_by_key(|w| std::cmp::Reverse(w.count));
        words.truncate(limit);
        words
    }
}

/// Split text into lowercase alphanumeric runs.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Count every token across the given bodies, without thresholding.
pub fn count_tokens<'a, I>(bodies: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for body in bodies {
        for token in tokenize(body) {
            *counts.entry(token).or_default() += 1;
        }
    }

    counts
}

/// Count tokens and keep those occurring more than `threshold` times.
pub fn token_frequencies<'a, I>(bodies: I, threshold: usize) -> WordFrequencies
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = count_tokens(bodies);
    counts.retain(|_, count| *count > threshold);
    WordFrequencies(counts)
}

/// Word frequencies over every article body of one candidate, ignoring any
/// month range. Returns the number of articles that had a body as well.
pub fn candidate_word_frequencies(dataset: &Dataset, candidate: &str) -> (usize, WordFrequencies) {
    let bodies: Vec<&str> = dataset
        .articles_for(candidate)
        .filter_map(|a| a.body.as_deref())
        .collect();

    let frequencies = token_frequencies(bodies.iter().copied(), MIN_TOKEN_COUNT);
    (bodies.len(), frequencies)
}
