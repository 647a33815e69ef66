//! RAKE (Rapid Automatic Keyword Extraction) topic ranking.
//!
//! Text is cut into candidate phrases at punctuation and stopwords. Each word
//! scores `degree / frequency`, where degree counts the words of every phrase
//! the word appears in, and a phrase scores the sum of its words. Phrases are
//! lowercased, deduplicated, and returned best first; equal scores keep their
//! order of first appearance.

use super::TopicRanker;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Phrases longer than this are dropped rather than ranked.
pub const DEFAULT_MAX_PHRASE_WORDS: usize = 4;

static CLAUSE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?,;:()\[\]{}"“”‘«»—–|/\n\t]+"#).unwrap());

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}'’&-]*").unwrap());

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "couldn't", "did", "didn't", "do",
        "does", "doesn't", "doing", "don't", "down", "during", "each", "few", "for", "from",
        "further", "had", "hadn't", "has", "hasn't", "have", "haven't", "having", "he", "her",
        "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is",
        "isn't", "it", "it's", "its", "itself", "just", "me", "more", "most", "my", "myself",
        "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our",
        "ours", "ourselves", "out", "over", "own", "said", "same", "says", "she", "should",
        "so", "some", "such", "than", "that", "that's", "the", "their", "theirs", "them",
        "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
        "under", "until", "up", "very", "was", "wasn't", "we", "were", "weren't", "what",
        "when", "where", "which", "while", "who", "whom", "why", "will", "with", "won't",
        "would", "wouldn't", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, Copy)]
pub struct RakeRanker {
    max_phrase_words: usize,
}

impl Default for RakeRanker {
    fn default() -> Self {
        Self {
            max_phrase_words: DEFAULT_MAX_PHRASE_WORDS,
        }
    }
}

impl RakeRanker {
    pub fn new(max_phrase_words: usize) -> Self {
        Self {
            max_phrase_words: max_phrase_words.max(1),
        }
    }

    /// Candidate phrases in order of appearance, duplicates included.
    fn candidate_phrases(&self, text: &str) -> Vec<Vec<String>> {
        let lower = text.to_lowercase().replace('’', "'");
        let mut phrases = Vec::new();

        for clause in CLAUSE_BREAK.split(&lower) {
            let mut current: Vec<String> = Vec::new();
            for token in TOKEN.find_iter(clause) {
                let word = token.as_str().trim_matches(|c: char| c == '-' || c == '\'');
                if word.is_empty() || STOPWORDS.contains(word) {
                    if !current.is_empty() {
                        phrases.push(std::mem::take(&mut current));
                    }
                } else {
                    current.push(word.to_string());
                }
            }
            if !current.is_empty() {
                phrases.push(current);
            }
        }

        phrases.retain(|p| p.len() <= self.max_phrase_words);
        phrases
    }
}

impl TopicRanker for RakeRanker {
    fn rank(&self, text: &str, top_k: usize) -> Vec<String> {
        let phrases = self.candidate_phrases(text);

        let mut frequency: HashMap<&str, usize> = HashMap::new();
        let mut degree: HashMap<&str, usize> = HashMap::new();
        for phrase in &phrases {
            for word in phrase {
                *frequency.entry(word.as_str()).or_insert(0) += 1;
                *degree.entry(word.as_str()).or_insert(0) += phrase.len();
            }
        }

        let word_score = |word: &str| degree[word] as f64 / frequency[word] as f64;

        phrases
            .iter()
            .map(|phrase| phrase.join(" "))
            .unique()
            .map(|joined| {
                let score: f64 = joined.split(' ').map(word_score).sum();
                (joined, score)
            })
            // stable sort keeps first-seen order among equal scores
            .sorted_by(|a, b| b.1.total_cmp(&a.1))
            .take(top_k)
            .map(|(phrase, _)| phrase)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrases_split_on_stopwords_and_punctuation() {
        let phrases = RakeRanker::default()
            .candidate_phrases("Tesla opened a new gigafactory in Berlin, and the plant employs workers.");
        let joined: Vec<String> = phrases.iter().map(|p| p.join(" ")).collect();
        assert_eq!(
            joined,
            vec!["tesla opened", "new gigafactory", "berlin", "plant employs workers"]
        );
    }

    #[test]
    fn test_longer_phrases_score_higher() {
        let topics = RakeRanker::default().rank(
            "Tesla opened a new gigafactory in Berlin, and the plant employs workers.",
            3,
        );
        assert_eq!(
            topics,
            vec!["plant employs workers", "tesla opened", "new gigafactory"]
        );
    }

    #[test]
    fn test_repeated_phrases_are_deduplicated() {
        let topics = RakeRanker::default().rank(
            "Electric vehicles sell well. Electric vehicles are popular. Batteries matter.",
            5,
        );
        assert_eq!(topics.iter().filter(|t| *t == "electric vehicles").count(), 1);
        assert!(topics.contains(&"batteries matter".to_string()));
    }

    #[test]
    fn test_overlong_phrases_are_dropped() {
        let ranker = RakeRanker::new(2);
        let topics = ranker.rank("quarterly revenue growth exceeded expectations. Shares rose.", 5);
        assert_eq!(topics, vec!["shares rose"]);
    }

    #[test]
    fn test_top_k_and_empty_input() {
        let ranker = RakeRanker::default();
        assert!(ranker.rank("", 3).is_empty());
        assert!(ranker.rank("the and of to", 3).is_empty());
        assert_eq!(ranker.rank("alpha. beta. gamma. delta.", 2), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_curly_apostrophes_match_stopwords() {
        let topics = RakeRanker::default().rank("It’s autopilot software", 3);
        assert_eq!(topics, vec!["autopilot software"]);
    }
}
