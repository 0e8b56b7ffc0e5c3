// Tiered recipe recall
// Scores documents against a tag query with exact, substring and fuzzy tiers

pub mod text;

use crate::corpus::Corpus;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

pub use text::{JiebaTokenizer, Similarity, TokenSortRatio, Tokenizer, WhitespaceTokenizer};

/// Weight of a tag equal to a material key
pub const EXACT_WEIGHT: f64 = 5.0;
/// Weight of a token contained in (or containing) a material key
pub const SUBSTRING_WEIGHT: f64 = 1.0;
/// Minimum similarity for the fuzzy tier to contribute
pub const FUZZY_GATE: u8 = 30;

/// Characters separating tags in a query
pub const TAG_SEPARATORS: &[char] = &[',', '，', '|'];

/// Whether an exact hit for a tag stops the token tiers for that tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExactMatchPolicy {
    /// Exact and token tiers both contribute
    #[default]
    Accumulate,
    /// Token tiers are skipped once the tag matched exactly
    Suppress,
}

impl FromStr for ExactMatchPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accumulate" => Ok(Self::Accumulate),
            "suppress" => Ok(Self::Suppress),
            other => Err(Error::Config(format!(
                "Invalid exact match policy: {other} (expected accumulate or suppress)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecallOptions {
    pub exact_policy: ExactMatchPolicy,
}

/// A recalled document and its accumulated score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallMatch {
    pub recipe: String,
    pub score: f64,
}

/// Split a query into trimmed, non-empty tags
pub fn split_tags(query: &str) -> Vec<&str> {
    query
        .split(TAG_SEPARATORS)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Score accumulator; every contribution is rounded to two decimals
#[derive(Default)]
struct Scores<'c> {
    totals: HashMap<&'c str, f64>,
}

impl<'c> Scores<'c> {
    fn add(&mut self, names: &'c [String], weight: f64) {
        let weight = (weight * 100.0).round() / 100.0;
        for name in names {
            *self.totals.entry(name.as_str()).or_insert(0.0) += weight;
        }
    }

    fn add_one(&mut self, name: &'c str, weight: f64) {
        *self.totals.entry(name).or_insert(0.0) += weight;
    }

    /// Descending score, ties by ascending name
    fn ranked(self) -> Vec<RecallMatch> {
        let mut ranked: Vec<RecallMatch> = self
            .totals
            .into_iter()
            .map(|(recipe, score)| RecallMatch {
                recipe: recipe.to_string(),
                score,
            })
            .collect();
        ranked.sort_by(|a, b| match b.score.total_cmp(&a.score) {
            Ordering::Equal => a.recipe.cmp(&b.recipe),
            other => other,
        });
        ranked
    }
}

/// Ranks corpus documents for a free-text tag query.
///
/// The engine holds no corpus state; every call reads the snapshot it is given.
#[derive(Clone)]
pub struct RecallEngine {
    tokenizer: Arc<dyn Tokenizer>,
    similarity: Arc<dyn Similarity>,
    options: RecallOptions,
}

impl RecallEngine {
    /// Engine with Chinese segmentation and token-sort similarity
    pub fn new(options: RecallOptions) -> Self {
        Self::with_components(
            Arc::new(JiebaTokenizer::new()),
            Arc::new(TokenSortRatio),
            options,
        )
    }

    pub fn with_components(
        tokenizer: Arc<dyn Tokenizer>,
        similarity: Arc<dyn Similarity>,
        options: RecallOptions,
    ) -> Self {
        Self {
            tokenizer,
            similarity,
            options,
        }
    }

    /// Rank documents by material matches against the query tags
    pub fn recall(&self, query: &str, corpus: &Corpus) -> Vec<RecallMatch> {
        let index = corpus.material_index();
        let mut scores = Scores::default();

        for tag in split_tags(query) {
            if let Some(names) = index.get(tag) {
                scores.add(names, EXACT_WEIGHT);
                if self.options.exact_policy == ExactMatchPolicy::Suppress {
                    continue;
                }
            }

            for token in self.tokenizer.tokenize(tag) {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }

                let mut substring_hit = false;
                for (material, names) in index.iter() {
                    if material.contains(token) || token.contains(material) {
                        scores.add(names, SUBSTRING_WEIGHT);
                        substring_hit = true;
                    }
                }
                if substring_hit {
                    continue;
                }

                for (material, names) in index.iter() {
                    let similarity = self.similarity.similarity(token, material);
                    if similarity >= FUZZY_GATE {
                        scores.add(names, f64::from(similarity) / f64::from(100 - FUZZY_GATE));
                    }
                }
            }
        }

        let ranked = scores.ranked();
        debug!("Recall for {:?} matched {} recipes", query, ranked.len());
        ranked
    }

    /// Rank documents by how many query tokens occur in their raw text
    pub fn recall_fulltext(&self, query: &str, corpus: &Corpus) -> Vec<RecallMatch> {
        let mut scores = Scores::default();

        for tag in split_tags(query) {
            for token in self.tokenizer.tokenize(tag) {
                let token = token.trim();
                if token.is_empty() {
                    continue;
                }
                for (name, content) in corpus.sources() {
                    if content.contains(token) {
                        scores.add_one(name, 1.0);
                    }
                }
            }
        }

        scores.ranked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags("冬瓜,菠菜"), vec!["冬瓜", "菠菜"]);
        assert_eq!(split_tags(" 冬瓜 ，菠菜| 排骨 ,,"), vec!["冬瓜", "菠菜", "排骨"]);
        assert!(split_tags("").is_empty());
        assert!(split_tags(" , | ").is_empty());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("accumulate".parse::<ExactMatchPolicy>().unwrap(), ExactMatchPolicy::Accumulate);
        assert_eq!(" Suppress ".parse::<ExactMatchPolicy>().unwrap(), ExactMatchPolicy::Suppress);
        assert!("sometimes".parse::<ExactMatchPolicy>().is_err());
    }

    #[test]
    fn test_scores_round_each_contribution() {
        let names = vec!["a".to_string()];
        let mut scores = Scores::default();
        scores.add(&names, 31.0 / 70.0);
        scores.add(&names, 31.0 / 70.0);
        let ranked = scores.ranked();
        assert!((ranked[0].score - 0.88).abs() < 1e-9);
    }

    #[test]
    fn test_ranking_ties_by_name() {
        let names = vec!["乙".to_string(), "甲".to_string(), "b".to_string(), "a".to_string()];
        let mut scores = Scores::default();
        scores.add(&names, 1.0);
        let ranked: Vec<_> = scores.ranked().into_iter().map(|m| m.recipe).collect();
        assert_eq!(ranked, vec!["a", "b", "乙", "甲"]);
    }
}
