// Immutable in-memory recipe corpus
// Built from a full batch of documents, never mutated once published

pub mod handle;
pub mod refresh;
pub mod source;

use crate::error::{Error, Result};
use crate::parser::{parse_recipe, Recipe};
use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error, info};

pub use handle::CorpusHandle;
pub use refresh::RefreshScheduler;
pub use source::{DirectorySource, DocumentSource, MemorySource, RawDocument};

/// Material token to document names, keys kept in first-seen order.
/// A document that lists the same material twice appears twice.
#[derive(Debug, Clone, Default)]
pub struct MaterialIndex {
    keys: Vec<String>,
    entries: HashMap<String, Vec<String>>,
}

impl MaterialIndex {
    fn insert(&mut self, material: &str, name: &str) {
        match self.entries.get_mut(material) {
            Some(names) => names.push(name.to_string()),
            None => {
                self.keys.push(material.to_string());
                self.entries
                    .insert(material.to_string(), vec![name.to_string()]);
            }
        }
    }

    pub fn get(&self, material: &str) -> Option<&[String]> {
        self.entries.get(material).map(Vec::as_slice)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.keys
            .iter()
            .map(|k| (k.as_str(), self.entries[k].as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A document dropped from the batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub name: String,
    pub reason: String,
}

/// Outcome of a batch build
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub parsed: usize,
    pub failures: Vec<BatchFailure>,
}

/// Documents sharing a length bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LengthBucket {
    pub start: usize,
    pub end: usize,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: BTreeMap<String, Recipe>,
    material_index: MaterialIndex,
    char_counts: BTreeMap<String, usize>,
    sources: BTreeMap<String, String>,
    fingerprint: u64,
}

impl Corpus {
    /// Parse a batch of documents into a corpus.
    ///
    /// Documents are parsed in parallel; results are merged in input order so
    /// the material index matches a sequential build. Failing documents are
    /// logged and left out.
    pub fn build(documents: Vec<RawDocument>) -> (Self, BatchReport) {
        let parsed: Vec<(String, Result<(String, Recipe)>)> = documents
            .into_par_iter()
            .map(|doc| {
                let result = doc.content.and_then(|content| {
                    let recipe = parse_recipe(&content)?;
                    Ok((content, recipe))
                });
                (doc.name, result)
            })
            .collect();

        let mut corpus = Corpus::default();
        let mut report = BatchReport::default();
        let mut hasher = Sha256::new();

        for (name, result) in parsed {
            let outcome = result.and_then(|(content, recipe)| {
                if corpus.documents.contains_key(&name) {
                    return Err(Error::Validation(format!("Duplicate document name: {name}")));
                }
                Ok((content, recipe))
            });

            match outcome {
                Ok((content, recipe)) => {
                    hasher.update(name.as_bytes());
                    hasher.update([0u8]);
                    hasher.update(content.as_bytes());
                    hasher.update([0u8]);
                    corpus.submit(name, content, recipe);
                    report.parsed += 1;
                }
                Err(e) => {
                    error!("Failed to extract recipe {}: {}", name, e);
                    report.failures.push(BatchFailure {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        corpus.fingerprint = u64::from_le_bytes(bytes);

        info!(
            "Recipe extraction complete: {} recipes, {} materials, {} failed",
            report.parsed,
            corpus.material_index.len(),
            report.failures.len()
        );

        (corpus, report)
    }

    /// List and parse every document of a source
    pub fn load(source: &dyn DocumentSource) -> Result<(Self, BatchReport)> {
        let documents = source.list_documents()?;
        Ok(Self::build(documents))
    }

    fn submit(&mut self, name: String, content: String, recipe: Recipe) {
        debug!("Extracted recipe {}", name);
        for material in recipe.materials.iter().filter(|m| !m.is_empty()) {
            self.material_index.insert(material, &name);
        }
        self.char_counts.insert(name.clone(), content.chars().count());
        self.sources.insert(name.clone(), content);
        self.documents.insert(name, recipe);
    }

    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.documents.get(name)
    }

    /// Document names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Material index keys in first-seen order
    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.material_index.keys()
    }

    pub fn material_index(&self) -> &MaterialIndex {
        &self.material_index
    }

    /// Document names for a material key, duplicates preserved
    pub fn recipes_for_material(&self, material: &str) -> &[String] {
        self.material_index.get(material).unwrap_or_default()
    }

    pub fn char_count(&self, name: &str) -> Option<usize> {
        self.char_counts.get(name).copied()
    }

    pub fn total_chars(&self) -> usize {
        self.char_counts.values().sum()
    }

    /// Raw markdown of a document
    pub fn source(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    pub fn sources(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Digest of every accepted (name, content) pair, used to skip no-op refreshes
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Group documents by character count into buckets of `step` characters
    pub fn length_histogram(&self, step: usize) -> Vec<LengthBucket> {
        let step = step.max(1);
        let mut buckets: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for (name, count) in &self.char_counts {
            buckets.entry(count / step).or_default().push(name.clone());
        }

        buckets
            .into_iter()
            .map(|(interval, names)| LengthBucket {
                start: interval * step,
                end: (interval + 1) * step,
                names,
            })
            .collect()
    }
}
