use crate::corpus::{BatchReport, Corpus, DirectorySource};
use crate::parser::parse_recipe;
use crate::recall::{RecallEngine, RecallMatch, RecallOptions};
use crate::{Error, Result};
use std::path::Path;
use tracing::warn;

/// Parse one file and print the recipe as JSON
pub fn parse(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let recipe = parse_recipe(&content)?;
    println!("{}", serde_json::to_string_pretty(&recipe)?);
    Ok(())
}

/// Load every document under a directory
pub fn load_corpus(dishes_dir: &Path) -> Result<Corpus> {
    let source = DirectorySource::new(dishes_dir);
    let (corpus, report) = Corpus::load(&source)?;
    report_failures(&report);
    Ok(corpus)
}

fn report_failures(report: &BatchReport) {
    for failure in &report.failures {
        warn!("Skipped {}: {}", failure.name, failure.reason);
    }
}

/// Print the character count distribution, one line per bucket
pub fn stats(dishes_dir: &Path, step: usize) -> Result<()> {
    if step == 0 {
        return Err(Error::Validation("Step must be non-zero".to_string()));
    }

    let corpus = load_corpus(dishes_dir)?;

    for bucket in corpus.length_histogram(step) {
        if bucket.names.len() <= 5 {
            println!(
                "{}-{} chars: {} recipes, {}",
                bucket.start,
                bucket.end,
                bucket.names.len(),
                bucket.names.join(",")
            );
        } else {
            println!(
                "{}-{} chars: {} recipes",
                bucket.start,
                bucket.end,
                bucket.names.len()
            );
        }
    }

    println!(
        "\nTotal recipes: {}, materials: {}",
        corpus.len(),
        corpus.material_index().len()
    );
    Ok(())
}

/// Recall against a freshly loaded local corpus
pub fn recall(
    dishes_dir: &Path,
    options: RecallOptions,
    query: &str,
    fulltext: bool,
    limit: usize,
) -> Result<()> {
    let corpus = load_corpus(dishes_dir)?;
    let engine = RecallEngine::new(options);

    let mut results = if fulltext {
        engine.recall_fulltext(query, &corpus)
    } else {
        engine.recall(query, &corpus)
    };
    results.truncate(limit);

    print_recall_results(&results);
    Ok(())
}

fn print_recall_results(results: &[RecallMatch]) {
    if results.is_empty() {
        println!("No recipes found");
        return;
    }

    println!("\nFound {} recipes:\n", results.len());
    println!("{:<5} {:<40} {:>8}", "Rank", "Recipe", "Score");
    println!("{}", "-".repeat(55));

    for (rank, matched) in results.iter().enumerate() {
        println!(
            "{:<5} {:<40} {:>8.2}",
            rank + 1,
            truncate(&matched.recipe, 38),
            matched.score
        );
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("红烧肉", 10), "红烧肉");
        assert_eq!(truncate("一二三四五六七八九十", 6), "一二三...");
    }

    #[test]
    fn test_load_corpus_skips_bad_documents() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("好.md"), "# 好\n## 操作\n- 煮").unwrap();
        std::fs::write(dir.path().join("坏.md"), "# 坏\n## 杂项\n").unwrap();

        let corpus = load_corpus(dir.path()).unwrap();
        assert_eq!(corpus.names().collect::<Vec<_>>(), vec!["好"]);
    }

    #[test]
    fn test_stats_rejects_zero_step() {
        let dir = tempdir().unwrap();
        assert!(matches!(stats(dir.path(), 0), Err(Error::Validation(_))));
    }

    #[test]
    fn test_parse_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(parse(&dir.path().join("nope.md")), Err(Error::Io(_))));
    }
}
