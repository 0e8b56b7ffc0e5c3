// Tokenization and string similarity used by recall
use jieba_rs::Jieba;

/// Splits free text into an ordered sequence of tokens
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Scores how alike two strings are, 0 (unrelated) to 100 (identical)
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> u8;
}

/// Dictionary based Chinese word segmentation
pub struct JiebaTokenizer {
    jieba: Jieba,
}

impl JiebaTokenizer {
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }
}

impl Default for JiebaTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for JiebaTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, true)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Splits on whitespace only
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

/// Order-insensitive similarity: both sides are normalized, split into words,
/// sorted and rejoined, then scored as `2 * matched / total` characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl TokenSortRatio {
    fn sorted_tokens(text: &str) -> String {
        let normalized: String = text
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect::<String>()
            .to_lowercase();
        let mut words: Vec<&str> = normalized.split_whitespace().collect();
        words.sort_unstable();
        words.join(" ")
    }

    /// Length of the longest common subsequence, by characters
    fn matched_chars(a: &[char], b: &[char]) -> usize {
        let mut row = vec![0usize; b.len() + 1];
        for &ca in a {
            let mut diagonal = 0;
            for (j, &cb) in b.iter().enumerate() {
                let above = row[j + 1];
                row[j + 1] = if ca == cb {
                    diagonal + 1
                } else {
                    above.max(row[j])
                };
                diagonal = above;
            }
        }
        row[b.len()]
    }
}

impl Similarity for TokenSortRatio {
    fn similarity(&self, a: &str, b: &str) -> u8 {
        let a = Self::sorted_tokens(a);
        let b = Self::sorted_tokens(b);
        if a.is_empty() || b.is_empty() {
            return 0;
        }
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let matched = Self::matched_chars(&a, &b);
        let ratio = (2 * matched) as f64 / (a.len() + b.len()) as f64;
        (ratio * 100.0).round().clamp(0.0, 100.0) as u8
    }
}
