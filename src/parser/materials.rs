// Material token extraction for the "必备原料和工具" section
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Characters that separate material fragments within a line
static DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()（）\[\]【】［］,，。、“”:：+\-./!！<>]+").unwrap());

/// A parenthesized aside, ASCII or fullwidth, in any pairing
static ASIDE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[（(][^）)]*[）)]").unwrap());

const LIST_MARKERS: &[char] = &['-', '*', '>'];
const EMPHASIS: char = '*';
const TRAILING_PUNCTUATION: &[char] = &[':', '：', '。', '.'];

/// Cleaned material tokens with their raw counterparts, index-aligned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialTokens {
    pub cleaned: Vec<String>,
    pub dirty: Vec<String>,
}

/// Split a materials section body into raw fragments
pub fn split_dirty(body: &str) -> Vec<String> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .flat_map(|line| {
            let line = line.trim_start_matches(|c: char| c.is_whitespace() || LIST_MARKERS.contains(&c));
            DELIMITERS
                .split(line)
                .map(str::trim)
                .filter(|fragment| !fragment.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Remove emphasis markers, asides and surrounding punctuation from a single fragment
pub fn clean_token(token: &str) -> String {
    let token = token.replace(EMPHASIS, "");
    ASIDE
        .replace_all(&token, "")
        .trim()
        .trim_matches(TRAILING_PUNCTUATION)
        .trim()
        .to_string()
}

pub fn is_all_cjk(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// Tokenize a materials section. Tokens that are not pure CJK are kept but reported.
pub fn extract_materials(body: &str) -> MaterialTokens {
    let dirty = split_dirty(body);
    let cleaned: Vec<String> = dirty.iter().map(|t| clean_token(t)).collect();

    let suspicious: Vec<&str> = cleaned
        .iter()
        .filter(|t| !is_all_cjk(t))
        .map(String::as_str)
        .collect();
    if !suspicious.is_empty() {
        warn!("Material tokens need cleaning: {:?}", suspicious);
    }

    MaterialTokens { cleaned, dirty }
}
