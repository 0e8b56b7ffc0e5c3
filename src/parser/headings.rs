// Heading grammar and section outline for recipe markdown
use std::collections::BTreeSet;

/// The fixed set of section headings a recipe body may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Heading {
    Materials,
    Estimation,
    Steps,
    AdditionalInfo,
}

impl Heading {
    pub const ALL: [Heading; 4] = [
        Heading::Materials,
        Heading::Estimation,
        Heading::Steps,
        Heading::AdditionalInfo,
    ];

    /// Exact heading line as it appears in a document
    pub fn literal(self) -> &'static str {
        match self {
            Heading::Materials => "## 必备原料和工具",
            Heading::Estimation => "## 计算",
            Heading::Steps => "## 操作",
            Heading::AdditionalInfo => "## 附加内容",
        }
    }

    pub fn from_literal(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.literal() == line)
    }
}

/// Whether a line is a level 1 or level 2 markdown heading (`# x` or `## x`)
pub fn is_heading_line(line: &str) -> bool {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if !(1..=2).contains(&hashes) {
        return false;
    }
    // '#' is one byte, so slicing by count is safe
    match line[hashes..].strip_prefix(' ') {
        Some(rest) => !rest.is_empty(),
        None => false,
    }
}

/// Validate discovered headings against the grammar.
///
/// The first heading is the title and is exempt. On failure the offending
/// headings are returned as a set.
pub fn validate(headings: &[&str]) -> Result<(), BTreeSet<String>> {
    let offending: BTreeSet<String> = headings
        .iter()
        .skip(1)
        .filter(|h| Heading::from_literal(h).is_none())
        .map(|h| h.to_string())
        .collect();

    if offending.is_empty() {
        Ok(())
    } else {
        Err(offending)
    }
}

/// Return the first section heading that appears more than once after the title
pub fn find_duplicate(headings: &[&str]) -> Option<Heading> {
    let mut seen = BTreeSet::new();
    headings
        .iter()
        .skip(1)
        .filter_map(|h| Heading::from_literal(h))
        .find(|h| !seen.insert(*h))
}

/// A heading line and the raw lines that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub heading: &'a str,
    pub body: Vec<&'a str>,
}

impl Section<'_> {
    pub fn text(&self) -> String {
        self.body.join("\n")
    }
}

/// Document split into heading-delimited sections
#[derive(Debug, Clone, Default)]
pub struct Outline<'a> {
    pub sections: Vec<Section<'a>>,
}

enum ScanState<'a> {
    Preamble,
    InSection(Section<'a>),
}

impl<'a> Outline<'a> {
    pub fn scan(document: &'a str) -> Self {
        let mut outline = Outline::default();
        let mut state = ScanState::Preamble;

        for line in document.lines() {
            if is_heading_line(line) {
                if let ScanState::InSection(section) = state {
                    outline.sections.push(section);
                }
                state = ScanState::InSection(Section {
                    heading: line,
                    body: Vec::new(),
                });
                continue;
            }

            // Lines before the first heading belong to no section
            if let ScanState::InSection(section) = &mut state {
                section.body.push(line);
            }
        }

        if let ScanState::InSection(section) = state {
            outline.sections.push(section);
        }

        outline
    }

    pub fn headings(&self) -> Vec<&'a str> {
        self.sections.iter().map(|s| s.heading).collect()
    }

    /// Body of the first section with exactly this heading line
    pub fn section(&self, heading: &str) -> Option<String> {
        self.sections
            .iter()
            .find(|s| s.heading == heading)
            .map(Section::text)
    }
}

/// Extract the body between `heading` and the next level 1/2 heading (or end of document)
pub fn extract_section(document: &str, heading: &str) -> Option<String> {
    Outline::scan(document).section(heading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_heading_line() {
        assert!(is_heading_line("# 红烧肉的做法"));
        assert!(is_heading_line("## 操作"));
        assert!(!is_heading_line("### 小标题"));
        assert!(!is_heading_line("##操作"));
        assert!(!is_heading_line("## "));
        assert!(!is_heading_line("- ## 操作"));
    }

    #[test]
    fn test_validate_accepts_known_headings() {
        let headings = vec!["# 番茄炒蛋", "## 必备原料和工具", "## 计算", "## 操作", "## 附加内容"];
        assert!(validate(&headings).is_ok());
    }

    #[test]
    fn test_validate_title_is_exempt() {
        assert!(validate(&["## 随便什么标题", "## 操作"]).is_ok());
        assert!(validate(&[]).is_ok());
    }

    #[test]
    fn test_validate_reports_offending_set() {
        let headings = vec!["# 番茄炒蛋", "## 不存在", "## 操作", "# 另一个", "## 不存在"];
        let diff = validate(&headings).unwrap_err();
        let expected: BTreeSet<String> = ["## 不存在", "# 另一个"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(diff, expected);
    }

    #[test]
    fn test_find_duplicate() {
        assert_eq!(find_duplicate(&["# a", "## 操作", "## 计算"]), None);
        assert_eq!(
            find_duplicate(&["# a", "## 操作", "## 计算", "## 操作"]),
            Some(Heading::Steps)
        );
    }

    #[test]
    fn test_extract_section_until_next_heading() {
        let doc = "# 标题\n\n## 计算\n\n每份 2 个鸡蛋\n\n## 操作\n\n- 打蛋";
        assert_eq!(
            extract_section(doc, "## 计算").as_deref(),
            Some("\n每份 2 个鸡蛋\n")
        );
        assert_eq!(extract_section(doc, "## 操作").as_deref(), Some("\n- 打蛋"));
        assert_eq!(extract_section(doc, "## 附加内容"), None);
    }

    #[test]
    fn test_outline_keeps_deeper_headings_in_body() {
        let doc = "# 标题\n## 操作\n### 准备\n- 洗菜";
        let outline = Outline::scan(doc);
        assert_eq!(outline.headings(), vec!["# 标题", "## 操作"]);
        assert_eq!(outline.section("## 操作").as_deref(), Some("### 准备\n- 洗菜"));
    }
}
