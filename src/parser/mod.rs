// Recipe markdown parsing
// Turns a document in the fixed heading convention into a validated `Recipe`

pub mod headings;
pub mod materials;
pub mod steps;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

pub use headings::{extract_section, Heading, Outline};
pub use materials::{extract_materials, MaterialTokens};
pub use steps::{build_step_tree, StepNode, StepTreeBuilder};

/// Marker phrase preceding the difficulty stars
pub const DIFFICULTY_MARKER: &str = "预估烹饪难度：";
pub const DIFFICULTY_GLYPH: char = '★';

/// Structured form of one recipe document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub difficulty: Option<String>,
    pub materials: Vec<String>,
    pub materials_dirty: Vec<String>,
    pub estimation: String,
    pub steps: Vec<StepNode>,
    pub additional_info: Vec<String>,
}

impl Recipe {
    /// Difficulty level, i.e. the number of stars
    pub fn difficulty_level(&self) -> Option<usize> {
        self.difficulty.as_ref().map(|d| d.chars().count())
    }
}

/// Structural violations that reject a single document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected headings: {0:?}")]
    UnexpectedHeadings(BTreeSet<String>),

    #[error("Duplicate heading: {}", .0.literal())]
    DuplicateHeading(Heading),
}

/// Parse one recipe document
pub fn parse_recipe(document: &str) -> Result<Recipe, ParseError> {
    let outline = Outline::scan(document);
    let found = outline.headings();
    debug!("Markdown headings: {:?}", found);

    headings::validate(&found).map_err(ParseError::UnexpectedHeadings)?;
    if let Some(heading) = headings::find_duplicate(&found) {
        return Err(ParseError::DuplicateHeading(heading));
    }

    let title = document
        .lines()
        .next()
        .unwrap_or_default()
        .trim_matches(|c: char| c == '#' || c == ' ')
        .to_string();

    let MaterialTokens { cleaned, dirty } = outline
        .section(Heading::Materials.literal())
        .map(|body| extract_materials(&body))
        .unwrap_or_default();

    let estimation = outline
        .section(Heading::Estimation.literal())
        .map(|body| body.trim().to_string())
        .unwrap_or_default();

    let steps = outline
        .section(Heading::Steps.literal())
        .map(|body| build_step_tree(&body))
        .unwrap_or_default();

    let additional_info = outline
        .section(Heading::AdditionalInfo.literal())
        .map(|body| parse_bullets(&body))
        .unwrap_or_default();

    Ok(Recipe {
        title,
        difficulty: find_difficulty(document),
        materials: cleaned,
        materials_dirty: dirty,
        estimation,
        steps,
        additional_info,
    })
}

/// First run of difficulty stars following the marker phrase
pub fn find_difficulty(document: &str) -> Option<String> {
    document.match_indices(DIFFICULTY_MARKER).find_map(|(pos, marker)| {
        let stars: String = document[pos + marker.len()..]
            .chars()
            .take_while(|&c| c == DIFFICULTY_GLYPH)
            .collect();
        (!stars.is_empty()).then_some(stars)
    })
}

/// One entry per non-blank line, list markers stripped
fn parse_bullets(body: &str) -> Vec<String> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.trim()
                .trim_matches(|c: char| c == '-' || c == ' ')
                .to_string()
        })
        .collect()
}
