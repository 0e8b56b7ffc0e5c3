use crate::recall::RecallMatch;
use serde::{Deserialize, Serialize};

/// Recall request parameters
#[derive(Debug, Clone, Deserialize)]
pub struct RecallParams {
    /// Tags or free text separated by `,`, `，` or `|`
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Recall response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallResponse {
    pub matched_recipes: Vec<RecallMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialListResponse {
    pub materials: Vec<String>,
}

/// Raw markdown of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecipeResponse {
    pub content: String,
}

/// Corpus statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_recipes: usize,
    pub total_materials: usize,
    pub total_chars: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
