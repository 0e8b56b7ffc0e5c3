use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    api::models::*, config::Settings, corpus::CorpusHandle, parser::Recipe, recall::RecallEngine,
    Error, Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub corpus: CorpusHandle,
    pub engine: Arc<RecallEngine>,
    pub settings: Settings,
}

impl AppState {
    fn limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.settings.recall.max_results)
            .min(self.settings.recall.max_results)
    }
}

/// GET /api/recipes - List all recipe names
pub async fn list_recipes(State(state): State<AppState>) -> Result<Json<RecipeListResponse>> {
    let corpus = state.corpus.snapshot().await;
    Ok(Json(RecipeListResponse {
        recipes: corpus.names().map(str::to_string).collect(),
    }))
}

/// GET /api/recipes/:name - Get a parsed recipe
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Recipe>> {
    debug!("Get recipe request: {}", name);

    let corpus = state.corpus.snapshot().await;
    corpus
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("Recipe {name} not found")))
}

/// GET /api/recipes/:name/raw - Get the original markdown
pub async fn get_raw_recipe(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RawRecipeResponse>> {
    debug!("Get raw recipe request: {}", name);

    let corpus = state.corpus.snapshot().await;
    let content = corpus
        .source(&name)
        .ok_or_else(|| Error::NotFound(format!("Recipe {name} not found")))?;

    Ok(Json(RawRecipeResponse {
        content: content.to_string(),
    }))
}

/// GET /api/recall - Rank recipes by material matches
pub async fn recall_recipes(
    State(state): State<AppState>,
    Query(params): Query<RecallParams>,
) -> Result<Json<RecallResponse>> {
    debug!("Recall request: {:?}", params);

    let corpus = state.corpus.snapshot().await;
    let mut matched_recipes = state.engine.recall(&params.q, &corpus);
    matched_recipes.truncate(state.limit(params.limit));

    Ok(Json(RecallResponse { matched_recipes }))
}

/// GET /api/recall/fulltext - Rank recipes by token occurrences in the raw text
pub async fn recall_fulltext(
    State(state): State<AppState>,
    Query(params): Query<RecallParams>,
) -> Result<Json<RecallResponse>> {
    debug!("Full-text recall request: {:?}", params);

    let corpus = state.corpus.snapshot().await;
    let mut matched_recipes = state.engine.recall_fulltext(&params.q, &corpus);
    matched_recipes.truncate(state.limit(params.limit));

    Ok(Json(RecallResponse { matched_recipes }))
}

/// GET /api/materials - List all material keys
/// The keys are raw tokens meant for recall, not for display
pub async fn list_materials(State(state): State<AppState>) -> Result<Json<MaterialListResponse>> {
    let corpus = state.corpus.snapshot().await;
    Ok(Json(MaterialListResponse {
        materials: corpus.materials().map(str::to_string).collect(),
    }))
}

/// GET /api/materials/:material - Recipes listing a material
pub async fn get_material_recipes(
    State(state): State<AppState>,
    Path(material): Path<String>,
) -> Result<Json<RecipeListResponse>> {
    let corpus = state.corpus.snapshot().await;
    Ok(Json(RecipeListResponse {
        recipes: corpus.recipes_for_material(&material).to_vec(),
    }))
}

/// GET /api/stats - Corpus statistics
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    let corpus = state.corpus.snapshot().await;
    Ok(Json(Stats {
        total_recipes: corpus.len(),
        total_materials: corpus.material_index().len(),
        total_chars: corpus.total_chars(),
    }))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
