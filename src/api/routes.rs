use axum::http::{header, Method};
use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers::{self as api_handlers, AppState};

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    // Public API routes - read-only, no authentication required
    let api_routes = Router::new()
        // Recipes
        .route("/recipes", get(api_handlers::list_recipes))
        .route("/recipes/:name", get(api_handlers::get_recipe))
        .route("/recipes/:name/raw", get(api_handlers::get_raw_recipe))
        // Recall
        .route("/recall", get(api_handlers::recall_recipes))
        .route("/recall/fulltext", get(api_handlers::recall_fulltext))
        // Materials
        .route("/materials", get(api_handlers::list_materials))
        .route("/materials/:material", get(api_handlers::get_material_recipes))
        // Stats
        .route("/stats", get(api_handlers::get_stats))
        .with_state(state);

    let health_routes = Router::new().route("/health", get(api_handlers::health_check));

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            // CORS - allow all origins for read-only public API
            CorsLayer::new()
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(
            // Compression
            CompressionLayer::new(),
        )
        .layer(
            // Tracing
            TraceLayer::new_for_http(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorpusConfig, RecallConfig, ServerConfig, Settings};
    use crate::corpus::{Corpus, CorpusHandle, RawDocument};
    use crate::recall::{
        ExactMatchPolicy, RecallEngine, RecallOptions, TokenSortRatio, WhitespaceTokenizer,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    // Helper to create test app state
    fn create_test_state() -> AppState {
        let (corpus, _) = Corpus::build(vec![RawDocument::new(
            "soup",
            "# soup\n\n## 必备原料和工具\n\n- 冬瓜\n- 排骨\n",
        )]);

        let settings = Settings {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            corpus: CorpusConfig {
                dishes_dir: "/tmp/dishes".into(),
                refresh_interval_seconds: 0,
            },
            recall: RecallConfig {
                exact_policy: ExactMatchPolicy::Accumulate,
                max_results: 10,
            },
        };

        AppState {
            corpus: CorpusHandle::new(corpus),
            engine: Arc::new(RecallEngine::with_components(
                Arc::new(WhitespaceTokenizer),
                Arc::new(TokenSortRatio),
                RecallOptions::default(),
            )),
            settings,
        }
    }

    async fn get_status(uri: &str) -> StatusCode {
        let app = create_router(create_test_state());
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_routes_exist() {
        for uri in [
            "/health",
            "/api/recipes",
            "/api/recipes/soup",
            "/api/recipes/soup/raw",
            "/api/recall?q=abc",
            "/api/recall/fulltext?q=abc",
            "/api/materials",
            "/api/materials/abc",
            "/api/stats",
        ] {
            assert_eq!(get_status(uri).await, StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_unknown_recipe_is_not_found() {
        assert_eq!(get_status("/api/recipes/stew").await, StatusCode::NOT_FOUND);
        assert_eq!(
            get_status("/api/recipes/stew/raw").await,
            StatusCode::NOT_FOUND
        );
    }
}
