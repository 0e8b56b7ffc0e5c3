pub mod config;
pub mod error;

// Document parsing
pub mod parser;

// Corpus snapshot and document sources
pub mod corpus;

// Ranking
pub mod recall;

// Serving
pub mod api;
pub mod cli;

// Re-exports
pub use config::Settings;
pub use corpus::{Corpus, CorpusHandle};
pub use error::{Error, Result};
pub use parser::{parse_recipe, ParseError, Recipe, StepNode};
pub use recall::{RecallEngine, RecallMatch, RecallOptions};
