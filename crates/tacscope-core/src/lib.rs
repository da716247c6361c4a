pub mod config;
pub mod cost;
pub mod error;
pub mod markup;
pub mod metrics;
pub mod metrics_report;
pub mod tagger;
pub mod types;

pub use config::Config;
pub use cost::CostAnalyzer;
pub use error::ConfigError;
pub use metrics::{AnalysisResult, ComparisonResult};
pub use tagger::LexicalTagger;
pub use types::*;
