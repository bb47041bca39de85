//! Sieve Core Library
//!
//! Page fetching, LLM content classification and the per-URL analysis
//! pipeline shared by the web server and the CLI.

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fetcher;

pub use analysis::model::{AnalysisRequest, AnalysisResult, Outcome, Verdict};
pub use analysis::Analyzer;
pub use config::Config;
pub use error::{SieveError, SieveResult};
