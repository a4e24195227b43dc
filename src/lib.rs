//! Advisor Scribe
//!
//! Post-meeting analysis for financial advisor conversations: indexes the
//! client table and product catalog, annotates the transcript, summarizes
//! the meeting and recommends products for unmet needs.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod utils;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use pipeline::{Orchestrator, PipelineInputs, PipelineRun};
