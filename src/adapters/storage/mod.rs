//! Report storage adapters

pub mod files;

pub use files::FileReportWriter;
