//! Error types for catalog loading and optimization.

use thiserror::Error;

/// Failures raised by the optimizer before any allocation happens.
///
/// Unaffordable plants and exhausted budgets are never errors; they produce
/// a (possibly empty) `AllocationResult`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("Validation error: {0}")]
    Validation(String),
}

impl OptimizeError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        OptimizeError::Validation(message.into())
    }
}

/// Failures raised while reading or serving a plant catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load catalog table: {0}")]
    Table(#[from] polars::prelude::PolarsError),

    #[error("Catalog row {row}: missing value for '{column}'")]
    MissingValue { row: usize, column: &'static str },

    #[error("Duplicate plant '{label}' in category '{category}'")]
    DuplicateLabel { category: String, label: String },

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

/// Failures of a full recommendation (catalog fetch + optimization)
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}
