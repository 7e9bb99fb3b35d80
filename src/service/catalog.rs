//! AD metadata lookup by aircraft model

use std::path::Path;

use async_trait::async_trait;

use crate::model::{AdCandidate, DirectiveRecord};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of AD metadata keyed by affected model
#[async_trait]
pub trait DirectiveCatalog: Send + Sync {
    /// ADs whose affected model equals one of `models` (case-insensitive)
    async fn find_by_models(&self, models: &[String]) -> Vec<AdCandidate>;
}

/// In-memory catalog, typically loaded from an exported JSON file
#[derive(Debug, Clone, Default)]
pub struct StaticDirectiveCatalog {
    records: Vec<DirectiveRecord>,
}

impl StaticDirectiveCatalog {
    pub fn new(records: Vec<DirectiveRecord>) -> Self {
        Self { records }
    }

    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        let records: Vec<DirectiveRecord> = serde_json::from_str(&contents)?;

        tracing::info!(
            path = %path.as_ref().display(),
            records = records.len(),
            "Loaded directive catalog"
        );

        Ok(Self::new(records))
    }
}

#[async_trait]
impl DirectiveCatalog for StaticDirectiveCatalog {
    async fn find_by_models(&self, models: &[String]) -> Vec<AdCandidate> {
        self.records
            .iter()
            .filter(|record| {
                record.model_affected.as_deref().is_some_and(|affected| {
                    let affected = affected.trim();
                    models.iter().any(|m| m.eq_ignore_ascii_case(affected))
                })
            })
            .map(AdCandidate::from)
            .collect()
    }
}
