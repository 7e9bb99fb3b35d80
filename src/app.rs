//! Application state and service initialization
//!
//! Builds the analysis pipeline from configuration: document fetcher,
//! text extractor, the local classifier with optional LLM escalation, and
//! an optional directive catalog.

use std::path::Path;
use std::sync::Arc;

use crate::model::Config;
use crate::retriever::{HttpDocumentFetcher, RetrieverError};
use crate::service::{
    AnalysisService, CatalogError, ClassifierChain, EscalationClassifier, LlmClient,
    LocalClassifier, StaticDirectiveCatalog, TextExtractor,
};

/// Application state containing the wired analysis service
pub struct AppState {
    pub analysis_service: Arc<AnalysisService>,
    /// Whether a later classification tier can be reached
    pub escalation_enabled: bool,
}

impl AppState {
    /// Initialize all services.
    ///
    /// Escalation is enabled only when `OPENAI_API_KEY` is set; without it
    /// every verdict comes from the local rules.
    pub async fn new(config: Config, catalog_path: Option<&Path>) -> Result<Self, AppError> {
        let llm_client = LlmClient::from_env(config.escalation.base_url.as_deref());
        let escalation_enabled = llm_client.is_some();

        let catalog = match catalog_path {
            Some(path) => Some(StaticDirectiveCatalog::from_json_file(path).await?),
            None => None,
        };

        let mut analysis_service = Self::build_analysis_service(config, llm_client)?;
        if let Some(catalog) = catalog {
            analysis_service = analysis_service.with_catalog(Arc::new(catalog));
        }

        Ok(Self {
            analysis_service: Arc::new(analysis_service),
            escalation_enabled,
        })
    }

    /// Build the analysis service with all dependencies
    fn build_analysis_service(
        config: Config,
        llm_client: Option<LlmClient>,
    ) -> Result<AnalysisService, AppError> {
        let fetcher = Arc::new(HttpDocumentFetcher::new(config.fetcher)?);
        let extractor = TextExtractor::new(config.extraction);

        let local = Arc::new(LocalClassifier::new(&config.classifier));
        let escalation = Arc::new(EscalationClassifier::new(llm_client, &config.escalation));
        let chain = ClassifierChain::new(local, config.classifier).with_escalation(escalation);

        Ok(AnalysisService::new(fetcher, extractor, chain))
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// HTTP client construction failed
    #[error("Document fetcher initialization failed: {0}")]
    FetcherInit(#[from] RetrieverError),

    /// Directive catalog could not be loaded
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Request could not be parsed or result could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
