pub mod analysis;
pub mod catalog;
pub mod classifier;
pub mod extraction;
pub mod llm;
pub mod ranking;
pub mod risk;

pub use analysis::AnalysisService;
pub use catalog::{CatalogError, DirectiveCatalog, StaticDirectiveCatalog};
pub use classifier::{ClassifierChain, EscalationClassifier, LocalClassifier};
pub use extraction::TextExtractor;
pub use llm::LlmClient;
