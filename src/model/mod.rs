pub mod aircraft;
pub mod analysis;
pub mod config;
pub mod defects;
pub mod directive;
pub mod risk;
pub mod verdict;

pub use aircraft::{AircraftIdentity, MatchType, RegistryAttributes, UNKNOWN_SERIAL};
pub use analysis::{AnalysisRequest, AnalysisResult};
pub use config::{ClassifierConfig, Config, EscalationConfig, ExtractionConfig, FetcherConfig};
pub use defects::{DefectCondition, DefectReport, DefectStatistics, TopFailure};
pub use directive::{AdCandidate, AdResult, DirectiveRecord};
pub use risk::{RiskBreakdown, RiskLevel};
pub use verdict::{ExtractedVerdict, Verdict, VerdictSource};
