use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

const ENV_CONFIG_PATH: &str = "AIRWORTHINESS_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Hosts serving AD documents that the fetcher is allowed to contact
pub const DEFAULT_ALLOWED_HOSTS: &[&str] = &[
    "drs.faa.gov",
    "rgl.faa.gov",
    "www.faa.gov",
    "www.federalregister.gov",
    "federalregister.gov",
    "www.govinfo.gov",
    "www.ecfr.gov",
];

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ESCALATION_TIMEOUT_SECS: u64 = 30;

/// Document fetcher restrictions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Exact host names (case-insensitive) documents may be fetched from
    pub allowed_hosts: Vec<String>,
    pub require_https: bool,
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: DEFAULT_ALLOWED_HOSTS.iter().map(|h| h.to_string()).collect(),
            require_https: true,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl FetcherConfig {
    /// Check the URL scheme and host against the allow-list
    pub fn is_url_allowed(&self, url: &Url) -> bool {
        if self.require_https && url.scheme() != "https" {
            return false;
        }
        if !matches!(url.scheme(), "https" | "http") {
            return false;
        }

        let host = match url.host_str() {
            Some(h) => h.to_lowercase(),
            None => return false,
        };

        self.allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&host))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Section isolation limits for the text extractor
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// A located section shorter than this is treated as a false positive
    pub min_section_chars: usize,
    pub max_section_chars: usize,
    /// Length of the leading text used when no section is found
    pub fallback_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_section_chars: 100,
            max_section_chars: 6000,
            fallback_chars: 4000,
        }
    }
}

/// Thresholds for the local classifier and the escalation gate
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Local verdicts below this confidence are escalated
    pub escalation_threshold: u8,
    /// Text must be longer than this to be worth escalating
    pub min_escalation_text_chars: usize,
    /// Text shorter than this is classified as insufficient data
    pub min_text_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            escalation_threshold: 80,
            min_escalation_text_chars: 20,
            min_text_chars: 20,
        }
    }
}

/// Escalation service settings. The API key comes from the environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    pub model: Option<String>,
    /// OpenAI-compatible API base URL; the public endpoint when unset
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            model: None,
            base_url: None,
            timeout_secs: DEFAULT_ESCALATION_TIMEOUT_SECS,
        }
    }
}

impl EscalationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Application configuration, loaded from a YAML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub extraction: ExtractionConfig,
    pub classifier: ClassifierConfig,
    pub escalation: EscalationConfig,
}

impl Config {
    /// Load configuration from the file named by the environment, or defaults
    pub fn from_env() -> Self {
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Self::load_config_file(&config_path).unwrap_or_default()
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<Config> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(Config::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }
}
