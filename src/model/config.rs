use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::SourceStatus;

const ENV_CONFIG_PATH: &str = "CREDIBILITY_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_FACT_CHECK_API_KEY: &str = "GOOGLE_FACT_CHECK_API_KEY";
const ENV_BROWSERLESS_URL: &str = "BROWSERLESS_URL";
const ENV_BROWSERLESS_TOKEN: &str = "BROWSERLESS_TOKEN";
const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

const DEFAULT_USER_AGENT: &str = "news-credibility/0.1 (+https://github.com/news-credibility)";

/// Content extraction settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Timeout for each raw page download
    pub fetch_timeout_secs: u64,
    /// Timeout for the whole headless render, settle delay included
    pub render_timeout_secs: u64,
    /// Fixed delay letting client-side scripts settle before the DOM is captured
    pub render_settle_ms: u64,
    pub user_agent: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 10,
            render_timeout_secs: 30,
            render_settle_ms: 3000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// One prioritized keyword category applied to encyclopedia summaries
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRule {
    pub status: SourceStatus,
    pub score: f64,
    pub explanation: String,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    fn new(status: SourceStatus, score: f64, explanation: &str, keywords: &[&str]) -> Self {
        Self {
            status,
            score,
            explanation: explanation.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Default keyword categories, evaluated top to bottom
pub fn default_keyword_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new(
            SourceStatus::VeryReliable,
            1.0,
            "Institutional source or reference press agency.",
            &[
                "agence de presse",
                "service public",
                "établissement public",
                "news agency",
                "public broadcaster",
            ],
        ),
        KeywordRule::new(
            SourceStatus::Reliable,
            0.9,
            "Established daily press outlet.",
            &[
                "journal quotidien",
                "presse quotidienne",
                "journal d'information",
                "média d'information",
                "daily newspaper",
            ],
        ),
        KeywordRule::new(
            SourceStatus::GenerallyReliable,
            0.8,
            "Standard news magazine or web-native outlet.",
            &[
                "hebdomadaire",
                "magazine",
                "site web d'information",
                "pure player",
                "news website",
            ],
        ),
        KeywordRule::new(
            SourceStatus::Satirical,
            0.2,
            "Humorous site, not to be taken literally.",
            &["satirique", "parodique", "pastiche", "humoristique", "satirical"],
        ),
        KeywordRule::new(
            SourceStatus::Dangerous,
            0.0,
            "Site associated with disinformation or conspiracy theories.",
            &[
                "fake news",
                "fausses nouvelles",
                "désinformation",
                "complotiste",
                "extrême droite",
                "propagande",
                "conspiration",
                "disinformation",
                "conspiracy",
            ],
        ),
    ]
}

/// Reputation resolver settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    /// JSON file holding the local allow/deny lists
    pub sources_path: String,
    /// Encyclopedia language edition
    pub language: String,
    pub lookup_timeout_secs: u64,
    /// Identifying client tag sent to the encyclopedia
    pub user_agent: String,
    /// Domain fragments that mark government sites
    pub official_markers: Vec<String>,
    /// Domain fragments that mark academic sites
    pub academic_markers: Vec<String>,
    pub rules: Vec<KeywordRule>,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            sources_path: "sources.json".to_string(),
            language: "fr".to_string(),
            lookup_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            official_markers: vec![".gouv.".to_string(), ".gov".to_string()],
            academic_markers: vec![".edu".to_string()],
            rules: default_keyword_rules(),
        }
    }
}

/// Fact-check index settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FactCheckConfig {
    pub language: String,
    pub timeout_secs: u64,
    /// Rating fragments meaning "false" in the target locale
    pub fake_keywords: Vec<String>,
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            language: "fr".to_string(),
            timeout_secs: 10,
            fake_keywords: ["faux", "fake", "incorrect", "trompeur", "false", "misleading"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

/// Generative-model settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    pub primary_model: String,
    /// Tried once when the primary model call fails
    pub fallback_model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
    /// Article text beyond this many characters is not sent to the model
    pub max_input_chars: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            primary_model: "gemini-2.0-flash".to_string(),
            fallback_model: "gemini-1.5-flash".to_string(),
            temperature: 0.1,
            timeout_secs: 60,
            max_input_chars: 15000,
        }
    }
}

/// Remote headless browser endpoint
#[derive(Debug, Clone)]
pub struct BrowserlessSettings {
    pub base_url: String,
    pub token: Option<String>,
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub reputation: ReputationConfig,
    #[serde(default)]
    pub fact_check: FactCheckConfig,
    #[serde(default)]
    pub semantic: SemanticConfig,
    #[serde(default)]
    pub pipeline_timeout_secs: Option<u64>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    /// Mandatory for the semantic signal; checked before each run
    pub gemini_api_key: Option<String>,
    /// Optional; the claim signal is skipped without it
    pub fact_check_api_key: Option<String>,
    pub browserless: Option<BrowserlessSettings>,
    pub chromium_path: Option<String>,
    pub extraction: ExtractionConfig,
    pub reputation: ReputationConfig,
    pub fact_check: FactCheckConfig,
    pub semantic: SemanticConfig,
    /// Upper bound for a whole assessment run
    pub pipeline_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            gemini_api_key: None,
            fact_check_api_key: None,
            browserless: None,
            chromium_path: None,
            extraction: ExtractionConfig::default(),
            reputation: ReputationConfig::default(),
            fact_check: FactCheckConfig::default(),
            semantic: SemanticConfig::default(),
            pipeline_timeout_secs: 180,
        }
    }
}

/// Read a non-empty environment variable
fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let host = std::env::var("HOST").unwrap_or(defaults.host);

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = Self::load_config_file(&config_path).unwrap_or_default();

        let browserless = env_non_empty(ENV_BROWSERLESS_URL).map(|base_url| BrowserlessSettings {
            base_url,
            token: env_non_empty(ENV_BROWSERLESS_TOKEN),
        });

        Self {
            port,
            host,
            gemini_api_key: env_non_empty(ENV_GEMINI_API_KEY),
            fact_check_api_key: env_non_empty(ENV_FACT_CHECK_API_KEY),
            browserless,
            chromium_path: env_non_empty(ENV_CHROMIUM_PATH),
            extraction: file.extraction,
            reputation: file.reputation,
            fact_check: file.fact_check,
            semantic: file.semantic,
            pipeline_timeout_secs: file
                .pipeline_timeout_secs
                .unwrap_or(defaults.pipeline_timeout_secs),
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents, path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse_config(contents: &str, path: &Path) -> Option<ConfigFile> {
        let contents = contents.trim();
        if contents.is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Some(ConfigFile::default());
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

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
fact_check:
  language: en
semantic:
  temperature: 0.0
pipeline_timeout_secs: 90
"#;
        let file = Config::parse_config(yaml, Path::new("test.yaml")).unwrap();

        assert_eq!(file.fact_check.language, "en");
        assert_eq!(file.fact_check.timeout_secs, 10);
        assert!(file.fact_check.fake_keywords.contains(&"faux".to_string()));
        assert_eq!(file.semantic.temperature, 0.0);
        assert_eq!(file.semantic.fallback_model, "gemini-1.5-flash");
        assert_eq!(file.reputation.rules.len(), 5);
        assert_eq!(file.pipeline_timeout_secs, Some(90));
    }

    #[test]
    fn test_custom_rules_replace_defaults() {
        let yaml = r#"
reputation:
  rules:
    - status: SATIRICAL
      score: 0.1
      explanation: Satire
      keywords: [satire]
"#;
        let file = Config::parse_config(yaml, Path::new("test.yaml")).unwrap();
        assert_eq!(file.reputation.rules.len(), 1);
        assert_eq!(file.reputation.rules[0].status, SourceStatus::Satirical);
        assert_eq!(file.reputation.language, "fr");
    }

    #[test]
    fn test_malformed_yaml_falls_back() {
        assert!(Config::parse_config("semantic: [unclosed", Path::new("bad.yaml")).is_none());
    }

    #[test]
    fn test_default_rule_order() {
        let statuses: Vec<_> = default_keyword_rules().iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                SourceStatus::VeryReliable,
                SourceStatus::Reliable,
                SourceStatus::GenerallyReliable,
                SourceStatus::Satirical,
                SourceStatus::Dangerous,
            ]
        );
    }
}
