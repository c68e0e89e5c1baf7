use crate::error::Result;
use crate::paths;
use claude_agent::{OutputFormat, PrintOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// GeneratorConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorFormat {
    Text,
    #[default]
    Json,
}

impl From<GeneratorFormat> for OutputFormat {
    fn from(f: GeneratorFormat) -> Self {
        match f {
            GeneratorFormat::Text => OutputFormat::Text,
            GeneratorFormat::Json => OutputFormat::Json,
        }
    }
}

/// How the external text generator is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_executable")]
    pub executable: String,
    /// Arguments placed before `--print` (e.g. a package name for `npx`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub output_format: GeneratorFormat,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_executable() -> String {
    "claude".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            args: Vec::new(),
            model: None,
            output_format: GeneratorFormat::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeneratorConfig {
    pub fn print_options(&self, cwd: &Path) -> PrintOptions {
        PrintOptions {
            executable: self.executable.clone(),
            args: self.args.clone(),
            model: self.model.clone(),
            output_format: self.output_format.into(),
            cwd: Some(cwd.to_path_buf()),
            timeout: Duration::from_secs(self.timeout_secs),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// LanguageConfig
// ---------------------------------------------------------------------------

/// Keys accepted when a raw field is a mapping keyed by language tag,
/// checked in order (short tag first, then the long form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageConfig {
    #[serde(default = "default_primary_keys")]
    pub primary: Vec<String>,
    #[serde(default = "default_secondary_keys")]
    pub secondary: Vec<String>,
}

fn default_primary_keys() -> Vec<String> {
    vec!["en".to_string(), "english".to_string()]
}

fn default_secondary_keys() -> Vec<String> {
    vec!["hi".to_string(), "hindi".to_string()]
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_keys(),
            secondary: default_secondary_keys(),
        }
    }
}

// ---------------------------------------------------------------------------
// IdeasConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeasConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before attempt `n + 1` is `n * retry_backoff_ms`.
    #[serde(default)]
    pub retry_backoff_ms: u64,
    /// Word-overlap ratio above which two ideas are near-duplicates.
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: f64,
    #[serde(default)]
    pub languages: LanguageConfig,
    #[serde(default = "default_target_users")]
    pub default_target_users: String,
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
    #[serde(default = "default_id_width")]
    pub id_width: usize,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_duplicate_threshold() -> f64 {
    0.7
}

fn default_target_users() -> String {
    "Farmers in UP".to_string()
}

fn default_id_prefix() -> String {
    "tool".to_string()
}

fn default_id_width() -> usize {
    3
}

impl Default for IdeasConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_backoff_ms: 0,
            duplicate_threshold: default_duplicate_threshold(),
            languages: LanguageConfig::default(),
            default_target_users: default_target_users(),
            id_prefix: default_id_prefix(),
            id_width: default_id_width(),
        }
    }
}

// ---------------------------------------------------------------------------
// DomainConfig
// ---------------------------------------------------------------------------

/// What kind of tools to ask for. Feeds the idea prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    #[serde(default = "default_domain_description")]
    pub description: String,
    #[serde(default = "default_constraints")]
    pub constraints: Vec<String>,
}

fn default_domain_description() -> String {
    "AI and smartphone-based tools for farmers in Uttar Pradesh, India".to_string()
}

fn default_constraints() -> Vec<String> {
    [
        "Must be buildable as a simple web app (HTML/CSS/JS)",
        "Must work on basic Android smartphones",
        "Should support Hindi and English",
        "Should solve a real pain point for UP farmers",
        "Should leverage AI capabilities (image recognition, NLP, predictions)",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            description: default_domain_description(),
            constraints: default_constraints(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub ideas: IdeasConfig,
    #[serde(default)]
    pub domain: DomainConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            generator: GeneratorConfig::default(),
            ideas: IdeasConfig::default(),
            domain: DomainConfig::default(),
        }
    }
}

impl Config {
    /// Load `.forge/config.yaml`, or defaults when the file does not exist.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.ideas.max_attempts == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "ideas.max_attempts is 0: no idea will ever be generated".to_string(),
            });
        }

        if self.generator.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "generator.timeout_secs is 0: every call will time out".to_string(),
            });
        }

        let t = self.ideas.duplicate_threshold;
        if !(t > 0.0 && t <= 1.0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("ideas.duplicate_threshold={t} is outside (0, 1]"),
            });
        }

        let langs = &self.ideas.languages;
        if langs.primary.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "ideas.languages.primary is empty".to_string(),
            });
        }
        if langs.primary.iter().any(|k| langs.secondary.contains(k)) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "ideas.languages.primary and secondary share a tag".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
