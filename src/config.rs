//! Extension rules and file filtering configuration.
//!
//! Configuration has two halves: `[rules]`, a mapping from extension key
//! (".md", ".png", …) to the vault folder files of that extension should be
//! moved into, and `[filters]`, exclusion rules deciding which root files
//! participate in a batch at all.
//!
//! A rule value is tri-state in spirit: a key that is absent and a key set to
//! the empty string both mean "do not move this extension". Both collapse
//! into [`TargetRule::Unset`] when loaded.
//!
//! # Configuration File Format
//!
//! ```toml
//! [rules]
//! ".md" = "Notes"
//! ".png" = "Attachments/Images"
//! ".pdf" = ""
//!
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.tmp"]
//! extensions = ["bak"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension keys every fresh configuration carries, all unset.
const DEFAULT_RULE_KEYS: &[&str] = &[
    ".md", ".png", ".jpeg", ".jpg", ".gif", ".bmp", ".webp", ".svg", ".pdf", ".mmd", ".tex",
    ".canvas",
];

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// A rule key is not a valid extension key.
    InvalidRuleKey(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading or writing configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidRuleKey(key) => {
                write!(
                    f,
                    "Invalid rule key '{}': expected an extension key like \".md\"",
                    key
                )
            }
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(
                    f,
                    "Invalid glob pattern '{}': expected *.ext or dir/**",
                    pattern
                )
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error accessing configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where files of one extension should go.
///
/// Serialized as a plain string; the empty string round-trips to `Unset`,
/// preserving the on-disk shape of configurations that list an extension
/// without assigning it a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetRule {
    /// Extension is listed but not assigned; files are left in place.
    Unset,
    /// Move files of this extension into the named vault folder.
    Set(String),
}

impl TargetRule {
    /// The configured folder, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            TargetRule::Unset => None,
            TargetRule::Set(dir) => Some(dir),
        }
    }
}

impl From<String> for TargetRule {
    fn from(value: String) -> Self {
        if value.is_empty() {
            TargetRule::Unset
        } else {
            TargetRule::Set(value)
        }
    }
}

impl From<TargetRule> for String {
    fn from(rule: TargetRule) -> Self {
        match rule {
            TargetRule::Unset => String::new(),
            TargetRule::Set(dir) => dir,
        }
    }
}

/// Full configuration: extension rules plus batch filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Extension key → target folder rules.
    #[serde(default)]
    pub rules: BTreeMap<String, TargetRule>,

    /// Rules deciding which root files enter a batch.
    #[serde(default)]
    pub filters: FilterRules,
}

/// Root-level filter rules configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to include hidden files (starting with "."). Defaults to false.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

/// Helper function for default value of `enable_hidden_files`.
fn default_enable_hidden_files() -> bool {
    false
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: false,
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

/// Rules for excluding files from a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.tmp").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude, without the leading dot (e.g., "bak").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns to exclude (for advanced users).
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl VaultConfig {
    /// Load configuration, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.vaultmove.toml` in the current directory
    /// 3. Look for `~/.config/vaultmove/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any loaded file fails validation.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        // If explicitly specified, load from that path
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try current directory
        let local_config = PathBuf::from(".vaultmove.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try home directory
        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("vaultmove")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        // Fall back to defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::InvalidRuleKey` if a rule key fails validation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration to `path` in TOML format.
    ///
    /// Used at settings-change time, never during a batch.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// Validate rule keys: every key must be a non-empty extension key with a
    /// leading dot, e.g. ".md".
    fn validate(&self) -> Result<(), ConfigError> {
        for key in self.rules.keys() {
            if key.len() < 2 || !key.starts_with('.') {
                return Err(ConfigError::InvalidRuleKey(key.clone()));
            }
        }
        Ok(())
    }

    /// Look up the target folder for an extension key.
    ///
    /// Returns `None` for absent keys and for keys set to [`TargetRule::Unset`];
    /// both mean "leave files of this extension alone". The empty extension
    /// key (extensionless files) never matches a rule.
    pub fn target_for(&self, extension: &str) -> Option<&str> {
        self.rules.get(extension).and_then(|rule| rule.target())
    }

    /// Set or clear the rule for an extension key.
    pub fn set_rule(&mut self, extension: &str, rule: TargetRule) -> Result<(), ConfigError> {
        if extension.len() < 2 || !extension.starts_with('.') {
            return Err(ConfigError::InvalidRuleKey(extension.to_string()));
        }
        self.rules.insert(extension.to_string(), rule);
        Ok(())
    }

    /// Compile the filter rules into matchers for efficient per-file checks.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<FileFilters, ConfigError> {
        FileFilters::new(&self.filters)
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        let rules = DEFAULT_RULE_KEYS
            .iter()
            .map(|key| (key.to_string(), TargetRule::Unset))
            .collect();
        Self {
            rules,
            filters: FilterRules::default(),
        }
    }
}

/// Compiled filter matchers for per-file checks.
///
/// Glob and regex patterns are compiled once per batch so that matching each
/// file is a set lookup plus a scan over the pattern lists.
pub struct FileFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl FileFilters {
    /// Create compiled filters from filter rules.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex patterns are invalid.
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        // Pre-compile all glob patterns and validate them
        let exclude_patterns = rules
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let include_patterns = rules
            .include
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Pre-compile all regex patterns and validate them
        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Check if a file should enter the batch (not excluded).
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        // 1. Include rules have priority (whitelist override)
        if self.matches_include_patterns(file_path) {
            return true;
        }

        // 2. Check hidden file filter
        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        // 3. Check exact filename match
        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        // 4. Check extension match
        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        // 5. Check glob patterns
        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(file_path))
        {
            return false;
        }

        // 6. Check regex patterns
        if self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
        {
            return false;
        }

        // 7. Include by default
        true
    }

    /// Check if file matches any include (whitelist) patterns.
    fn matches_include_patterns(&self, file_path: &Path) -> bool {
        self.include_patterns
            .iter()
            .any(|pattern| pattern.matches_path(file_path))
    }
}
