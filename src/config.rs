//! Configuration: custom category tables and file filtering rules.
//!
//! Configuration is loaded from TOML. It can replace the built-in category
//! table (the `[[categories]]` array, whose order is significant) and tune
//! which files a run considers at all (the `[filters]` section).
//!
//! # Configuration File Format
//!
//! ```toml
//! [filters]
//! include_hidden = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! extensions = ["part", "crdownload"]
//! patterns = ["*.tmp"]
//! regex = []
//!
//! [[categories]]
//! name = "Images"
//! extensions = [".jpg", ".png"]
//!
//! [[categories]]
//! name = "Documents"
//! extensions = [".pdf", ".txt"]
//! ```

use crate::classifier::{Category, CategoryTable};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// A category was declared without a name.
    EmptyCategoryName,
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::EmptyCategoryName => {
                write!(f, "Category declared without a name")
            }
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration, deserialized from TOML.
///
/// An empty `categories` list means "use the built-in table".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Ordered category declarations replacing the built-in table.
    #[serde(default)]
    pub categories: Vec<CategoryRule>,

    /// Rules deciding which files a run considers.
    #[serde(default)]
    pub filters: FilterRules,
}

/// One declared category: a name and its extensions, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// File filtering rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to consider hidden files (names starting with "."). Defaults
    /// to false.
    #[serde(default)]
    pub include_hidden: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for excluding files from a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// File extensions to exclude, with or without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.tmp").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl OrganizerConfig {
    /// Loads configuration, with fallback to defaults.
    ///
    /// Attempts sources in order:
    /// 1. `config_path`, when provided (an error if missing or invalid)
    /// 2. `.filesift.toml` in the current directory
    /// 3. `~/.config/filesift/config.toml`
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".filesift.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("filesift")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Validates the configuration and produces the runtime values: the
    /// category table and the compiled filter set.
    ///
    /// # Errors
    ///
    /// Returns an error if a category has an empty name or any glob/regex
    /// pattern fails to compile.
    pub fn compile(self) -> Result<(CategoryTable, CompiledFilters), ConfigError> {
        let table = if self.categories.is_empty() {
            CategoryTable::builtin()
        } else {
            let mut categories = Vec::with_capacity(self.categories.len());
            for rule in &self.categories {
                if rule.name.trim().is_empty() {
                    return Err(ConfigError::EmptyCategoryName);
                }
                let extensions: Vec<&str> = rule.extensions.iter().map(String::as_str).collect();
                categories.push(Category::new(rule.name.clone(), &extensions));
            }
            CategoryTable::new(categories)
        };

        let filters = CompiledFilters::new(self.filters)?;
        Ok((table, filters))
    }
}

/// Pre-compiled filter structures for per-file matching.
///
/// Glob and regex patterns are parsed once at compile time so matching each
/// snapshot entry costs no reparsing.
pub struct CompiledFilters {
    include_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl CompiledFilters {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

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
            include_hidden: rules.include_hidden,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Returns true if a file passes the filters and belongs in the snapshot.
    ///
    /// Checks, with early termination:
    /// 1. Hidden file filter (unless `include_hidden`)
    /// 2. Exact filename match
    /// 3. File extension match (case-insensitive)
    /// 4. Glob pattern match
    /// 5. Regex match on the file name
    /// 6. Default: include
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if !self.include_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(file_path))
        {
            return false;
        }

        if self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
        {
            return false;
        }

        true
    }
}

impl Default for CompiledFilters {
    /// Hidden files excluded, nothing else filtered.
    fn default() -> Self {
        Self {
            include_hidden: false,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
        }
    }
}
