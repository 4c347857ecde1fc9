//! Filter configuration deciding which files an organize run may move.
//!
//! Rules are read from TOML. An entry rejected by the filters is still
//! reported, with outcome `Skipped: excluded by filter`.
//!
//! ```toml
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.tmp", "~*"]
//! extensions = ["bak", "part"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```

use crate::error::ConfigError;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".dirsortrc.toml";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub filters: FilterRules,
}

/// Root-level filter rules configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether files starting with "." may be moved. Defaults to false.
    #[serde(default)]
    pub enable_hidden_files: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist that overrides every exclude rule.
    #[serde(default)]
    pub include: IncludeRules,
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames (e.g. ".DS_Store").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns (e.g. "*.tmp").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions without the dot, matched case-insensitively.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regular expressions matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FilterConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if provided (it must exist)
    /// 2. `.dirsortrc.toml` in the current directory
    /// 3. `$HOME/.config/dirsort/config.toml`
    /// 4. [`FilterConfig::default`]
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let home = std::env::var_os("HOME").map(PathBuf::from);
        for candidate in Self::search_paths(home.as_deref()) {
            if candidate.exists() {
                return Self::load_from_file(&candidate);
            }
        }

        tracing::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Implicit configuration locations, most specific first.
    pub fn search_paths(home: Option<&Path>) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(home) = home {
            paths.push(home.join(".config").join("dirsort").join("config.toml"));
        }
        paths
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile the rules, validating every glob and regex.
    pub fn compile(self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self.filters)
    }
}

/// Pre-parsed filter rules ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let compile_globs = |patterns: &[String]| {
            patterns
                .iter()
                .map(|pattern| {
                    Pattern::new(pattern)
                        .map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
                })
                .collect::<Result<Vec<_>, _>>()
        };

        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

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
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Filters that let every entry through, hidden files included.
    pub fn allow_all() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }

    /// Check whether an entry name may be organized.
    ///
    /// Include patterns win outright. Otherwise the entry is rejected if it
    /// is hidden (unless enabled), or matches an excluded name, extension,
    /// glob or regex, in that order.
    pub fn should_include(&self, file_name: &str) -> bool {
        let path = Path::new(file_name);

        if self.include_patterns.iter().any(|p| p.matches_path(path)) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        if let Some(ext) = crate::category::extension_of(file_name)
            && self.exclude_extensions.contains(&ext.to_lowercase())
        {
            return false;
        }

        if self.exclude_patterns.iter().any(|p| p.matches_path(path)) {
            return false;
        }

        !self.exclude_regexes.iter().any(|r| r.is_match(file_name))
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self::allow_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules_with_exclude(exclude: ExcludeRules) -> FilterConfig {
        FilterConfig {
            filters: FilterRules {
                enable_hidden_files: true,
                exclude,
                include: IncludeRules::default(),
            },
        }
    }

    #[test]
    fn test_default_config_hides_hidden_files() {
        let compiled = FilterConfig::default().compile().unwrap();

        assert!(!compiled.should_include(".DS_Store"));
        assert!(!compiled.should_include(".gitignore"));
        assert!(compiled.should_include("notes.txt"));
    }

    #[test]
    fn test_allow_all_includes_hidden_files() {
        let filters = CompiledFilters::allow_all();
        assert!(filters.should_include(".bashrc"));
        assert!(filters.should_include("anything.tmp"));
    }

    #[test]
    fn test_exclude_exact_filename() {
        let compiled = rules_with_exclude(ExcludeRules {
            filenames: vec!["Thumbs.db".to_string()],
            ..Default::default()
        })
        .compile()
        .unwrap();

        assert!(!compiled.should_include("Thumbs.db"));
        assert!(compiled.should_include("thumbs.db"));
    }

    #[test]
    fn test_exclude_extensions_case_insensitive() {
        let compiled = rules_with_exclude(ExcludeRules {
            extensions: vec!["bak".to_string(), ".PART".to_string()],
            ..Default::default()
        })
        .compile()
        .unwrap();

        assert!(!compiled.should_include("file.bak"));
        assert!(!compiled.should_include("file.BAK"));
        assert!(!compiled.should_include("movie.part"));
        assert!(compiled.should_include("file.txt"));
        assert!(compiled.should_include("bak"));
    }

    #[test]
    fn test_exclude_glob_patterns() {
        let compiled = rules_with_exclude(ExcludeRules {
            patterns: vec!["*.tmp".to_string(), "[0-9]*.log".to_string()],
            ..Default::default()
        })
        .compile()
        .unwrap();

        assert!(!compiled.should_include("scratch.tmp"));
        assert!(!compiled.should_include("2024.log"));
        assert!(compiled.should_include("app.log"));
    }

    #[test]
    fn test_exclude_regex() {
        let compiled = rules_with_exclude(ExcludeRules {
            regex: vec![r"^draft_.*\.md$".to_string()],
            ..Default::default()
        })
        .compile()
        .unwrap();

        assert!(!compiled.should_include("draft_post.md"));
        assert!(compiled.should_include("post.md"));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let config = FilterConfig {
            filters: FilterRules {
                enable_hidden_files: false,
                exclude: ExcludeRules {
                    extensions: vec!["log".to_string()],
                    ..Default::default()
                },
                include: IncludeRules {
                    patterns: vec![".important".to_string(), "keep*.log".to_string()],
                },
            },
        };
        let compiled = config.compile().unwrap();

        assert!(compiled.should_include(".important"));
        assert!(!compiled.should_include(".other"));
        assert!(compiled.should_include("keep-me.log"));
        assert!(!compiled.should_include("drop-me.log"));
    }

    #[test]
    fn test_invalid_patterns_return_errors() {
        let bad_regex = rules_with_exclude(ExcludeRules {
            regex: vec!["[invalid(".to_string()],
            ..Default::default()
        });
        assert!(matches!(
            bad_regex.compile(),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));

        let bad_glob = rules_with_exclude(ExcludeRules {
            patterns: vec!["[invalid".to_string()],
            ..Default::default()
        });
        assert!(matches!(
            bad_glob.compile(),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }

    #[test]
    fn test_parse_toml() {
        let config = FilterConfig::from_toml_str(
            r#"
            [filters]
            enable_hidden_files = true

            [filters.exclude]
            extensions = ["bak"]
            "#,
        )
        .expect("Failed to parse config");

        assert!(config.filters.enable_hidden_files);
        assert_eq!(config.filters.exclude.extensions, vec!["bak".to_string()]);
        assert!(config.filters.include.patterns.is_empty());
    }

    #[test]
    fn test_parse_empty_toml_uses_defaults() {
        let config = FilterConfig::from_toml_str("").expect("Failed to parse config");
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = FilterConfig::from_toml_str("[filters\nbroken");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = FilterConfig::load(Some(Path::new("/non/existent/dirsort.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_search_paths_include_home() {
        let paths = FilterConfig::search_paths(Some(Path::new("/home/user")));
        assert_eq!(
            paths,
            vec![
                PathBuf::from(LOCAL_CONFIG_FILE),
                PathBuf::from("/home/user/.config/dirsort/config.toml"),
            ]
        );
        assert_eq!(FilterConfig::search_paths(None).len(), 1);
    }
}
