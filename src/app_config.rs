/*!
 * Application configuration.
 *
 * Loaded from an optional JSON file and overridable from the command line.
 * Every field has a default, so running without a config file works.
 */

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::correction::cache::{CHINESE_CACHE_CAPACITY, ENGLISH_CACHE_CAPACITY};
use crate::correction::pipeline::DEFAULT_CONTEXT_WINDOW;
use crate::correctors::language_tool::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::repair::merge::DEFAULT_TERMINAL_PUNCTUATION;
use crate::repair::timeline::DEFAULT_MIN_DURATION_MS;

/// Log verbosity, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => anyhow::bail!("Unknown log level: {}", other),
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Settings for the optional LanguageTool grammar pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrammarConfig {
    /// Base URL of a running LanguageTool server
    #[serde(default = "default_grammar_endpoint")]
    pub endpoint: String,

    /// Language code sent with each check request
    #[serde(default = "default_grammar_language")]
    pub language: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_grammar_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        GrammarConfig {
            endpoint: default_grammar_endpoint(),
            language: default_grammar_language(),
            timeout_secs: default_grammar_timeout_secs(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Shortest acceptable cue duration after repair, in milliseconds
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,

    /// Cues on each side contributing to a cue's correction context
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Whether the English route runs the grammar pass
    #[serde(default)]
    pub enable_grammar: bool,

    /// Keep original cue numbers instead of renumbering sequentially
    #[serde(default)]
    pub preserve_numbering: bool,

    /// Characters treated as sentence-ending for the merge heuristic
    #[serde(default = "default_terminal_punctuation")]
    pub terminal_punctuation: Vec<char>,

    /// Correction cache capacity for the Chinese route
    #[serde(default = "default_chinese_cache_capacity")]
    pub chinese_cache_capacity: usize,

    /// Correction cache capacity for the English route
    #[serde(default = "default_english_cache_capacity")]
    pub english_cache_capacity: usize,

    /// Known-bad to known-good literal substitutions for Chinese text
    #[serde(default)]
    pub typo_map: HashMap<String, String>,

    #[serde(default)]
    pub grammar: GrammarConfig,

    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_min_duration_ms() -> u64 {
    DEFAULT_MIN_DURATION_MS
}

fn default_context_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}

fn default_terminal_punctuation() -> Vec<char> {
    DEFAULT_TERMINAL_PUNCTUATION.to_vec()
}

fn default_chinese_cache_capacity() -> usize {
    CHINESE_CACHE_CAPACITY
}

fn default_english_cache_capacity() -> usize {
    ENGLISH_CACHE_CAPACITY
}

fn default_grammar_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_grammar_language() -> String {
    "en-US".to_string()
}

fn default_grammar_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_duration_ms: default_min_duration_ms(),
            context_window: default_context_window(),
            enable_grammar: false,
            preserve_numbering: false,
            terminal_punctuation: default_terminal_punctuation(),
            chinese_cache_capacity: default_chinese_cache_capacity(),
            english_cache_capacity: default_english_cache_capacity(),
            typo_map: HashMap::new(),
            grammar: GrammarConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file when a path is given, defaults otherwise
    pub fn from_optional_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Config::default()),
        }
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_duration_ms == 0 {
            anyhow::bail!("min_duration_ms must be greater than zero");
        }
        if self.terminal_punctuation.is_empty() {
            anyhow::bail!("terminal_punctuation must not be empty");
        }
        if self.chinese_cache_capacity == 0 || self.english_cache_capacity == 0 {
            anyhow::bail!("Cache capacities must be greater than zero");
        }
        if self.enable_grammar {
            if self.grammar.endpoint.is_empty() {
                anyhow::bail!("grammar.endpoint must not be empty when grammar is enabled");
            }
            if self.grammar.timeout_secs == 0 {
                anyhow::bail!("grammar.timeout_secs must be greater than zero");
            }
        }
        Ok(())
    }
}
