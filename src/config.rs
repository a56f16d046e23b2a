// src/config.rs
use crate::error::Result;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound on `max_edit_distance`; past this the variation set explodes.
pub const MAX_EDIT_DISTANCE_CAP: usize = 2;

/// Query length cap applied on top of `max_query_chars` at distance 2.
/// A few hundred thousand variations at this length.
pub const MAX_QUERY_CHARS_AT_DISTANCE_2: usize = 10;

pub const CONFIG_ENV_VAR: &str = "PHRASE_COMPLETE_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct AutocompleteConfig {
    #[serde(default = "default_max_edit_distance")]
    pub max_edit_distance: usize,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Longest query, in chars, a caller should pass to `autocomplete`.
    /// See [`AutocompleteConfig::query_char_limit`].
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,
    #[serde(default = "default_dictionary_dir")]
    pub dictionary_dir: PathBuf,
    #[serde(default = "default_dictionary_id")]
    pub dictionary_id: String,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: default_max_edit_distance(),
            default_limit: default_limit(),
            max_query_chars: default_max_query_chars(),
            dictionary_dir: default_dictionary_dir(),
            dictionary_id: default_dictionary_id(),
        }
    }
}

impl AutocompleteConfig {
    /// Loads the config file if one exists, otherwise returns defaults.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path();
        if config_path.exists() {
            log::debug!("loading config from {}", config_path.display());
            return Self::from_file(&config_path);
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let parsed: AutocompleteConfig = toml::from_str(raw)?;
        Ok(parsed.clamped())
    }

    /// Caps the edit distance at [`MAX_EDIT_DISTANCE_CAP`].
    pub fn clamped(mut self) -> Self {
        if self.max_edit_distance > MAX_EDIT_DISTANCE_CAP {
            log::warn!(
                "max_edit_distance {} is too large, using {}",
                self.max_edit_distance,
                MAX_EDIT_DISTANCE_CAP
            );
            self.max_edit_distance = MAX_EDIT_DISTANCE_CAP;
        }
        self
    }

    /// Effective query length limit for the configured edit distance.
    pub fn query_char_limit(&self) -> usize {
        if self.max_edit_distance >= 2 {
            self.max_query_chars.min(MAX_QUERY_CHARS_AT_DISTANCE_2)
        } else {
            self.max_query_chars
        }
    }

    /// Cuts `query` down to [`query_char_limit`](Self::query_char_limit) chars.
    /// The flag is `true` when something was cut.
    pub fn fit_query<'a>(&self, query: &'a str) -> (&'a str, bool) {
        match query.char_indices().nth(self.query_char_limit()) {
            Some((end, _)) => (&query[..end], true),
            None => (query, false),
        }
    }
}

fn resolve_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }

    if let Some(base) = dirs::config_dir() {
        return base.join("phrase-complete").join("config.toml");
    }

    PathBuf::from("phrase-complete.toml")
}

fn default_max_edit_distance() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

fn default_max_query_chars() -> usize {
    24
}

fn default_dictionary_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join("phrase-complete"))
        .unwrap_or_else(|| PathBuf::from("dictionaries"))
}

fn default_dictionary_id() -> String {
    "default".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = AutocompleteConfig::from_toml("").unwrap();
        assert_eq!(config.max_edit_distance, 1);
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.dictionary_id, "default");
        assert_eq!(config.max_query_chars, 24);
    }

    #[test]
    fn query_limit_tightens_at_distance_two() {
        let config = AutocompleteConfig::from_toml("max_query_chars = 30").unwrap();
        assert_eq!(config.query_char_limit(), 30);

        let config = AutocompleteConfig::from_toml("max_edit_distance = 2\nmax_query_chars = 30").unwrap();
        assert_eq!(config.query_char_limit(), MAX_QUERY_CHARS_AT_DISTANCE_2);

        let config = AutocompleteConfig::from_toml("max_edit_distance = 2\nmax_query_chars = 6").unwrap();
        assert_eq!(config.query_char_limit(), 6);
    }

    #[test]
    fn long_queries_are_cut_on_char_boundaries() {
        let config = AutocompleteConfig::from_toml("max_edit_distance = 2").unwrap();
        let (fitted, cut) = config.fit_query("the quick brown fox jumps");
        assert!(cut);
        assert_eq!(fitted, "the quick ");

        let config = AutocompleteConfig::from_toml("max_query_chars = 3").unwrap();
        assert_eq!(config.fit_query("héllo"), ("hél", true));
        assert_eq!(config.fit_query("hé"), ("hé", false));
    }

    #[test]
    fn fields_override_defaults() {
        let config = AutocompleteConfig::from_toml(
            "max_edit_distance = 2\ndefault_limit = 5\ndictionary_dir = \"/tmp/dicts\"\n",
        )
        .unwrap();
        assert_eq!(config.max_edit_distance, 2);
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.dictionary_dir, PathBuf::from("/tmp/dicts"));
    }

    #[test]
    fn oversized_distance_is_clamped() {
        let config = AutocompleteConfig::from_toml("max_edit_distance = 9").unwrap();
        assert_eq!(config.max_edit_distance, MAX_EDIT_DISTANCE_CAP);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AutocompleteConfig::from_toml("max_edit_distance = \"two\"").is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_limit = 3").unwrap();
        assert_eq!(AutocompleteConfig::from_file(&path).unwrap().default_limit, 3);
    }
}
