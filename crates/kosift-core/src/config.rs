//! Reference table location configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default template location relative to the installation root
const DEFAULT_HMM_TABLE: &str = "db/hmm_table_template.txt";
/// Default ko list location relative to the installation root
const DEFAULT_KO_LIST: &str = "db/ko_list";

/// Where the reference tables live
///
/// Both tables default to fixed locations under an installation root; either
/// path can be overridden individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Installation root the default table paths are resolved against
    pub root: PathBuf,
    /// Explicit hmm table template path, overriding the root-relative default
    pub hmm_table: Option<PathBuf>,
    /// Explicit ko list path, overriding the root-relative default
    pub ko_list: Option<PathBuf>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            hmm_table: None,
            ko_list: None,
        }
    }
}

impl TableConfig {
    /// Create a new TableConfig with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `KOSIFT_HOME`: Installation root
    /// - `KOSIFT_HMM_TABLE`: hmm table template path override
    /// - `KOSIFT_KO_LIST`: ko list path override
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(root) = std::env::var("KOSIFT_HOME") {
            config.root = PathBuf::from(root);
        }
        if let Ok(path) = std::env::var("KOSIFT_HMM_TABLE") {
            config.hmm_table = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("KOSIFT_KO_LIST") {
            config.ko_list = Some(PathBuf::from(path));
        }

        config
    }

    /// Set the installation root
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Override the hmm table template path
    pub fn with_hmm_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.hmm_table = Some(path.into());
        self
    }

    /// Override the ko list path
    pub fn with_ko_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.ko_list = Some(path.into());
        self
    }

    /// Resolved hmm table template path
    pub fn hmm_table_path(&self) -> PathBuf {
        match &self.hmm_table {
            Some(path) => path.clone(),
            None => self.root.join(DEFAULT_HMM_TABLE),
        }
    }

    /// Resolved ko list path
    pub fn ko_list_path(&self) -> PathBuf {
        match &self.ko_list {
            Some(path) => path.clone(),
            None => self.root.join(DEFAULT_KO_LIST),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_are_root_relative() {
        let config = TableConfig::default();
        assert_eq!(config.hmm_table_path(), PathBuf::from("./db/hmm_table_template.txt"));
        assert_eq!(config.ko_list_path(), PathBuf::from("./db/ko_list"));
    }

    #[test]
    fn test_root_moves_both_defaults() {
        let config = TableConfig::new().with_root("/opt/kosift");
        assert_eq!(
            config.hmm_table_path(),
            PathBuf::from("/opt/kosift/db/hmm_table_template.txt")
        );
        assert_eq!(config.ko_list_path(), PathBuf::from("/opt/kosift/db/ko_list"));
    }

    #[test]
    fn test_explicit_overrides_beat_root() {
        let config = TableConfig::new()
            .with_root("/opt/kosift")
            .with_hmm_table("/data/custom_template.txt")
            .with_ko_list("/data/custom_ko_list");

        assert_eq!(config.hmm_table_path(), PathBuf::from("/data/custom_template.txt"));
        assert_eq!(config.ko_list_path(), PathBuf::from("/data/custom_ko_list"));
    }

    #[test]
    fn test_partial_override() {
        let config = TableConfig::new()
            .with_root("/opt/kosift")
            .with_ko_list("/data/ko_list.custom");

        assert_eq!(
            config.hmm_table_path(),
            PathBuf::from("/opt/kosift/db/hmm_table_template.txt")
        );
        assert_eq!(config.ko_list_path(), PathBuf::from("/data/ko_list.custom"));
    }
}
