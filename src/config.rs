//! Particle-list configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Settings for [`PartList`](crate::core::PartList).
///
/// ```toml
/// save_path_pdg_list = [13, -13, 2212]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartListConfig {
    /// PDG codes whose in-detector path is computed and kept.
    #[serde(default)]
    pub save_path_pdg_list: Vec<i32>,
}

impl PartListConfig {
    pub fn new<I: IntoIterator<Item = i32>>(pdgs: I) -> Self {
        Self {
            save_path_pdg_list: pdgs.into_iter().collect(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Species of interest as a lookup set.
    pub fn pdg_set(&self) -> BTreeSet<i32> {
        self.save_path_pdg_list.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn parses_pdg_list() -> Result<()> {
        let cfg = PartListConfig::from_toml_str("save_path_pdg_list = [13, -13, 2212, 13]")?;
        assert_eq!(cfg.save_path_pdg_list, vec![13, -13, 2212, 13]);
        assert_eq!(cfg.pdg_set().len(), 3);
        Ok(())
    }

    #[test]
    fn empty_document_defaults() -> Result<()> {
        let cfg = PartListConfig::from_toml_str("")?;
        assert!(cfg.save_path_pdg_list.is_empty());
        Ok(())
    }

    #[test]
    fn unknown_key_rejected() {
        let err = PartListConfig::from_toml_str("save_path_pdgs = [13]").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PartListConfig::from_toml_file("/nonexistent/mcreco.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
