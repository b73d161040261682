use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One brand taking part in an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorEntity {
    pub name: String,
    pub domain: Option<String>,
    /// Ad-library page identifier, when known. Preferred over name/domain search.
    #[serde(default)]
    pub page_id: Option<String>,
    #[serde(default, alias = "subject")]
    pub is_subject: bool,
}

impl CompetitorEntity {
    /// Search term for the ad library: page id, then domain, then name.
    #[must_use]
    pub fn search_key(&self) -> &str {
        self.page_id
            .as_deref()
            .or(self.domain.as_deref())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompetitorSetFile {
    pub brands: Vec<CompetitorEntity>,
}

/// Load and validate a competitor set from a YAML file.
///
/// Only names are validated here; the subject/competitor counts are checked
/// when the analysis starts.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_competitor_set(path: &Path) -> Result<CompetitorSetFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CompetitorFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let set: CompetitorSetFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CompetitorFileParse)?;

    validate_competitor_set(&set)?;

    Ok(set)
}

fn validate_competitor_set(set: &CompetitorSetFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for brand in &set.brands {
        if brand.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(brand.name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand name: '{}'",
                brand.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "competitors_test.rs"]
mod tests;
