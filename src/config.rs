use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DatasetConfig – declarative description of one dataset/tab
// ---------------------------------------------------------------------------

/// Configuration for one dataset tab. Immutable after construction; the
/// pipeline orchestrator is its only consumer. Behavioural differences
/// between tabs (year filtering, grouping key, identifier set) live here
/// instead of being duplicated across per-tab code paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Stable identifier used to select the dataset.
    pub id: String,
    /// Human-readable tab title.
    pub name: String,
    /// Location of the source table.
    pub file_path: PathBuf,
    /// Descriptor columns carried verbatim through the reshape, in order.
    pub identifier_columns: Vec<String>,
    /// Whether the year-range projector applies to this dataset.
    #[serde(default)]
    pub year_filter_enabled: bool,
    /// Optional secondary grouping key for the median trend (e.g. "Variable").
    #[serde(default)]
    pub secondary_group_key: Option<String>,
    /// Columns dropped before any processing.
    #[serde(default)]
    pub exclude_columns: BTreeSet<String>,
    /// Column the chart groups/colors series by; aggregate rows get the
    /// sentinel label here. Defaults to the first identifier column.
    #[serde(default)]
    pub discriminator_column: Option<String>,
}

impl DatasetConfig {
    /// The chart discriminator: configured column, or the first identifier.
    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator_column
            .as_deref()
            .or_else(|| self.identifier_columns.first().map(|s| s.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Registry – all dataset configs, built once at application start
// ---------------------------------------------------------------------------

/// The static dataset registry. One entry per tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    pub datasets: Vec<DatasetConfig>,
}

impl Registry {
    /// Look up a dataset config by id.
    pub fn get(&self, id: &str) -> Option<&DatasetConfig> {
        self.datasets.iter().find(|d| d.id == id)
    }

    /// Load a registry from a JSON file.
    pub fn from_json_path(path: &Path) -> Result<Registry> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading registry {}", path.display()))?;
        serde_json::from_str(&text).context("parsing registry JSON")
    }

    /// The built-in registry mirroring the site's modules.
    pub fn builtin() -> Registry {
        fn cols(names: &[&str]) -> Vec<String> {
            names.iter().map(|s| s.to_string()).collect()
        }

        Registry {
            datasets: vec![
                DatasetConfig {
                    id: "pathways".to_string(),
                    name: "Climate Pathways".to_string(),
                    file_path: PathBuf::from("Alldata.csv"),
                    identifier_columns: cols(&["Model", "Scenario", "Region", "Variable", "Unit"]),
                    year_filter_enabled: true,
                    secondary_group_key: Some("Variable".to_string()),
                    exclude_columns: BTreeSet::new(),
                    discriminator_column: Some("Scenario".to_string()),
                },
                DatasetConfig {
                    id: "products".to_string(),
                    name: "Products".to_string(),
                    file_path: PathBuf::from("products.csv"),
                    identifier_columns: cols(&["Product", "Category", "Region"]),
                    year_filter_enabled: true,
                    secondary_group_key: None,
                    exclude_columns: BTreeSet::new(),
                    discriminator_column: Some("Category".to_string()),
                },
                DatasetConfig {
                    id: "indicators".to_string(),
                    name: "Country Indicators".to_string(),
                    file_path: PathBuf::from("indicators.csv"),
                    identifier_columns: cols(&["Country", "Sector", "Indicator"]),
                    year_filter_enabled: false,
                    secondary_group_key: Some("Indicator".to_string()),
                    exclude_columns: BTreeSet::new(),
                    discriminator_column: Some("Country".to_string()),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_has_unique_ids() {
        let reg = Registry::builtin();
        let mut ids: Vec<&str> = reg.datasets.iter().map(|d| d.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), reg.datasets.len());
        assert!(reg.get("pathways").is_some());
        assert!(reg.get("nope").is_none());
    }

    #[test]
    fn discriminator_falls_back_to_first_identifier() {
        let mut cfg = Registry::builtin().get("pathways").unwrap().clone();
        cfg.discriminator_column = None;
        assert_eq!(cfg.discriminator(), Some("Model"));
    }

    #[test]
    fn registry_round_trips_through_json() {
        let reg = Registry::builtin();
        let text = serde_json::to_string(&reg).unwrap();
        let back: Registry = serde_json::from_str(&text).unwrap();
        assert_eq!(back.datasets.len(), reg.datasets.len());
        assert_eq!(back.datasets[0].identifier_columns, reg.datasets[0].identifier_columns);
    }
}
