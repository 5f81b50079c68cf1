use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use harvest_logging::harvest_info;

/// Everything the harvester reads at startup. Fixed for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HarvestConfig {
    pub base_url: String,
    pub api_key: String,
    pub service_id: String,
    /// Source fields to harvest; also the output column order.
    pub fields: Vec<String>,
    pub start_index: u64,
    pub end_index: u64,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub page_delay_secs: u64,
    pub output_path: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://openapi.foodsafetykorea.go.kr/api".to_string(),
            api_key: String::new(),
            service_id: "C005".to_string(),
            fields: vec![
                "BAR_CD".to_string(),
                "PRDLST_NM".to_string(),
                "BSSH_NM".to_string(),
                "PRDLST_DCNM".to_string(),
                "POG_DAYCNT".to_string(),
            ],
            start_index: 1,
            end_index: 100,
            max_retries: 3,
            retry_delay_secs: 5,
            page_delay_secs: 1,
            output_path: "barcode_product.csv".to_string(),
        }
    }
}

/// Loads the config, or materializes a default template when the file is
/// missing so the operator has something to edit.
pub fn load_or_create(path: &Path) -> anyhow::Result<HarvestConfig> {
    match fs::read_to_string(path) {
        Ok(content) => ron::from_str(&content)
            .with_context(|| format!("could not parse config {}", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let config = HarvestConfig::default();
            let pretty = ron::ser::PrettyConfig::new();
            let content = ron::ser::to_string_pretty(&config, pretty)
                .context("could not serialize default config")?;
            fs::write(path, content)
                .with_context(|| format!("could not write default config {}", path.display()))?;
            harvest_info!("wrote default config template to {}", path.display());
            Ok(config)
        }
        Err(err) => {
            Err(err).with_context(|| format!("could not read config {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_materializes_default_template() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("harvest.ron");

        let config = load_or_create(&path).unwrap();
        assert_eq!(config, HarvestConfig::default());
        assert!(path.exists());

        // A second load round-trips the template we just wrote.
        let reloaded = load_or_create(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn garbage_config_is_an_error_not_a_silent_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("harvest.ron");
        fs::write(&path, "(base_url: 42)").unwrap();

        assert!(load_or_create(&path).is_err());
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("harvest.ron");
        fs::write(&path, "(api_key: \"sample-key\", end_index: 50)").unwrap();

        let config = load_or_create(&path).unwrap();
        assert_eq!(config.api_key, "sample-key");
        assert_eq!(config.end_index, 50);
        assert_eq!(config.service_id, "C005");
        assert_eq!(config.max_retries, 3);
    }
}
