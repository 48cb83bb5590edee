//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use cadence_commerce::catalog::{Catalog, Item};
use cadence_commerce::{Money, Shop, ShopConfig};
use cadence_observability::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Shop tunables.
    #[serde(default)]
    pub shop: ShopConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Catalog items. Empty means the built-in catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<CatalogEntry>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Build the catalog, falling back to the built-in items.
    pub fn build_catalog(&self) -> Result<Catalog> {
        if self.catalog.is_empty() {
            return Ok(Catalog::seeded(self.shop.currency));
        }

        let items = self
            .catalog
            .iter()
            .map(|entry| entry.to_item(&self.shop))
            .collect();
        Catalog::new(items).context("Invalid [[catalog]] section")
    }

    /// Build a fresh in-memory shop from this configuration.
    pub fn build_shop(&self) -> Result<Shop> {
        let catalog = self.build_catalog()?;
        Shop::new(self.shop.clone(), catalog).context("Invalid [shop] section")
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level (trace, debug, info, warn, error).
    #[serde(default)]
    pub level: LogLevel,

    /// Line format (human or json).
    #[serde(default)]
    pub format: LogFormat,
}

/// A catalog item as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub item_id: String,
    pub name: String,
    /// Unit price as a decimal (e.g. 29.99).
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CatalogEntry {
    fn to_item(&self, shop: &ShopConfig) -> Item {
        let item = Item::new(
            self.item_id.trim(),
            self.name.trim(),
            Money::from_decimal(self.price, shop.currency),
        );
        match self.description {
            Some(ref d) => item.with_description(d.as_str()),
            None => item,
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |e| e == "json")
}

/// Generate a default cadence.toml config file.
pub fn generate_default_config(name: &str) -> String {
    format!(
        r#"# Cadence shop configuration

[shop]
name = "{name}"
# A discount code becomes available every nth_order orders.
nth_order = 5
discount_percent = 10
code_prefix = "DISCOUNT"
currency = "USD"
max_quantity_per_item = 1000

[logging]
level = "info"
format = "human"

# Remove every [[catalog]] entry to use the built-in items.
[[catalog]]
item_id = "item001"
name = "Laptop"
price = 999.99
description = "High-performance laptop"

[[catalog]]
item_id = "item002"
name = "Mouse"
price = 29.99
description = "Wireless mouse"

[[catalog]]
item_id = "item003"
name = "Keyboard"
price = 79.99
description = "Mechanical keyboard"

[[catalog]]
item_id = "item004"
name = "Monitor"
price = 299.99
description = "27-inch 4K monitor"

[[catalog]]
item_id = "item005"
name = "Headphones"
price = 149.99
description = "Noise-cancelling headphones"

[[catalog]]
item_id = "item006"
name = "Webcam"
price = 89.99
description = "HD webcam"
"#,
        name = name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_commerce::ItemId;

    #[test]
    fn test_default_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config("demo")).unwrap();
        assert_eq!(config.shop.name, "demo");
        assert_eq!(config.shop.nth_order, 5);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.catalog.len(), 6);

        let catalog = config.build_catalog().unwrap();
        let laptop = catalog.get(&ItemId::new("item001")).unwrap();
        assert_eq!(laptop.price.amount_cents, 99999);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config.shop, ShopConfig::default());
        assert_eq!(config.build_catalog().unwrap().len(), 6);
    }

    #[test]
    fn test_custom_catalog_and_cadence() {
        let config: CliConfig = toml::from_str(
            r#"
[shop]
nth_order = 2
code_prefix = "SAVE"

[[catalog]]
item_id = "tea"
name = "Tea"
price = 4.5
"#,
        )
        .unwrap();

        let shop = config.build_shop().unwrap();
        assert_eq!(shop.catalog().len(), 1);
        for _ in 0..2 {
            shop.add_to_cart("u", "tea", 1).unwrap();
            shop.checkout("u", None).unwrap();
        }
        let stats = shop.admin_statistics().unwrap();
        assert_eq!(stats.discount_codes[0].code, "SAVE1");
    }

    #[test]
    fn test_duplicate_catalog_item_rejected() {
        let config: CliConfig = toml::from_str(
            r#"
[[catalog]]
item_id = "a"
name = "A"
price = 1.0

[[catalog]]
item_id = "a"
name = "A again"
price = 2.0
"#,
        )
        .unwrap();
        assert!(config.build_catalog().is_err());
    }

    #[test]
    fn test_invalid_shop_section_rejected() {
        let config: CliConfig = toml::from_str("[shop]\ndiscount_percent = 0\n").unwrap();
        assert!(config.build_shop().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CliConfig::default();
        config.shop.nth_order = 3;
        config.logging.format = LogFormat::Json;

        for name in ["cadence.toml", "cadence.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            let loaded = CliConfig::load(&path).unwrap();
            assert_eq!(loaded.shop.nth_order, 3);
            assert_eq!(loaded.logging.format, LogFormat::Json);
        }
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cadence.toml");
        std::fs::write(&path, "[shop\n").unwrap();
        let err = CliConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse TOML config"));
    }
}
