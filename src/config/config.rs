use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::columns::ColumnDef;
use crate::error::TableError;
use crate::utils::app_paths::AppPaths;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub table: TableConfig,
    pub search: SearchConfig,
    pub export: ExportConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Viewport height in pixels
    pub height: u32,

    /// Fixed height of every row in pixels
    pub row_height: u32,

    /// Rows materialized per window
    pub visible_rows: usize,

    /// Extra rows rendered below the window
    pub overscan: usize,

    /// Virtual scrolling; when false the table is paged
    pub virtual_scroll: bool,

    /// Rows per page in paged mode
    pub page_size: usize,

    pub searchable: bool,
    pub selectable: bool,

    /// Presentation hints passed through to sinks
    pub striped: bool,
    pub hover: bool,

    /// Column definitions; empty means "all values of each row"
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before typed search text is applied
    pub debounce_ms: u64,

    /// Markers wrapped around highlighted matches in text output
    pub highlight_open: String,
    pub highlight_close: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Suggested filename for exports
    pub filename: String,

    pub include_header: bool,
}

/// URL templates for the external collaborator; `:id` is replaced with the
/// row's natural key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_url: Option<String>,

    /// Load rows from `load_url` as soon as the table is built
    pub auto_load: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            height: 400,
            row_height: 42,
            visible_rows: 25,
            overscan: 0,
            virtual_scroll: true,
            page_size: 25,
            searchable: true,
            selectable: false,
            striped: false,
            hover: false,
            columns: Vec::new(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            highlight_open: "<mark>".to_string(),
            highlight_close: "</mark>".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: "data.csv".to_string(),
            include_header: true,
        }
    }
}

impl ApiConfig {
    pub fn has_mutations(&self) -> bool {
        self.create_url.is_some() || self.update_url.is_some() || self.delete_url.is_some()
    }

    pub fn has_all_mutations(&self) -> bool {
        self.create_url.is_some() && self.update_url.is_some() && self.delete_url.is_some()
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load and validate a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        AppPaths::config_file()
    }

    /// Reject settings no table can work with
    pub fn validate(&self) -> Result<(), TableError> {
        if self.table.row_height == 0 {
            return Err(TableError::Config("row_height must be greater than 0".into()));
        }
        if self.table.visible_rows == 0 {
            return Err(TableError::Config("visible_rows must be greater than 0".into()));
        }
        if self.table.page_size == 0 {
            return Err(TableError::Config("page_size must be greater than 0".into()));
        }
        if self.api.has_mutations() && !self.api.has_all_mutations() {
            return Err(TableError::Config(
                "create_url, update_url and delete_url must be set together".into(),
            ));
        }
        if self.api.has_mutations() && self.api.load_url.is_none() {
            return Err(TableError::Config("mutation URLs require load_url".into()));
        }
        if self.api.auto_load && self.api.load_url.is_none() {
            return Err(TableError::Config("auto_load requires load_url".into()));
        }
        Ok(())
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# pd-tables Configuration File
# Location: ~/.config/pd-tables/config.toml (Linux/macOS)
#           %APPDATA%\pd-tables\config.toml (Windows)

[table]
# Viewport height in pixels
height = 400

# Height of every row in pixels (virtual scrolling needs a fixed height)
row_height = 42

# Rows rendered per window
visible_rows = 25

# Extra rows rendered below the window to hide blank flashes while scrolling
overscan = 0

# Virtual scrolling; set to false for page-by-page display
virtual_scroll = true

# Rows per page when virtual_scroll = false
page_size = 25

# Show the search box
searchable = true

# Show selection checkboxes
selectable = false

# Presentation hints for renderers
striped = false
hover = false

# Column definitions (leave empty to show every value of each row)
# [[table.columns]]
# key = "name"
# label = "Name"

[search]
# Milliseconds of quiet typing before the search is applied
debounce_ms = 300

# Markers wrapped around matches in text output
highlight_open = "<mark>"
highlight_close = "</mark>"

[export]
# Suggested file name for CSV export
filename = "data.csv"

# Write a header line
include_header = true

[api]
# External collaborator. Leave unset to keep every change in memory.
# ":id" is replaced with the row's id.
# load_url = "https://example.com/api/rows"
# create_url = "https://example.com/api/rows"
# update_url = "https://example.com/api/rows/:id"
# delete_url = "https://example.com/api/rows/:id"

# Load rows as soon as the table is built
auto_load = false
"#
        .to_string()
    }

    /// Initialize config with a setup wizard
    pub fn init_wizard() -> Result<Self> {
        println!("pd-tables Configuration Setup");
        println!("=============================");

        let mut config = Config::default();
        config.table.virtual_scroll = ask_yes_no("Use virtual scrolling?", true)?;
        config.table.selectable = ask_yes_no("Show selection checkboxes?", false)?;

        config.save()?;

        println!("\nConfiguration saved to: {:?}", Config::get_config_path()?);
        println!("You can edit this file directly to customize further.");

        Ok(config)
    }
}

fn ask_yes_no(question: &str, default: bool) -> Result<bool> {
    let hint = if default { "y" } else { "n" };
    print!("{} (y/n) [{}]: ", question, hint);
    std::io::Write::flush(&mut std::io::stdout())?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.table.row_height, 42);
        assert_eq!(config.table.visible_rows, 25);
        assert_eq!(config.search.debounce_ms, 300);
        assert!(config.table.virtual_scroll);
        assert!(!config.table.selectable);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.table.columns.push(ColumnDef::new("name", "Name"));
        config.api.load_url = Some("http://localhost/rows".to_string());
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_commented_default_parses() {
        let parsed: Config = toml::from_str(&Config::create_default_with_comments()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[table]\nselectable = true\n").unwrap();
        assert!(parsed.table.selectable);
        assert_eq!(parsed.table.row_height, 42);
        assert_eq!(parsed.export.filename, "data.csv");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.table.row_height = 0;
        assert!(matches!(config.validate(), Err(TableError::Config(_))));

        let mut config = Config::default();
        config.api.load_url = Some("http://x/rows".into());
        config.api.create_url = Some("http://x/rows".into());
        assert!(config.validate().is_err());

        config.api.update_url = Some("http://x/rows/:id".into());
        config.api.delete_url = Some("http://x/rows/:id".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.table.page_size = 10;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.table.page_size, 10);
    }
}
