use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bulk::BulkStrategy;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub catalog: Option<CatalogConfig>,
    pub selection: Option<SelectionConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Directory holding the persisted selection.
    pub data_dir: Option<String>,
    pub bulk_strategy: Option<BulkStrategy>,
    /// `false` keeps the selection in memory only.
    pub persist: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub fps: Option<u32>,
}

/// Platform config directory path: `<config_dir>/artic-gallery/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("artic-gallery").join("config.toml"))
}

/// Load config by cascading CWD `.artic-gallery.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".artic-gallery.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_catalog = base.catalog.unwrap_or_default();
    let over_catalog = overlay.catalog.unwrap_or_default();
    let base_selection = base.selection.unwrap_or_default();
    let over_selection = overlay.selection.unwrap_or_default();
    let base_display = base.display.unwrap_or_default();
    let over_display = overlay.display.unwrap_or_default();

    ConfigFile {
        catalog: Some(CatalogConfig {
            base_url: over_catalog.base_url.or(base_catalog.base_url),
            user_agent: over_catalog.user_agent.or(base_catalog.user_agent),
        }),
        selection: Some(SelectionConfig {
            data_dir: over_selection.data_dir.or(base_selection.data_dir),
            bulk_strategy: over_selection.bulk_strategy.or(base_selection.bulk_strategy),
            persist: over_selection.persist.or(base_selection.persist),
        }),
        display: Some(DisplayConfig {
            theme: over_display.theme.or(base_display.theme),
            fps: over_display.fps.or(base_display.fps),
        }),
    }
}
