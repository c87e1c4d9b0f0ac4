use anyhow::{anyhow, Result};
use std::path::PathBuf;

const APP_DIR: &str = "pd-tables";

pub struct AppPaths;

impl AppPaths {
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join(APP_DIR))
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Where exports land when only a file name is given
    pub fn export_path(filename: &str) -> PathBuf {
        let path = PathBuf::from(filename);
        if path.components().count() > 1 || path.is_absolute() {
            return path;
        }
        dirs::download_dir()
            .or_else(dirs::home_dir)
            .map(|dir| dir.join(&path))
            .unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_path_keeps_explicit_paths() {
        assert_eq!(
            AppPaths::export_path("out/rows.csv"),
            PathBuf::from("out/rows.csv")
        );
        assert!(AppPaths::export_path("rows.csv").ends_with("rows.csv"));
    }
}
