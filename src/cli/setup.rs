use crate::cli::ui::{StyleType, style_text};
use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the example configuration to the default location and tells the
/// user where it went.
pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    let written = setup_at_path(&path)?;
    println!(
        "{} {}",
        style_text("Configuration written to", StyleType::Label),
        written.display()
    );
    Ok(())
}

/// Writes the example configuration to `path`, refusing to overwrite an
/// existing file. The written file is loaded back so a broken template never
/// leaves the user with an unusable config.
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    let config = AppConfig::load_from_path(path)
        .with_context(|| format!("Written config at {} does not load", path.display()))?;
    tracing::info!(
        path = %path.display(),
        base = %config.base_currency,
        mode = %config.mode,
        "Created default configuration"
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ConversionMode, TableScope};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_setup_creates_config_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.yaml");

        let written = setup_at_path(&config_path)?;

        assert_eq!(written, config_path);
        assert!(config_path.exists());
        let content = fs::read_to_string(&config_path)?;
        assert!(content.contains("provider:"));
        assert!(content.contains("# Example configuration file for fxtable"));

        Ok(())
    }

    #[test]
    fn test_setup_fails_if_config_exists() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "test")?;

        let result = setup_at_path(&config_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));

        Ok(())
    }

    #[test]
    fn test_example_config_is_valid_yaml() -> Result<()> {
        let config: AppConfig = serde_yaml::from_str(EXAMPLE_CONFIG)
            .context("Failed to parse example config as YAML")?;

        assert_eq!(config.mode, ConversionMode::Direct);
        assert_eq!(config.scope, TableScope::Selected);
        assert_eq!(config.currencies, vec!["EUR", "GBP", "INR", "JPY"]);
        assert!(config.provider.access_key.is_none());
        assert_eq!(config.amount, 1.0);

        Ok(())
    }
}
