use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod page;

pub use page::{
    AttributeOwner, DEFAULT_IMAGE_POSITION_LABEL, DEFAULT_MAX_LINES, PageAttribute, PageSettings,
    parse_boolean,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Site-wide settings, the native counterpart of the theme parameters a page
/// template writes into `<html>` / `<body>` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub code: CodeConfig,
    pub figures: FigureConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    pub max_lines: usize,
    pub line_numbers: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub show_position: bool,
    pub label: String,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            line_numbers: true,
        }
    }
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            show_position: false,
            label: DEFAULT_IMAGE_POSITION_LABEL.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: SiteConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/codepanel");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Settings as the client-side layer would read them back from the page.
    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            image_position_label: self.figures.label.clone(),
            ..PageSettings::from_attributes(|attr| self.attribute_value(attr))
        }
    }

    /// Attribute name/value pairs to write onto the given element.
    pub fn attributes_for(&self, owner: AttributeOwner) -> Vec<(&'static str, String)> {
        PageAttribute::ALL
            .into_iter()
            .filter(|attr| attr.owner() == owner)
            .filter_map(|attr| self.attribute_value(attr).map(|value| (attr.name(), value)))
            .collect()
    }

    fn attribute_value(&self, attr: PageAttribute) -> Option<String> {
        match attr {
            PageAttribute::MaxLines => Some(self.code.max_lines.to_string()),
            PageAttribute::LinesByDefault => Some(self.code.line_numbers.to_string()),
            PageAttribute::ShowImagePosition => Some(self.figures.show_position.to_string()),
            PageAttribute::BaseUrl if self.base_url.is_empty() => None,
            PageAttribute::BaseUrl => Some(self.base_url.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = SiteConfig::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/codepanel/config.toml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = SiteConfig::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let config = SiteConfig {
            base_url: "https://example.com/".to_string(),
            code: CodeConfig {
                max_lines: 12,
                line_numbers: false,
            },
            figures: FigureConfig::default(),
        };

        config.save_to_path(&config_file).unwrap();
        let loaded = SiteConfig::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();

        assert_eq!(config.base_url, "");
        assert_eq!(config.code.max_lines, DEFAULT_MAX_LINES);
        assert!(config.code.line_numbers);
        assert!(!config.figures.show_position);
        assert_eq!(config.figures.label, DEFAULT_IMAGE_POSITION_LABEL);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
base_url = "https://example.com/"

[code]
max_lines = 20
"#,
        )
        .unwrap();

        assert_eq!(config.code.max_lines, 20);
        assert!(config.code.line_numbers);
        assert_eq!(config.figures.label, "Figure");
    }

    #[test]
    fn test_parse_error_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[code]\nmax_lines = \"many\"\n").unwrap();

        let err = SiteConfig::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_body_attributes() {
        let config = SiteConfig {
            base_url: "https://example.com/".to_string(),
            code: CodeConfig {
                max_lines: 20,
                line_numbers: false,
            },
            figures: FigureConfig::default(),
        };

        assert_eq!(
            config.attributes_for(AttributeOwner::Body),
            vec![
                ("data-code", "20".to_string()),
                ("data-lines", "false".to_string()),
                ("data-url", "https://example.com/".to_string()),
            ]
        );
        assert_eq!(
            config.attributes_for(AttributeOwner::Root),
            vec![("data-figures", "false".to_string())]
        );
    }

    #[test]
    fn test_page_settings_round_trip_through_attributes() {
        let mut config = SiteConfig::default();
        config.code.max_lines = 7;
        config.figures.show_position = true;

        let settings = config.page_settings();

        assert_eq!(settings.max_lines, 7);
        assert_eq!(settings.lines_by_default, Some(true));
        assert!(settings.show_image_position);
        assert_eq!(settings.base_url, "");
    }
}
