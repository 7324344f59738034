use crate::chunked_loader::DEFAULT_CHUNK_LINES;
use crate::color::Color;
use crate::html::HtmlStyle;
use crate::sorter::SortKey;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    path: Option<String>,
    /// Lines per part when splitting large files.
    pub chunk_lines: usize,
    /// Color for groups created without one.
    pub default_group_color: Color,
    /// Initial case sensitivity of searches.
    pub case_sensitive: bool,
    /// Default policy when sorting curated lines.
    pub sort_key: SortKey,
    pub appearance: AppearanceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            chunk_lines: DEFAULT_CHUNK_LINES,
            default_group_color: Color::WHITE,
            case_sensitive: false,
            sort_key: SortKey::default(),
            appearance: AppearanceConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppearanceConfig {
    pub font_family: String,
    /// Point size.
    pub font_size: u16,
    pub theme: Theme,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            font_family: "monospace".to_string(),
            font_size: 10,
            theme: Theme::default(),
        }
    }
}

impl AppearanceConfig {
    /// Styling of saved HTML logs.
    pub fn html_style(&self) -> HtmlStyle {
        let (foreground, background) = match self.theme {
            Theme::Dark => (Color::rgb(220, 220, 220), Color::rgb(30, 30, 30)),
            Theme::Light => (Color::BLACK, Color::WHITE),
        };
        HtmlStyle {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            foreground,
            background,
        }
    }
}

impl Config {
    /// Load configuration from the specified path, the default config dir
    /// (~/.config/lognote/) or a local .lognote.toml.
    pub fn load(path: &Option<String>) -> Self {
        let config_path = if let Some(p) = path {
            PathBuf::from(p)
        } else {
            Self::default_config_path()
        };
        Self::load_from_path(&config_path)
    }

    fn load_from_path(config_path: &PathBuf) -> Self {
        if !config_path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(config_path) {
            Ok(content) => {
                let mut config = Self::parse(&content);
                config.path = config_path.to_str().map(|s| s.to_string());
                config
            }
            Err(e) => {
                warn!("Failed to read config {:?}: {}", config_path, e);
                Self::default()
            }
        }
    }

    /// Parses TOML, falling back to defaults when it is malformed.
    pub fn parse(content: &str) -> Self {
        let mut config: Config = toml::from_str(content).unwrap_or_else(|e| {
            warn!("Ignoring malformed config: {}", e);
            Self::default()
        });
        config.chunk_lines = config.chunk_lines.max(1);
        config
    }

    /// Get the path of the configuration file if it was loaded from a file.
    pub fn get_path(&self) -> Option<&String> {
        self.path.as_ref()
    }

    fn default_config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("lognote").join("config.toml");
            if config_path.exists() {
                return config_path;
            }
        }
        // Fallback to local .lognote.toml (might not exist)
        PathBuf::from(".lognote.toml")
    }
}
