use std::path::{Path, PathBuf};

use serde::Deserialize;

/// User settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub view: ViewSettings,
}

/// How the text area is drawn and scrolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    /// Wrap long lines instead of scrolling horizontally.
    pub wrap: bool,
    /// Columns moved per horizontal scroll step.
    pub horizontal_scroll: usize,
    pub line_numbers: bool,
    pub gutter_width: u16,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            wrap: false,
            horizontal_scroll: 20,
            line_numbers: true,
            gutter_width: 4,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
}

// ── Serde intermediate structs ───────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    view: RawViewSettings,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawViewSettings {
    wrap: bool,
    horizontal_scroll: usize,
    line_numbers: bool,
    gutter_width: u16,
}

impl Default for RawViewSettings {
    fn default() -> Self {
        let view = ViewSettings::default();
        Self {
            wrap: view.wrap,
            horizontal_scroll: view.horizontal_scroll,
            line_numbers: view.line_numbers,
            gutter_width: view.gutter_width,
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────────

impl Settings {
    /// Default location: `<config dir>/rsvi/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "rsvi")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load settings from a TOML file. Returns defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!("Ignoring {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let settings = Self {
            view: ViewSettings {
                wrap: raw.view.wrap,
                horizontal_scroll: raw.view.horizontal_scroll,
                line_numbers: raw.view.line_numbers,
                gutter_width: raw.view.gutter_width,
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.view.horizontal_scroll == 0 {
            return Err(ConfigError::Validation(
                "view.horizontal_scroll must be > 0".to_string(),
            ));
        }
        if self.view.line_numbers && self.view.gutter_width < 2 {
            return Err(ConfigError::Validation(
                "view.gutter_width must be >= 2 when line numbers are shown".to_string(),
            ));
        }
        Ok(())
    }
}
