//! Configuration loading from typewriter.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use typewriter_ui::{SpringTransition, TextWritingStyle, WindowConfig};

/// Config file looked up when no --config is given
pub const DEFAULT_CONFIG_PATH: &str = "typewriter.toml";

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub writing: WritingConfig,
    pub spring: SpringConfig,
    pub style: StyleConfig,
    pub window: WindowSection,
}

/// What gets written and how
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WritingConfig {
    pub text: String,
    /// Seconds before the first character
    pub delay: f32,
    /// Never show the cursor
    pub nocursor: bool,
    /// Hide the cursor once writing completes
    pub noblink: bool,
    /// Seconds between characters
    pub stagger: f32,
    /// Start writing as soon as the window opens
    pub autoplay: bool,
}

impl Default for WritingConfig {
    fn default() -> Self {
        Self {
            text: default_text(),
            delay: 0.0,
            nocursor: false,
            noblink: false,
            stagger: default_stagger(),
            autoplay: true,
        }
    }
}

fn default_text() -> String {
    "Hello, world".to_string()
}

fn default_stagger() -> f32 {
    typewriter_ui::elements::text_writing::DEFAULT_STAGGER
}

/// Wrapper fade-in spring
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub damping: f32,
    pub stiffness: f32,
    pub mass: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        let spring = SpringTransition::default();
        Self {
            damping: spring.damping,
            stiffness: spring.stiffness,
            mass: spring.mass,
        }
    }
}

/// Text and cursor appearance
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub font_size: f32,
    pub text_color: [f32; 4],
    pub cursor_color: [f32; 4],
    pub cursor_width: f32,
    /// 0 = line height
    pub cursor_height: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let style = TextWritingStyle::default();
        Self {
            font_size: style.font_size,
            text_color: style.text_color,
            cursor_color: style.cursor_color,
            cursor_width: style.cursor_width,
            cursor_height: 0.0,
        }
    }
}

/// Host window
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowSection {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub always_on_top: bool,
    /// Background color [r, g, b, a]
    pub background: [f32; 4],
    /// Distance from the window's top-left corner to the text, in pixels
    pub padding: f32,
}

impl Default for WindowSection {
    fn default() -> Self {
        let window = WindowConfig::default();
        Self {
            width: window.width,
            height: window.height,
            title: window.title,
            always_on_top: window.always_on_top,
            background: window.background,
            padding: default_padding(),
        }
    }
}

fn default_padding() -> f32 {
    24.0
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load an explicit path, or typewriter.toml if present, or defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => {
                log::info!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = |name: &str, value: f32| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be >= 0, got {}", name, value)))
            }
        };
        let positive = |name: &str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be > 0, got {}", name, value)))
            }
        };

        non_negative("writing.delay", self.writing.delay)?;
        non_negative("writing.stagger", self.writing.stagger)?;
        positive("spring.damping", self.spring.damping)?;
        positive("spring.stiffness", self.spring.stiffness)?;
        positive("spring.mass", self.spring.mass)?;
        positive("style.font_size", self.style.font_size)?;
        non_negative("style.cursor_width", self.style.cursor_width)?;
        non_negative("style.cursor_height", self.style.cursor_height)?;
        non_negative("window.padding", self.window.padding)?;

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        Ok(())
    }

    pub fn spring_transition(&self) -> SpringTransition {
        SpringTransition {
            damping: self.spring.damping,
            stiffness: self.spring.stiffness,
            mass: self.spring.mass,
        }
    }

    pub fn text_style(&self) -> TextWritingStyle {
        TextWritingStyle {
            font_size: self.style.font_size,
            text_color: self.style.text_color,
            cursor_color: self.style.cursor_color,
            cursor_width: self.style.cursor_width,
            cursor_height: (self.style.cursor_height > 0.0).then_some(self.style.cursor_height),
        }
    }

    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            width: self.window.width,
            height: self.window.height,
            always_on_top: self.window.always_on_top,
            title: self.window.title.clone(),
            background: self.window.background,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.writing.text, "Hello, world");
        assert_eq!(config.writing.delay, 0.0);
        assert_eq!(config.writing.stagger, 0.15);
        assert!(config.writing.autoplay);
        assert_eq!(config.spring.damping, 10.0);
        assert_eq!(config.spring.stiffness, 100.0);
        assert_eq!(config.spring.mass, 1.0);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [writing]
            text = "Hi"
            delay = 0.2
            noblink = true

            [style]
            font_size = 32.0
            "#,
        )
        .unwrap();

        assert_eq!(config.writing.text, "Hi");
        assert_eq!(config.writing.delay, 0.2);
        assert!(config.writing.noblink);
        assert!(!config.writing.nocursor);
        assert_eq!(config.style.font_size, 32.0);
        assert_eq!(config.style.cursor_width, 2.0);
    }

    #[test]
    fn test_cursor_height_zero_means_line_height() {
        let config = Config::from_toml("[style]\nfont_size = 20.0\n").unwrap();
        let style = config.text_style();
        assert_eq!(style.cursor_height, None);
        assert_eq!(style.cursor_size()[1], style.line_height());

        let config = Config::from_toml("[style]\ncursor_height = 18.0\n").unwrap();
        assert_eq!(config.text_style().cursor_height, Some(18.0));
    }

    #[test]
    fn test_negative_delay_is_rejected() {
        let err = Config::from_toml("[writing]\ndelay = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_stiffness_is_rejected() {
        let err = Config::from_toml("[spring]\nstiffness = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_damping_is_rejected() {
        // An undamped spring never settles, so writing would never complete
        let err = Config::from_toml("[spring]\ndamping = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = Config::from_toml("[spring]\ndamping = 2.5\n").unwrap();
        assert_eq!(config.spring_transition().damping, 2.5);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = Config::from_toml("[writing\ntext = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = Config::from_toml("[writing]\ndelay = \"soon\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load_or_default(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_window_config_mapping() {
        let config = Config::from_toml(
            r#"
            [window]
            width = 800
            height = 100
            title = "Demo"
            always_on_top = true
            "#,
        )
        .unwrap();
        let window = config.window_config();
        assert_eq!(window.width, 800);
        assert_eq!(window.height, 100);
        assert_eq!(window.title, "Demo");
        assert!(window.always_on_top);
        assert!(window.draggable);
    }
}
