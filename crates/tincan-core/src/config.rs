//! Renderer configuration
//!
//! Loaded from `~/.config/tincan/config.toml` (platform config dir). Every
//! key is optional; missing keys fall back to the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard ceiling for `max_depth`
const DEPTH_CEILING: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Rendering knobs shared by every render call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Written in front of every non-empty line inside a quote block
    pub quote_prefix: String,
    /// Text of the colored line that opens an embed
    pub embed_separator: String,
    /// RGB used for embeds without a color
    pub default_embed_color: u32,
    /// Maximum nesting of renderer instances (embed descriptions)
    pub max_depth: usize,
    pub emoji_size: u32,
    /// Emoji size used when a message contains nothing but emoji
    pub large_emoji_size: u32,
    pub large_emoji_limit: usize,
    /// Size of embed author/footer icons and mention avatars
    pub avatar_size: u32,
    /// Place an avatar anchor in front of resolved user mentions
    pub mention_avatars: bool,
    pub thumbnail_size: u32,
    pub image_max_width: u32,
    pub image_max_height: u32,
    /// chrono format string for embed timestamps
    pub timestamp_format: String,
    /// Attachment extensions rendered inline as images
    pub image_extensions: Vec<String>,
    pub cdn_base: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            quote_prefix: "> ".to_string(),
            embed_separator: "▌".to_string(),
            default_embed_color: 0x4f545c,
            max_depth: 2,
            emoji_size: 22,
            large_emoji_size: 48,
            large_emoji_limit: 27,
            avatar_size: 24,
            mention_avatars: false,
            thumbnail_size: 80,
            image_max_width: 400,
            image_max_height: 300,
            timestamp_format: "%Y-%m-%d %H:%M".to_string(),
            image_extensions: ["png", "jpg", "jpeg", "gif", "webp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            cdn_base: "https://cdn.discordapp.com".to_string(),
        }
    }
}

impl RenderConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Platform config location (`<config dir>/tincan/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tincan").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 || self.max_depth > DEPTH_CEILING {
            return Err(ConfigError::Invalid(format!(
                "max_depth must be between 1 and {}, got {}",
                DEPTH_CEILING, self.max_depth
            )));
        }

        let sizes = [
            ("emoji_size", self.emoji_size),
            ("large_emoji_size", self.large_emoji_size),
            ("avatar_size", self.avatar_size),
            ("thumbnail_size", self.thumbnail_size),
            ("image_max_width", self.image_max_width),
            ("image_max_height", self.image_max_height),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, size)| *size == 0) {
            return Err(ConfigError::Invalid(format!("{} must not be zero", name)));
        }

        if self.image_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "image_extensions must list at least one extension".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether a filename has one of the configured image extensions
    pub fn is_image_file(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.image_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}
