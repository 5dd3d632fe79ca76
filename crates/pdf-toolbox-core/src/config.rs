use serde::{Deserialize, Serialize};

use crate::options::{
    CompressionOptions, ImagePlacementOptions, MAX_IMAGE_MARGIN_MM, PageNumberOptions,
    WatermarkOptions,
};

/// Largest image accepted for conversion by default (25 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 25 * 1024 * 1024;

const fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}

/// Application configuration
///
/// Every section falls back to its defaults, so a config file only needs the
/// values it changes:
///
/// ```toml
/// [watermark]
/// text = "DRAFT"
/// opacity = 0.3
///
/// [page_numbers]
/// position = "bottom-center"
/// template = "Page {n} of {total}"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default watermark options
    #[serde(default)]
    pub watermark: WatermarkOptions,

    /// Default page-number options
    #[serde(default)]
    pub page_numbers: PageNumberOptions,

    /// Default image-to-PDF options
    #[serde(default)]
    pub image: ImagePlacementOptions,

    /// Default compression options
    #[serde(default)]
    pub compression: CompressionOptions,

    /// Maximum accepted image size in bytes
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watermark: WatermarkOptions::default(),
            page_numbers: PageNumberOptions::default(),
            image: ImagePlacementOptions::default(),
            compression: CompressionOptions::default(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no operation could use.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if !(0.0..=MAX_IMAGE_MARGIN_MM).contains(&self.image.margin_mm) {
            return Err(crate::error::Error::ConfigInvalid {
                field: "image.margin_mm".to_string(),
                reason: format!("must be between 0 and {MAX_IMAGE_MARGIN_MM}"),
            });
        }
        if self.max_image_bytes == 0 {
            return Err(crate::error::Error::ConfigInvalid {
                field: "max_image_bytes".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.watermark.font_size <= 0.0 || self.page_numbers.font_size <= 0.0 {
            return Err(crate::error::Error::ConfigInvalid {
                field: "font_size".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Load from default locations (~/.config/pdf-toolbox/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(user_config) = crate::util::user_config_path() {
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        // Return defaults
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::{FitMode, PagePosition};
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.max_image_bytes, 25 * 1024 * 1024);
        assert_eq!(config.watermark.text, "CONFIDENTIAL");
        assert_eq!(config.page_numbers.template, "{n}/{total}");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [watermark]
            text = "DRAFT"

            [page_numbers]
            position = "top-center"

            [image]
            fit = "cover"
            "#,
        )
        .unwrap();
        assert_eq!(config.watermark.text, "DRAFT");
        assert!((config.watermark.opacity - 0.15).abs() < f32::EPSILON);
        assert_eq!(config.page_numbers.position, PagePosition::parse("top-center"));
        assert_eq!(config.page_numbers.start_at, 1);
        assert_eq!(config.image.fit, FitMode::Cover);
        assert!((config.image.margin_mm - 10.0).abs() < f32::EPSILON);
        assert_eq!(config.max_image_bytes, DEFAULT_MAX_IMAGE_BYTES);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_image_bytes = 1024\n[compression]\ncollect_stats = true").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_image_bytes, 1024);
        assert!(config.compression.collect_stats);
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[image]\nmargin_mm = 45.0").unwrap();

        let result = AppConfig::from_file(file.path());
        assert!(matches!(
            result,
            Err(crate::error::Error::ConfigInvalid { ref field, .. }) if field == "image.margin_mm"
        ));
    }

    #[test]
    fn test_from_missing_file() {
        let result = AppConfig::from_file("/definitely/not/here/config.toml");
        assert!(matches!(result, Err(crate::error::Error::ConfigLoad(_))));
    }
}
