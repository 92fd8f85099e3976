use dossier_layout::PageGeometry;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Tunables for report rendering.
///
/// Every field has a default, so an empty file (or no file at all) yields a
/// working configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of images fetched concurrently before assembly continues.
    pub batch_size: usize,
    pub fetch_timeout_secs: u64,
    pub thumbnail_width: u32,
    pub thumbnail_quality: u8,
    /// Originals below this size stand in for a thumbnail that failed to generate.
    pub thumbnail_fallback_max_bytes: usize,
    pub max_part_images: usize,
    pub max_part_bytes: u64,
    pub page: PageGeometry,
    /// Stamp "Page N of M" footers on the main report.
    pub page_numbers: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            fetch_timeout_secs: 20,
            thumbnail_width: 300,
            thumbnail_quality: 60,
            thumbnail_fallback_max_bytes: 500 * 1024,
            max_part_images: 250,
            max_part_bytes: 45 * 1024 * 1024,
            page: PageGeometry::default(),
            page_numbers: true,
        }
    }
}

impl RenderConfig {
    /// Loads configuration from an optional TOML file, with `DOSSIER__*`
    /// environment variables layered on top (e.g. `DOSSIER__BATCH_SIZE=10`,
    /// `DOSSIER__PAGE__WIDTH=612`).
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.to_path_buf()));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("DOSSIER")
                .separator("__")
                .try_parsing(true),
        );
        builder.build()?.try_deserialize()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Batch size, never zero.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(20));
        assert_eq!(config.max_part_images, 250);
        assert_eq!(config.max_part_bytes, 47_185_920);
        assert_eq!(config.page.margin, 50.0);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = RenderConfig::load(None).unwrap();
        assert_eq!(config.thumbnail_width, 300);
        assert_eq!(config.thumbnail_quality, 60);
    }

    #[test]
    fn test_load_partial_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "max_part_images = 10\npage_numbers = false\n\n[page]\nwidth = 612.0\nheight = 792.0"
        )
        .unwrap();

        let config = RenderConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.max_part_images, 10);
        assert!(!config.page_numbers);
        assert_eq!(config.page.width, 612.0);
        assert_eq!(config.page.margin, 50.0);
        assert_eq!(config.batch_size, 5);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = RenderConfig::load(Some(Path::new("/nonexistent/dossier.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        let config = RenderConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_batch_size(), 1);
    }
}
