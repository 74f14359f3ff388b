//! JSON configuration for a canvas.
//!
//! Only canvas-level defaults live here. Shader source text is supplied by the host; this crate
//! never reads `.glsl` files.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CanvasError;
use crate::logging::LoggingConfig;

/// Initial state for a canvas and its default uniforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasConfig {
    /// `[min_x, min_y, max_x, max_y]` in canvas space.
    pub bounds: [f32; 4],

    /// Multiplied into every fragment. Defaults to opaque white.
    #[serde(default = "default_color_mask")]
    pub color_mask: [f32; 4],

    /// Column-major 3x3 transform. Defaults to identity.
    #[serde(default = "default_transform")]
    pub transform: [f32; 9],

    /// `tracing` filter directive, e.g. "glcanvas_runtime_glow=debug".
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_color_mask() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_transform() -> [f32; 9] {
    [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
}

impl CanvasConfig {
    pub fn new(bounds: [f32; 4]) -> Self {
        Self {
            bounds,
            color_mask: default_color_mask(),
            transform: default_transform(),
            log_filter: None,
        }
    }

    pub fn from_json_path(path: &Path) -> Result<Self, CanvasError> {
        let cfg: CanvasConfig = load_typed_json(path)?;
        cfg.validate()
            .map_err(|msg| CanvasError::InvalidConfig {
                path: path.to_path_buf(),
                msg,
            })?;
        Ok(cfg)
    }

    /// Width and height of the configured bounds.
    pub fn size(&self) -> [f32; 2] {
        [self.bounds[2] - self.bounds[0], self.bounds[3] - self.bounds[1]]
    }

    /// Subscriber settings carrying this config's `log_filter`.
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log_filter.clone(),
            with_ansi: true,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let [w, h] = self.size();
        if !(w > 0.0 && h > 0.0) {
            return Err(format!(
                "bounds must have max > min on both axes, got {:?}",
                self.bounds
            ));
        }
        Ok(())
    }
}

/// Reads `path` and deserializes it as `T`.
pub fn load_typed_json<T: DeserializeOwned>(path: &Path) -> Result<T, CanvasError> {
    let text = std::fs::read_to_string(path).map_err(|source| CanvasError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CanvasError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let cfg: CanvasConfig = serde_json::from_str(r#"{ "bounds": [0, 0, 600, 310] }"#)
            .expect("minimal config should parse");
        assert_eq!(cfg.color_mask, [1.0; 4]);
        assert_eq!(cfg.transform, default_transform());
        assert_eq!(cfg.size(), [600.0, 310.0]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<CanvasConfig, _> =
            serde_json::from_str(r#"{ "bounds": [0, 0, 1, 1], "smooth": true }"#);
        assert!(res.is_err(), "deny_unknown_fields must reject 'smooth'");
    }

    #[test]
    fn degenerate_bounds_fail_validation() {
        let cfg = CanvasConfig::new([10.0, 0.0, 10.0, 5.0]);
        let msg = cfg.validate().expect_err("zero width must be rejected");
        assert!(msg.contains("max > min"), "unexpected msg: {msg}");
    }

    #[test]
    fn missing_file_maps_to_io_error() {
        let path = std::env::temp_dir().join("glcanvas_core_definitely_missing.json");
        let err = CanvasConfig::from_json_path(&path).expect_err("missing file must fail");
        assert!(matches!(err, CanvasError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn log_filter_feeds_logging_config() {
        let mut cfg = CanvasConfig::new([0.0, 0.0, 1.0, 1.0]);
        assert_eq!(cfg.logging_config().env_filter, None);

        cfg.log_filter = Some("glcanvas_runtime_glow=debug".into());
        assert_eq!(
            cfg.logging_config().env_filter.as_deref(),
            Some("glcanvas_runtime_glow=debug")
        );
    }
}
