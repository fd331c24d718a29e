use std::{env, path::PathBuf, str::FromStr};

use thiserror::Error;

use crate::sketch::{parse_color, raster::Rgba};

pub const DEFAULT_MODEL_FILENAME: &str = "movenet_singlepose_lightning.onnx";
pub const DEFAULT_STROKE_COLOR: Rgba = [0xfe, 0x6b, 0x31, 0xff];
pub const DEFAULT_STROKE_WIDTH: f32 = 20.0;
pub const STROKE_WIDTH_RANGE: std::ops::RangeInclusive<f32> = 1.0..=200.0;
pub const DEFAULT_EXPORT_FILENAME: &str = "myPieceOfArt.jpg";

const ENV_MODEL_PATH: &str = "AIR_SKETCH_MODEL_PATH";
const ENV_MODEL_URL: &str = "AIR_SKETCH_MODEL_URL";
const ENV_INPUT_SIZE: &str = "AIR_SKETCH_INPUT_SIZE";
const ENV_MIN_POSE_SCORE: &str = "AIR_SKETCH_MIN_POSE_SCORE";
const ENV_DETECTOR_FPS: &str = "AIR_SKETCH_DETECTOR_FPS";
const ENV_MIRROR: &str = "AIR_SKETCH_MIRROR";
const ENV_STROKE_COLOR: &str = "AIR_SKETCH_STROKE_COLOR";
const ENV_STROKE_WIDTH: &str = "AIR_SKETCH_STROKE_WIDTH";
const ENV_EXPORT_PATH: &str = "AIR_SKETCH_EXPORT_PATH";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{var} must be {constraint}, got {value}")]
    OutOfRange {
        var: &'static str,
        value: String,
        constraint: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SketchConfig {
    pub model_path: PathBuf,
    pub model_url: Option<String>,
    pub input_size: u32,
    pub min_pose_score: f32,
    pub detector_fps: u64,
    pub mirror: bool,
    pub stroke_color: Rgba,
    pub stroke_width: f32,
    pub export_path: PathBuf,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models").join(DEFAULT_MODEL_FILENAME),
            model_url: None,
            input_size: 192,
            min_pose_score: 0.2,
            detector_fps: 15,
            mirror: true,
            stroke_color: DEFAULT_STROKE_COLOR,
            stroke_width: DEFAULT_STROKE_WIDTH,
            export_path: PathBuf::from(DEFAULT_EXPORT_FILENAME),
        }
    }
}

impl SketchConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_MODEL_PATH) {
            cfg.model_path = PathBuf::from(path);
        }
        cfg.model_url = get(ENV_MODEL_URL);
        if let Some(raw) = get(ENV_INPUT_SIZE) {
            cfg.input_size = parse(ENV_INPUT_SIZE, &raw, "positive integer")?;
            if cfg.input_size == 0 {
                return Err(out_of_range(ENV_INPUT_SIZE, raw, "greater than zero"));
            }
        }
        if let Some(raw) = get(ENV_MIN_POSE_SCORE) {
            cfg.min_pose_score = parse(ENV_MIN_POSE_SCORE, &raw, "number")?;
            if !(0.0..=1.0).contains(&cfg.min_pose_score) {
                return Err(out_of_range(ENV_MIN_POSE_SCORE, raw, "within 0..=1"));
            }
        }
        if let Some(raw) = get(ENV_DETECTOR_FPS) {
            cfg.detector_fps = parse(ENV_DETECTOR_FPS, &raw, "positive integer")?;
            if cfg.detector_fps == 0 {
                return Err(out_of_range(ENV_DETECTOR_FPS, raw, "greater than zero"));
            }
        }
        if let Some(raw) = get(ENV_MIRROR) {
            cfg.mirror = parse_bool(ENV_MIRROR, &raw)?;
        }
        if let Some(color) = get(ENV_STROKE_COLOR) {
            cfg.stroke_color = parse_color(&color).map_err(|_| ConfigError::Invalid {
                var: ENV_STROKE_COLOR,
                value: color.clone(),
                expected: "CSS colour",
            })?;
        }
        if let Some(raw) = get(ENV_STROKE_WIDTH) {
            cfg.stroke_width = parse(ENV_STROKE_WIDTH, &raw, "number")?;
            if !STROKE_WIDTH_RANGE.contains(&cfg.stroke_width) {
                return Err(out_of_range(ENV_STROKE_WIDTH, raw, "within 1..=200"));
            }
        }
        if let Some(path) = get(ENV_EXPORT_PATH) {
            cfg.export_path = PathBuf::from(path);
        }

        Ok(cfg)
    }

    pub fn model_url_hint() -> &'static str {
        ENV_MODEL_URL
    }
}

fn parse<T: FromStr>(var: &'static str, raw: &str, expected: &'static str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        expected,
    })
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            expected: "boolean",
        }),
    }
}

fn out_of_range(var: &'static str, value: String, constraint: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        var,
        value,
        constraint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<SketchConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SketchConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg, SketchConfig::default());
        assert_eq!(cfg.stroke_color, [0xfe, 0x6b, 0x31, 0xff]);
        assert_eq!(cfg.stroke_width, 20.0);
        assert!(cfg.mirror);
        assert!(cfg.model_url.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = config_from(&[
            ("AIR_SKETCH_MODEL_PATH", "/tmp/pose.onnx"),
            ("AIR_SKETCH_MODEL_URL", "https://models.invalid/pose.onnx"),
            ("AIR_SKETCH_MIRROR", "off"),
            ("AIR_SKETCH_STROKE_COLOR", "rebeccapurple"),
            ("AIR_SKETCH_STROKE_WIDTH", "8"),
            ("AIR_SKETCH_DETECTOR_FPS", "30"),
        ])
        .unwrap();

        assert_eq!(cfg.model_path, PathBuf::from("/tmp/pose.onnx"));
        assert_eq!(cfg.model_url.as_deref(), Some("https://models.invalid/pose.onnx"));
        assert!(!cfg.mirror);
        assert_eq!(cfg.stroke_color, [0x66, 0x33, 0x99, 0xff]);
        assert_eq!(cfg.stroke_width, 8.0);
        assert_eq!(cfg.detector_fps, 30);
    }

    #[test]
    fn blank_values_keep_defaults() {
        let cfg = config_from(&[("AIR_SKETCH_MODEL_URL", "  ")]).unwrap();
        assert!(cfg.model_url.is_none());
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = config_from(&[("AIR_SKETCH_INPUT_SIZE", "big")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "AIR_SKETCH_INPUT_SIZE", .. }));

        let err = config_from(&[("AIR_SKETCH_MIRROR", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "AIR_SKETCH_MIRROR", .. }));

        let err = config_from(&[("AIR_SKETCH_STROKE_COLOR", "#zzzzzz")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "AIR_SKETCH_STROKE_COLOR", .. }));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = config_from(&[("AIR_SKETCH_MIN_POSE_SCORE", "1.5")]).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));

        let err = config_from(&[("AIR_SKETCH_DETECTOR_FPS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));

        let err = config_from(&[("AIR_SKETCH_STROKE_WIDTH", "NaN")]).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn stroke_width_is_bounded() {
        for raw in ["0.5", "200.5", "100000", "inf"] {
            let err = config_from(&[("AIR_SKETCH_STROKE_WIDTH", raw)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::OutOfRange { var: "AIR_SKETCH_STROKE_WIDTH", .. }),
                "{raw}"
            );
        }
        let cfg = config_from(&[("AIR_SKETCH_STROKE_WIDTH", "200")]).unwrap();
        assert_eq!(cfg.stroke_width, 200.0);
    }
}
