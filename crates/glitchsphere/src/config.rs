use std::path::{Path, PathBuf};

use renderer::{Antialiasing, ColorSpaceMode};
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::cli::{parse_antialias, parse_color_space, parse_surface_size, RunArgs};

pub const DEFAULT_SURFACE_SIZE: (u32, u32) = (1280, 720);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub fps: Option<f32>,
    #[serde(default)]
    pub time_step: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_antialias_opt")]
    pub antialias: Option<Antialiasing>,
    #[serde(default, deserialize_with = "deserialize_color_space_opt")]
    pub color_space: Option<ColorSpaceMode>,
}

fn deserialize_antialias_opt<'de, D>(deserializer: D) -> Result<Option<Antialiasing>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Str(String),
        Num(i64),
    }

    let helper: Option<Helper> = Option::deserialize(deserializer)?;
    let result = match helper {
        None => None,
        Some(Helper::Str(raw)) => Some(parse_antialias(&raw).map_err(de::Error::custom)?),
        Some(Helper::Num(value)) => {
            if value < 0 {
                return Err(de::Error::custom("antialias value must be non-negative"));
            }
            Some(parse_antialias(&value.to_string()).map_err(de::Error::custom)?)
        }
    };
    Ok(result)
}

fn deserialize_color_space_opt<'de, D>(
    deserializer: D,
) -> Result<Option<ColorSpaceMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| parse_color_space(&value).map_err(de::Error::custom))
        .transpose()
}

impl FileConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: FileConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Reads `path`, failing if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reads `path` if present; a missing file yields the empty config.
    pub fn load_optional(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(size) = &self.size {
            parse_surface_size(size).map_err(ConfigError::Invalid)?;
        }
        if let Some(fps) = self.fps {
            validate_non_negative("fps", fps)?;
        }
        if let Some(step) = self.time_step {
            validate_non_negative("time_step", step)?;
        }
        Ok(())
    }
}

fn validate_non_negative(key: &str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{key} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

/// Effective settings after layering CLI flags over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub surface_size: (u32, u32),
    pub target_fps: Option<f32>,
    pub time_step: f32,
    pub antialiasing: Antialiasing,
    pub color_space: ColorSpaceMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            surface_size: DEFAULT_SURFACE_SIZE,
            target_fps: None,
            time_step: glitchfx::params::DEFAULT_TIME_STEP,
            antialiasing: Antialiasing::default(),
            color_space: ColorSpaceMode::default(),
        }
    }
}

impl Settings {
    pub fn resolve(file: &FileConfig, args: &RunArgs) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let file_size = file
            .size
            .as_deref()
            .map(parse_surface_size)
            .transpose()
            .map_err(ConfigError::Invalid)?;

        let fps = args.fps.or(file.fps);
        if let Some(fps) = fps {
            validate_non_negative("fps", fps)?;
        }
        let time_step = args.time_step.or(file.time_step);
        if let Some(step) = time_step {
            validate_non_negative("time_step", step)?;
        }

        Ok(Self {
            surface_size: args.size.or(file_size).unwrap_or(defaults.surface_size),
            target_fps: fps.filter(|fps| *fps > 0.0),
            time_step: time_step.unwrap_or(defaults.time_step),
            antialiasing: args
                .antialias
                .or(file.antialias)
                .unwrap_or(defaults.antialiasing),
            color_space: args
                .color_space
                .or(file.color_space)
                .unwrap_or(defaults.color_space),
        })
    }
}
