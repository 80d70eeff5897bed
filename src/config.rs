use crate::board::*;
use crate::heuristic::*;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use yaml_rust::{Yaml, YamlLoader};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Scan(#[from] yaml_rust::ScanError),
    #[error("config root must be a mapping")]
    NotAMapping,
    #[error("invalid value '{value}' for '{key}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("'{key}' must be {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },
}

/// Whose point of view a position is scored from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Perspective {
    #[default]
    SideToMove,
    Fixed(Player),
}

impl Perspective {
    /// Positions without a side to move are scored for black.
    pub fn player(self, side_to_move: Option<Player>) -> Player {
        match self {
            Perspective::SideToMove => side_to_move.unwrap_or(Player::Black),
            Perspective::Fixed(player) => player,
        }
    }
}

impl FromStr for Perspective {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "side-to-move" | "side_to_move" | "side" => Ok(Perspective::SideToMove),
            _ => Ok(Perspective::Fixed(s.parse()?)),
        }
    }
}

impl TryFrom<String> for Perspective {
    type Error = BoardParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Perspective::SideToMove => write!(f, "side-to-move"),
            Perspective::Fixed(Player::Black) => write!(f, "black"),
            Perspective::Fixed(Player::White) => write!(f, "white"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "output",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct EvalConfig {
    pub heuristic: HeuristicKind,
    pub perspective: Perspective,
    pub output: OutputFormat,
    /// Worker threads for batch evaluation, 0 for the rayon default.
    pub threads: usize,
}

impl EvalConfig {
    pub fn from_file(path: &Path) -> Result<EvalConfig, ConfigError> {
        let mut config_file = File::open(path)?;
        let mut config_string = String::new();
        config_file.read_to_string(&mut config_string)?;
        Self::from_yaml_str(&config_string)
    }

    pub fn from_yaml_str(s: &str) -> Result<EvalConfig, ConfigError> {
        let config_objs = YamlLoader::load_from_str(s)?;
        let mut config = EvalConfig::default();
        // empty file
        let Some(doc) = config_objs.first() else {
            return Ok(config);
        };
        match doc {
            Yaml::Hash(_) => (),
            Yaml::Null => return Ok(config),
            _ => return Err(ConfigError::NotAMapping),
        }
        // `heuristic: null` scans as a YAML null
        let heuristic = match &doc["heuristic"] {
            Yaml::Null => Some("null"),
            _ => string_field(doc, "heuristic")?,
        };
        if let Some(value) = heuristic {
            config.heuristic = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "heuristic",
                value: value.to_string(),
            })?;
        }
        if let Some(value) = string_field(doc, "perspective")? {
            config.perspective = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "perspective",
                value: value.to_string(),
            })?;
        }
        if let Some(value) = string_field(doc, "output")? {
            config.output = value.parse()?;
        }
        match &doc["threads"] {
            Yaml::BadValue => (),
            Yaml::Integer(n) => {
                config.threads = usize::try_from(*n).map_err(|_| ConfigError::InvalidValue {
                    key: "threads",
                    value: n.to_string(),
                })?;
            }
            _ => {
                return Err(ConfigError::WrongType {
                    key: "threads",
                    expected: "a non-negative integer",
                });
            }
        }
        Ok(config)
    }
}

fn string_field<'a>(doc: &'a Yaml, key: &'static str) -> Result<Option<&'a str>, ConfigError> {
    match &doc[key] {
        Yaml::BadValue => Ok(None),
        Yaml::String(s) => Ok(Some(s.as_str())),
        _ => Err(ConfigError::WrongType {
            key,
            expected: "a string",
        }),
    }
}
