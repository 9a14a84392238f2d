use std::str::FromStr;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use toml::Value;

/// Which traffic-generation variant drives the run.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    #[default]
    Request,
    Dma,
}

impl FromStr for EngineMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "request" => Ok(Self::Request),
            "dma" => Ok(Self::Dma),
            _ => Err(format!(
                "unsupported engine mode '{}', expected one of: request, dma",
                value
            )),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimConfig {
    pub log_level: u64,
    pub timeout: u64,
    pub engine: EngineMode,
    pub results_json: Option<String>,
}

pub trait Config: DeserializeOwned + Default {
    fn from_section(section: Option<&Value>) -> Self {
        match section {
            Some(value) => value.clone().try_into().expect("cannot deserialize config"),
            None => {
                warn!("config section not found");
                Self::default()
            }
        }
    }
}

impl Config for SimConfig {}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            log_level: 0,
            timeout: 10_000_000,
            engine: EngineMode::Request,
            results_json: None,
        }
    }
}
