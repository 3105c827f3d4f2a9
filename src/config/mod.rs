use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::AreaScope;

pub const DEFAULT_CITY: &str = "Kota Bandung";
pub const DEFAULT_OUTPUT_DIR: &str = "lib/data";
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_RADIUS_M: u32 = 5000;

fn default_overpass_url() -> String {
    DEFAULT_OVERPASS_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    200
}

fn default_streets() -> Vec<String> {
    [
        "Merdeka",
        "Sudirman",
        "Diponegoro",
        "Ahmad Yani",
        "Gatot Subroto",
        "Veteran",
        "Pemuda",
        "Pahlawan",
        "Soekarno Hatta",
        "Asia Afrika",
        "Braga",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_opening_hours() -> String {
    "08:00-20:00".to_string()
}

fn default_phone_prefix() -> String {
    "+62".to_string()
}

/// Settings read from a `poiscrape.toml` file; every field is optional
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub radius: Option<u32>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub overpass: Option<OverpassConfig>,
    #[serde(default)]
    pub synthesis: Option<SynthesisConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_url")]
    pub url: String,
    /// Request timeout; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: default_overpass_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Values used to fill the placeholder fields of every record
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SynthesisConfig {
    #[serde(default = "default_streets")]
    pub streets: Vec<String>,
    #[serde(default = "default_opening_hours")]
    pub opening_hours: String,
    #[serde(default = "default_phone_prefix")]
    pub phone_prefix: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            streets: default_streets(),
            opening_hours: default_opening_hours(),
            phone_prefix: default_phone_prefix(),
        }
    }
}

impl FileConfig {
    /// Load the first parseable config file from the search paths
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file; it must exist and parse
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("poiscrape.toml"));
    paths.push(PathBuf::from(".poiscrape.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("poiscrape").join("config.toml"));
        paths.push(config_dir.join("poiscrape.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".poiscrape.toml"));
        paths.push(home.join(".config").join("poiscrape").join("config.toml"));
    }

    paths
}

/// Values given on the command line; they win over the config file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub overpass_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub seed: Option<u64>,
    pub verbose: bool,
}

/// Fully resolved settings handed to the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ScraperConfig {
    pub scope: AreaScope,
    pub output_dir: PathBuf,
    pub overpass: OverpassConfig,
    pub synthesis: SynthesisConfig,
    pub seed: Option<u64>,
    pub verbose: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            scope: AreaScope::Named(DEFAULT_CITY.to_string()),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            overpass: OverpassConfig::default(),
            synthesis: SynthesisConfig::default(),
            seed: None,
            verbose: false,
        }
    }
}

impl ScraperConfig {
    /// Merge command line, config file and built-in defaults, in that order
    ///
    /// Coordinates select a radius search and take precedence over a city
    /// name from the same source.
    pub fn resolve(overrides: Overrides, file: Option<FileConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let radius_m = overrides.radius.or(file.radius).unwrap_or(DEFAULT_RADIUS_M);
        let scope = match overrides.city {
            Some(city) if overrides.lat.is_none() && overrides.lon.is_none() => {
                AreaScope::Named(city)
            }
            city => match (overrides.lat.or(file.lat), overrides.lon.or(file.lon)) {
                (Some(lat), Some(lon)) => AreaScope::Around { lat, lon, radius_m },
                (None, None) => AreaScope::Named(
                    city.or(file.city)
                        .unwrap_or_else(|| DEFAULT_CITY.to_string()),
                ),
                _ => bail!("Both lat and lon are required for a radius search"),
            },
        };

        let mut overpass = file.overpass.unwrap_or_default();
        if let Some(url) = overrides.overpass_url {
            overpass.url = url;
        }
        if let Some(timeout) = overrides.timeout_secs {
            overpass.timeout_secs = timeout;
        }

        let synthesis = file.synthesis.unwrap_or_default();
        if synthesis.streets.is_empty() {
            bail!("synthesis.streets must list at least one street name");
        }

        Ok(Self {
            scope,
            output_dir: overrides
                .output_dir
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            overpass,
            synthesis,
            seed: overrides.seed.or(file.seed),
            verbose: overrides.verbose || file.verbose,
        })
    }
}
