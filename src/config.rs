#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const GOT_CONFIG_FILE_NAME: &str = "got_config.toml";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GotConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_area")]
    pub start_area: u8,
}

fn default_true() -> bool {
    true
}

fn default_area() -> u8 {
    1
}

/// Resolves the config in two steps: an explicit `-config <path>` argument
/// wins, otherwise a `got_config.toml` in the working directory is used.
/// With neither present every field falls back to its default.
pub fn read_got_config() -> Result<GotConfig, String> {
    if let Some(conf_arg) = check_config_arg() {
        let path = Path::new(&conf_arg);
        return read_conf_file(path);
    }

    let conf_file = Path::new(GOT_CONFIG_FILE_NAME);
    if conf_file.exists() {
        read_conf_file(conf_file)
    } else {
        default_got_config()
    }
}

fn read_conf_file(conf_file: &Path) -> Result<GotConfig, String> {
    let content = fs::read_to_string(conf_file).map_err(|e| e.to_string())?;
    let config: GotConfig = toml::from_str(&content).map_err(|e| e.to_string())?;
    Ok(config)
}

pub fn default_got_config() -> Result<GotConfig, String> {
    toml::from_str("").map_err(|e: toml::de::Error| e.to_string())
}

fn check_config_arg() -> Option<String> {
    let mut args = env::args();
    while let Some(arg) = args.next() {
        if arg == "-config" {
            return args.next();
        }
    }
    None
}
