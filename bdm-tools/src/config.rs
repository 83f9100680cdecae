use std::path::{Path, PathBuf};

use bdm::BdmConfig;
use figment::providers::{Env, Format as _, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::util::logging::LevelFilter;

/// Name of the configuration file searched for in the working directory.
const CONFIG_FILE: &str = "bdm.toml";

/// Line offsets of the BDM signals on a GPIO character device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GpioConfig {
    pub chip: PathBuf,
    pub dsi: u32,
    pub dso: u32,
    pub dsclk: u32,
    pub bkpt: u32,
    pub reset: u32,
}

impl Default for GpioConfig {
    fn default() -> Self {
        GpioConfig {
            chip: PathBuf::from("/dev/gpiochip0"),
            dsi: 13,
            dso: 6,
            dsclk: 19,
            bkpt: 26,
            reset: 17,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub log_level: Option<LevelFilter>,
    pub gpio: GpioConfig,
    pub bdm: BdmConfig,
}

/// Load the configuration: built-in defaults, then `bdm.toml` in the working
/// directory (or `explicit`), then `BDM_` environment variables.
///
/// Nested keys are separated by `__`, e.g. `BDM_GPIO__DSO=5`.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let file = explicit.map_or_else(|| PathBuf::from(CONFIG_FILE), Path::to_path_buf);
    if explicit.is_some() && !file.exists() {
        anyhow::bail!("Config file {} does not exist", file.display());
    }

    let config = figment(&file).extract::<Config>()?;
    Ok(config)
}

fn figment(file: &Path) -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(file))
        .merge(Env::prefixed("BDM_").split("__"))
}
