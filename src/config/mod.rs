use crate::core::histogram::BinPolicy;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory where `U<date>.csv` / `S<date>.csv` dumps are written and looked up
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Device address (host or host:port); prompted for when missing
    #[serde(default)]
    pub device_address: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    #[serde(default)]
    pub bin_overflow: BinPolicy,
}

fn default_data_dir() -> String {
    Config::config_dir()
        .join("data")
        .to_string_lossy()
        .to_string()
}
fn default_port() -> u16 {
    23
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_read_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            device_address: None,
            port: default_port(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            bin_overflow: BinPolicy::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        let base = if cfg!(target_os = "windows") {
            dirs::config_dir()
        } else {
            dirs::home_dir()
        };
        let base = base.unwrap_or_else(|| PathBuf::from("."));

        if cfg!(target_os = "windows") {
            base.join("uroflow")
        } else {
            base.join(".uroflow")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("uroflow.conf")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_yaml(&content)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;
        if cfg.read_timeout_secs == 0 {
            return Err(AppError::Config(
                "read_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(cfg)
    }

    /// Write the default config file and create the data directory.
    /// In test mode the config file is left untouched.
    pub fn init_all(data_dir: Option<String>, is_test: bool) -> AppResult<Config> {
        let mut config = Config::default();
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }

        if !is_test {
            fs::create_dir_all(Self::config_dir())?;
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        fs::create_dir_all(&config.data_dir)?;
        println!("✅ Data dir:    {}", config.data_dir);

        Ok(config)
    }
}
