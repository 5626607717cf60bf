use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use crate::wallet::{Latency, WalletSettings, DEMO_ADDRESS, STARTING_BALANCE};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub wallet: Wallet,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct General {
    pub log_level: String,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Wallet {
    pub demo_address: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub starting_balance: Decimal,
    /// Directory standing in for the browser profile
    pub storage_dir: PathBuf,
    pub connect_latency_ms: u64,
    pub disconnect_latency_ms: u64,
    pub purchase_latency_ms: u64,
}

impl Default for Wallet {
    fn default() -> Self {
        let latency = Latency::default();
        Self {
            demo_address: DEMO_ADDRESS.to_string(),
            starting_balance: STARTING_BALANCE,
            storage_dir: PathBuf::from(".pokemarket"),
            connect_latency_ms: latency.connect.as_millis() as u64,
            disconnect_latency_ms: latency.disconnect.as_millis() as u64,
            purchase_latency_ms: latency.purchase.as_millis() as u64,
        }
    }
}

impl Wallet {
    pub fn settings(&self) -> WalletSettings {
        WalletSettings {
            address: self.demo_address.clone(),
            starting_balance: self.starting_balance,
            latency: Latency {
                connect: Duration::from_millis(self.connect_latency_ms),
                disconnect: Duration::from_millis(self.disconnect_latency_ms),
                purchase: Duration::from_millis(self.purchase_latency_ms),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Fixed seed for a reproducible catalog; random per run when unset
    pub seed: Option<u64>,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Like `load`, but a missing file gives the defaults.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }
}
