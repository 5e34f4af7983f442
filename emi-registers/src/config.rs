//! Data load definitions: which EMI registers to read and how to decode them.
//!
//! The configuration is JSON with PascalCase keys:
//!
//! ```json
//! {
//!   "DataLoads": [
//!     { "Name": "clock", "Address": "0x0001", "Type": "Clock", "Unit": "" },
//!     { "Name": "voltage_l1", "Address": "0x006C", "Type": "Float", "Unit": "V", "Scaler": -1 },
//!     { "Name": "active_energy", "Address": "0x0016", "Type": "Double", "Unit": "Wh", "PollingInterval": 15 },
//!     { "Name": "device_id", "Address": "0x0003", "Type": "String", "Unit": "", "Length": 12 }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::clock::ClockRecord;
use crate::codec::Address;
use crate::decoder;
use crate::error::{ConfigError, DecodeResult};
use crate::octet_string::OctetString;
use crate::transport::RegisterTransport;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmiConfig {
    #[serde(default)]
    pub data_loads: Vec<DataLoad>,
}

/// How the registers of a data load are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DataLoadType {
    /// Unsigned 16-bit register, scaled.
    Float,
    /// Unsigned 32-bit register pair, scaled.
    Double,
    /// Octet string of `Length` octets.
    String,
    /// Device clock record.
    Clock,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataLoad {
    pub name: String,
    /// Written as a hexadecimal string, `0x` prefix optional.
    #[serde(deserialize_with = "deserialize_address")]
    pub address: Address,
    #[serde(rename = "Type")]
    pub kind: DataLoadType,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub scaler: i8,
    /// Polling interval in seconds.
    #[serde(default = "default_polling_interval")]
    pub polling_interval: u64,
    #[serde(default)]
    pub length: Option<u8>,
}

fn default_polling_interval() -> u64 {
    1
}

/// Parse a hexadecimal register address such as `0x006C` or `6c`.
pub fn parse_hex_address(text: &str) -> Result<Address, ConfigError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    // from_str_radix alone would accept a leading sign.
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidAddress(text.to_string()));
    }
    Address::from_str_radix(digits, 16)
        .map_err(|_| ConfigError::InvalidAddress(text.to_string()))
}

fn deserialize_address<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_hex_address(&text).map_err(serde::de::Error::custom)
}

/// Decoded value of a data load.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Scalar(f64),
    Text(OctetString),
    Clock(ClockRecord),
}

impl EmiConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        debug!(data_loads = config.data_loads.len(), "loaded EMI configuration");
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for load in &self.data_loads {
            if !names.insert(load.name.as_str()) {
                return Err(ConfigError::DuplicateName(load.name.clone()));
            }
            if load.kind == DataLoadType::String && load.length.is_none() {
                return Err(ConfigError::MissingLength(load.name.clone()));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&DataLoad> {
        self.data_loads.iter().find(|load| load.name == name)
    }
}

impl DataLoad {
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval)
    }

    /// Read and decode this data load.
    ///
    /// A `String` load without `Length` reads as an empty string; loaders reject
    /// such configurations up front.
    pub async fn read<T>(&self, transport: &mut T) -> DecodeResult<Reading>
    where
        T: RegisterTransport + ?Sized,
    {
        let address = self.address;
        let reading = match self.kind {
            DataLoadType::Float => {
                let value = decoder::decode_scaled_u16(transport, address, self.scaler).await?;
                Reading::Scalar(value)
            }
            DataLoadType::Double => {
                let value = decoder::decode_scaled_u32(transport, address, self.scaler).await?;
                Reading::Scalar(value)
            }
            DataLoadType::String => {
                let length = self.length.unwrap_or_default();
                Reading::Text(decoder::decode_octet_string(transport, address, length).await?)
            }
            DataLoadType::Clock => {
                Reading::Clock(decoder::decode_clock_at(transport, address).await?)
            }
        };
        Ok(reading)
    }
}
