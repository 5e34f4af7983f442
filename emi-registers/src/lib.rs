//! Register decoding for Energy Metering Interface (EMI) devices, on top of [tokio-modbus](https://github.com/slowtec/tokio-modbus).
//!
//! EMI devices expose their measurements as Modbus input registers holding big-endian
//! unsigned integers with a device-documented power-of-ten scaler, octet strings and a
//! packed clock record. This crate turns those raw register blocks into values.

//! ## Decoders
//!
//! - [`decoder::decode_scaled_u16`] and [`decoder::decode_scaled_u32`] - `raw x 10^scaler` as `f64`,
//! - [`decoder::decode_clock`] - the [`clock::ClockRecord`] at address `0x0001`,
//! - [`decoder::decode_octet_string`] - an [`octet_string::OctetString`] of the requested length.
//!
//! Each decoder performs a single read through a [`transport::RegisterTransport`] and returns
//! [`error::DecodeError`] when the read fails or comes back short; no value is produced then.
//!
//! ## Derive macro
//!
//! [`derive::InputRegisterMap`] implements [`core::InputRegisterMap`] for a struct. Annotated fields
//! are decoded in address order. The field `emi` attribute **must** contain
//! - `addr` - register address, `u16` integer,
//! - `ty` - one of `"u16"`, `"u32"` (for `f64` fields), `"clock"` (for `ClockRecord`) or `"octets(len)"` (for `OctetString`),
//!
//! and **can** contain
//! - `scaler` - signed power-of-ten exponent, default `0`,
//! - `unit` - measurement unit of the scaled value.
//!
//! The `emi_doc` attribute creates documentation from the `emi` field attributes.

/// Clock record decoded from the clock object
pub mod clock;
/// Utilities for decoding from and encoding to EMI registers
pub mod codec;
/// Data load configuration
pub mod config;
/// Core traits to read from EMI registers
pub mod core;
/// Scaled value, clock and octet string decoders
pub mod decoder;
pub mod error;
pub mod octet_string;
/// In-memory register store for tests and demos
pub mod simulator;
pub mod transport;

pub use clock::{ClockRecord, ClockStatus};
pub use decoder::{
    decode_clock, decode_clock_at, decode_octet_string, decode_scaled_u16, decode_scaled_u32,
    CLOCK_ADDRESS,
};
pub use error::{ConfigError, DecodeError, TransportError};
pub use octet_string::OctetString;
pub use transport::{ModbusTransport, RegisterTransport};

pub mod derive {
    /// Re-export.
    pub use emi_registers_derive::{emi_doc, InputRegisterMap};
}
