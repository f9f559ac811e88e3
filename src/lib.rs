//! SHT3x Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the Sensirion SHT30, SHT31
//! and SHT35 temperature and humidity sensors, built on top of the
//! [`embedded-hal`] traits.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Single-shot (polled or clock-stretched) and periodic acquisition
//! - CRC-8 validation of every word received from the sensor
//! - Alert threshold programming and read-back for temperature and humidity
//! - Status register decoding, heater control, soft and hardware reset
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`I2c`] for bus access
//! - [`DelayNs`] for command and conversion timing
//! - [`OutputPin`] for the optional active-low reset line
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs through `defmt`
//! - `log`: Logs through the `log` facade
//!
//! # Example
//!
//! ```ignore
//! use sht3x_sensor::{Address, Repeatability, Sht3x};
//!
//! let mut sht = Sht3x::new(i2c, delay, Address::High);
//! let serial = sht.begin()?;
//! let reading = sht.read_temperature_and_humidity(Repeatability::High)?;
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`I2c`]: embedded_hal::i2c::I2c
//! [`DelayNs`]: embedded_hal::delay::DelayNs
//! [`OutputPin`]: embedded_hal::digital::OutputPin

#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

// This must go first so the logging macros are visible to the other modules.
mod fmt;

pub mod command;
pub mod crc;
pub mod error;
pub mod limits;
pub mod measurement;
pub mod sht3x;
pub mod status;

pub use command::{Command, Frequency, Repeatability};
pub use error::Sht3xError;
pub use limits::{AlertLevel, EnvironmentState, LimitSlot, LimitThresholds, LimitUnit};
pub use measurement::Measurement;
pub use sht3x::{AcquisitionMode, Address, NoResetPin, Sht3x};
pub use status::StatusRegister;
