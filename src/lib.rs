//! DHT11 / DHT22 Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the DHT11 and DHT22
//! (AM2302) temperature and humidity sensors, built on top of the
//! [`embedded-hal`] traits.
//!
//! The sensors talk over a single self-clocked data line. A read drives a
//! start signal, measures the width of the 40 high pulses that follow with a
//! microsecond [`Clock`], decodes them into a 5-byte frame, validates the
//! checksum and converts the bytes according to the [`SensorType`].
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Every wait on the line is bounded by a timeout
//! - Minimum interval between reads enforced per driver instance
//! - Optional logging support via `defmt` or `log`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access. The line is expected to
//!   be open-drain with a pull-up: `set_low` drives it, `set_high` releases it.
//! - [`DelayNs`] for the start signal
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs through `defmt`
//! - `log`: Logs through the `log` facade
//! - `std`: Provides [`StdClock`]
//! - `linux`: Builds the `dht-reader` command line tool for Linux GPIO character devices
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]

#[macro_use]
mod fmt;

pub mod capture;
pub mod clock;
pub mod config;
pub mod dht;
pub mod error;
pub mod frame;
pub mod reading;
pub mod sensor_type;

#[cfg(test)]
mod sim;

#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::Clock;
pub use config::{Dht11Fraction, DhtConfig};
pub use dht::{Dht, State};
pub use error::{DhtError, ReadOutcome};
pub use frame::RawFrame;
pub use reading::Reading;
pub use sensor_type::{SensorType, UnknownSensorType};
