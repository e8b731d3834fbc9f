//! Drivers for the Sensirion SHT3x temperature and humidity sensor and the
//! TSL2561 ambient light sensor, built on the [`embedded-hal`] I2C traits.
//!
//! The crate is split in the usual way:
//!
//! - [`blocking`] and [`asynch`] hold the bus-facing drivers, one per
//!   flavour of `embedded-hal`.
//! - [`crc`], [`conversions`] and the device modules ([`sht3x`],
//!   [`tsl2561`]) are pure and shared between the two.
//! - [`offload`] models the hand-off between the main processor and a
//!   low-power coprocessor that polls the light sensor while the main
//!   processor sleeps.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
#![no_std]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

// This must go first, so the logging macros are visible to every module.
mod fmt;

#[cfg(feature = "async")]
pub mod asynch;
#[cfg(feature = "blocking")]
pub mod blocking;
pub mod common;
pub mod conversions;
pub mod crc;
pub mod error;
pub mod offload;
pub mod sht3x;
pub mod tsl2561;

pub use common::{Device, RegisterAddress, RegisterWidth};
pub use error::{ConfigurationError, CrcFailureReason, Error};
