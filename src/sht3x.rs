//! SHT3x command set, configuration and measurement types.
//!
//! The bus operations live in [`crate::blocking::Sht3x`] and
//! [`crate::asynch::Sht3x`]. Section and table numbers below refer to the
//! [datasheet].
//!
//! [datasheet]: https://sensirion.com/media/documents/213E6A3B/63A5A569/Datasheet_SHT3x_DIS.pdf

use crate::common::Unvalidated;
use crate::error::{CrcFailureReason, Error};

/// Every 16-bit command the driver may send to the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Command {
    SoftReset = 0x30A2,

    // Single shot, clock stretching enabled (table 9).
    SingleShotHighStretch = 0x2C06,
    SingleShotMediumStretch = 0x2C0D,
    SingleShotLowStretch = 0x2C10,
    // Single shot, clock stretching disabled.
    SingleShotHigh = 0x2400,
    SingleShotMedium = 0x240B,
    SingleShotLow = 0x2416,

    // Periodic, named by repeatability and measurements per second (table 10).
    PeriodicHighHalf = 0x2032,
    PeriodicMediumHalf = 0x2024,
    PeriodicLowHalf = 0x202F,
    PeriodicHigh1 = 0x2130,
    PeriodicMedium1 = 0x2126,
    PeriodicLow1 = 0x212D,
    PeriodicHigh2 = 0x2236,
    PeriodicMedium2 = 0x2220,
    PeriodicLow2 = 0x222B,
    PeriodicHigh4 = 0x2334,
    PeriodicMedium4 = 0x2322,
    PeriodicLow4 = 0x2329,
    PeriodicHigh10 = 0x2737,
    PeriodicMedium10 = 0x2721,
    PeriodicLow10 = 0x272A,
    /// Fetch the latest periodic measurement.
    PeriodicReadout = 0xE000,
    /// Stop periodic measurement and return to single shot mode.
    Break = 0x3093,

    HeaterEnable = 0x306D,
    HeaterDisable = 0x3066,
    ReadStatus = 0xF32D,
    ClearStatus = 0x3041,
}

impl Command {
    pub const fn code(self) -> u16 {
        self as u16
    }
}

/// Measurement repeatability, trading conversion time for noise.
///
/// Typical 3σ repeatability for temperature / humidity (table 1 and 2):
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Repeatability {
    /// 0.04°C, 0.08%RH
    High,
    /// 0.08°C, 0.15%RH
    Medium,
    /// 0.15°C, 0.21%RH
    Low,
}

/// Whether the sensor holds SCL low until a single shot result is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockStretching {
    Enabled,
    Disabled,
}

/// Measurements per second in periodic mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementRate {
    Half,
    One,
    Two,
    Four,
    Ten,
}

impl MeasurementRate {
    /// Milliseconds between two periodic measurements.
    pub const fn period_ms(self) -> u32 {
        match self {
            MeasurementRate::Half => 2_000,
            MeasurementRate::One => 1_000,
            MeasurementRate::Two => 500,
            MeasurementRate::Four => 250,
            MeasurementRate::Ten => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementMode {
    /// Trigger each measurement, then read it back.
    SingleShot {
        repeatability: Repeatability,
        clock_stretching: ClockStretching,
    },
    /// Let the sensor free-run; each read fetches the latest result.
    Periodic {
        repeatability: Repeatability,
        rate: MeasurementRate,
    },
}

impl MeasurementMode {
    /// The command that starts a measurement in this mode.
    pub const fn command(&self) -> Command {
        use ClockStretching::{Disabled, Enabled};
        use MeasurementRate::{Four, Half, One, Ten, Two};
        use Repeatability::{High, Low, Medium};

        match *self {
            MeasurementMode::SingleShot {
                repeatability,
                clock_stretching,
            } => match (repeatability, clock_stretching) {
                (High, Enabled) => Command::SingleShotHighStretch,
                (Medium, Enabled) => Command::SingleShotMediumStretch,
                (Low, Enabled) => Command::SingleShotLowStretch,
                (High, Disabled) => Command::SingleShotHigh,
                (Medium, Disabled) => Command::SingleShotMedium,
                (Low, Disabled) => Command::SingleShotLow,
            },
            MeasurementMode::Periodic {
                repeatability,
                rate,
            } => match (repeatability, rate) {
                (High, Half) => Command::PeriodicHighHalf,
                (Medium, Half) => Command::PeriodicMediumHalf,
                (Low, Half) => Command::PeriodicLowHalf,
                (High, One) => Command::PeriodicHigh1,
                (Medium, One) => Command::PeriodicMedium1,
                (Low, One) => Command::PeriodicLow1,
                (High, Two) => Command::PeriodicHigh2,
                (Medium, Two) => Command::PeriodicMedium2,
                (Low, Two) => Command::PeriodicLow2,
                (High, Four) => Command::PeriodicHigh4,
                (Medium, Four) => Command::PeriodicMedium4,
                (Low, Four) => Command::PeriodicLow4,
                (High, Ten) => Command::PeriodicHigh10,
                (Medium, Ten) => Command::PeriodicMedium10,
                (Low, Ten) => Command::PeriodicLow10,
            },
        }
    }
}

/// Delays the sensor needs between commands.
///
/// The sensor has no ready flag, so these waits are what move it from one
/// state to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Wait after a soft reset before the next command.
    pub reset_ms: u32,
    /// Wait after starting periodic mode before the first readout.
    pub periodic_start_ms: u32,
    /// Conversion time for a single shot at high repeatability.
    pub single_shot_high_ms: u32,
    pub single_shot_medium_ms: u32,
    pub single_shot_low_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reset_ms: 20,
            periodic_start_ms: 500,
            single_shot_high_ms: 15,
            single_shot_medium_ms: 6,
            single_shot_low_ms: 4,
        }
    }
}

impl Timing {
    pub const fn single_shot_ms(&self, repeatability: Repeatability) -> u32 {
        match repeatability {
            Repeatability::High => self.single_shot_high_ms,
            Repeatability::Medium => self.single_shot_medium_ms,
            Repeatability::Low => self.single_shot_low_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub mode: MeasurementMode,
    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: MeasurementMode::Periodic {
                repeatability: Repeatability::Medium,
                rate: MeasurementRate::Two,
            },
            timing: Timing::default(),
        }
    }
}

/// Whether the sensor is free-running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    Uninitialized,
    Measuring,
}

/// A CRC-validated pair of raw readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub raw_temperature_reading: u16,
    pub raw_humidity_reading: u16,
}

impl Measurement {
    pub(crate) fn from_read_bytes<I>(sensor_data: Unvalidated) -> Result<Self, Error<I>>
    where
        I: embedded_hal::i2c::Error,
    {
        let [t0, t1, h0, h1] = sensor_data.try_get_bytes(
            CrcFailureReason::TemperatureBytes,
            CrcFailureReason::HumidityBytes,
        )?;
        Ok(Measurement {
            raw_temperature_reading: u16::from_be_bytes([t0, t1]),
            raw_humidity_reading: u16::from_be_bytes([h0, h1]),
        })
    }

    pub fn celsius(&self) -> f32 {
        crate::conversions::temperature_reading_to_celsius(self.raw_temperature_reading)
    }

    pub fn fahrenheit(&self) -> f32 {
        crate::conversions::temperature_reading_to_fahrenheit(self.raw_temperature_reading)
    }

    pub fn humidity(&self) -> f32 {
        crate::conversions::humidity_reading_to_percent_rh(self.raw_humidity_reading)
    }

    #[cfg(feature = "fixed")]
    pub fn celsius_fixed_point(&self) -> fixed::types::I16F16 {
        crate::conversions::fixed_point::temperature_reading_to_celsius(
            self.raw_temperature_reading,
        )
    }

    #[cfg(feature = "fixed")]
    pub fn humidity_fixed_point(&self) -> fixed::types::I16F16 {
        crate::conversions::fixed_point::humidity_reading_to_percent_rh(self.raw_humidity_reading)
    }
}

/// Result of decoding six raw bytes without going through the bus.
///
/// On CRC failure `valid` is false and both values are 0.0. Zero is a real
/// reading for both quantities, so check `valid` rather than the values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodeOutcome {
    pub valid: bool,
    pub temperature: f32,
    pub humidity: f32,
}

/// Validate and convert a 6-byte temperature/humidity readout.
pub fn decode(bytes: [u8; 6]) -> DecodeOutcome {
    match Measurement::from_read_bytes::<embedded_hal::i2c::ErrorKind>(Unvalidated::new(bytes)) {
        Ok(measurement) => DecodeOutcome {
            valid: true,
            temperature: measurement.celsius(),
            humidity: measurement.humidity(),
        },
        Err(_) => DecodeOutcome {
            valid: false,
            temperature: 0.0,
            humidity: 0.0,
        },
    }
}

/// The 16-bit status register (table 17).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(pub u16);

impl Status {
    pub(crate) fn from_read_bytes<I>(bytes: [u8; 3]) -> Result<Self, Error<I>>
    where
        I: embedded_hal::i2c::Error,
    {
        let [s0, s1, crc] = bytes;
        if !crate::crc::check([s0, s1], crc, crate::crc::SHT3X_INITIAL) {
            warn!("CRC mismatch in {}", CrcFailureReason::StatusBytes);
            return Err(Error::CrcValidationFailed(CrcFailureReason::StatusBytes));
        }
        Ok(Status(u16::from_be_bytes([s0, s1])))
    }

    const fn bit(&self, n: u8) -> bool {
        self.0 & (1 << n) != 0
    }

    pub const fn alert_pending(&self) -> bool {
        self.bit(15)
    }

    pub const fn heater_on(&self) -> bool {
        self.bit(13)
    }

    pub const fn humidity_alert(&self) -> bool {
        self.bit(11)
    }

    pub const fn temperature_alert(&self) -> bool {
        self.bit(10)
    }

    pub const fn reset_detected(&self) -> bool {
        self.bit(4)
    }

    /// The last command was not processed (invalid or failed checksum).
    pub const fn command_failed(&self) -> bool {
        self.bit(1)
    }

    /// The checksum of the last write transfer failed.
    pub const fn write_checksum_failed(&self) -> bool {
        self.bit(0)
    }
}
