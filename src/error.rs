//! Errors returned by the drivers.

/// Which group of sensor bytes failed CRC validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcFailureReason {
    TemperatureBytes,
    HumidityBytes,
    StatusBytes,
}

impl core::fmt::Display for CrcFailureReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let description = match self {
            CrcFailureReason::TemperatureBytes => "temperature bytes",
            CrcFailureReason::HumidityBytes => "humidity bytes",
            CrcFailureReason::StatusBytes => "status register bytes",
        };
        f.write_str(description)
    }
}

/// A request that cannot be put on the bus as asked.
///
/// These are caught before any I2C traffic is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigurationError {
    /// The register address is 8-bit on a 16-bit device, or the reverse.
    RegisterWidthMismatch,
    /// Register address plus payload do not fit in a single write frame.
    PayloadTooLong,
    /// A periodic-mode readout was requested before periodic measurement
    /// was started.
    NotMeasuring,
}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let description = match self {
            ConfigurationError::RegisterWidthMismatch => {
                "register address width does not match the device"
            }
            ConfigurationError::PayloadTooLong => "payload too long for a single write",
            ConfigurationError::NotMeasuring => "sensor is not in periodic measurement mode",
        };
        f.write_str(description)
    }
}

#[derive(Debug)]
pub enum Error<I2cError>
where
    I2cError: embedded_hal::i2c::Error,
{
    /// The transport reported a failure (NACK, arbitration loss, timeout).
    /// The error is passed through untouched.
    I2c(I2cError),
    CrcValidationFailed(CrcFailureReason),
    InvalidConfiguration(ConfigurationError),
}

impl<I2cError> From<I2cError> for Error<I2cError>
where
    I2cError: embedded_hal::i2c::Error,
{
    fn from(value: I2cError) -> Self {
        Error::I2c(value)
    }
}

impl<I2cError> core::fmt::Display for Error<I2cError>
where
    I2cError: embedded_hal::i2c::Error,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "Received I2C error: {:?}", e),
            Error::CrcValidationFailed(location) => {
                write!(f, "CRC validation failed for {location}")
            }
            Error::InvalidConfiguration(reason) => write!(f, "Invalid configuration: {reason}"),
        }
    }
}

impl<I> core::error::Error for Error<I> where I: embedded_hal::i2c::Error {}
