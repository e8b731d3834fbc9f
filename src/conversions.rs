//! Sensor readings to celsius, fahrenheit, percent relative humidity and
//! light channel counts.
//!
//! These functions are used by the methods on [`Measurement`] and
//! [`LightChannels`] but are provided here should you need them directly.
//!
//! The SHT3x formulas can be found in section 4.13 of the [datasheet].
//!
//! If you prefer to work with fixed- rather than floating-point numbers,
//! use the `fixed` feature and the [`fixed_point`] submodule.
//!
//! [`Measurement`]: crate::sht3x::Measurement
//! [`LightChannels`]: crate::tsl2561::LightChannels
//! [datasheet]: https://sensirion.com/media/documents/213E6A3B/63A5A569/Datasheet_SHT3x_DIS.pdf

/// Convert the raw humidity reading to percent relative humidity.
///
/// The full `u16` range maps onto `0.0..=100.0`.
pub fn humidity_reading_to_percent_rh(reading: u16) -> f32 {
    let s_rh: f32 = reading.into();
    100.0 * (s_rh / 65_535.0)
}

/// Convert the raw temperature reading to celsius.
pub fn temperature_reading_to_celsius(reading: u16) -> f32 {
    let s_t: f32 = reading.into();
    -45.0 + 175.0 * (s_t / 65_535.0)
}

/// Convert the raw temperature reading to fahrenheit.
pub fn temperature_reading_to_fahrenheit(reading: u16) -> f32 {
    let s_t: f32 = reading.into();
    -49.0 + 315.0 * (s_t / 65_535.0)
}

/// Assemble a light channel count from its two register bytes.
///
/// The low byte is taken as is and the high byte is shifted up by 8.
pub const fn channel_from_bytes(low: u8, high: u8) -> u16 {
    (low as u16) + ((high as u16) << 8)
}

/// Fixed-point numeric conversions from sensor readings.
///
/// The same as the functions in the parent module, but computed with a
/// 16-bit fractional part so that converting the reading into a fraction
/// of `u16::MAX` loses nothing.
#[cfg(feature = "fixed")]
pub mod fixed_point {
    use fixed::types::{I16F16, U16F16};

    fn fraction(reading: u16) -> I16F16 {
        // Convert u16 reading into a fraction 0..=1
        I16F16::from_num(U16F16::from_num(reading) / U16F16::from_num(u16::MAX))
    }

    /// Convert the raw humidity reading to percent relative humidity.
    pub fn humidity_reading_to_percent_rh(reading: u16) -> I16F16 {
        I16F16::from_num(100) * fraction(reading)
    }

    /// Convert the raw temperature reading to celsius.
    pub fn temperature_reading_to_celsius(reading: u16) -> I16F16 {
        I16F16::from_num(-45) + I16F16::from_num(175) * fraction(reading)
    }

    /// Convert the raw temperature reading to fahrenheit.
    pub fn temperature_reading_to_fahrenheit(reading: u16) -> I16F16 {
        I16F16::from_num(-49) + I16F16::from_num(315) * fraction(reading)
    }

    #[cfg(test)]
    mod test {
        use super::*;

        #[test]
        fn endpoints() {
            assert_eq!(temperature_reading_to_celsius(0), I16F16::from_num(-45));
            assert_eq!(temperature_reading_to_celsius(u16::MAX), I16F16::from_num(130));
            assert_eq!(humidity_reading_to_percent_rh(0), I16F16::ZERO);
            assert_eq!(humidity_reading_to_percent_rh(u16::MAX), I16F16::from_num(100));
        }
    }
}
