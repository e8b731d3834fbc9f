//! TSL2561 registers, configuration and channel readings.
//!
//! Every register address carries the command bit (0x80). The two ADC
//! channels are exposed as four separately addressed bytes, so each channel
//! is read as two single-byte register reads.

use crate::conversions::channel_from_bytes;

/// Default wake threshold on the visible channel.
pub const DEFAULT_WAKE_THRESHOLD: u16 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    Control = 0x80,
    Timing = 0x81,
    Id = 0x8A,
    Data0Low = 0x8C,
    Data0High = 0x8D,
    Data1Low = 0x8E,
    Data1High = 0x8F,
}

impl Register {
    pub const fn address(self) -> u8 {
        self as u8
    }
}

/// Values written to the control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerState {
    On = 0x03,
    Off = 0x01,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// 1x
    Low,
    /// 16x
    High,
}

/// ADC integration time. The sensor resets to 402ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntegrationTime {
    Ms13_7,
    Ms101,
    Ms402,
}

impl IntegrationTime {
    /// Milliseconds until a fresh conversion is available, rounded up.
    pub const fn ms(self) -> u32 {
        match self {
            IntegrationTime::Ms13_7 => 14,
            IntegrationTime::Ms101 => 101,
            IntegrationTime::Ms402 => 402,
        }
    }
}

/// Encode gain and integration time into the timing register value.
pub const fn timing_byte(gain: Gain, integration_time: IntegrationTime) -> u8 {
    let gain_bit = match gain {
        Gain::Low => 0x00,
        Gain::High => 0x10,
    };
    let integ_bits = match integration_time {
        IntegrationTime::Ms13_7 => 0b00,
        IntegrationTime::Ms101 => 0b01,
        IntegrationTime::Ms402 => 0b10,
    };
    gain_bit | integ_bits
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Wait after power on before the first reading is valid. This covers
    /// one full conversion at the default integration time.
    pub power_on_delay_ms: u32,
    pub gain: Gain,
    pub integration_time: IntegrationTime,
    /// Visible channel count above which an alert is raised.
    pub wake_threshold: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            power_on_delay_ms: 400,
            gain: Gain::Low,
            integration_time: IntegrationTime::Ms402,
            wake_threshold: DEFAULT_WAKE_THRESHOLD,
        }
    }
}

/// Raw counts from both ADC channels. No lux conversion is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightChannels {
    /// Channel 0, visible and infrared.
    pub visible: u16,
    /// Channel 1, infrared only.
    pub infrared: u16,
}

impl LightChannels {
    /// Build from the four data register bytes in register order
    /// (0x8C, 0x8D, 0x8E, 0x8F).
    pub const fn from_register_bytes(bytes: [u8; 4]) -> Self {
        let [c0_low, c0_high, c1_low, c1_high] = bytes;
        Self {
            visible: channel_from_bytes(c0_low, c0_high),
            infrared: channel_from_bytes(c1_low, c1_high),
        }
    }

    pub const fn exceeds(&self, threshold: u16) -> bool {
        self.visible > threshold
    }
}

/// The data registers in the order they are read.
pub(crate) const CHANNEL_REGISTERS: [Register; 4] = [
    Register::Data0Low,
    Register::Data0High,
    Register::Data1Low,
    Register::Data1High,
];
