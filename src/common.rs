//! Pieces shared by the blocking and async drivers: device descriptions,
//! register addressing and the framing of write transactions.

use embedded_hal::i2c::SevenBitAddress;

use crate::crc::{SHT3X_INITIAL, check};
use crate::error::{ConfigurationError, CrcFailureReason, Error};

/// Width of the register (or command) address a device expects after its
/// bus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterWidth {
    Eight,
    Sixteen,
}

impl RegisterWidth {
    pub const fn bytes(self) -> usize {
        match self {
            RegisterWidth::Eight => 1,
            RegisterWidth::Sixteen => 2,
        }
    }
}

/// A sensor on the bus: its 7-bit address and how its registers are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Device {
    pub address: SevenBitAddress,
    pub width: RegisterWidth,
}

impl Device {
    pub const fn new(address: SevenBitAddress, width: RegisterWidth) -> Self {
        Self { address, width }
    }
}

/// SHT3x with the ADDR pin pulled low.
pub const SHT3X_DEVICE: Device = Device::new(0x44, RegisterWidth::Sixteen);
/// SHT3x with the ADDR pin pulled high.
pub const SHT3X_ALTERNATE_DEVICE: Device = Device::new(0x45, RegisterWidth::Sixteen);
/// TSL2561 with the ADDR SEL pin floating.
pub const TSL2561_DEVICE: Device = Device::new(0x39, RegisterWidth::Eight);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterAddress {
    Eight(u8),
    Sixteen(u16),
}

impl RegisterAddress {
    pub const fn width(&self) -> RegisterWidth {
        match self {
            RegisterAddress::Eight(_) => RegisterWidth::Eight,
            RegisterAddress::Sixteen(_) => RegisterWidth::Sixteen,
        }
    }
}

impl From<u8> for RegisterAddress {
    fn from(value: u8) -> Self {
        RegisterAddress::Eight(value)
    }
}

impl From<u16> for RegisterAddress {
    fn from(value: u16) -> Self {
        RegisterAddress::Sixteen(value)
    }
}

/// Largest write (register address plus payload) issued in one transaction.
pub const MAX_FRAME_LEN: usize = 8;

/// The bytes that follow the address byte in a single write transaction.
///
/// The 16-bit register addresses go out high byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteFrame {
    buffer: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl WriteFrame {
    /// Frame a register address for `device`, rejecting a mismatched width.
    pub fn for_register(
        device: Device,
        register: RegisterAddress,
    ) -> Result<Self, ConfigurationError> {
        if register.width() != device.width {
            return Err(ConfigurationError::RegisterWidthMismatch);
        }
        let mut frame = Self {
            buffer: [0u8; MAX_FRAME_LEN],
            len: 0,
        };
        match register {
            RegisterAddress::Eight(r) => frame.push(&[r])?,
            RegisterAddress::Sixteen(r) => frame.push(&r.to_be_bytes())?,
        }
        Ok(frame)
    }

    /// Frame a register address followed by a payload.
    pub fn with_payload(
        device: Device,
        register: RegisterAddress,
        payload: &[u8],
    ) -> Result<Self, ConfigurationError> {
        let mut frame = Self::for_register(device, register)?;
        frame.push(payload)?;
        Ok(frame)
    }

    fn push(&mut self, bytes: &[u8]) -> Result<(), ConfigurationError> {
        let end = self.len + bytes.len();
        let slot = self
            .buffer
            .get_mut(self.len..end)
            .ok_or(ConfigurationError::PayloadTooLong)?;
        slot.copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }
}

/// Internal wrapper around the 6 bytes read from the SHT3x, so that the
/// 4 data bytes may only be accessed after passing CRC verification.
pub(crate) struct Unvalidated([u8; 6]);

impl Unvalidated {
    pub(crate) fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Return the data bytes `[s0, s1, s3, s4]` if the CRC of each group is
    /// valid. Bytes `s2` and `s5` are the CRCs of the preceding pairs.
    pub(crate) fn try_get_bytes<I>(
        self,
        first_group_meaning: CrcFailureReason,
        second_group_meaning: CrcFailureReason,
    ) -> Result<[u8; 4], Error<I>>
    where
        I: embedded_hal::i2c::Error,
    {
        let [s0, s1, s2, s3, s4, s5] = self.0;
        if !check([s0, s1], s2, SHT3X_INITIAL) {
            warn!("CRC mismatch in {}", first_group_meaning);
            return Err(Error::CrcValidationFailed(first_group_meaning));
        }
        if !check([s3, s4], s5, SHT3X_INITIAL) {
            warn!("CRC mismatch in {}", second_group_meaning);
            return Err(Error::CrcValidationFailed(second_group_meaning));
        }
        Ok([s0, s1, s3, s4])
    }
}
