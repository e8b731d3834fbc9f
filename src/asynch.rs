//! Async drivers built on `embedded_hal_async::i2c::I2c`.
//!
//! These mirror [`crate::blocking`] operation for operation.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::common::{
    Device, RegisterAddress, SHT3X_DEVICE, TSL2561_DEVICE, Unvalidated, WriteFrame,
};
use crate::error::{ConfigurationError, Error};
use crate::sht3x::{self, ClockStretching, Command, DeviceState, MeasurementMode, Measurement, Status};
use crate::tsl2561::{self, CHANNEL_REGISTERS, LightChannels, PowerState, Register};

pub struct RegisterBus<I: I2c> {
    i2c: I,
}

impl<I: I2c> RegisterBus<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I {
        self.i2c
    }

    pub async fn write_register(
        &mut self,
        device: Device,
        register: RegisterAddress,
        payload: &[u8],
    ) -> Result<(), Error<I::Error>> {
        let frame =
            WriteFrame::with_payload(device, register, payload).map_err(Error::InvalidConfiguration)?;
        trace!("write {} bytes to {}", frame.as_bytes().len(), device.address);
        self.i2c.write(device.address, frame.as_bytes()).await?;
        Ok(())
    }

    pub async fn send_command(&mut self, device: Device, command: u16) -> Result<(), Error<I::Error>> {
        trace!("command {} to {}", command, device.address);
        self.write_register(device, RegisterAddress::Sixteen(command), &[])
            .await
    }

    pub async fn read_register(
        &mut self,
        device: Device,
        register: RegisterAddress,
        buffer: &mut [u8],
    ) -> Result<(), Error<I::Error>> {
        if buffer.is_empty() {
            return Ok(());
        }
        let frame = WriteFrame::for_register(device, register).map_err(Error::InvalidConfiguration)?;
        trace!("read {} bytes from {}", buffer.len(), device.address);
        self.i2c
            .write_read(device.address, frame.as_bytes(), buffer)
            .await?;
        Ok(())
    }

    pub async fn read_register_array<const N: usize>(
        &mut self,
        device: Device,
        register: RegisterAddress,
    ) -> Result<[u8; N], Error<I::Error>> {
        let mut buffer = [0u8; N];
        self.read_register(device, register, &mut buffer).await?;
        Ok(buffer)
    }

    pub async fn read_byte(&mut self, device: Device, register: u8) -> Result<u8, Error<I::Error>> {
        let [byte] = self
            .read_register_array(device, RegisterAddress::Eight(register))
            .await?;
        Ok(byte)
    }

    pub async fn read<const N: usize>(&mut self, device: Device) -> Result<[u8; N], Error<I::Error>> {
        let mut buffer = [0u8; N];
        if N > 0 {
            self.i2c.read(device.address, &mut buffer).await?;
        }
        Ok(buffer)
    }
}

pub struct Sht3x<I: I2c> {
    bus: RegisterBus<I>,
    state: DeviceState,
    pub device: Device,
    pub config: sht3x::Config,
}

impl<I: I2c> Sht3x<I> {
    pub fn new(i2c: I, config: sht3x::Config) -> Self {
        Self::with_device(i2c, SHT3X_DEVICE, config)
    }

    pub fn with_device(i2c: I, device: Device, config: sht3x::Config) -> Self {
        Self {
            bus: RegisterBus::new(i2c),
            state: DeviceState::Uninitialized,
            device,
            config,
        }
    }

    pub fn release(self) -> I {
        self.bus.release()
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    async fn send(&mut self, command: Command) -> Result<(), Error<I::Error>> {
        self.bus.send_command(self.device, command.code()).await
    }

    pub async fn soft_reset(&mut self, mut delay: impl DelayNs) -> Result<(), Error<I::Error>> {
        self.send(Command::SoftReset).await?;
        self.state = DeviceState::Uninitialized;
        delay.delay_ms(self.config.timing.reset_ms).await;
        Ok(())
    }

    pub async fn start(&mut self, mut delay: impl DelayNs) -> Result<(), Error<I::Error>> {
        if let MeasurementMode::Periodic { .. } = self.config.mode {
            self.send(self.config.mode.command()).await?;
            self.state = DeviceState::Measuring;
            delay.delay_ms(self.config.timing.periodic_start_ms).await;
        }
        Ok(())
    }

    pub async fn stop_periodic(&mut self) -> Result<(), Error<I::Error>> {
        self.send(Command::Break).await?;
        self.state = DeviceState::Uninitialized;
        Ok(())
    }

    pub async fn read_raw(&mut self) -> Result<[u8; 6], Error<I::Error>> {
        if self.state != DeviceState::Measuring {
            return Err(Error::InvalidConfiguration(ConfigurationError::NotMeasuring));
        }
        self.bus
            .read_register_array(
                self.device,
                RegisterAddress::Sixteen(Command::PeriodicReadout.code()),
            )
            .await
    }

    pub async fn measure(&mut self, mut delay: impl DelayNs) -> Result<Measurement, Error<I::Error>> {
        let bytes = match self.config.mode {
            MeasurementMode::SingleShot {
                repeatability,
                clock_stretching,
            } => {
                self.send(self.config.mode.command()).await?;
                if clock_stretching == ClockStretching::Disabled {
                    delay
                        .delay_ms(self.config.timing.single_shot_ms(repeatability))
                        .await;
                }
                self.bus.read::<6>(self.device).await?
            }
            MeasurementMode::Periodic { .. } => self.read_raw().await?,
        };
        Measurement::from_read_bytes(Unvalidated::new(bytes))
    }

    pub async fn set_heater(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        if enabled {
            self.send(Command::HeaterEnable).await
        } else {
            self.send(Command::HeaterDisable).await
        }
    }

    pub async fn status(&mut self) -> Result<Status, Error<I::Error>> {
        let bytes = self
            .bus
            .read_register_array(
                self.device,
                RegisterAddress::Sixteen(Command::ReadStatus.code()),
            )
            .await?;
        Status::from_read_bytes(bytes)
    }

    pub async fn clear_status(&mut self) -> Result<(), Error<I::Error>> {
        self.send(Command::ClearStatus).await
    }
}

pub struct Tsl2561<I: I2c> {
    bus: RegisterBus<I>,
    pub device: Device,
    pub config: tsl2561::Config,
}

impl<I: I2c> Tsl2561<I> {
    pub fn new(i2c: I, config: tsl2561::Config) -> Self {
        Self::with_device(i2c, TSL2561_DEVICE, config)
    }

    pub fn with_device(i2c: I, device: Device, config: tsl2561::Config) -> Self {
        Self {
            bus: RegisterBus::new(i2c),
            device,
            config,
        }
    }

    pub fn release(self) -> I {
        self.bus.release()
    }

    async fn write(&mut self, register: Register, value: u8) -> Result<(), Error<I::Error>> {
        self.bus
            .write_register(self.device, RegisterAddress::Eight(register.address()), &[value])
            .await
    }

    pub async fn power_on(&mut self, mut delay: impl DelayNs) -> Result<(), Error<I::Error>> {
        self.write(Register::Control, PowerState::On as u8).await?;
        delay.delay_ms(self.config.power_on_delay_ms).await;
        Ok(())
    }

    pub async fn power_off(&mut self) -> Result<(), Error<I::Error>> {
        self.write(Register::Control, PowerState::Off as u8).await
    }

    pub async fn id(&mut self) -> Result<u8, Error<I::Error>> {
        self.bus.read_byte(self.device, Register::Id.address()).await
    }

    pub async fn configure_timing(&mut self) -> Result<(), Error<I::Error>> {
        let value = tsl2561::timing_byte(self.config.gain, self.config.integration_time);
        self.write(Register::Timing, value).await
    }

    pub async fn read_channels(&mut self) -> Result<LightChannels, Error<I::Error>> {
        let mut bytes = [0u8; 4];
        for (byte, register) in bytes.iter_mut().zip(CHANNEL_REGISTERS) {
            *byte = self.bus.read_byte(self.device, register.address()).await?;
        }
        Ok(LightChannels::from_register_bytes(bytes))
    }

    pub fn exceeds_threshold(&self, channels: &LightChannels) -> bool {
        channels.exceeds(self.config.wake_threshold)
    }
}
