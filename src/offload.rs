//! Hand-off between the main processor and a low-power coprocessor.
//!
//! While the main processor sleeps, the coprocessor polls the light sensor,
//! publishes both channel counts into a small shared slot and wakes the
//! main processor when the visible channel crosses a threshold. The slot is
//! the only state the two sides share.
//!
//! The main processor never reads the slot while the coprocessor may be
//! writing it. [`Handoff::suspend`] halts the coprocessor, takes a single
//! snapshot of the slot, and the returned guard resumes the coprocessor
//! when dropped. The bus may be used by the main processor for as long as
//! the guard is alive.

use crate::tsl2561::LightChannels;

/// The data published by the coprocessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C)]
pub struct SharedReadings {
    pub visible: u32,
    pub infrared: u32,
}

impl From<LightChannels> for SharedReadings {
    fn from(channels: LightChannels) -> Self {
        Self {
            visible: channels.visible.into(),
            infrared: channels.infrared.into(),
        }
    }
}

/// Control over the coprocessor, as seen from the main processor.
pub trait Coprocessor {
    /// Stop the coprocessor and its wake-up timer.
    fn halt(&mut self);

    /// Restart the wake-up timer so the coprocessor runs again.
    fn resume(&mut self);

    /// Read the shared slot. Only called between `halt` and `resume`.
    fn shared(&self) -> SharedReadings;
}

pub struct Handoff<C: Coprocessor> {
    coprocessor: C,
}

impl<C: Coprocessor> Handoff<C> {
    pub fn new(coprocessor: C) -> Self {
        Self { coprocessor }
    }

    pub fn release(self) -> C {
        self.coprocessor
    }

    /// Halt the coprocessor and snapshot the shared slot.
    pub fn suspend(&mut self) -> Suspended<'_, C> {
        trace!("halting coprocessor");
        self.coprocessor.halt();
        let readings = self.coprocessor.shared();
        Suspended {
            coprocessor: &mut self.coprocessor,
            readings,
        }
    }

    /// Suspend, read and resume in one step.
    pub fn collect(&mut self) -> SharedReadings {
        self.suspend().readings()
    }
}

/// Proof that the coprocessor is halted. Resumes it on drop.
pub struct Suspended<'a, C: Coprocessor> {
    coprocessor: &'a mut C,
    readings: SharedReadings,
}

impl<C: Coprocessor> Suspended<'_, C> {
    /// The slot as it was when the coprocessor was halted.
    pub fn readings(&self) -> SharedReadings {
        self.readings
    }
}

impl<C: Coprocessor> Drop for Suspended<'_, C> {
    fn drop(&mut self) {
        trace!("resuming coprocessor");
        self.coprocessor.resume();
    }
}

/// What the coprocessor should do at the end of a polling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeDecision {
    Wake,
    Sleep,
}

/// One polling cycle on the coprocessor side.
///
/// Reads both channels, publishes them into `slot` and decides whether the
/// main processor should be woken. On a bus error the slot is left as it
/// was.
#[cfg(feature = "blocking")]
pub fn offload_cycle<I>(
    sensor: &mut crate::blocking::Tsl2561<I>,
    slot: &mut SharedReadings,
) -> Result<WakeDecision, crate::error::Error<I::Error>>
where
    I: embedded_hal::i2c::I2c,
{
    let channels = sensor.read_channels()?;
    *slot = channels.into();
    if sensor.exceeds_threshold(&channels) {
        Ok(WakeDecision::Wake)
    } else {
        Ok(WakeDecision::Sleep)
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use core::cell::RefCell;
    use std::vec;
    use std::vec::Vec;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Halt,
        Read,
        Resume,
    }

    struct FakeCoprocessor {
        halted: bool,
        slot: SharedReadings,
        events: RefCell<Vec<Event>>,
    }

    impl FakeCoprocessor {
        fn new(slot: SharedReadings) -> Self {
            Self {
                halted: false,
                slot,
                events: RefCell::new(Vec::new()),
            }
        }
    }

    impl Coprocessor for FakeCoprocessor {
        fn halt(&mut self) {
            self.halted = true;
            self.events.borrow_mut().push(Event::Halt);
        }

        fn resume(&mut self) {
            self.halted = false;
            self.events.borrow_mut().push(Event::Resume);
        }

        fn shared(&self) -> SharedReadings {
            assert!(self.halted, "shared slot read while coprocessor running");
            self.events.borrow_mut().push(Event::Read);
            self.slot
        }
    }

    const SLOT: SharedReadings = SharedReadings {
        visible: 1_024,
        infrared: 300,
    };

    #[test]
    fn collect_halts_reads_and_resumes() {
        let mut handoff = Handoff::new(FakeCoprocessor::new(SLOT));
        assert_eq!(handoff.collect(), SLOT);

        let coprocessor = handoff.release();
        assert!(!coprocessor.halted);
        assert_eq!(
            coprocessor.events.into_inner(),
            vec![Event::Halt, Event::Read, Event::Resume]
        );
    }

    #[test]
    fn coprocessor_stays_halted_while_guard_lives() {
        let mut handoff = Handoff::new(FakeCoprocessor::new(SLOT));
        {
            let suspended = handoff.suspend();
            assert_eq!(suspended.readings().visible, 1_024);
            assert!(suspended.coprocessor.halted);
        }
        assert!(!handoff.release().halted);
    }

    #[test]
    fn readings_widen_channel_counts() {
        let channels = LightChannels {
            visible: u16::MAX,
            infrared: 7,
        };
        let readings = SharedReadings::from(channels);
        assert_eq!(readings.visible, 65_535);
        assert_eq!(readings.infrared, 7);
    }

    #[cfg(feature = "blocking")]
    mod cycle {
        extern crate std;
        use std::vec;

        use super::super::*;
        use crate::blocking::Tsl2561;
        use crate::error::Error;
        use crate::tsl2561::Config;
        use embedded_hal::i2c::ErrorKind;
        use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};

        const TSL: u8 = 0x39;

        fn channel_reads(bytes: [u8; 4]) -> [Transaction; 4] {
            [
                Transaction::write_read(TSL, vec![0x8C], vec![bytes[0]]),
                Transaction::write_read(TSL, vec![0x8D], vec![bytes[1]]),
                Transaction::write_read(TSL, vec![0x8E], vec![bytes[2]]),
                Transaction::write_read(TSL, vec![0x8F], vec![bytes[3]]),
            ]
        }

        #[test]
        fn bright_light_wakes_main_processor() {
            // visible = 0x0321 = 801, one above the default threshold
            let expectations = channel_reads([0x21, 0x03, 0x10, 0x00]);
            let mut sensor = Tsl2561::new(I2cMock::new(&expectations), Config::default());
            let mut slot = SharedReadings::default();

            let decision = offload_cycle(&mut sensor, &mut slot).unwrap();
            assert_eq!(decision, WakeDecision::Wake);
            assert_eq!(slot, SharedReadings { visible: 801, infrared: 16 });

            sensor.release().done();
        }

        #[test]
        fn threshold_itself_does_not_wake() {
            // visible = 0x0320 = 800
            let expectations = channel_reads([0x20, 0x03, 0x00, 0x00]);
            let mut sensor = Tsl2561::new(I2cMock::new(&expectations), Config::default());
            let mut slot = SharedReadings::default();

            assert_eq!(offload_cycle(&mut sensor, &mut slot).unwrap(), WakeDecision::Sleep);
            assert_eq!(slot.visible, 800);

            sensor.release().done();
        }

        #[test]
        fn bus_error_leaves_slot_untouched() {
            let expectations =
                [Transaction::write_read(TSL, vec![0x8C], vec![0x00]).with_error(ErrorKind::Bus)];
            let mut sensor = Tsl2561::new(I2cMock::new(&expectations), Config::default());
            let previous = SharedReadings {
                visible: 5,
                infrared: 6,
            };
            let mut slot = previous;

            let result = offload_cycle(&mut sensor, &mut slot);
            assert!(matches!(result, Err(Error::I2c(ErrorKind::Bus))));
            assert_eq!(slot, previous);

            sensor.release().done();
        }
    }
}
