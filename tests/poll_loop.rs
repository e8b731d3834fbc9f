//! A polling loop over a mocked bus: failed cycles are dropped and the loop
//! carries on with the next one.
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
use sht3x_tsl2561::blocking::Sht3x;
use sht3x_tsl2561::sht3x::decode;
use sht3x_tsl2561::{CrcFailureReason, Error};

const SHT: u8 = 0x44;
const READOUT: [u8; 2] = [0xE0, 0x00];

#[test]
fn poll_loop_survives_bad_cycles() {
    let good = vec![0x64, 0x8B, 0xC7, 0x5C, 0xA8, 0x97];
    let mut corrupt = good.clone();
    corrupt[4] ^= 0x01;

    let expectations = [
        Transaction::write(SHT, vec![0x22, 0x20]),
        Transaction::write_read(SHT, READOUT.to_vec(), good.clone()),
        Transaction::write_read(SHT, READOUT.to_vec(), corrupt),
        Transaction::write_read(SHT, READOUT.to_vec(), vec![0; 6]).with_error(ErrorKind::Bus),
        Transaction::write_read(SHT, READOUT.to_vec(), good),
    ];
    let mut sensor = Sht3x::new(I2cMock::new(&expectations), Default::default());
    sensor.start(NoopDelay::new()).unwrap();

    let mut readings = Vec::new();
    let mut failures = Vec::new();
    for _ in 0..4 {
        match sensor.measure(NoopDelay::new()) {
            Ok(measurement) => readings.push(measurement.celsius()),
            Err(e) => failures.push(e),
        }
    }

    assert_eq!(readings.len(), 2);
    assert!(matches!(
        failures[0],
        Error::CrcValidationFailed(CrcFailureReason::HumidityBytes)
    ));
    assert!(matches!(failures[1], Error::I2c(ErrorKind::Bus)));

    sensor.release().done();
}

#[test]
fn decode_reports_failure_with_zeroed_outputs() {
    let outcome = decode([0x12, 0x34, 0x00, 0x56, 0x78, 0x00]);
    assert!(!outcome.valid);
    assert_eq!((outcome.temperature, outcome.humidity), (0.0, 0.0));

    let outcome = decode([0x00, 0x00, 0x81, 0x00, 0x00, 0x81]);
    assert!(outcome.valid);
    assert_eq!((outcome.temperature, outcome.humidity), (-45.0, 0.0));
}
