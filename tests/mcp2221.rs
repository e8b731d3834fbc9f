//! Smoke test against real sensors wired to an MCP2221 USB-I2C bridge.
//!
//! Run with `cargo test -- --ignored` with both sensors on the bridge's bus.
use embedded_hal_mock::eh1::delay::StdSleep;
use mcp2221_hal::MCP2221;
use sht3x_tsl2561::blocking::{Sht3x, Tsl2561};

#[test]
#[ignore = "needs an MCP2221 with an SHT3x and a TSL2561 attached"]
fn mcp() -> anyhow::Result<()> {
    let mut dev = MCP2221::connect().map_err(|e| anyhow::anyhow!("{e:?}"))?;

    {
        let mut light = Tsl2561::new(&mut dev, Default::default());
        light
            .power_on(StdSleep::new())
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        println!("TSL2561 ID: {:#04x}", light.id().map_err(|e| anyhow::anyhow!("{e}"))?);
        let channels = light.read_channels().map_err(|e| anyhow::anyhow!("{e}"))?;
        println!(
            "visible light = {}, infrared light = {}",
            channels.visible, channels.infrared
        );
    }

    let mut climate = Sht3x::new(&mut dev, Default::default());
    climate
        .soft_reset(StdSleep::new())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    climate
        .start(StdSleep::new())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let measurement = climate
        .measure(StdSleep::new())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    println!(
        "{}°C\t{} %RH",
        measurement.celsius(),
        measurement.humidity()
    );

    Ok(())
}
