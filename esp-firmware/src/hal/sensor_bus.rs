// Sensor-Bus: I²C Peripheral für den Farbsensor
//
// Baut den esp-hal I²C Treiber auf und hängt ihn hinter den
// I2cBusEngine-Adapter aus esp-core.

use esp_hal::Blocking;
use esp_hal::i2c::master::{Config, ConfigError, I2c};
use esp_hal::peripherals::{GPIO6, GPIO7, I2C0};
use esp_hal::time::Rate;

use crate::I2cBusEngine;
use crate::config::I2C_FREQUENCY_KHZ;

/// Bus-Engine über dem blockierenden esp-hal I²C Treiber
pub type SensorBusEngine = I2cBusEngine<I2c<'static, Blocking>>;

/// Initialisiert I2C0 auf SDA = GPIO6, SCL = GPIO7
///
/// # Fehlerbehandlung
/// Gibt `ConfigError` zurück, wenn die Taktfrequenz nicht einstellbar ist.
pub fn init_sensor_bus(
    i2c0: I2C0<'static>,
    sda: GPIO6<'static>,
    scl: GPIO7<'static>,
) -> Result<SensorBusEngine, ConfigError> {
    let config = Config::default().with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ));
    let i2c = I2c::new(i2c0, config)?.with_sda(sda).with_scl(scl);
    Ok(I2cBusEngine::new(i2c))
}
