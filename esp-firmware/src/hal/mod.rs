// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul kapselt Hardware-Zugriffe (I²C-Bus, Reset-Taster),
// damit die Poll-Logik ohne Peripherals auskommt.

pub mod reset_button;
pub mod sensor_bus;

pub use reset_button::ResetInput;
pub use sensor_bus::{SensorBusEngine, init_sensor_bus};

#[cfg(not(test))]
pub use reset_button::ResetButton;

#[cfg(test)]
pub use reset_button::MockResetInput;
