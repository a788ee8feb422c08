// Task-Modul: Enthält alle Embassy Tasks
//
// Tasks kommunizieren über einen PubSub Channel (Sensor-Poll → MQTT).

pub mod mqtt;
pub mod sensor_poll;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use mqtt::mqtt_task;
pub use sensor_poll::{sensor_poll_logic, sensor_poll_task};
pub use wifi::{connection_task, dhcp_task, net_task};
