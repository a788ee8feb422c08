//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert den Poll-Controller für den Farbsensor, den Vertrag zur
//! Bus-Engine und eine Simulation für Tests.

#![no_std]

pub mod controller;
pub mod device;
pub mod edge;
pub mod i2c_engine;
pub mod logic;
pub mod sim;
pub mod system;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use controller::{ControllerConfig, SensorPollController, next_state};
pub use edge::{BusyEdge, BusySample};
pub use i2c_engine::I2cBusEngine;
pub use logic::channel_word;
pub use sim::{SimConfig, SimulatedEngine, SimulatedSensor};
pub use system::PollSystem;
pub use traits::{BusDevice, BusEngine, BusError};
pub use types::{
    ChannelReading, ControllerState, Direction, EngineStatus, ReadBuffer, TransactionRequest,
};
