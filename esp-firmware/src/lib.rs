// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod telemetry;

// Re-exports von esp-core
pub use esp_core::{
    BusError, ChannelReading, ControllerConfig, ControllerState, I2cBusEngine, PollSystem,
};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};

use crate::config::WATCHDOG_STALL_TICKS;

// ============================================================================
// Firmware-spezifische Typen
// ============================================================================

/// Ein fertiger Lese-Zyklus, wie er an die Verbraucher geht
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct SensorReport {
    pub reading: ChannelReading,
    /// Laufende Nummer des Zyklus seit dem Start (zählt über Resets hinweg)
    pub cycle: u32,
}

/// Controller-Konfiguration der Firmware (Watchdog aktiv)
pub fn controller_config() -> ControllerConfig {
    ControllerConfig {
        stall_limit: Some(WATCHDOG_STALL_TICKS),
    }
}

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Statt:  Publisher<'static, NoopRawMutex, SensorReport, 2, 2, 1>
// Nutze:  ReportPublisher

/// PubSubChannel für Messwert-Broadcasts
/// - 2: Nachrichten-Kapazität im Queue
/// - 2: Maximale Anzahl Subscribers (MQTT + Reserve)
/// - 1: Publisher (Sensor-Poll Task)
pub type ReportChannel = PubSubChannel<NoopRawMutex, SensorReport, 2, 2, 1>;

/// Publisher für Messwert-Broadcasts
pub type ReportPublisher = Publisher<'static, NoopRawMutex, SensorReport, 2, 2, 1>;

/// Subscriber für Messwert-Broadcasts
pub type ReportSubscriber = Subscriber<'static, NoopRawMutex, SensorReport, 2, 2, 1>;
