// Sensor Poll Task - Taktet Poll-Controller und I²C-Engine
use defmt::{Debug2Format, error, info, warn};
use embassy_futures::yield_now;
use embassy_time::{Duration, Timer};
use embedded_hal::i2c::I2c;
use esp_core::BusEngine;

use crate::config::{LOG_EVERY_CYCLES, TICK_BATCH_PAUSE_US, TICKS_PER_YIELD};
use crate::hal::{ResetButton, ResetInput, init_sensor_bus};
use crate::{I2cBusEngine, PollSystem, ReportPublisher, SensorReport, controller_config};

/// Beobachtet das Poll-System zwischen zwei Ticks und loggt Ereignisse
#[derive(Debug, Default)]
struct PollMonitor {
    reset_held: bool,
    watchdog_restarts: u32,
}

impl PollMonitor {
    /// Ein Tick mit Logging; gibt bei fertigem Lese-Zyklus den Messwert zurück
    fn step<E: BusEngine>(
        &mut self,
        system: &mut PollSystem<E>,
        reset: bool,
    ) -> Option<SensorReport> {
        if reset && !self.reset_held {
            warn!("Sensor: Reset pressed, restarting power-up");
        }
        self.reset_held = reset;

        let before = system.state();
        let completed = system.step(reset);

        if before.is_power_up() && !system.state().is_power_up() {
            info!("Sensor: Power-up complete");
        }

        let restarts = system.controller().watchdog_restarts();
        if restarts != self.watchdog_restarts {
            self.watchdog_restarts = restarts;
            warn!(
                "Sensor: Watchdog restart #{}, controller was stuck in {}",
                restarts, before
            );
        }

        if !completed {
            return None;
        }

        let report = SensorReport {
            reading: system.channels(),
            cycle: system.controller().completed_cycles(),
        };
        if report.cycle % LOG_EVERY_CYCLES == 1 {
            info!("Sensor: Cycle {} -> {}", report.cycle, report.reading);
        }
        Some(report)
    }
}

/// Sensor Poll Logic - Testbare Logik ohne Peripherals
///
/// Taktet das Poll-System in Durchläufen von `TICKS_PER_YIELD` Ticks und
/// gibt danach die CPU an WiFi/MQTT ab. Jeder fertige Lese-Zyklus wird
/// über den Publisher verteilt.
///
/// Bus-Fehler erreichen den Controller nie, sie werden nur pro Durchlauf
/// geloggt (höchstens einer).
///
/// # Parameter
/// - `system`: Controller + I²C-Engine (Hardware oder Fake-Treiber)
/// - `reset`: Reset-Eingang, einmal pro Tick abgefragt
/// - `publisher`: PubSub Publisher für Messwerte
pub async fn sensor_poll_logic<I: I2c, R: ResetInput>(
    mut system: PollSystem<I2cBusEngine<I>>,
    mut reset: R,
    publisher: ReportPublisher,
) -> ! {
    let mut monitor = PollMonitor::default();

    loop {
        for _ in 0..TICKS_PER_YIELD {
            let asserted = reset.is_asserted();
            if let Some(report) = monitor.step(&mut system, asserted) {
                publisher.publish_immediate(report);
            }
        }

        let engine = system.engine_mut();
        if let Some(bus_error) = engine.take_error() {
            warn!(
                "Sensor: I2C error: {} ({} total)",
                bus_error,
                engine.error_count()
            );
        }

        if TICK_BATCH_PAUSE_US > 0 {
            Timer::after(Duration::from_micros(TICK_BATCH_PAUSE_US)).await;
        } else {
            yield_now().await;
        }
    }
}

/// Sensor Poll Task - Embassy Task für parallele Ausführung
///
/// Übernimmt die Hardware-Initialisierung (I2C0, Reset-Taster) und ruft
/// dann `sensor_poll_logic()` auf.
///
/// # Parameter
/// - `i2c0`: I²C Peripheral
/// - `sda` / `scl`: GPIO6 / GPIO7
/// - `reset_pin`: GPIO9 (BOOT-Taster, aktiv low)
/// - `publisher`: PubSub Publisher für Messwerte
#[embassy_executor::task]
pub async fn sensor_poll_task(
    i2c0: esp_hal::peripherals::I2C0<'static>,
    sda: esp_hal::peripherals::GPIO6<'static>,
    scl: esp_hal::peripherals::GPIO7<'static>,
    reset_pin: esp_hal::peripherals::GPIO9<'static>,
    publisher: ReportPublisher,
) {
    let engine = match init_sensor_bus(i2c0, sda, scl) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Sensor: I2C configuration rejected: {}", Debug2Format(&e));
            return;
        }
    };
    info!("Sensor: I2C ready, starting poll controller");

    let system = PollSystem::with_config(engine, controller_config());
    let reset = ResetButton::new(reset_pin);

    sensor_poll_logic(system, reset, publisher).await
}
