//! Kopplung von Poll-Controller und Bus-Engine
//!
//! Beide Seiten werten pro Tick genau einmal aus und sehen dabei jeweils die
//! Ausgänge der anderen Seite vom vorherigen Tick (synchrones Register-Modell).

use crate::controller::{ControllerConfig, SensorPollController};
use crate::traits::BusEngine;
use crate::types::{ChannelReading, ControllerState};

pub struct PollSystem<E: BusEngine> {
    controller: SensorPollController,
    engine: E,
    cycle_completed: bool,
}

impl<E: BusEngine> PollSystem<E> {
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, ControllerConfig::default())
    }

    pub fn with_config(engine: E, config: ControllerConfig) -> Self {
        Self {
            controller: SensorPollController::with_config(config),
            engine,
            cycle_completed: false,
        }
    }

    /// Ein synchroner Takt für Controller und Engine
    ///
    /// Gibt `true` zurück, wenn in diesem Takt ein Lese-Zyklus fertig wurde.
    pub fn step(&mut self, reset: bool) -> bool {
        let status = self.engine.status();
        let request = self.controller.request();
        let cycles_before = self.controller.completed_cycles();

        self.controller.tick(status, reset);
        self.engine.tick(request);

        self.cycle_completed = self.controller.completed_cycles() != cycles_before;
        self.cycle_completed
    }

    /// Läuft bis `cycles` weitere Lese-Zyklen abgeschlossen sind
    ///
    /// Bricht nach `max_ticks` ab und gibt dann `false` zurück.
    pub fn run_cycles(&mut self, cycles: u32, max_ticks: u64) -> bool {
        let mut remaining = cycles;
        let mut budget = max_ticks;
        while remaining > 0 {
            if budget == 0 {
                return false;
            }
            budget -= 1;
            if self.step(false) {
                remaining -= 1;
            }
        }
        true
    }

    pub fn cycle_completed(&self) -> bool {
        self.cycle_completed
    }

    pub fn channels(&self) -> ChannelReading {
        self.controller.channels()
    }

    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn controller(&self) -> &SensorPollController {
        &self.controller
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Gibt die Engine frei (z.B. um den I²C-Treiber zurückzubekommen)
    pub fn into_engine(self) -> E {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimConfig, SimulatedEngine, SimulatedSensor};

    #[test]
    fn test_first_cycle_completes_with_simulated_sensor() {
        let reading = ChannelReading {
            clear: 1200,
            red: 400,
            green: 500,
            blue: 300,
        };
        let engine = SimulatedEngine::with_config(
            SimulatedSensor::with_reading(reading),
            SimConfig { byte_ticks: 4 },
        );
        let mut system = PollSystem::new(engine);
        assert!(system.run_cycles(1, 1_000));
        assert_eq!(system.channels(), reading);
        assert_eq!(system.state(), ControllerState::WaitBeforeReading);
    }
}
