//! Sensor-Poll-Controller
//!
//! Synchroner Zustandsautomat: einmalige Power-Up-Sequenz, danach endlos
//! "begin sequential read" + 8 Einzelbyte-Reads. Pro Tick wird genau ein
//! Übergang ausgewertet, Reset hat immer Vorrang.

use crate::device::{CMD_POWER_ON, CMD_READ_COLOR, CMD_SELECT_CONTROL, LAST_SLOT, READ_BUFFER_LEN};
use crate::edge::{BusyEdge, BusySample};
use crate::types::{
    ChannelReading, ControllerState, Direction, EngineStatus, ReadBuffer, TransactionRequest,
};

/// Konfiguration des Controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerConfig {
    /// Watchdog: nach so vielen Ticks im selben Zustand wird neu gestartet.
    /// `None` = wartet unbegrenzt auf die Engine.
    pub stall_limit: Option<u32>,
}

/// Folgezustand aus aktuellem Zustand, Busy-Sample und Buffer-Index
///
/// Reine Funktion ohne Seiteneffekte; Byte-Capture und Index-Update
/// passieren in [`SensorPollController::tick`].
pub fn next_state(state: ControllerState, busy: BusySample, index: usize) -> ControllerState {
    use ControllerState::*;

    match state {
        Startup if busy.idle() => SendPowerCommand,
        SendPowerCommand if busy.rising => TurnPowerOn,
        TurnPowerOn if busy.rising => WaitBeforeReading,
        WaitBeforeReading if busy.idle() => SendReadCommand,
        SendReadCommand if busy.rising => StartRead,
        StartRead if busy.rising && index >= LAST_SLOT => FinishReadAndRestart,
        StartRead if busy.rising => FinishReadAndContinue,
        FinishReadAndContinue if busy.idle() => StartRead,
        FinishReadAndRestart if busy.idle() => WaitBeforeReading,
        unchanged => unchanged,
    }
}

#[derive(Debug, Clone)]
pub struct SensorPollController {
    config: ControllerConfig,
    state: ControllerState,
    busy: BusyEdge,
    request: TransactionRequest,
    buffer: ReadBuffer,
    index: usize,
    /// Ticks seit dem letzten Zustandswechsel (für den Watchdog)
    ticks_in_state: u32,
    completed_cycles: u32,
    watchdog_restarts: u32,
}

impl SensorPollController {
    pub const fn new() -> Self {
        Self::with_config(ControllerConfig { stall_limit: None })
    }

    pub const fn with_config(config: ControllerConfig) -> Self {
        Self {
            config,
            state: ControllerState::Startup,
            busy: BusyEdge::new(),
            request: TransactionRequest::idle(),
            buffer: [0; READ_BUFFER_LEN],
            index: 0,
            ticks_in_state: 0,
            completed_cycles: 0,
            watchdog_restarts: 0,
        }
    }

    /// Ein Takt: Reset prüfen, Aktionen des Zustands, Übergang auswerten
    ///
    /// `status` sind die Engine-Ausgänge vom vorherigen Takt. Zurückgegeben
    /// wird der Request, den die Engine im nächsten Takt sieht.
    pub fn tick(&mut self, status: EngineStatus, reset: bool) -> TransactionRequest {
        // Sampling läuft auch während Reset weiter (eigenes Register)
        let busy = self.busy.sample(status.busy);

        if reset {
            self.reset();
            return self.request;
        }

        self.apply_state_outputs();

        let next = next_state(self.state, busy, self.index);
        if next != self.state {
            // Capture im selben Tick, in dem "not busy" gesehen wird
            match self.state {
                ControllerState::FinishReadAndContinue => {
                    self.buffer[self.index] = status.read_byte;
                    self.index += 1;
                }
                ControllerState::FinishReadAndRestart => {
                    self.buffer[self.index] = status.read_byte;
                    self.completed_cycles = self.completed_cycles.wrapping_add(1);
                }
                _ => {}
            }
            self.state = next;
            self.ticks_in_state = 0;
        } else {
            self.ticks_in_state = self.ticks_in_state.saturating_add(1);
            if let Some(limit) = self.config.stall_limit {
                if self.ticks_in_state >= limit {
                    self.watchdog_restarts = self.watchdog_restarts.wrapping_add(1);
                    self.reset();
                }
            }
        }

        self.request
    }

    /// Setzt den Ausgangs-Request entsprechend dem aktuellen Zustand
    fn apply_state_outputs(&mut self) {
        match self.state {
            ControllerState::Startup => {}
            ControllerState::SendPowerCommand => {
                self.request.activate = true;
                self.request.direction = Direction::Write;
                self.request.payload = CMD_SELECT_CONTROL;
            }
            ControllerState::TurnPowerOn => {
                self.request.payload = CMD_POWER_ON;
            }
            ControllerState::WaitBeforeReading => {
                self.request.activate = false;
                self.index = 0;
            }
            ControllerState::SendReadCommand => {
                self.request.activate = true;
                self.request.direction = Direction::Write;
                self.request.payload = CMD_READ_COLOR;
                self.index = 0;
            }
            ControllerState::StartRead => {
                self.request.direction = Direction::Read;
            }
            ControllerState::FinishReadAndContinue => {}
            ControllerState::FinishReadAndRestart => {
                self.request.activate = false;
            }
        }
    }

    /// Asynchroner Reset: zurück auf STARTUP, laufende Transaktion wird verworfen
    ///
    /// Buffer wird auf den Einschaltwert (0) zurückgesetzt. Zähler bleiben
    /// erhalten, das Busy-Sampling ebenfalls.
    pub fn reset(&mut self) {
        self.state = ControllerState::Startup;
        self.request = TransactionRequest::idle();
        self.buffer = [0; READ_BUFFER_LEN];
        self.index = 0;
        self.ticks_in_state = 0;
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Request, den der Controller aktuell an die Engine anlegt
    pub fn request(&self) -> TransactionRequest {
        self.request
    }

    pub fn buffer(&self) -> &ReadBuffer {
        &self.buffer
    }

    pub fn buffer_index(&self) -> usize {
        self.index
    }

    /// Kanalwerte, immer aus dem aktuellen Buffer berechnet
    pub fn channels(&self) -> ChannelReading {
        ChannelReading::from_buffer(&self.buffer)
    }

    /// Anzahl vollständig abgeschlossener Lese-Zyklen seit Start
    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn watchdog_restarts(&self) -> u32 {
        self.watchdog_restarts
    }
}

impl Default for SensorPollController {
    fn default() -> Self {
        Self::new()
    }
}
