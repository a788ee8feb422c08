//! Core Types für den Sensor-Poll-Controller
//!
//! Datenstrukturen ohne Hardware-Dependencies

use crate::device::{CMD_SELECT_CONTROL, DEVICE_ADDRESS, READ_BUFFER_LEN};

/// Richtung einer Bus-Transaktion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Write,
    Read,
}

/// Request vom Controller an die Bus-Engine
///
/// Wird jeden Tick neu erzeugt. `payload` ist nur bei `Direction::Write` relevant,
/// `address` ist immer [`DEVICE_ADDRESS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRequest {
    pub activate: bool,
    pub address: u8,
    pub direction: Direction,
    pub payload: u8,
}

impl TransactionRequest {
    /// Ruhezustand nach Reset: Engine nicht aktiviert
    pub const fn idle() -> Self {
        Self {
            activate: false,
            address: DEVICE_ADDRESS,
            direction: Direction::Write,
            payload: CMD_SELECT_CONTROL,
        }
    }
}

impl Default for TransactionRequest {
    fn default() -> Self {
        Self::idle()
    }
}

/// Ausgänge der Bus-Engine, aus Sicht des Controllers read-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStatus {
    /// Transfer läuft oder Bus ist belegt
    pub busy: bool,
    /// Zuletzt gelesenes Byte (gültig sobald `busy` nach einem Read fällt)
    pub read_byte: u8,
}

/// Zustände des Poll-Controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Startup,
    SendPowerCommand,
    TurnPowerOn,
    WaitBeforeReading,
    SendReadCommand,
    StartRead,
    FinishReadAndContinue,
    FinishReadAndRestart,
}

impl ControllerState {
    pub fn as_str(self) -> &'static str {
        match self {
            ControllerState::Startup => "STARTUP",
            ControllerState::SendPowerCommand => "SEND_POWER_COMMAND",
            ControllerState::TurnPowerOn => "TURN_POWER_ON",
            ControllerState::WaitBeforeReading => "WAIT_BEFORE_READING",
            ControllerState::SendReadCommand => "SEND_READ_COMMAND",
            ControllerState::StartRead => "START_READ",
            ControllerState::FinishReadAndContinue => "FINISH_READ_AND_CONTINUE",
            ControllerState::FinishReadAndRestart => "FINISH_READ_AND_RESTART",
        }
    }

    /// Gehört der Zustand zur einmaligen Power-Up-Sequenz?
    pub fn is_power_up(self) -> bool {
        matches!(
            self,
            ControllerState::Startup
                | ControllerState::SendPowerCommand
                | ControllerState::TurnPowerOn
        )
    }
}

/// Der 8-Byte Lese-Buffer
pub type ReadBuffer = [u8; READ_BUFFER_LEN];

/// Vier 16-Bit Kanalwerte des Sensors
///
/// Reine Projektion des Lese-Buffers, siehe [`ChannelReading::from_buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelReading {
    pub clear: u16,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Direction {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Direction::Write => defmt::write!(fmt, "W"),
            Direction::Read => defmt::write!(fmt, "R"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransactionRequest {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Request {{ ena: {}, addr: {=u8:#04x}, dir: {}, data: {=u8:#04x} }}",
            self.activate,
            self.address,
            self.direction,
            self.payload
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ControllerState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChannelReading {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "C: {} R: {} G: {} B: {}",
            self.clear,
            self.red,
            self.green,
            self.blue
        )
    }
}
