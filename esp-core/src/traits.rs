//! Hardware Abstraction Traits
//!
//! Diese Traits definieren den Vertrag zwischen Poll-Controller und Bus-Engine
//! ohne konkrete Implementierung.

use crate::types::{EngineStatus, TransactionRequest};

/// Fehler-Typ für Bus-Operationen
///
/// Der Controller sieht diese Fehler nie, sie dienen nur dem Logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Adresse oder Daten-Byte nicht bestätigt
    Nack,
    ArbitrationLoss,
    /// Fehler auf den Leitungen (z.B. fehlende Pull-Ups)
    Bus,
    Overrun,
    Other,
}

impl From<embedded_hal::i2c::ErrorKind> for BusError {
    fn from(kind: embedded_hal::i2c::ErrorKind) -> Self {
        use embedded_hal::i2c::ErrorKind;
        match kind {
            ErrorKind::NoAcknowledge(_) => BusError::Nack,
            ErrorKind::ArbitrationLoss => BusError::ArbitrationLoss,
            ErrorKind::Bus => BusError::Bus,
            ErrorKind::Overrun => BusError::Overrun,
            _ => BusError::Other,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BusError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            BusError::Nack => defmt::write!(fmt, "NACK"),
            BusError::ArbitrationLoss => defmt::write!(fmt, "arbitration lost"),
            BusError::Bus => defmt::write!(fmt, "bus error"),
            BusError::Overrun => defmt::write!(fmt, "overrun"),
            BusError::Other => defmt::write!(fmt, "other"),
        }
    }
}

/// Trait für die Bus-Transaktions-Engine
///
/// Führt pro Aktivierung einen adressierten Byte-Transfer aus und meldet
/// Fertigstellung über das Busy-Flag.
///
/// # Implementierungen
/// - **Simulation:** `SimulatedEngine` (tick-genaues Verhalten + Register-Modell)
/// - **Hardware:** `I2cBusEngine` (über jeden `embedded_hal::i2c::I2c` Treiber)
/// - **Testing:** Mocks in esp-tests
pub trait BusEngine {
    /// Aktuelle Ausgänge (Busy-Flag und zuletzt gelesenes Byte)
    fn status(&self) -> EngineStatus;

    /// Einen Takt weiterschalten mit den Eingängen vom vorherigen Takt
    fn tick(&mut self, request: TransactionRequest);
}

/// Trait für ein Gerät am simulierten Bus
///
/// Die Engine ruft `start()` bei jeder (Repeated-)Start-Bedingung auf,
/// danach pro Byte `write()` oder `read()`, und `stop()` am Ende.
pub trait BusDevice {
    /// Gerät antwortet auf diese Adresse
    fn address(&self) -> u8;

    fn start(&mut self);

    fn write(&mut self, byte: u8);

    fn read(&mut self) -> u8;

    fn stop(&mut self);
}
