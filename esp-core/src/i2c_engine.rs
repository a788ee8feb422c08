//! Bus-Engine über einen transaktionsbasierten I²C-Treiber
//!
//! HALs bieten kein Byte-für-Byte Interface mit Busy-Flag, sondern ganze
//! Transaktionen (`write`, `read`, `write_read`). Dieser Adapter sammelt die
//! Bytes einer Session und bildet sie auf solche Transaktionen ab:
//!
//! - Write-Bytes werden gepuffert und am Session-Ende als ein `write` gesendet
//! - Das erste Read einer Session wird mit den gepufferten Writes zu einem
//!   `write_read` kombiniert (Repeated Start) und liest einen ganzen Burst
//! - Weitere Reads werden aus dem Burst bedient
//! - Schlägt der Burst fehl, liefert der Rest der Session 0 ohne weiteren
//!   Bus-Zugriff (ein reines `read` hätte keinen Register-Pointer)
//!
//! Busy bleibt pro Byte zwei Ticks gesetzt, damit der Controller nach der
//! Übernahme-Flanke das nächste Byte anlegen kann.

use embedded_hal::i2c::{Error as _, I2c};
use heapless::Vec;

use crate::device::READ_BUFFER_LEN;
use crate::traits::{BusEngine, BusError};
use crate::types::{Direction, EngineStatus, TransactionRequest};

/// Maximale Anzahl gepufferter Write-Bytes pro Session
pub const PENDING_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Request übernommen, Transfer wird im nächsten Tick ausgeführt
    Latched,
    /// Transfer erledigt, Busy fällt im nächsten Tick
    Transferred,
    Gap,
}

pub struct I2cBusEngine<I> {
    i2c: I,
    phase: Phase,
    address: u8,
    direction: Direction,
    payload: u8,
    busy: bool,
    read_byte: u8,
    pending: Vec<u8, PENDING_CAPACITY>,
    burst: [u8; READ_BUFFER_LEN],
    burst_len: usize,
    burst_pos: usize,
    /// Burst dieser Session fehlgeschlagen
    burst_failed: bool,
    last_error: Option<BusError>,
    error_count: u32,
}

impl<I: I2c> I2cBusEngine<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            phase: Phase::Idle,
            address: 0,
            direction: Direction::Write,
            payload: 0,
            busy: false,
            read_byte: 0,
            pending: Vec::new(),
            burst: [0; READ_BUFFER_LEN],
            burst_len: 0,
            burst_pos: 0,
            burst_failed: false,
            last_error: None,
            error_count: 0,
        }
    }

    /// Letzten Bus-Fehler abholen (für Logging)
    pub fn take_error(&mut self) -> Option<BusError> {
        self.last_error.take()
    }

    /// Anzahl Bus-Fehler seit Start
    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Gibt den I²C-Treiber wieder frei
    pub fn release(self) -> I {
        self.i2c
    }

    fn latch(&mut self, request: &TransactionRequest) {
        if request.direction == Direction::Write && self.direction == Direction::Read {
            // Neuer Befehl nach Reads: übrige Burst-Bytes verwerfen
            self.drop_burst();
            self.burst_failed = false;
        }
        self.address = request.address;
        self.direction = request.direction;
        self.payload = request.payload;
        self.busy = true;
        self.phase = Phase::Latched;
    }

    fn execute(&mut self) {
        match self.direction {
            Direction::Write => {
                if self.pending.push(self.payload).is_err() {
                    self.flush_writes();
                    // nach flush ist Platz
                    let _ = self.pending.push(self.payload);
                }
            }
            Direction::Read => {
                if self.burst_pos >= self.burst_len && !self.burst_failed {
                    self.fetch_burst();
                }
                self.read_byte = if self.burst_pos < self.burst_len {
                    let byte = self.burst[self.burst_pos];
                    self.burst_pos += 1;
                    byte
                } else {
                    0
                };
            }
        }
        self.phase = Phase::Transferred;
    }

    fn fetch_burst(&mut self) {
        let result = if self.pending.is_empty() {
            self.i2c.read(self.address, &mut self.burst)
        } else {
            self.i2c.write_read(self.address, &self.pending, &mut self.burst)
        };
        self.pending.clear();
        match result {
            Ok(()) => {
                self.burst_len = self.burst.len();
                self.burst_pos = 0;
            }
            Err(e) => {
                self.record_error(BusError::from(e.kind()));
                self.drop_burst();
                self.burst_failed = true;
            }
        }
    }

    fn flush_writes(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if let Err(e) = self.i2c.write(self.address, &self.pending) {
            self.record_error(BusError::from(e.kind()));
        }
        self.pending.clear();
    }

    fn finish_session(&mut self) {
        self.flush_writes();
        self.drop_burst();
        self.burst_failed = false;
        self.phase = Phase::Idle;
    }

    fn drop_burst(&mut self) {
        self.burst_len = 0;
        self.burst_pos = 0;
    }

    fn record_error(&mut self, error: BusError) {
        self.last_error = Some(error);
        self.error_count = self.error_count.wrapping_add(1);
    }
}

impl<I: I2c> BusEngine for I2cBusEngine<I> {
    fn status(&self) -> EngineStatus {
        EngineStatus {
            busy: self.busy,
            read_byte: self.read_byte,
        }
    }

    fn tick(&mut self, request: TransactionRequest) {
        match self.phase {
            Phase::Idle => {
                if request.activate {
                    self.latch(&request);
                }
            }
            Phase::Latched => self.execute(),
            Phase::Transferred => {
                self.busy = false;
                self.phase = Phase::Gap;
            }
            Phase::Gap => {
                if request.activate {
                    self.latch(&request);
                } else {
                    self.finish_session();
                }
            }
        }
    }
}
