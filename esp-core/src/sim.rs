//! Tick-genaue Simulation von Bus-Engine und Farbsensor
//!
//! Ermöglicht Tests und Host-Demos des Poll-Controllers ohne Hardware.

use crate::device::{
    COMMAND_ADDRESS_MASK, COMMAND_AUTO_INCREMENT, COMMAND_BIT, COMMAND_TYPE_MASK, DEVICE_ADDRESS,
    DEVICE_ID, REG_CDATAL, REG_ENABLE, REG_ID,
};
use crate::traits::{BusDevice, BusEngine};
use crate::types::{ChannelReading, Direction, EngineStatus, TransactionRequest};

/// Konfiguration der simulierten Engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Ticks, die ein Byte auf dem Bus dauert
    ///
    /// Mindestens 2: der Controller legt das nächste Byte erst einen Tick nach
    /// der Busy-Flanke an.
    pub byte_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        // 9 SCL-Takte pro Byte
        Self { byte_ticks: 9 }
    }
}

const MIN_BYTE_TICKS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Transfer { remaining: u32 },
    /// Ein Tick Busy=0 zwischen zwei Bytes, Bus bleibt belegt
    Gap,
}

/// Verhaltensmodell der Bus-Transaktions-Engine
///
/// - Übernimmt einen Request im Tick, in dem `activate` gesehen wird (busy 0→1)
/// - Bleibt `byte_ticks` lang busy, dann genau einen Tick nicht busy
/// - Repeated Start bei Richtungswechsel, Stop wenn `activate` an der
///   Byte-Grenze low ist
pub struct SimulatedEngine<D: BusDevice> {
    config: SimConfig,
    device: D,
    phase: Phase,
    busy: bool,
    read_byte: u8,
    direction: Direction,
    payload: u8,
    /// Angesprochenes Gerät hat bestätigt (sonst NACK, Bytes gehen ins Leere)
    selected: bool,
    transfers: u32,
}

impl<D: BusDevice> SimulatedEngine<D> {
    pub fn new(device: D) -> Self {
        Self::with_config(device, SimConfig::default())
    }

    pub fn with_config(device: D, config: SimConfig) -> Self {
        Self {
            config: SimConfig {
                byte_ticks: config.byte_ticks.max(MIN_BYTE_TICKS),
            },
            device,
            phase: Phase::Idle,
            busy: false,
            read_byte: 0,
            direction: Direction::Write,
            payload: 0,
            selected: false,
            transfers: 0,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Anzahl übernommener Bytes seit Start
    pub fn transfers(&self) -> u32 {
        self.transfers
    }

    fn start(&mut self, request: &TransactionRequest) {
        self.selected = request.address == self.device.address();
        if self.selected {
            self.device.start();
        }
    }

    fn latch(&mut self, request: &TransactionRequest) {
        self.direction = request.direction;
        self.payload = request.payload;
        self.busy = true;
        self.transfers = self.transfers.wrapping_add(1);
        self.phase = Phase::Transfer {
            remaining: self.config.byte_ticks,
        };
    }

    fn complete(&mut self) {
        match self.direction {
            Direction::Write => {
                if self.selected {
                    self.device.write(self.payload);
                }
            }
            Direction::Read => {
                // Ohne Gerät ziehen die Pull-Ups SDA auf High
                self.read_byte = if self.selected {
                    self.device.read()
                } else {
                    0xFF
                };
            }
        }
        self.busy = false;
        self.phase = Phase::Gap;
    }
}

impl<D: BusDevice> BusEngine for SimulatedEngine<D> {
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
                    self.start(&request);
                    self.latch(&request);
                }
            }
            Phase::Transfer { remaining } => {
                if remaining > 1 {
                    self.phase = Phase::Transfer {
                        remaining: remaining - 1,
                    };
                } else {
                    self.complete();
                }
            }
            Phase::Gap => {
                if request.activate {
                    if request.direction != self.direction {
                        self.start(&request);
                    }
                    self.latch(&request);
                } else {
                    if self.selected {
                        self.device.stop();
                    }
                    self.selected = false;
                    self.phase = Phase::Idle;
                }
            }
        }
    }
}

// ============================================================================
// Simulierter Farbsensor (Register-Modell)
// ============================================================================

const REGISTER_COUNT: usize = 32;

/// Register-Modell eines TCS3472 Farbsensors
///
/// Erstes Byte nach einem Write-Start ist das Command-Byte (Register-Adresse
/// + Transaktions-Typ), weitere Bytes werden ins adressierte Register
/// geschrieben. Reads liefern das adressierte Register, bei Auto-Increment
/// mit fortlaufender Adresse.
pub struct SimulatedSensor {
    registers: [u8; REGISTER_COUNT],
    pointer: u8,
    auto_increment: bool,
    expect_command: bool,
    protocol_faults: u32,
}

impl SimulatedSensor {
    pub fn new() -> Self {
        let mut registers = [0; REGISTER_COUNT];
        registers[REG_ID as usize] = DEVICE_ID;
        Self {
            registers,
            pointer: 0,
            auto_increment: false,
            expect_command: false,
            protocol_faults: 0,
        }
    }

    /// Sensor mit vorgegebenen Messwerten
    pub fn with_reading(reading: ChannelReading) -> Self {
        let mut sensor = Self::new();
        sensor.set_reading(reading);
        sensor
    }

    /// Setzt die Daten-Register CDATAL..BDATAH
    pub fn set_reading(&mut self, reading: ChannelReading) {
        let words = [reading.clear, reading.red, reading.green, reading.blue];
        for (channel, word) in words.iter().enumerate() {
            let [low, high] = word.to_le_bytes();
            let base = REG_CDATAL as usize + channel * 2;
            self.registers[base] = low;
            self.registers[base + 1] = high;
        }
    }

    pub fn register(&self, address: u8) -> u8 {
        self.registers[(address & COMMAND_ADDRESS_MASK) as usize]
    }

    pub fn enable(&self) -> u8 {
        self.register(REG_ENABLE)
    }

    /// Write-Bytes ohne gesetztes Command-Bit an erster Stelle
    pub fn protocol_faults(&self) -> u32 {
        self.protocol_faults
    }

    fn advance(&mut self) {
        if self.auto_increment {
            self.pointer = (self.pointer + 1) & COMMAND_ADDRESS_MASK;
        }
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl BusDevice for SimulatedSensor {
    fn address(&self) -> u8 {
        DEVICE_ADDRESS
    }

    fn start(&mut self) {
        self.expect_command = true;
    }

    fn write(&mut self, byte: u8) {
        if self.expect_command {
            self.expect_command = false;
            if byte & COMMAND_BIT == 0 {
                self.protocol_faults += 1;
                return;
            }
            self.pointer = byte & COMMAND_ADDRESS_MASK;
            self.auto_increment = byte & COMMAND_TYPE_MASK == COMMAND_AUTO_INCREMENT;
            return;
        }
        // ID und Daten-Register sind read-only
        if self.pointer < REG_ID {
            self.registers[self.pointer as usize] = byte;
        }
        self.advance();
    }

    fn read(&mut self) -> u8 {
        self.expect_command = false;
        let value = self.registers[self.pointer as usize];
        self.advance();
        value
    }

    fn stop(&mut self) {
        self.expect_command = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{CMD_POWER_ON, CMD_READ_COLOR, CMD_SELECT_CONTROL};

    fn write_request(payload: u8) -> TransactionRequest {
        TransactionRequest {
            activate: true,
            address: DEVICE_ADDRESS,
            direction: Direction::Write,
            payload,
        }
    }

    #[test]
    fn test_sensor_power_on_sequence() {
        let mut sensor = SimulatedSensor::new();
        sensor.start();
        sensor.write(CMD_SELECT_CONTROL);
        sensor.write(CMD_POWER_ON);
        sensor.stop();
        assert_eq!(sensor.enable(), 0x03);
        assert_eq!(sensor.protocol_faults(), 0);
    }

    #[test]
    fn test_sensor_auto_increment_read() {
        let mut sensor = SimulatedSensor::with_reading(ChannelReading {
            clear: 0x3412,
            red: 0x7856,
            green: 0xBC9A,
            blue: 0xF0DE,
        });
        sensor.start();
        sensor.write(CMD_READ_COLOR);
        sensor.start();
        let mut bytes = [0u8; 8];
        for byte in bytes.iter_mut() {
            *byte = sensor.read();
        }
        assert_eq!(bytes, [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0]);
    }

    #[test]
    fn test_sensor_rejects_missing_command_bit() {
        let mut sensor = SimulatedSensor::new();
        sensor.start();
        sensor.write(0x03);
        assert_eq!(sensor.protocol_faults(), 1);
        assert_eq!(sensor.enable(), 0);
    }

    #[test]
    fn test_engine_latches_on_activate() {
        let mut engine = SimulatedEngine::new(SimulatedSensor::new());
        assert!(!engine.status().busy);
        engine.tick(write_request(CMD_SELECT_CONTROL));
        assert!(engine.status().busy);
        assert_eq!(engine.transfers(), 1);
    }

    #[test]
    fn test_engine_drops_busy_for_one_tick_between_bytes() {
        let config = SimConfig { byte_ticks: 3 };
        let mut engine = SimulatedEngine::with_config(SimulatedSensor::new(), config);
        engine.tick(write_request(CMD_SELECT_CONTROL));
        engine.tick(write_request(CMD_POWER_ON));
        engine.tick(write_request(CMD_POWER_ON));
        assert!(engine.status().busy);
        engine.tick(write_request(CMD_POWER_ON));
        assert!(!engine.status().busy);
        engine.tick(write_request(CMD_POWER_ON));
        assert!(engine.status().busy);
        assert_eq!(engine.transfers(), 2);
    }

    #[test]
    fn test_engine_stops_when_deactivated() {
        let config = SimConfig { byte_ticks: 2 };
        let mut engine = SimulatedEngine::with_config(SimulatedSensor::new(), config);
        for _ in 0..3 {
            engine.tick(write_request(CMD_SELECT_CONTROL));
        }
        for _ in 0..2 {
            engine.tick(write_request(CMD_POWER_ON));
        }
        engine.tick(TransactionRequest::idle());
        engine.tick(TransactionRequest::idle());
        assert!(!engine.status().busy);
        assert_eq!(engine.transfers(), 2);
        assert_eq!(engine.device().enable(), CMD_POWER_ON);
    }

    #[test]
    fn test_engine_enforces_minimum_byte_ticks() {
        let config = SimConfig { byte_ticks: 0 };
        let mut engine = SimulatedEngine::with_config(SimulatedSensor::new(), config);
        engine.tick(write_request(CMD_SELECT_CONTROL));
        engine.tick(write_request(CMD_SELECT_CONTROL));
        assert!(engine.status().busy);
    }

    #[test]
    fn test_engine_without_device_reads_ones() {
        let config = SimConfig { byte_ticks: 2 };
        let mut engine = SimulatedEngine::with_config(SimulatedSensor::new(), config);
        let request = TransactionRequest {
            activate: true,
            address: 0x42,
            direction: Direction::Read,
            payload: 0,
        };
        for _ in 0..3 {
            engine.tick(request);
        }
        assert_eq!(engine.status().read_byte, 0xFF);
    }
}
