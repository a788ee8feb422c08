//! Integration Tests für den I²C-Adapter
//!
//! Ein Fake-I²C-Treiber (embedded-hal 1.0) mit dem TCS3472 Register-Modell
//! prüft, welche Transaktionen der Adapter auf dem Bus erzeugt.

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use esp_core::device::{CMD_POWER_ON, CMD_READ_COLOR, CMD_SELECT_CONTROL, DEVICE_ADDRESS};
use esp_core::{
    BusDevice, BusEngine, BusError, ChannelReading, Direction, I2cBusEngine, PollSystem,
    SimulatedSensor, TransactionRequest,
};

// ============================================================================
// Fake I²C Treiber
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Write(Vec<u8>),
    Read(usize),
}

struct FakeI2c {
    sensor: SimulatedSensor,
    transactions: Vec<(u8, Vec<Op>)>,
    /// Simuliere NACK auf die Adresse
    nack: bool,
    /// So viele der nächsten Transaktionen mit Read schlagen fehl
    fail_reads: usize,
    /// Alle Transaktionen, auch fehlgeschlagene
    attempts: usize,
}

impl FakeI2c {
    fn new(reading: ChannelReading) -> Self {
        Self {
            sensor: SimulatedSensor::with_reading(reading),
            transactions: Vec::new(),
            nack: false,
            fail_reads: 0,
            attempts: 0,
        }
    }
}

impl ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl I2c for FakeI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.attempts += 1;
        if self.nack || address != self.sensor.address() {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        let has_read = operations
            .iter()
            .any(|operation| matches!(operation, Operation::Read(_)));
        if has_read && self.fail_reads > 0 {
            self.fail_reads -= 1;
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        }

        let mut recorded = Vec::new();
        let mut last_was_read = None;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    if last_was_read != Some(false) {
                        self.sensor.start();
                    }
                    for &byte in bytes.iter() {
                        self.sensor.write(byte);
                    }
                    recorded.push(Op::Write(bytes.to_vec()));
                    last_was_read = Some(false);
                }
                Operation::Read(buffer) => {
                    if last_was_read != Some(true) {
                        self.sensor.start();
                    }
                    for byte in buffer.iter_mut() {
                        *byte = self.sensor.read();
                    }
                    recorded.push(Op::Read(buffer.len()));
                    last_was_read = Some(true);
                }
            }
        }
        self.sensor.stop();
        self.transactions.push((address, recorded));
        Ok(())
    }
}

const REFERENCE: ChannelReading = ChannelReading {
    clear: 0x3412,
    red: 0x7856,
    green: 0xBC9A,
    blue: 0xF0DE,
};

fn request(direction: Direction, payload: u8, activate: bool) -> TransactionRequest {
    TransactionRequest {
        activate,
        address: DEVICE_ADDRESS,
        direction,
        payload,
    }
}

// ============================================================================
// Tests: Adapter direkt
// ============================================================================

#[test]
fn test_busy_held_two_ticks_per_byte() {
    let mut engine = I2cBusEngine::new(FakeI2c::new(REFERENCE));
    let write = request(Direction::Write, CMD_SELECT_CONTROL, true);

    engine.tick(write);
    assert!(engine.status().busy);
    engine.tick(write);
    assert!(engine.status().busy);
    engine.tick(write);
    assert!(!engine.status().busy);
}

#[test]
fn test_writes_flushed_as_one_transaction_at_session_end() {
    let mut engine = I2cBusEngine::new(FakeI2c::new(REFERENCE));
    for _ in 0..3 {
        engine.tick(request(Direction::Write, CMD_SELECT_CONTROL, true));
    }
    for _ in 0..3 {
        engine.tick(request(Direction::Write, CMD_POWER_ON, true));
    }
    // bisher nichts auf dem Bus
    engine.tick(request(Direction::Write, CMD_POWER_ON, false));

    let i2c = engine.release();
    assert_eq!(
        i2c.transactions,
        vec![(
            DEVICE_ADDRESS,
            vec![Op::Write(vec![CMD_SELECT_CONTROL, CMD_POWER_ON])]
        )]
    );
    assert_eq!(i2c.sensor.enable(), CMD_POWER_ON);
}

#[test]
fn test_nack_is_counted_not_propagated() {
    let mut fake = FakeI2c::new(REFERENCE);
    fake.nack = true;
    let mut engine = I2cBusEngine::new(fake);

    engine.tick(request(Direction::Write, CMD_READ_COLOR, true));
    engine.tick(request(Direction::Read, CMD_READ_COLOR, true));
    engine.tick(request(Direction::Read, CMD_READ_COLOR, true));
    engine.tick(request(Direction::Read, CMD_READ_COLOR, true));
    engine.tick(request(Direction::Read, CMD_READ_COLOR, true));

    assert_eq!(engine.status().read_byte, 0);
    assert_eq!(engine.error_count(), 1);
    assert_eq!(engine.take_error(), Some(BusError::Nack));
    assert_eq!(engine.take_error(), None);
}

// ============================================================================
// Tests: Controller über den Adapter
// ============================================================================

#[test]
fn test_poll_cycle_over_i2c_driver() {
    let mut system = PollSystem::new(I2cBusEngine::new(FakeI2c::new(REFERENCE)));
    assert!(system.run_cycles(2, 2_000));
    assert_eq!(system.channels(), REFERENCE);
    assert_eq!(system.engine().error_count(), 0);
}

#[test]
fn test_poll_cycle_bus_transactions() {
    let mut system = PollSystem::new(I2cBusEngine::new(FakeI2c::new(REFERENCE)));
    assert!(system.run_cycles(2, 2_000));

    // Burst wird beim ersten Read geholt, danach aus dem Buffer bedient
    let read_cycle = (
        DEVICE_ADDRESS,
        vec![Op::Write(vec![CMD_READ_COLOR]), Op::Read(8)],
    );
    let expected = vec![
        (
            DEVICE_ADDRESS,
            vec![Op::Write(vec![CMD_SELECT_CONTROL, CMD_POWER_ON])],
        ),
        read_cycle.clone(),
        read_cycle,
    ];

    let transactions = system.into_engine().release().transactions;
    assert_eq!(&transactions[..3], expected.as_slice());
}

#[test]
fn test_absent_sensor_reads_zero_channels() {
    let mut fake = FakeI2c::new(REFERENCE);
    fake.nack = true;
    let mut system = PollSystem::new(I2cBusEngine::new(fake));
    assert!(system.run_cycles(2, 2_000));

    assert_eq!(system.channels(), ChannelReading::default());
    // Power-Up Write + ein Burst pro Zyklus
    assert_eq!(system.engine().error_count(), 3);
}

#[test]
fn test_absent_sensor_one_bus_transaction_per_cycle() {
    let mut fake = FakeI2c::new(REFERENCE);
    fake.nack = true;
    let mut system = PollSystem::new(I2cBusEngine::new(fake));
    assert!(system.run_cycles(1, 2_000));
    let after_first = system.engine().error_count();
    assert_eq!(after_first, 2);

    assert!(system.run_cycles(3, 5_000));
    assert_eq!(system.engine().error_count() - after_first, 3);

    let i2c = system.into_engine().release();
    assert_eq!(i2c.attempts, 5);
    assert!(i2c.transactions.is_empty());
}

#[test]
fn test_failed_burst_reads_zero_for_rest_of_cycle() {
    let mut fake = FakeI2c::new(REFERENCE);
    fake.fail_reads = 1;
    let mut system = PollSystem::new(I2cBusEngine::new(fake));

    assert!(system.run_cycles(1, 2_000));
    assert_eq!(system.controller().buffer(), &[0; 8]);
    assert_eq!(system.engine().error_count(), 1);

    // nächster Zyklus liest wieder korrekt
    assert!(system.run_cycles(1, 2_000));
    assert_eq!(system.channels(), REFERENCE);

    let i2c = system.into_engine().release();
    // Power-Up, fehlgeschlagener Burst, erfolgreicher Burst
    assert_eq!(i2c.attempts, 3);
    let plain_reads = i2c
        .transactions
        .iter()
        .filter(|(_, ops)| matches!(ops.as_slice(), [Op::Read(_)]))
        .count();
    assert_eq!(plain_reads, 0);
}
