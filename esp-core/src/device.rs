//! Protokoll-Konstanten des Farbsensors (TCS3472-Familie)
//!
//! Nur die Register, die der Poll-Controller tatsächlich benutzt.

/// 7-Bit I²C-Adresse des Sensors (fest für die Bauteilfamilie)
pub const DEVICE_ADDRESS: u8 = 0x29;

/// Command-Bit: jedes erste Byte einer Schreib-Transaktion muss es gesetzt haben
pub const COMMAND_BIT: u8 = 0x80;

/// Transaktions-Typ "Auto-Increment" (Bits 6:5 = 01)
pub const COMMAND_AUTO_INCREMENT: u8 = 0x20;

/// Maske für die 5-Bit Register-Adresse im Command-Byte
pub const COMMAND_ADDRESS_MASK: u8 = 0x1F;

/// Maske für den Transaktions-Typ im Command-Byte
pub const COMMAND_TYPE_MASK: u8 = 0x60;

// ============================================================================
// Register-Adressen
// ============================================================================

/// ENABLE Register (PON, AEN)
pub const REG_ENABLE: u8 = 0x00;

/// ID Register
pub const REG_ID: u8 = 0x12;

/// Erster Daten-Register: Clear Low Byte (CDATAL)
pub const REG_CDATAL: u8 = 0x14;

/// Power On Bit im ENABLE Register
pub const ENABLE_PON: u8 = 0x01;

/// RGBC ADC Enable Bit im ENABLE Register
pub const ENABLE_AEN: u8 = 0x02;

/// Wert im ID Register (TCS34725)
pub const DEVICE_ID: u8 = 0x44;

// ============================================================================
// Command-Bytes des Protokolls
// ============================================================================

/// "Select control register": Command-Byte auf das ENABLE Register
pub const CMD_SELECT_CONTROL: u8 = COMMAND_BIT | REG_ENABLE;

/// "Power on": Oszillator und ADC einschalten
pub const CMD_POWER_ON: u8 = ENABLE_PON | ENABLE_AEN;

/// "Begin sequential color read": Auto-Increment ab CDATAL
pub const CMD_READ_COLOR: u8 = COMMAND_BIT | COMMAND_AUTO_INCREMENT | REG_CDATAL;

/// Anzahl Bytes pro Lese-Zyklus (4 Kanäle × 16 Bit)
pub const READ_BUFFER_LEN: usize = 8;

/// Index des letzten Buffer-Slots
pub const LAST_SLOT: usize = READ_BUFFER_LEN - 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_bytes_match_register_map() {
        assert_eq!(CMD_SELECT_CONTROL, 0x80);
        assert_eq!(CMD_POWER_ON, 0x03);
        assert_eq!(CMD_READ_COLOR, 0xB4);
    }

    #[test]
    fn test_read_color_addresses_cdatal() {
        assert_eq!(CMD_READ_COLOR & COMMAND_ADDRESS_MASK, REG_CDATAL);
        assert_eq!(CMD_READ_COLOR & COMMAND_TYPE_MASK, COMMAND_AUTO_INCREMENT);
    }
}
