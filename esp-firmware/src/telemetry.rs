// Telemetrie-Format für MQTT
// Definiert die JSON-Nachricht für einen Farbsensor-Messwert

use core::fmt::Write;

use heapless::String;
use serde::Serialize;

use crate::{ChannelReading, SensorReport};

/// Hex-Farbe "#rrggbb"
pub type HexColor = String<7>;

/// Fehler beim Serialisieren eines Messwerts
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum TelemetryError {
    /// JSON passt nicht in den Buffer
    BufferTooSmall,
    /// Hex-Farbe konnte nicht formatiert werden
    Format,
}

/// Messwert als JSON
///
/// `{"channels":{"clear":..,"red":..,"green":..,"blue":..},"rgb":"#rrggbb","cycle":..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelReport<'a> {
    pub channels: ChannelReading,
    pub rgb: &'a str,
    pub cycle: u32,
}

/// Formatiert die normierte Sensorfarbe als "#rrggbb"
pub fn hex_color(reading: &ChannelReading) -> Result<HexColor, TelemetryError> {
    let color = reading.to_rgb8();
    let mut hex = HexColor::new();
    write!(hex, "#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
        .map_err(|_| TelemetryError::Format)?;
    Ok(hex)
}

/// Serialisiert einen Messwert in `buffer`
///
/// Gibt die Anzahl geschriebener Bytes zurück.
pub fn encode_report(report: &SensorReport, buffer: &mut [u8]) -> Result<usize, TelemetryError> {
    let hex = hex_color(&report.reading)?;
    let json = ChannelReport {
        channels: report.reading,
        rgb: hex.as_str(),
        cycle: report.cycle,
    };
    serde_json_core::to_slice(&json, buffer).map_err(|_| TelemetryError::BufferTooSmall)
}
