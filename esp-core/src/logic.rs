//! Pure Business Logic Functions
//!
//! Projektion des Lese-Buffers auf die vier Kanäle (testbar ohne Hardware!)

use rgb::RGB8;

use crate::types::{ChannelReading, ReadBuffer};

/// Setzt einen Kanal aus zwei benachbarten Buffer-Slots zusammen
///
/// Low Byte am geraden Index, High Byte am ungeraden Index.
///
/// # Beispiele
///
/// ```
/// # use esp_core::channel_word;
/// let buffer = [0x12, 0x34, 0, 0, 0, 0, 0, 0];
/// assert_eq!(channel_word(&buffer, 0), 0x3412);
/// ```
pub fn channel_word(buffer: &ReadBuffer, channel: usize) -> u16 {
    let low = buffer[channel * 2];
    let high = buffer[channel * 2 + 1];
    u16::from_le_bytes([low, high])
}

impl ChannelReading {
    /// Slots 0–1 → clear, 2–3 → red, 4–5 → green, 6–7 → blue
    pub fn from_buffer(buffer: &ReadBuffer) -> Self {
        Self {
            clear: channel_word(buffer, 0),
            red: channel_word(buffer, 1),
            green: channel_word(buffer, 2),
            blue: channel_word(buffer, 3),
        }
    }

    /// Normiert Rot/Grün/Blau auf den Clear-Kanal (0-255)
    ///
    /// Bei `clear == 0` ergibt sich Schwarz, Werte über Clear sättigen bei 255.
    ///
    /// # Beispiele
    ///
    /// ```
    /// # use esp_core::ChannelReading;
    /// # use rgb::RGB8;
    /// let reading = ChannelReading { clear: 1000, red: 500, green: 250, blue: 0 };
    /// assert_eq!(reading.to_rgb8(), RGB8 { r: 127, g: 63, b: 0 });
    /// ```
    pub fn to_rgb8(&self) -> RGB8 {
        if self.clear == 0 {
            return RGB8::default();
        }
        let scale = |value: u16| -> u8 {
            let scaled = u32::from(value) * 255 / u32::from(self.clear);
            scaled.min(255) as u8
        };
        RGB8 {
            r: scale(self.red),
            g: scale(self.green),
            b: scale(self.blue),
        }
    }
}
