// Reset-Eingang Trait und Implementierungen
//
// Abstrahiert den Reset-Taster, damit die Poll-Logik ohne GPIO-Treiber
// getestet werden kann.

/// Trait für den Reset-Eingang des Poll-Controllers
pub trait ResetInput {
    /// `true` solange Reset anliegt (wird einmal pro Tick abgefragt)
    fn is_asserted(&mut self) -> bool;
}

// ============================================================================
// Real Hardware Implementation (nur für ESP32-Target)
// ============================================================================

#[cfg(not(test))]
mod real_impl {
    use super::ResetInput;
    use esp_hal::gpio::{Input, InputConfig, InputPin, Pull};

    /// Taster gegen GND, interner Pull-Up → gedrückt = low
    pub struct ResetButton<'a> {
        input: Input<'a>,
    }

    impl<'a> ResetButton<'a> {
        pub fn new(pin: impl InputPin + 'a) -> Self {
            let input = Input::new(pin, InputConfig::default().with_pull(Pull::Up));
            Self { input }
        }
    }

    impl ResetInput for ResetButton<'_> {
        fn is_asserted(&mut self) -> bool {
            self.input.is_low()
        }
    }
}

#[cfg(not(test))]
pub use real_impl::ResetButton;

// ============================================================================
// Mock Implementation (nur für Tests)
// ============================================================================

/// Spielt einen vorgegebenen Reset-Verlauf ab, danach bleibt Reset aus
#[cfg(test)]
pub struct MockResetInput {
    pub script: &'static [bool],
    /// Anzahl der Abfragen
    pub polls: usize,
}

#[cfg(test)]
impl MockResetInput {
    pub fn new(script: &'static [bool]) -> Self {
        Self { script, polls: 0 }
    }
}

#[cfg(test)]
impl ResetInput for MockResetInput {
    fn is_asserted(&mut self) -> bool {
        let asserted = self.script.get(self.polls).copied().unwrap_or(false);
        self.polls += 1;
        asserted
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_reset_plays_script_then_releases() {
        let mut reset = MockResetInput::new(&[false, true, true]);
        assert!(!reset.is_asserted());
        assert!(reset.is_asserted());
        assert!(reset.is_asserted());
        assert!(!reset.is_asserted());
        assert_eq!(reset.polls, 4);
    }
}
