//! Flanken-Erkennung auf dem Busy-Flag der Engine
//!
//! Der vorherige Wert wird jeden Tick explizit gespeichert.

/// Ergebnis eines Samples: Pegel plus Flanken gegenüber dem letzten Tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusySample {
    pub busy: bool,
    /// 0 → 1: Engine hat den Request übernommen
    pub rising: bool,
}

impl BusySample {
    /// Engine ist frei (Pegel, nicht Flanke)
    pub fn idle(&self) -> bool {
        !self.busy
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BusyEdge {
    previous: bool,
}

impl BusyEdge {
    pub const fn new() -> Self {
        Self { previous: false }
    }

    /// Vergleicht `busy` mit dem Wert vom letzten Tick und merkt ihn sich
    pub fn sample(&mut self, busy: bool) -> BusySample {
        let sample = BusySample {
            busy,
            rising: busy && !self.previous,
        };
        self.previous = busy;
        sample
    }
}
