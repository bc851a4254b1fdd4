//! Quadrature decoding of a two-line rotary encoder.
//!
//! Samples are 2-bit values `(A << 1) | B`. One detent walks the ring
//! `11 -> 01 -> 00 -> 10 -> 11` in one direction (delta `-1` per step) or
//! the reverse (delta `+1` per step).

/// Delta per `(previous << 2) | new` transition.
const DELTAS: [i8; 16] = [0, 1, -1, 0, -1, 0, 0, 1, 1, 0, 0, -1, 0, -1, 1, 0];

/// The ring position a transition crosses, regardless of direction.
const EDGE_IDS: [u8; 16] = [0, 1, 2, 0, 1, 0, 0, 0, 2, 0, 0, 3, 0, 0, 3, 0];

/// Both lines high; the resting position of a detent encoder.
const IDLE_SAMPLE: u8 = 0b11;

/// A single decoded quadrature transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeEvent {
    /// `1` or `-1` for a step between adjacent ring positions.
    pub delta: i8,
    /// Which of the four ring edges was crossed (0-3).
    pub edge_id: u8,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for EdgeEvent {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Edge({=i8}, {=u8})", self.delta, self.edge_id);
    }
}

/// Table driven quadrature state machine.
///
/// The decoder only keeps the last sample. It performs no I/O and must be
/// driven from a single context (the polling loop), never from an interrupt
/// that could preempt another `update()`.
#[derive(Clone, Debug)]
pub struct EncoderDecoder {
    prev: u8,
}

impl EncoderDecoder {
    /// Create a decoder that assumes the lines start at rest (both high).
    #[must_use]
    pub const fn new() -> Self {
        Self { prev: IDLE_SAMPLE }
    }

    /// Pack the two line levels into a sample.
    #[must_use]
    pub const fn sample(a: bool, b: bool) -> u8 {
        ((a as u8) << 1) | b as u8
    }

    /// The last observed sample.
    #[must_use]
    pub const fn state(&self) -> u8 {
        self.prev
    }

    /// Feed one sample (only the low 2 bits are used).
    ///
    /// Returns an event when the lines moved to an adjacent ring position.
    /// Repeated samples and jumps between diagonally opposite positions
    /// (a missed sample or contact bounce) yield `None`. The sample always
    /// becomes the new reference.
    pub fn update(&mut self, sample: u8) -> Option<EdgeEvent> {
        let new = sample & 0b11;
        let prev = core::mem::replace(&mut self.prev, new);
        if prev == new || prev ^ new == 0b11 {
            return None;
        }
        let idx = ((prev << 2) | new) as usize;
        Some(EdgeEvent {
            delta: DELTAS[idx],
            edge_id: EDGE_IDS[idx],
        })
    }

    /// Like [`EncoderDecoder::update()`], but hands the event to `on_edge`
    /// synchronously instead of returning it.
    pub fn update_with<F>(&mut self, sample: u8, mut on_edge: F)
    where
        F: FnMut(EdgeEvent),
    {
        if let Some(event) = self.update(sample) {
            on_edge(event);
        }
    }
}

impl Default for EncoderDecoder {
    fn default() -> Self {
        Self::new()
    }
}
