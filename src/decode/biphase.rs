//! Biphase-mark symbol decoder: turns edge events into bit values by
//! tracking which half of a symbol period the current edge falls in.
//!
//! Grounded on `original_source/src/decoder.c`'s `biphase_decode`. The C
//! version tracks the previous edge's polarity and compares it against the
//! current one; because [`crate::decode::envelope::EnvelopeTracker`]
//! already classifies each edge as the completion of a long (full-period,
//! bit 0) or short (half-period) interval, this reduces to a single
//! `bit_phase` flip-flop that only needs the long/short classification.
//!
//! `biphase_decode`'s comparison-against-previous-symbol scheme settles to
//! `biphaseToBinaryState == 1` after every completed bit (a long interval
//! forces it there directly; a completed short pair toggles back to it).
//! `bit_phase` mirrors that settled state, so it must start `true` — a
//! decoder that begins mid-stream (no preceding bit) is in exactly the
//! state it would be in right after finishing one.

/// Tracks which half of a biphase-mark symbol the decoder is in.
pub(crate) struct BiphaseDecoder {
    bit_phase: bool,
}

impl BiphaseDecoder {
    pub(crate) fn new() -> Self {
        Self { bit_phase: true }
    }

    /// Consume one edge. `long_interval` is the classification from
    /// [`EnvelopeTracker::push`](super::envelope::EnvelopeTracker::push).
    /// Returns the decoded bit once a full symbol has been observed: `Some`
    /// immediately for a long interval (biphase-0), `Some` only on the
    /// second half of a short-interval pair (biphase-1), `None` on the
    /// first half of a pair.
    pub(crate) fn push(&mut self, long_interval: bool) -> Option<bool> {
        if long_interval {
            self.bit_phase = true;
            log::trace!("ltc bit: 0 (full period)");
            Some(false)
        } else {
            self.bit_phase = !self.bit_phase;
            if self.bit_phase {
                log::trace!("ltc bit: 1 (half-period pair)");
                Some(true)
            } else {
                None
            }
        }
    }
}
