//! Per-sample adaptive min/max envelope tracker and hysteresis-threshold
//! edge detector.
//!
//! Grounded on `original_source/src/decoder.c`'s `audio_to_biphase`: the
//! envelope relaxes 15/16 toward centre each sample, snaps to the new
//! extreme, and a state change is flagged at 50% of the instantaneous
//! dynamic range. The long/short threshold ratio used here is 13/16,
//! distinct from the 14/16 that appears in the `decoder.c` comment trail.

const SAMPLE_CENTER: i32 = 0x80;

/// Nominal seed for `min_env`/`max_env`, matching the encoder's
/// `DEFAULT_LO`/`DEFAULT_HI` (see `crate::encode`). A tracker that starts
/// flat at `SAMPLE_CENTER` has no open hysteresis window until it has seen a
/// sample at each extreme, so a decoder attached mid-stream with no preroll
/// would otherwise need to relax/snap its way to a usable threshold before
/// the first edge could register. Seeding at the conventional full-swing
/// amplitude opens the window immediately for the common case, at the cost
/// of a slightly wider-than-ideal threshold until the real amplitude is
/// observed.
const NOMINAL_LOW: i32 = 38;
const NOMINAL_HIGH: i32 = 218;

/// Adaptive envelope tracker; consumes one 8-bit sample at a time and
/// reports a biphase edge when the signal crosses the current hysteresis
/// threshold.
pub(crate) struct EnvelopeTracker {
    min_env: i32,
    max_env: i32,
    polarity: bool,
    sample_ctr: u32,
    symbol_period: f64,
    symbol_half_limit: f64,
}

impl EnvelopeTracker {
    /// `initial_symbol_period` seeds the speed-tracking loop (samples per
    /// LTC bit) before any edges have been observed; it is a hint, not a
    /// hard requirement — the tracker adapts once edges start arriving.
    pub(crate) fn new(initial_symbol_period: f64) -> Self {
        let initial_symbol_period = initial_symbol_period.max(1.0);
        Self {
            min_env: NOMINAL_LOW,
            max_env: NOMINAL_HIGH,
            polarity: false,
            sample_ctr: 0,
            symbol_period: initial_symbol_period,
            symbol_half_limit: initial_symbol_period * 13.0 / 16.0,
        }
    }

    /// Feed one 8-bit sample. Returns `Some(long_interval)` when a
    /// hysteresis threshold is crossed: `true` if the interval since the
    /// previous edge exceeded the current half-symbol limit (a biphase-0
    /// full period), `false` otherwise (half of a biphase-1).
    pub(crate) fn push(&mut self, sample: u8) -> Option<bool> {
        let x = sample as i32;

        self.min_env = SAMPLE_CENTER - (((SAMPLE_CENTER - self.min_env) * 15) / 16);
        self.max_env = SAMPLE_CENTER + (((self.max_env - SAMPLE_CENTER) * 15) / 16);
        self.min_env = self.min_env.min(x);
        self.max_env = self.max_env.max(x);

        let low = SAMPLE_CENTER - (((SAMPLE_CENTER - self.min_env) * 8) / 16);
        let high = SAMPLE_CENTER + (((self.max_env - SAMPLE_CENTER) * 8) / 16);

        let crossed = (!self.polarity && x < low) || (self.polarity && x > high);
        if !crossed {
            self.sample_ctr += 1;
            return None;
        }

        let interval = self.sample_ctr;
        let long_interval = (interval as f64) > self.symbol_half_limit;

        self.polarity = !self.polarity;
        self.symbol_period = (self.symbol_period * 3.0 + interval as f64) / 4.0;
        self.symbol_half_limit = self.symbol_period * 13.0 / 16.0;
        self.sample_ctr = 0;

        log::trace!(
            "ltc edge: interval={interval} long={long_interval} period={:.2}",
            self.symbol_period
        );
        Some(long_interval)
    }

    /// Current adaptive estimate of samples-per-LTC-bit.
    pub(crate) fn symbol_period(&self) -> f64 {
        self.symbol_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_wave(period: usize, cycles: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(period * cycles);
        for cycle in 0..cycles {
            for i in 0..period {
                out.push(if (cycle * period + i) / (period / 2) % 2 == 0 {
                    218
                } else {
                    38
                });
            }
        }
        out
    }

    #[test]
    fn clean_square_wave_yields_regular_edges() {
        let mut tracker = EnvelopeTracker::new(20.0);
        let samples = square_wave(20, 20);
        let mut edges = 0;
        for s in samples {
            if tracker.push(s).is_some() {
                edges += 1;
            }
        }
        assert!(edges > 30);
    }

    #[test]
    fn quiet_signal_never_crosses_threshold() {
        let mut tracker = EnvelopeTracker::new(20.0);
        let mut edges = 0;
        for _ in 0..10_000 {
            if tracker.push(0x80).is_some() {
                edges += 1;
            }
        }
        assert_eq!(edges, 0);
    }
}
