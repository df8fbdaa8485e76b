//! One-pole low-pass filter used to band-limit each rendered biphase-mark
//! segment, plus the rise-time-to-coefficient conversion.
//!
//! Grounded on `original_source/src/encoder.c`'s `addvalues`: a segment is
//! rendered by filtering from the centre sample value toward the segment's
//! target level for the first half, then mirroring that ramp to produce
//! the second half, so the waveform returns to centre by the segment's end
//! (ready for the next segment's polarity, rather than holding at the
//! target) — exactly what `addvalues`' `curve[n-i-1] = curve[i] = val` loop
//! does. The original fixed `(val + tgtval) / 2` smoothing (an implicit
//! coefficient of 0.5) is generalised here to a configurable coefficient so
//! `Encoder::set_filter` can vary the rise time.

/// Computes the one-pole filter coefficient for a given 10%-90% rise time.
/// `set_filter` takes rise time in microseconds, and `0.0` (or negative)
/// selects an unfiltered square wave.
pub(crate) fn rise_time_to_coeff(rise_time_us: f64, sample_rate: u32) -> f64 {
    if rise_time_us <= 0.0 {
        return 0.0;
    }
    let half_rise_seconds = rise_time_us * 1e-6 / 2.0;
    let tau = sample_rate as f64 * half_rise_seconds / std::f64::consts::E;
    if tau <= 0.0 {
        return 0.0;
    }
    1.0 - (-1.0 / tau).exp()
}

/// Render one biphase-mark segment of `n` samples, converging from centre
/// toward `target_high`'s selected level (`hi` or `lo`, both offsets
/// already applied around the `0x80` centre) and mirroring the ramp for the
/// trailing half. A non-positive `coeff` renders a pure square wave.
pub(crate) fn render_segment(n: usize, target_high: bool, hi: u8, lo: u8, coeff: f64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let target = if target_high {
        hi as f64 - 128.0
    } else {
        lo as f64 - 128.0
    };

    let mut curve = vec![0.0f64; n];
    let half = (n + 1) / 2;
    let mut val = 0.0f64;
    for i in 0..half {
        if coeff > 0.0 {
            val += coeff * (target - val);
        } else {
            val = target;
        }
        curve[n - i - 1] = val;
        curve[i] = val;
    }

    curve
        .into_iter()
        .map(|v| (v + 128.0).round().clamp(0.0, 255.0) as u8)
        .collect()
}
