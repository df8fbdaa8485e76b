//! The stateful [`Encoder`] facade: renders a [`FrameBits`] into a filtered
//! 8-bit PCM biphase-mark waveform at an arbitrary sample rate, fps, and
//! playback speed.

mod filter;

use intbits::Bits;

use crate::error::{LtcError, Result};
use crate::frame::{frame_to_timecode, timecode_to_frame, FrameBits, Fps, Timecode};
use crate::tv_standard::TvStandard;
use filter::{render_segment, rise_time_to_coeff};

/// Default high sample value (~+3 dBFS offset from the `0x80` centre).
const DEFAULT_HI: u8 = 218;
/// Default low sample value.
const DEFAULT_LO: u8 = 38;

/// Construction parameters for [`Encoder`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EncoderConfig {
    pub sample_rate: u32,
    pub fps: Fps,
    pub tv_standard: TvStandard,
    pub use_date: bool,
}

fn buffer_capacity_for(sample_rate: u32, fps: Fps) -> usize {
    (sample_rate as f64 / fps.rate).ceil() as usize + 1
}

/// Stateful LTC encoder: set a timecode (or frame), render bytes or whole
/// frames into an internal PCM buffer, drain the buffer.
///
/// Not internally synchronised: a caller sharing one `Encoder` across
/// threads must provide their own mutex.
pub struct Encoder {
    sample_rate: u32,
    fps: Fps,
    frame: FrameBits,
    use_date: bool,

    buf: Vec<u8>,
    write_offset: usize,

    samples_per_symbol: f64,
    samples_per_half: f64,
    fractional_carry: f64,
    polarity: bool,

    filter_coeff: f64,
    hi: u8,
    lo: u8,
}

impl Encoder {
    /// Create an encoder for `config`. The default rise time is taken from
    /// `config.tv_standard`; drop-frame is enabled automatically when `fps`
    /// is one of the two NTSC drop-frame rates.
    pub fn new(config: EncoderConfig) -> Self {
        let capacity = buffer_capacity_for(config.sample_rate, config.fps);
        let mut frame = FrameBits::new();
        frame.set_drop_frame(config.fps.is_drop_frame());
        frame.set_parity();

        let mut encoder = Self {
            sample_rate: config.sample_rate,
            fps: config.fps,
            frame,
            use_date: config.use_date,
            buf: Vec::with_capacity(capacity),
            write_offset: 0,
            samples_per_symbol: 0.0,
            samples_per_half: 0.0,
            fractional_carry: 0.5,
            polarity: false,
            filter_coeff: 0.0,
            hi: DEFAULT_HI,
            lo: DEFAULT_LO,
        };
        encoder.recompute_symbol_timing();
        encoder.set_filter(config.tv_standard.default_rise_time_us());
        encoder
    }

    fn recompute_symbol_timing(&mut self) {
        self.samples_per_symbol = self.sample_rate as f64 / (self.fps.rate * 80.0);
        self.samples_per_half = self.samples_per_symbol / 2.0;
    }

    /// Reinitialise sample rate / fps in place, flushing the buffer and
    /// resetting biphase state. Fails if the existing buffer is smaller
    /// than one frame at the new settings.
    pub fn reinit(&mut self, sample_rate: u32, fps: Fps) -> Result<()> {
        let needed = buffer_capacity_for(sample_rate, fps);
        if self.buf.capacity() < needed {
            return Err(LtcError::AllocationFailure);
        }
        self.sample_rate = sample_rate;
        self.fps = fps;
        self.frame.set_drop_frame(fps.is_drop_frame());
        self.frame.set_parity();
        self.recompute_symbol_timing();
        self.buffer_flush();
        self.fractional_carry = 0.5;
        self.polarity = false;
        Ok(())
    }

    /// Grow/replace the internal buffer to hold at least one frame at the
    /// given settings.
    pub fn set_buffer_size(&mut self, sample_rate: u32, fps: Fps) -> Result<()> {
        let needed = buffer_capacity_for(sample_rate, fps);
        if needed == 0 {
            return Err(LtcError::AllocationFailure);
        }
        let mut new_buf = Vec::with_capacity(needed);
        new_buf.extend_from_slice(&self.buf[..self.write_offset.min(needed)]);
        self.buf = new_buf;
        Ok(())
    }

    /// Rise time in microseconds for the one-pole band-limiting filter.
    /// `0.0` (or negative) selects an unfiltered square wave.
    pub fn set_filter(&mut self, rise_time_us: f64) {
        self.filter_coeff = rise_time_to_coeff(rise_time_us, self.sample_rate);
    }

    /// Set output amplitude in dBFS relative to full scale (0 dBFS = ±127
    /// around the `0x80` centre). Values are clamped to a sane range rather
    /// than rejected.
    pub fn set_volume(&mut self, dbfs: f64) {
        let amplitude = 127.0 * 10f64.powf(dbfs / 20.0);
        let amplitude = amplitude.clamp(0.0, 127.0).round() as i32;
        self.hi = (128 + amplitude).clamp(0, 255) as u8;
        self.lo = (128 - amplitude).clamp(0, 255) as u8;
    }

    /// Replace the encoder's timecode content.
    pub fn set_timecode(&mut self, tc: &Timecode) {
        self.frame = timecode_to_frame(tc, self.use_date);
    }

    /// Read back the encoder's current content as a [`Timecode`].
    pub fn timecode(&self) -> Timecode {
        frame_to_timecode(&self.frame, self.use_date)
    }

    /// Replace the encoder's raw frame content directly.
    pub fn set_frame(&mut self, frame: FrameBits) {
        self.frame = frame;
    }

    /// The encoder's current raw frame content.
    pub fn frame(&self) -> FrameBits {
        self.frame
    }

    /// Pack the eight 4-bit user fields as a single LSB-first 32-bit value,
    /// for callers using the user bits as arbitrary payload rather than
    /// date/timezone.
    pub fn user_bits(&self) -> u32 {
        let f = &self.frame;
        (f.user1() as u32)
            | ((f.user2() as u32) << 4)
            | ((f.user3() as u32) << 8)
            | ((f.user4() as u32) << 12)
            | ((f.user5() as u32) << 16)
            | ((f.user6() as u32) << 20)
            | ((f.user7() as u32) << 24)
            | ((f.user8() as u32) << 28)
    }

    /// Unpack a 32-bit value into the eight 4-bit user fields.
    pub fn set_user_bits(&mut self, bits: u32) {
        self.frame.set_user1((bits & 0xF) as u8);
        self.frame.set_user2(((bits >> 4) & 0xF) as u8);
        self.frame.set_user3(((bits >> 8) & 0xF) as u8);
        self.frame.set_user4(((bits >> 12) & 0xF) as u8);
        self.frame.set_user5(((bits >> 16) & 0xF) as u8);
        self.frame.set_user6(((bits >> 20) & 0xF) as u8);
        self.frame.set_user7(((bits >> 24) & 0xF) as u8);
        self.frame.set_user8(((bits >> 28) & 0xF) as u8);
        self.frame.set_parity();
    }

    fn push_segment(&mut self, n: usize) -> Result<()> {
        if self.write_offset + n > self.buf.capacity() {
            log::warn!(
                "ltc encoder buffer overflow: {}/{}",
                self.write_offset + n,
                self.buf.capacity()
            );
            return Err(LtcError::BufferOverflow {
                used: self.write_offset + n,
                capacity: self.buf.capacity(),
            });
        }
        let segment = render_segment(n, self.polarity, self.hi, self.lo, self.filter_coeff);
        self.buf.truncate(self.write_offset);
        self.buf.extend_from_slice(&segment);
        self.write_offset += n;
        Ok(())
    }

    /// Render one of the 10 bytes of the current frame (`byte_index` in
    /// `0..=9`) at `speed` symbols/sample-period: positive plays the byte's
    /// bits LSB-first (forward), negative plays them MSB-first (reverse),
    /// and `|speed|` scales segment lengths for faster/slower-than-realtime
    /// playback.
    pub fn encode_byte(&mut self, byte_index: u8, speed: f64) -> Result<()> {
        if byte_index > 9 {
            return Err(LtcError::InvalidByteIndex(byte_index));
        }
        if speed == 0.0 {
            return Err(LtcError::ZeroSpeed);
        }

        let byte = self.frame.as_bytes()[byte_index as usize];
        let abs_speed = speed.abs();
        let bit_order: [u8; 8] = if speed > 0.0 {
            [0, 1, 2, 3, 4, 5, 6, 7]
        } else {
            [7, 6, 5, 4, 3, 2, 1, 0]
        };

        for bit_pos in bit_order {
            let bit_is_one = byte.bit(bit_pos as usize);
            if bit_is_one {
                for _ in 0..2 {
                    let total = self.samples_per_half * abs_speed + self.fractional_carry;
                    let n = total.floor().max(0.0) as usize;
                    self.fractional_carry = total - total.floor();
                    self.polarity = !self.polarity;
                    self.push_segment(n)?;
                }
            } else {
                let total = self.samples_per_symbol * abs_speed + self.fractional_carry;
                let n = total.floor().max(0.0) as usize;
                self.fractional_carry = total - total.floor();
                self.polarity = !self.polarity;
                self.push_segment(n)?;
            }
        }
        Ok(())
    }

    /// Render the full 10-byte frame at realtime (forward) speed.
    pub fn encode_frame(&mut self) -> Result<()> {
        for byte_index in 0..10 {
            self.encode_byte(byte_index, 1.0)?;
        }
        Ok(())
    }

    /// Emit a final polarity transition so the waveform ends on a clean
    /// symbol boundary, trimming to whatever buffer space remains rather
    /// than erroring.
    pub fn end_encode(&mut self) {
        let remaining = self.buf.capacity().saturating_sub(self.write_offset);
        let n = (self.samples_per_symbol.floor() as usize).min(remaining);
        self.polarity = !self.polarity;
        let _ = self.push_segment(n);
    }

    /// Advance the frame by one tick; see [`FrameBits::increment`].
    pub fn increment_timecode(&mut self) -> bool {
        self.frame.increment(self.fps.nominal, self.use_date)
    }

    /// Retreat the frame by one tick; see [`FrameBits::decrement`].
    pub fn decrement_timecode(&mut self) -> bool {
        self.frame.decrement(self.fps.nominal, self.use_date)
    }

    /// Number of valid samples currently in the buffer.
    pub fn buffer_size(&self) -> usize {
        self.write_offset
    }

    /// Borrow the valid portion of the buffer, optionally flushing it.
    pub fn buffer(&mut self, flush: bool) -> &[u8] {
        let len = self.write_offset;
        if flush {
            self.write_offset = 0;
        }
        &self.buf[..len]
    }

    /// Copy the valid portion of the buffer into `dst`, draining what was
    /// copied. Returns the number of samples copied.
    pub fn copy_buffer(&mut self, dst: &mut [u8]) -> usize {
        let n = self.write_offset.min(dst.len());
        dst[..n].copy_from_slice(&self.buf[..n]);
        if n == self.write_offset {
            self.buffer_flush();
        } else {
            self.buf.drain(..n);
            self.write_offset -= n;
        }
        n
    }

    /// Discard all valid samples in the buffer without reading them.
    pub fn buffer_flush(&mut self) {
        self.buf.clear();
        self.write_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder(sample_rate: u32, fps: Fps) -> Encoder {
        Encoder::new(EncoderConfig {
            sample_rate,
            fps,
            tv_standard: TvStandard::default(),
            use_date: false,
        })
    }

    #[test]
    fn encode_frame_fills_roughly_one_frame_worth_of_samples() {
        let mut enc = encoder(44_100, Fps::NTSC_30);
        enc.encode_frame().unwrap();
        let expected = (44_100.0 / 30.0).round() as usize;
        assert!((enc.buffer_size() as i64 - expected as i64).abs() <= 4);
    }

    #[test]
    fn reverse_speed_does_not_error() {
        let mut enc = encoder(48_000, Fps::PAL_25);
        for i in 0..10 {
            enc.encode_byte(i, -1.0).unwrap();
        }
    }

    #[test]
    fn zero_speed_is_rejected() {
        let mut enc = encoder(48_000, Fps::PAL_25);
        assert_eq!(enc.encode_byte(0, 0.0), Err(LtcError::ZeroSpeed));
    }

    #[test]
    fn out_of_range_byte_index_is_rejected() {
        let mut enc = encoder(48_000, Fps::PAL_25);
        assert_eq!(enc.encode_byte(10, 1.0), Err(LtcError::InvalidByteIndex(10)));
    }

    #[test]
    fn buffer_flush_empties_buffer() {
        let mut enc = encoder(48_000, Fps::PAL_25);
        enc.encode_frame().unwrap();
        assert!(enc.buffer_size() > 0);
        enc.buffer_flush();
        assert_eq!(enc.buffer_size(), 0);
    }

    #[test]
    fn copy_buffer_drains_what_was_copied() {
        let mut enc = encoder(48_000, Fps::PAL_25);
        enc.encode_frame().unwrap();
        let total = enc.buffer_size();
        let mut dst = vec![0u8; total];
        let copied = enc.copy_buffer(&mut dst);
        assert_eq!(copied, total);
        assert_eq!(enc.buffer_size(), 0);
    }

    #[test]
    fn user_bits_roundtrip() {
        let mut enc = encoder(48_000, Fps::PAL_25);
        enc.set_user_bits(0xDEADBEEF);
        assert_eq!(enc.user_bits(), 0xDEADBEEF);
    }

    #[test]
    fn drop_frame_flag_set_for_2997() {
        let enc = encoder(48_000, Fps::NTSC_DF_2997);
        assert!(enc.frame().drop_frame());
    }

    #[test]
    fn encoding_past_buffer_capacity_reports_overflow() {
        let mut enc = encoder(48_000, Fps::PAL_25);
        // One frame's worth of samples exactly fills the buffer; a second
        // frame at the same speed has nowhere left to go.
        enc.encode_frame().unwrap();
        let err = enc.encode_frame().unwrap_err();
        assert!(matches!(err, LtcError::BufferOverflow { .. }));
    }

    #[test]
    fn buffer_flush_after_overflow_allows_further_encoding() {
        let mut enc = encoder(48_000, Fps::PAL_25);
        enc.encode_frame().unwrap();
        assert!(enc.encode_frame().is_err());
        enc.buffer_flush();
        enc.encode_frame().unwrap();
    }
}
