//! Human-readable [`Timecode`] and its conversion to/from [`FrameBits`].
//!
//! Grounded on `original_source/src/smpte.c`'s `SMPTEFrameToTime` /
//! `SMPTETimeToFrame` (date/timezone field mapping) and on
//! `src/lib.rs`'s `TimecodeFrame` / `FramesPerSecond` in the
//! `michaelhugi/rust-timecode-parser` crate (field set and naming).

use super::FrameBits;

/// A frame rate: the nominal integer frame count used for BCD-cascade
/// arithmetic, and the exact rate used for audio-sample timing math.
///
/// Drop-frame rates (29.97, 30000/1001) have a nominal count of 30 but a
/// rate just under it — the distinction matters because
/// [`FrameBits::increment`]/[`decrement`](FrameBits::decrement) compare
/// against the nominal integer, while the encoder's `samples_per_symbol`
/// math needs the exact rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fps {
    pub nominal: u8,
    pub rate: f64,
}

impl Fps {
    pub const FILM_24: Fps = Fps {
        nominal: 24,
        rate: 24.0,
    };
    pub const PAL_25: Fps = Fps {
        nominal: 25,
        rate: 25.0,
    };
    pub const NTSC_30: Fps = Fps {
        nominal: 30,
        rate: 30.0,
    };
    pub const NTSC_DF_2997: Fps = Fps {
        nominal: 30,
        rate: 30_000.0 / 1001.0,
    };

    pub const fn custom(nominal: u8, rate: f64) -> Self {
        Self { nominal, rate }
    }

    /// Whether this rate is one of the two drop-frame NTSC rates,
    /// `fps ∈ {29.97, 30000/1001}`.
    pub fn is_drop_frame(&self) -> bool {
        (self.rate - 29.97).abs() < 0.01 || (self.rate - 30_000.0 / 1001.0).abs() < 1e-6
    }
}

/// Human-readable timecode: date, time-of-day, sub-second frame, and
/// timezone.
///
/// `drop_frame` is carried here (rather than derived from `frame` alone) so
/// it round-trips through [`FrameBits::drop_frame`] — see DESIGN.md for the
/// rationale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timecode {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub frame: u8,
    pub timezone: &'static str,
    pub drop_frame: bool,
}

impl Timecode {
    /// A timecode with zeroed date/time fields and the "Greenwich" timezone.
    pub fn new(hours: u8, minutes: u8, seconds: u8, frame: u8) -> Self {
        Self {
            year: 0,
            month: 0,
            day: 0,
            hours,
            minutes,
            seconds,
            frame,
            timezone: "+0000",
            drop_frame: false,
        }
    }
}

/// SMPTE timezone codes, as per `original_source/src/smpte.c`'s
/// `SMPTETimeZones` table (`http://www.barney-wol.net/time/timecode.html`).
/// Sorted by code for a readable table; looked up linearly either way since
/// the table is tiny.
const TIMEZONES: &[(u8, &str)] = &[
    (0x00, "+0000"),
    (0x01, "-0100"),
    (0x02, "-0200"),
    (0x03, "-0300"),
    (0x04, "-0400"),
    (0x05, "-0500"),
    (0x06, "-0600"),
    (0x07, "-0700"),
    (0x08, "-0800"),
    (0x09, "-0900"),
    (0x0A, "+0030"),
    (0x0B, "-0130"),
    (0x0C, "-0230"),
    (0x0D, "-0330"),
    (0x0E, "-0430"),
    (0x0F, "-0530"),
    (0x10, "-1000"),
    (0x11, "-1100"),
    (0x12, "-1200"),
    (0x13, "+1300"),
    (0x14, "+1200"),
    (0x15, "+1100"),
    (0x16, "+1000"),
    (0x17, "+0900"),
    (0x18, "+0800"),
    (0x19, "+0700"),
    (0x1A, "-0630"),
    (0x1B, "-0730"),
    (0x1C, "-0830"),
    (0x1D, "-0930"),
    (0x1E, "-1030"),
    (0x1F, "-1130"),
    (0x20, "+0600"),
    (0x21, "+0500"),
    (0x22, "+0400"),
    (0x23, "+0300"),
    (0x24, "+0200"),
    (0x25, "+0100"),
    (0x28, "TP-03"),
    (0x29, "TP-02"),
    (0x2A, "+1130"),
    (0x2B, "+1030"),
    (0x2C, "+0930"),
    (0x2D, "+0830"),
    (0x2E, "+0730"),
    (0x2F, "+0630"),
    (0x30, "TP-01"),
    (0x31, "TP-00"),
    (0x32, "+1245"),
    (0x38, "+XXXX"),
    (0x3A, "+0530"),
    (0x3B, "+0430"),
    (0x3C, "+0330"),
    (0x3D, "+0230"),
    (0x3E, "+0130"),
    (0x3F, "+0030"),
];

fn timezone_to_code(tz: &str) -> u8 {
    TIMEZONES
        .iter()
        .find(|(_, s)| *s == tz)
        .map(|(code, _)| *code)
        .unwrap_or(0x00)
}

fn code_to_timezone(code: u8) -> &'static str {
    TIMEZONES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| *s)
        .unwrap_or("+0000")
}

/// Pack a [`Timecode`] into its [`FrameBits`] representation.
///
/// Grounded on `smpte.c`'s `SMPTETimeToFrame`, with the drop-frame skip
/// rule applied after packing.
pub fn timecode_to_frame(tc: &Timecode, use_date: bool) -> FrameBits {
    let mut fb = FrameBits::new();
    fb.set_hours(tc.hours);
    fb.set_minutes(tc.minutes);
    fb.set_seconds(tc.seconds);
    fb.set_frame(tc.frame);
    fb.set_drop_frame(tc.drop_frame);

    if use_date {
        fb.set_date_fields(tc.year, tc.month, tc.day);
        fb.set_timezone_code(timezone_to_code(tc.timezone));
    }

    // A hand-built timecode could name a skipped drop-frame count directly
    // (e.g. 00:01:00;00) — correct it the same way `increment` would.
    if fb.drop_frame() && fb.mins_units() != 0 && fb.seconds() == 0 && fb.frame() == 0 {
        fb.set_frame(2);
    }

    fb.set_parity();
    fb
}

/// Unpack a [`FrameBits`] into its human-readable [`Timecode`].
///
/// Grounded on `smpte.c`'s `SMPTEFrameToTime`.
pub fn frame_to_timecode(fb: &FrameBits, use_date: bool) -> Timecode {
    let (year, month, day) = if use_date {
        fb.date_fields()
    } else {
        (0, 0, 0)
    };
    let timezone = if use_date {
        code_to_timezone(fb.timezone_code())
    } else {
        "+0000"
    };
    Timecode {
        year,
        month,
        day,
        hours: fb.hours(),
        minutes: fb.minutes(),
        seconds: fb.seconds(),
        frame: fb.frame(),
        timezone,
        drop_frame: fb.drop_frame(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_without_date() {
        let tc = Timecode::new(12, 34, 56, 7);
        let fb = timecode_to_frame(&tc, false);
        let back = frame_to_timecode(&fb, false);
        assert_eq!(back.hours, 12);
        assert_eq!(back.minutes, 34);
        assert_eq!(back.seconds, 56);
        assert_eq!(back.frame, 7);
    }

    #[test]
    fn roundtrip_with_date_and_timezone() {
        let mut tc = Timecode::new(23, 59, 59, 0);
        tc.year = 8;
        tc.month = 12;
        tc.day = 31;
        tc.timezone = "+0100";
        let fb = timecode_to_frame(&tc, true);
        let back = frame_to_timecode(&fb, true);
        assert_eq!((back.year, back.month, back.day), (8, 12, 31));
        assert_eq!(back.timezone, "+0100");
    }

    #[test]
    fn unknown_timezone_maps_to_code_zero_and_back_to_plus_zero() {
        let mut tc = Timecode::new(0, 0, 0, 0);
        tc.timezone = "bogus";
        let fb = timecode_to_frame(&tc, true);
        assert_eq!(fb.timezone_code(), 0x00);
        let back = frame_to_timecode(&fb, true);
        assert_eq!(back.timezone, "+0000");
    }

    #[test]
    fn drop_frame_flag_survives_roundtrip() {
        let mut tc = Timecode::new(0, 1, 0, 0);
        tc.drop_frame = true;
        let fb = timecode_to_frame(&tc, false);
        assert_eq!(fb.frame(), 2);
        let back = frame_to_timecode(&fb, false);
        assert!(back.drop_frame);
    }

    #[test]
    fn fps_is_drop_frame_detection() {
        assert!(Fps::NTSC_DF_2997.is_drop_frame());
        assert!(!Fps::NTSC_30.is_drop_frame());
        assert!(!Fps::PAL_25.is_drop_frame());
    }
}
