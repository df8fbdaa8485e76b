//! The 80-bit LTC frame: bit-level accessors, BCD packing, sync word,
//! parity, and BCD-cascade increment/decrement.
//!
//! Grounded on `original_source/src/ltc.h`'s `SMPTEFrame` bitfield struct and
//! `original_source/src/smpte.c`'s `SMPTEFrameIncrease`/`SMPTEFrameReset`,
//! but — per the design notes — rendered as an explicit byte array with
//! accessor functions instead of a packed bitfield, to avoid an
//! endianness-dependent layout.

pub mod timecode;

use intbits::Bits;

pub use timecode::{frame_to_timecode, timecode_to_frame, Fps, Timecode};

/// Number of bits in one LTC frame, including its 16-bit sync word.
pub const LTC_FRAME_BIT_COUNT: usize = 80;

/// LTC sync word as transmitted MSB-first on the wire: `0011_1111_1111_1101`.
pub const LTC_SYNC_WORD: u16 = 0b0011_1111_1111_1101;

/// The same sync word, mirrored bit-for-bit — this is what a decoder sees in
/// its shift register when a frame is captured in reverse playback.
pub const LTC_SYNC_WORD_REVERSED: u16 = 0b1011_1111_1111_1100;

/// In-memory little-endian constant written into bytes 8–9 of a freshly
/// reset [`FrameBits`] (mirrors `SMPTEFrameReset`'s `frame->syncWord =
/// 0xBFFC` on little-endian hosts).
const SYNC_WORD_LE_BYTES: [u8; 2] = [0xFC, 0xBF];

/// `LTC_SYNC_WORD` (`0x3FFD`, MSB-first on the wire) read back as a
/// little-endian 16-bit value once the ten wire bytes are stored in memory.
const LTC_SYNC_WORD_LE: u16 = 0xBFFC;

/// The raw 80-bit LTC frame, stored as ten bytes in wire (LSB-first) bit
/// order: bit 0 is the low bit of `bytes[0]`, bit 79 is the high bit of
/// `bytes[9]`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FrameBits {
    bytes: [u8; 10],
}

impl core::fmt::Debug for FrameBits {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "FrameBits {{ {:02}:{:02}:{:02}:{:02} user={:?} df={} }}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.frame(),
            [
                self.user1(),
                self.user2(),
                self.user3(),
                self.user4(),
                self.user5(),
                self.user6(),
                self.user7(),
                self.user8()
            ],
            self.drop_frame() as u8,
        )
    }
}

impl Default for FrameBits {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads the `len`-bit field starting at absolute bit `start`. No field in
/// the LTC layout crosses a byte boundary, so this never needs to touch two
/// bytes.
fn get_bits(bytes: &[u8; 10], start: u8, len: u8) -> u8 {
    let byte = (start / 8) as usize;
    let shift = (start % 8) as usize;
    bytes[byte].bits(shift..shift + len as usize)
}

fn set_bits(bytes: &mut [u8; 10], start: u8, len: u8, val: u8) {
    let byte = (start / 8) as usize;
    let shift = (start % 8) as usize;
    bytes[byte].set_bits(shift..shift + len as usize, val);
}

fn get_bit(bytes: &[u8; 10], index: u8) -> bool {
    bytes[(index / 8) as usize].bit((index % 8) as usize)
}

fn set_bit(bytes: &mut [u8; 10], index: u8, val: bool) {
    bytes[(index / 8) as usize].set_bit((index % 8) as usize, val);
}

macro_rules! bcd_field {
    ($get_units:ident, $set_units:ident, $get_tens:ident, $set_tens:ident,
     $get:ident, $set:ident, $units_start:expr, $units_len:expr,
     $tens_start:expr, $tens_len:expr) => {
        /// Raw BCD units digit.
        pub fn $get_units(&self) -> u8 {
            get_bits(&self.bytes, $units_start, $units_len)
        }
        /// Set the raw BCD units digit.
        pub fn $set_units(&mut self, v: u8) {
            set_bits(&mut self.bytes, $units_start, $units_len, v);
        }
        /// Raw BCD tens digit.
        pub fn $get_tens(&self) -> u8 {
            get_bits(&self.bytes, $tens_start, $tens_len)
        }
        /// Set the raw BCD tens digit.
        pub fn $set_tens(&mut self, v: u8) {
            set_bits(&mut self.bytes, $tens_start, $tens_len, v);
        }
        /// Decimal value (`units + tens * 10`).
        pub fn $get(&self) -> u8 {
            self.$get_units() + self.$get_tens() * 10
        }
        /// Set the decimal value, splitting it into BCD units/tens digits.
        pub fn $set(&mut self, v: u8) {
            self.$set_tens(v / 10);
            self.$set_units(v % 10);
        }
    };
}

macro_rules! user_nibble {
    ($name:ident, $setter:ident, $start:expr) => {
        /// 4-bit user field, free for application-defined data.
        pub fn $name(&self) -> u8 {
            get_bits(&self.bytes, $start, 4)
        }
        /// Set the 4-bit user field.
        pub fn $setter(&mut self, v: u8) {
            set_bits(&mut self.bytes, $start, 4, v & 0x0F);
        }
    };
}

impl FrameBits {
    /// A frame with every field cleared except the sync word.
    pub fn new() -> Self {
        let mut fb = Self { bytes: [0; 10] };
        fb.reset();
        fb
    }

    /// Construct a `FrameBits` from its raw ten wire bytes, bit 0 first.
    pub fn from_bytes(bytes: [u8; 10]) -> Self {
        Self { bytes }
    }

    /// The raw ten wire bytes, bit 0 first.
    pub fn as_bytes(&self) -> [u8; 10] {
        self.bytes
    }

    bcd_field!(
        frame_units,
        set_frame_units,
        frame_tens,
        set_frame_tens,
        frame,
        set_frame,
        0,
        4,
        8,
        2
    );
    bcd_field!(
        secs_units,
        set_secs_units,
        secs_tens,
        set_secs_tens,
        seconds,
        set_seconds,
        16,
        4,
        24,
        3
    );
    bcd_field!(
        mins_units,
        set_mins_units,
        mins_tens,
        set_mins_tens,
        minutes,
        set_minutes,
        32,
        4,
        40,
        3
    );
    bcd_field!(
        hours_units,
        set_hours_units,
        hours_tens,
        set_hours_tens,
        hours,
        set_hours,
        48,
        4,
        56,
        2
    );

    user_nibble!(user1, set_user1, 4);
    user_nibble!(user2, set_user2, 12);
    user_nibble!(user3, set_user3, 20);
    user_nibble!(user4, set_user4, 28);
    user_nibble!(user5, set_user5, 36);
    user_nibble!(user6, set_user6, 44);
    user_nibble!(user7, set_user7, 52);
    user_nibble!(user8, set_user8, 60);

    /// Drop-frame flag (bit 10).
    pub fn drop_frame(&self) -> bool {
        get_bit(&self.bytes, 10)
    }
    /// Set the drop-frame flag (bit 10).
    pub fn set_drop_frame(&mut self, v: bool) {
        set_bit(&mut self.bytes, 10, v);
    }

    /// Colour-frame flag (bit 11).
    pub fn colour_frame(&self) -> bool {
        get_bit(&self.bytes, 11)
    }
    /// Set the colour-frame flag (bit 11).
    pub fn set_colour_frame(&mut self, v: bool) {
        set_bit(&mut self.bytes, 11, v);
    }

    /// Biphase-mark phase-correction (parity) bit (bit 27).
    pub fn parity_bit(&self) -> bool {
        get_bit(&self.bytes, 27)
    }

    /// Binary group flag 1 (bit 43).
    pub fn binary_group_flag_1(&self) -> bool {
        get_bit(&self.bytes, 43)
    }
    /// Set binary group flag 1 (bit 43).
    pub fn set_binary_group_flag_1(&mut self, v: bool) {
        set_bit(&mut self.bytes, 43, v);
    }

    /// Reserved bit (bit 58).
    pub fn reserved_bit(&self) -> bool {
        get_bit(&self.bytes, 58)
    }

    /// Binary group flag 2 (bit 59).
    pub fn binary_group_flag_2(&self) -> bool {
        get_bit(&self.bytes, 59)
    }
    /// Set binary group flag 2 (bit 59).
    pub fn set_binary_group_flag_2(&mut self, v: bool) {
        set_bit(&mut self.bytes, 59, v);
    }

    /// The 16-bit sync word (bits 64–79), as currently stored.
    pub fn sync_word(&self) -> u16 {
        self.bytes[8] as u16 | ((self.bytes[9] as u16) << 8)
    }

    /// Whether the stored sync word matches the expected constant exactly
    /// (forward playback) — mostly useful for frames built by hand.
    pub fn has_valid_sync_word(&self) -> bool {
        self.sync_word() == LTC_SYNC_WORD_LE
    }

    /// Read a single bit (0..=79) of the frame, wire order.
    pub fn bit(&self, index: u8) -> bool {
        get_bit(&self.bytes, index)
    }

    /// Set a single bit (0..=79) of the frame, wire order.
    pub fn set_bit(&mut self, index: u8, val: bool) {
        set_bit(&mut self.bytes, index, val);
    }

    /// Zero every field, then write the canonical sync word. Clears the
    /// drop-frame bit as a side effect, matching `SMPTEFrameReset`.
    pub fn reset(&mut self) {
        self.bytes = [0; 10];
        self.bytes[8] = SYNC_WORD_LE_BYTES[0];
        self.bytes[9] = SYNC_WORD_LE_BYTES[1];
    }

    /// Recompute and write the parity bit (bit 27) so that the XOR of all
    /// 80 bits is 0 (property 2 of the testable-properties list).
    pub fn set_parity(&mut self) {
        self.set_bit(27, false);
        let mut acc = 0u8;
        for b in &self.bytes {
            acc ^= b;
        }
        let mut parity = 0u8;
        for i in 0..8 {
            parity ^= (acc >> i) & 1;
        }
        self.set_bit(27, parity == 1);
    }

    /// Pack a packed year/month/day + timezone code into the user fields,
    /// per the mapping in `original_source/src/smpte.c`'s `SMPTETimeToFrame`
    /// (`user5`/`user6` = year, `user3`/`user4` = month, `user1`/`user2` =
    /// day).
    pub(crate) fn set_date_fields(&mut self, year: u8, month: u8, day: u8) {
        self.set_user6(year / 10);
        self.set_user5(year % 10);
        self.set_user4(month / 10);
        self.set_user3(month % 10);
        self.set_user2(day / 10);
        self.set_user1(day % 10);
    }

    pub(crate) fn date_fields(&self) -> (u8, u8, u8) {
        let year = self.user5() + self.user6() * 10;
        let month = self.user3() + self.user4() * 10;
        let day = self.user1() + self.user2() * 10;
        (year, month, day)
    }

    pub(crate) fn set_timezone_code(&mut self, code: u8) {
        self.set_user7(code & 0x0F);
        self.set_user8((code & 0xF0) >> 4);
    }

    pub(crate) fn timezone_code(&self) -> u8 {
        self.user7() | (self.user8() << 4)
    }

    /// Drop-frame skip rule: at a minute boundary whose tens digit is
    /// nonzero, frame counts 0 and 1 don't exist — bump a freshly-zeroed
    /// frame count to 2. Grounded on `smpte.c`'s `skip_drop_frames`.
    fn apply_drop_frame_rule(&mut self) {
        if self.mins_units() != 0 && self.seconds() == 0 && self.frame() == 0 {
            self.set_frame(2);
        }
    }

    /// Advance the frame by one tick, cascading seconds/minutes/hours and
    /// (if `use_date`) the packed date on a 24-hour wrap. Returns `true` iff
    /// the 24-hour boundary wrapped.
    ///
    /// `fps` is the nominal integer frame count per second (e.g. 30 for
    /// both 30 fps and 29.97 df) — the cascade compares against this
    /// integer, the fractional rate only matters for audio-sample timing.
    pub fn increment(&mut self, fps: u8, use_date: bool) -> bool {
        let mut frame = self.frame();
        let mut secs = self.seconds();
        let mut mins = self.minutes();
        let mut hours = self.hours();
        let mut wrapped = false;

        frame += 1;
        if frame >= fps {
            frame = 0;
            secs += 1;
            if secs >= 60 {
                secs = 0;
                mins += 1;
                if mins >= 60 {
                    mins = 0;
                    hours += 1;
                    if hours >= 24 {
                        hours = 0;
                        wrapped = true;
                        if use_date {
                            self.advance_date();
                        }
                    }
                }
            }
        }
        self.set_frame(frame);
        self.set_seconds(secs);
        self.set_minutes(mins);
        self.set_hours(hours);

        if self.drop_frame() {
            self.apply_drop_frame_rule();
        }
        self.set_parity();
        wrapped
    }

    /// Retreat the frame by one tick; the mirror image of [`increment`].
    /// Returns `true` iff the 24-hour boundary wrapped (i.e. we went from
    /// `00:00:00:00` to `23:59:59:{fps-1}`).
    ///
    /// [`increment`]: FrameBits::increment
    pub fn decrement(&mut self, fps: u8, use_date: bool) -> bool {
        let mut frame = self.frame() as i16;
        let mut secs = self.seconds() as i16;
        let mut mins = self.minutes() as i16;
        let mut hours = self.hours() as i16;
        let mut wrapped = false;

        frame -= 1;
        if frame < 0 {
            frame = fps as i16 - 1;
            secs -= 1;
            if secs < 0 {
                secs = 59;
                mins -= 1;
                if mins < 0 {
                    mins = 59;
                    hours -= 1;
                    if hours < 0 {
                        hours = 23;
                        wrapped = true;
                        if use_date {
                            self.retreat_date();
                        }
                    }
                }
            }
        }
        self.set_frame(frame as u8);
        self.set_seconds(secs as u8);
        self.set_minutes(mins as u8);
        self.set_hours(hours as u8);

        if self.drop_frame() {
            self.apply_drop_frame_rule();
        }
        self.set_parity();
        wrapped
    }

    /// Days in `month` (1-based) for `year` (2-digit, 0..=99), applying the
    /// `year % 4 == 0 && year != 0` leap rule from `smpte.c`.
    fn days_in_month(year: u8, month: u8) -> u8 {
        const DAYS_PER_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        let mut days = DAYS_PER_MONTH[(month.clamp(1, 12) - 1) as usize];
        if month == 2 && year % 4 == 0 && year != 0 {
            days = 29;
        }
        days
    }

    fn advance_date(&mut self) {
        let (mut year, mut month, mut day) = self.date_fields();
        if month == 0 || month > 12 {
            return;
        }
        day += 1;
        if day > Self::days_in_month(year, month) {
            day = 1;
            month += 1;
            if month > 12 {
                month = 1;
                year = (year + 1) % 100;
            }
        }
        self.set_date_fields(year, month, day);
    }

    fn retreat_date(&mut self) {
        let (mut year, mut month, mut day) = self.date_fields();
        if month == 0 || month > 12 {
            return;
        }
        if day > 1 {
            day -= 1;
        } else {
            if month == 1 {
                year = if year == 0 { 99 } else { year - 1 };
            }
            month = if month == 1 { 12 } else { month - 1 };
            day = Self::days_in_month(year, month);
        }
        self.set_date_fields(year, month, day);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_fields_and_sets_sync_word() {
        let mut fb = FrameBits::from_bytes([0xFF; 10]);
        fb.reset();
        assert_eq!(fb.frame(), 0);
        assert_eq!(fb.seconds(), 0);
        assert!(!fb.drop_frame());
        assert_eq!(fb.bytes[8], SYNC_WORD_LE_BYTES[0]);
        assert_eq!(fb.bytes[9], SYNC_WORD_LE_BYTES[1]);
    }

    #[test]
    fn bcd_field_roundtrip() {
        let mut fb = FrameBits::new();
        fb.set_hours(23);
        fb.set_minutes(59);
        fb.set_seconds(58);
        fb.set_frame(24);
        assert_eq!(fb.hours(), 23);
        assert_eq!(fb.minutes(), 59);
        assert_eq!(fb.seconds(), 58);
        assert_eq!(fb.frame(), 24);
    }

    #[test]
    fn user_bits_roundtrip() {
        let mut fb = FrameBits::new();
        fb.set_user1(0xA);
        fb.set_user8(0x5);
        assert_eq!(fb.user1(), 0xA);
        assert_eq!(fb.user8(), 0x5);
    }

    #[test]
    fn parity_makes_total_xor_zero() {
        let mut fb = FrameBits::new();
        fb.set_hours(12);
        fb.set_minutes(34);
        fb.set_seconds(56);
        fb.set_frame(7);
        fb.set_parity();
        let mut acc = 0u8;
        for b in &fb.bytes {
            acc ^= b;
        }
        let mut parity = 0u8;
        for i in 0..8 {
            parity ^= (acc >> i) & 1;
        }
        assert_eq!(parity, 0);
    }

    #[test]
    fn increment_cascades_frame_to_seconds() {
        let mut fb = FrameBits::new();
        fb.set_frame(24);
        let wrapped = fb.increment(25, false);
        assert_eq!(fb.frame(), 0);
        assert_eq!(fb.seconds(), 1);
        assert!(!wrapped);
    }

    #[test]
    fn increment_wraps_day_boundary() {
        let mut fb = FrameBits::new();
        fb.set_hours(23);
        fb.set_minutes(59);
        fb.set_seconds(59);
        fb.set_frame(24);
        let wrapped = fb.increment(25, false);
        assert_eq!(fb.hours(), 0);
        assert_eq!(fb.minutes(), 0);
        assert_eq!(fb.seconds(), 0);
        assert_eq!(fb.frame(), 0);
        assert!(wrapped);
    }

    #[test]
    fn decrement_is_increment_inverse() {
        let mut fb = FrameBits::new();
        fb.set_hours(1);
        fb.set_minutes(2);
        fb.set_seconds(3);
        fb.set_frame(4);
        let before = fb;
        fb.increment(25, false);
        fb.decrement(25, false);
        assert_eq!(fb.hours(), before.hours());
        assert_eq!(fb.minutes(), before.minutes());
        assert_eq!(fb.seconds(), before.seconds());
        assert_eq!(fb.frame(), before.frame());
    }

    #[test]
    fn decrement_from_midnight_wraps_to_previous_day() {
        let mut fb = FrameBits::new();
        let wrapped = fb.decrement(25, false);
        assert_eq!(fb.hours(), 23);
        assert_eq!(fb.minutes(), 59);
        assert_eq!(fb.seconds(), 59);
        assert_eq!(fb.frame(), 24);
        assert!(wrapped);
    }

    #[test]
    fn drop_frame_skips_00_and_01_on_nonzero_minute() {
        let mut fb = FrameBits::new();
        fb.set_drop_frame(true);
        fb.set_minutes(1);
        fb.set_seconds(59);
        fb.set_frame(29);
        fb.increment(30, false);
        assert_eq!(fb.minutes(), 2);
        assert_eq!(fb.seconds(), 0);
        assert_eq!(fb.frame(), 2);
    }

    #[test]
    fn drop_frame_does_not_skip_on_tens_minute() {
        let mut fb = FrameBits::new();
        fb.set_drop_frame(true);
        fb.set_minutes(9);
        fb.set_seconds(59);
        fb.set_frame(29);
        fb.increment(30, false);
        assert_eq!(fb.minutes(), 10);
        assert_eq!(fb.seconds(), 0);
        assert_eq!(fb.frame(), 0);
    }

    #[test]
    fn leap_year_date_rollover() {
        let mut fb = FrameBits::new();
        fb.set_date_fields(24, 2, 28);
        fb.set_hours(23);
        fb.set_minutes(59);
        fb.set_seconds(59);
        fb.set_frame(24);
        fb.increment(25, true);
        assert_eq!(fb.date_fields(), (24, 2, 29));
    }
}
