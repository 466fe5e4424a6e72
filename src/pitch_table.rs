//! # Pitch lookup tables
//!
//! The CV input is scaled by an opamp stage with a gain of `0.499` before it hits a 10 bit ADC referenced to 5 volts,
//! so the full ADC range spans a little over 10 octaves at 1volt/octave.
//!
//! Rather than do any division at sample rate, every ADC code is converted ahead of time into a fixed point number of
//! semitones with 8 fractional bits (Q8). Whole semitone numbers are then split into octave and note with two more
//! small tables. All of the tables are built at compile time.

use crate::note::Note;

/// An analog sample, the raw ADC code of the CV input, is represented here.
///
/// Codes are always in `[0..ADC_MAX]`, larger values are clamped when the code is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogCode(u16);

impl AnalogCode {
    /// `AnalogCode::new(c)` is a new code from the raw ADC reading `c` clamped to `[0..ADC_MAX]`
    pub const fn new(code: u16) -> Self {
        Self(if code <= ADC_MAX { code } else { ADC_MAX })
    }

    /// `c.value()` is the raw code
    pub const fn value(self) -> u16 {
        self.0
    }

    /// `c.abs_diff(other)` is the distance between two codes
    pub const fn abs_diff(self, other: Self) -> u16 {
        self.0.abs_diff(other.0)
    }
}

impl From<u16> for AnalogCode {
    fn from(code: u16) -> Self {
        Self::new(code)
    }
}

/// A quantized pitch in whole semitones above the bottom of the input range is represented here.
///
/// Semitones are always in `[0..MAX_SEMITONE]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Semitone(u8);

impl Semitone {
    /// `Semitone::new(s)` is a new semitone number from `s` clamped to `[0..MAX_SEMITONE]`
    pub const fn new(s: u8) -> Self {
        Self(if s <= MAX_SEMITONE { s } else { MAX_SEMITONE })
    }

    /// `s.value()` is the semitone number
    pub const fn value(self) -> u8 {
        self.0
    }

    /// `s.octave()` is the octave that semitone `s` falls in
    pub fn octave(self) -> u8 {
        OCTAVE_TABLE[self.0 as usize]
    }

    /// `s.note()` is the note within the octave that semitone `s` falls on
    pub fn note(self) -> Note {
        Note::new(NOTE_TABLE[self.0 as usize])
    }
}

/// `semitones_q8(c)` is ADC code `c` converted to semitones with 8 fractional bits
pub fn semitones_q8(code: AnalogCode) -> i32 {
    PITCH_TABLE[code.0 as usize] as i32
}

/// `octave_of(s)` is the octave of whole semitone number `s`, `s` is clamped to `[0..MAX_SEMITONE]`
pub fn octave_of(semitone: i32) -> i32 {
    OCTAVE_TABLE[semitone.clamp(0, MAX_SEMITONE as i32) as usize] as i32
}

/// The number of bits the ADC converts with
pub const ADC_BITS: u32 = 10;

/// The number of distinct ADC codes
pub const NUM_ADC_CODES: usize = 1 << ADC_BITS;

/// The largest code the ADC can produce
pub const ADC_MAX: u16 = (NUM_ADC_CODES - 1) as u16;

/// ADC reference voltage in millivolts
pub const V_REF_MILLIVOLTS: u64 = 5_000;

/// Gain of the CV input stage in thousandths, the input is attenuated by `0.499` before conversion
pub const CV_IN_GAIN_PERMILLE: u64 = 499;

/// The number of fractional bits used for fixed point semitones
pub const FRACTIONAL_BITS: u32 = 8;

/// One semitone in Q8
pub const SEMITONE_Q8: i32 = 1 << FRACTIONAL_BITS;

/// One octave in Q8
pub const OCTAVE_Q8: i32 = 12 * SEMITONE_Q8;

/// The highest whole semitone that the input can reach, `floor(ADC_MAX * volts_per_lsb * 12)`
pub const MAX_SEMITONE: u8 = (ADC_MAX as u64 * SEMITONES_PER_LSB_NUM / SEMITONES_PER_LSB_DEN) as u8;

/// Half a semitone expressed as a whole number of ADC codes, rounded down
pub const HALF_SEMITONE_IN_LSBS: u16 = (SEMITONES_PER_LSB_DEN / (2 * SEMITONES_PER_LSB_NUM)) as u16;

// semitones per ADC code as an exact fraction: 12 * V_REF / (GAIN * 2^ADC_BITS)
// scaled by 1000 on both sides to keep everything integer
const SEMITONES_PER_LSB_NUM: u64 = 12 * V_REF_MILLIVOLTS;
const SEMITONES_PER_LSB_DEN: u64 = CV_IN_GAIN_PERMILLE * NUM_ADC_CODES as u64;

const NUM_SEMITONES: usize = MAX_SEMITONE as usize + 1;

/// ADC code to Q8 semitones, rounded to nearest
static PITCH_TABLE: [i16; NUM_ADC_CODES] = build_pitch_table();

/// Whole semitone to octave number
static OCTAVE_TABLE: [u8; NUM_SEMITONES] = build_octave_table();

/// Whole semitone to note within the octave
static NOTE_TABLE: [u8; NUM_SEMITONES] = build_note_table();

const fn build_pitch_table() -> [i16; NUM_ADC_CODES] {
    let num = SEMITONES_PER_LSB_NUM << FRACTIONAL_BITS;
    let den = SEMITONES_PER_LSB_DEN;

    let mut table = [0; NUM_ADC_CODES];
    let mut code = 0;
    while code < NUM_ADC_CODES {
        table[code] = ((code as u64 * num + den / 2) / den) as i16;
        code += 1;
    }
    table
}

const fn build_octave_table() -> [u8; NUM_SEMITONES] {
    let mut table = [0; NUM_SEMITONES];
    let mut s = 0;
    while s < NUM_SEMITONES {
        table[s] = (s / 12) as u8;
        s += 1;
    }
    table
}

const fn build_note_table() -> [u8; NUM_SEMITONES] {
    let mut table = [0; NUM_SEMITONES];
    let mut s = 0;
    while s < NUM_SEMITONES {
        table[s] = (s % 12) as u8;
        s += 1;
    }
    table
}

// the top of the table must still fit in an i16
const _: () = assert!((ADC_MAX as u64 * SEMITONES_PER_LSB_NUM << FRACTIONAL_BITS) / SEMITONES_PER_LSB_DEN < 0x7FFF);
