//! # Quantizer
//!
//! Quantizers are used to force continuous inputs into discrete output steps. Musically they are used to generate
//! in-tune outputs from various inputs.
//!
//! This quantizer operates similarly to common hardware quantizers, using 1volt/octave scaling. The user picks which
//! of the 12 notes are allowed from the front panel, and the input is snapped to the nearest allowed note.
//!
//! The search is circular: when the nearest allowed note would lie outside the range the input can reach, the same
//! note an octave away is used instead. This way every input finds a note, even right at the top or bottom of the
//! voltage range, and the output never steps down as the input rises.

use crate::{
    note::Scale,
    pitch_table::{self, AnalogCode, Semitone, MAX_SEMITONE, OCTAVE_Q8, SEMITONE_Q8},
};

/// `quantize(s, c)` is ADC code `c` snapped to the nearest note allowed by scale `s`
///
/// Ties between two equally distant notes go to the lower note index.
///
/// # Examples
///
/// ```
/// # use cv_quantizer::{note::{Note, NoteMask, Scale}, pitch_table::AnalogCode, quantizer};
/// // the very bottom of the range is C0
/// assert_eq!(quantizer::quantize(Scale::CHROMATIC, AnalogCode::new(0)).value(), 0);
///
/// // code 512 is a hair above C5
/// assert_eq!(quantizer::quantize(Scale::CHROMATIC, AnalogCode::new(512)).value(), 60);
///
/// // with only G allowed, the nearest G to C5 is the one just below it
/// let only_g = NoteMask::from_notes(&[Note::G]).scale().unwrap();
/// assert_eq!(quantizer::quantize(only_g, AnalogCode::new(512)).value(), 55);
/// ```
pub fn quantize(scale: Scale, code: AnalogCode) -> Semitone {
    let semitones_q8 = pitch_table::semitones_q8(code);
    let octave = pitch_table::octave_of(semitones_q8 >> pitch_table::FRACTIONAL_BITS);
    let octave_base_q8 = octave * OCTAVE_Q8;

    let mut smallest_distance_so_far = OCTAVE_Q8;
    let mut nearest_delta = 0;

    for note in scale.notes() {
        let mut candidate_q8 = octave_base_q8 + note.index() as i32 * SEMITONE_Q8;

        // notes above the reachable range are folded back down an octave
        if MAX_Q8 < candidate_q8 {
            candidate_q8 -= OCTAVE_Q8;
        }

        let mut delta = candidate_q8 - semitones_q8;

        // the same note an octave away might be closer, as long as it is still in range
        if delta < -HALF_OCTAVE_Q8 {
            if candidate_q8 <= MAX_Q8 - OCTAVE_Q8 {
                delta += OCTAVE_Q8;
            }
        } else if HALF_OCTAVE_Q8 < delta && OCTAVE_Q8 <= candidate_q8 {
            delta -= OCTAVE_Q8;
        }

        // strictly less-than, so that ties go to the lowest note
        if delta.abs() < smallest_distance_so_far {
            smallest_distance_so_far = delta.abs();
            nearest_delta = delta;
        }
    }

    Semitone::new(((semitones_q8 + nearest_delta) >> pitch_table::FRACTIONAL_BITS) as u8)
}

/// A quantizer with a deadband on its input is represented here.
///
/// Noise on the CV input can make the output chatter between two notes when the input sits near the boundary between
/// them. The deadband ignores input changes smaller than a threshold, the last accepted input is re-used instead.
pub struct Quantizer {
    // the last input that moved far enough to be accepted
    accepted: AnalogCode,

    // inputs closer than this to the accepted input are ignored
    deadband: u16,
}

impl Quantizer {
    /// `Quantizer::new(d)` is a new quantizer which ignores input changes smaller than `d` ADC codes
    pub fn new(deadband: u16) -> Self {
        Self {
            accepted: AnalogCode::default(),
            deadband,
        }
    }

    /// `q.convert(s, c)` is the ADC code `c` passed through the deadband and snapped to scale `s`
    ///
    /// # Examples
    ///
    /// ```
    /// # use cv_quantizer::{note::Scale, pitch_table::AnalogCode, quantizer::Quantizer};
    /// let mut q = Quantizer::new(8);
    /// let first = q.convert(Scale::CHROMATIC, AnalogCode::new(512));
    ///
    /// // small wiggles are ignored
    /// assert_eq!(q.convert(Scale::CHROMATIC, AnalogCode::new(515)), first);
    /// ```
    pub fn convert(&mut self, scale: Scale, code: AnalogCode) -> Semitone {
        if self.deadband <= code.abs_diff(self.accepted) {
            self.accepted = code;
        }

        quantize(scale, self.accepted)
    }

    /// `q.accepted()` is the input code most recently accepted through the deadband
    pub fn accepted(&self) -> AnalogCode {
        self.accepted
    }
}

/// The highest reachable semitone in Q8
const MAX_Q8: i32 = MAX_SEMITONE as i32 * SEMITONE_Q8;

const HALF_OCTAVE_Q8: i32 = OCTAVE_Q8 / 2;
