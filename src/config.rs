//! # Build-time configuration
//!
//! All timing in the quantizer is counted in sample ticks. The constants here are fixed when the firmware is built,
//! the derived tick counts are checked at compile time so that a bad edit fails the build instead of overflowing.

use crate::pitch_table;

/// The rate at which the sample pipeline is ticked, in Hertz
pub const SAMPLE_RATE_HZ: u32 = 8_000;

/// Cutoff of the input smoothing filter, in Hertz
pub const FILTER_CUTOFF_HZ: u32 = 1_000;

/// How long the gate stays high after each pitch change, in milliseconds
pub const GATE_LENGTH_MS: u32 = 12;

/// How long the panel must sit untouched before the scale is saved, in milliseconds
pub const AUTOSAVE_DELAY_MS: u32 = 15_000;

/// The gate length converted to sample ticks
pub const GATE_TICKS: u32 = ms_to_ticks(GATE_LENGTH_MS);

/// The autosave delay converted to sample ticks
pub const AUTOSAVE_TICKS: u32 = ms_to_ticks(AUTOSAVE_DELAY_MS);

/// Number of consecutive identical button readings needed to register a press or a release, in `[1..8]`
pub const DEBOUNCE_SAMPLES: u32 = 4;

/// Capacity of the button edge queue between the control loop and the sample pipeline.
///
/// `heapless` queues hold one less element than their capacity, must be a power of two.
pub const EDGE_QUEUE_LEN: usize = 8;

/// The DAC is wired so that this many codes span one semitone
pub const DAC_CODES_PER_SEMITONE: u8 = 2;

/// Filtered samples closer than this to the last accepted sample are ignored, half a semitone worth of ADC codes
pub const DEADBAND_THRESHOLD: u16 = pitch_table::HALF_SEMITONE_IN_LSBS;

/// `ms_to_ticks(ms)` is the number of sample ticks in `ms` milliseconds
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ms * SAMPLE_RATE_HZ / 1_000
}

const _: () = assert!(0 < GATE_TICKS && GATE_TICKS <= u16::MAX as u32);
const _: () = assert!(0 < AUTOSAVE_TICKS && AUTOSAVE_TICKS <= u32::MAX >> 8);
const _: () = assert!(0 < DEBOUNCE_SAMPLES && DEBOUNCE_SAMPLES <= 8);
const _: () = assert!(EDGE_QUEUE_LEN.is_power_of_two() && 2 <= EDGE_QUEUE_LEN);
const _: () = assert!(2 * FILTER_CUTOFF_HZ < SAMPLE_RATE_HZ);
const _: () =
    assert!(pitch_table::MAX_SEMITONE as u32 * DAC_CODES_PER_SEMITONE as u32 <= u8::MAX as u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_is_96_ticks_at_8k() {
        assert_eq!(GATE_TICKS, 96);
    }

    #[test]
    fn autosave_is_120k_ticks_at_8k() {
        assert_eq!(AUTOSAVE_TICKS, 120_000);
    }

    #[test]
    fn deadband_is_half_a_semitone() {
        assert_eq!(DEADBAND_THRESHOLD, 4);
    }
}
