//! # Input smoothing filter
//!
//! The CV input picks up a little noise on its way to the ADC, and the ADC adds its own quantization noise. A single
//! pole lowpass at a fixed cutoff well above any musically useful CV movement smooths the raw samples before they are
//! quantized.

use crate::{
    config,
    pitch_table::{AnalogCode, ADC_MAX},
    utils::round_clamped,
};
use biquad::*;

/// A single pole lowpass filter for raw ADC samples is represented here.
pub struct SmoothingFilter {
    lpf: DirectForm1<f32>,
}

impl SmoothingFilter {
    /// `SmoothingFilter::new()` is a new filter at the configured sample rate and cutoff, starting from zero
    pub fn new() -> Self {
        Self::with_cutoff(config::SAMPLE_RATE_HZ as f32, config::FILTER_CUTOFF_HZ as f32)
    }

    /// `SmoothingFilter::with_cutoff(sr, fc)` is a new filter with sample rate `sr` and cutoff `fc`, in Hertz
    ///
    /// Cutoffs at or above `sr/2` can't be realized, the filter then passes samples through untouched.
    pub fn with_cutoff(sample_rate_hz: f32, cutoff_hz: f32) -> Self {
        Self {
            lpf: DirectForm1::<f32>::new(coeffs(sample_rate_hz.hz(), cutoff_hz.hz())),
        }
    }

    /// `f.process(c)` is the raw ADC code `c` smoothed by the filter, must be called periodically at the sample rate
    pub fn process(&mut self, code: AnalogCode) -> AnalogCode {
        let smoothed = self.lpf.run(code.value() as f32);
        AnalogCode::new(round_clamped(smoothed, ADC_MAX))
    }
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// `coeffs(fs, f0)` is the single pole lowpass filter coefficients for sample rate `fs` and cutoff frequency `f0`
fn coeffs(fs: Hertz<f32>, f0: Hertz<f32>) -> Coefficients<f32> {
    Coefficients::<f32>::from_params(Type::SinglePoleLowPass, fs, f0, 0.0_f32).unwrap_or(PASSTHROUGH)
}

const PASSTHROUGH: Coefficients<f32> = Coefficients {
    a1: 0.0_f32,
    a2: 0.0_f32,
    b0: 1.0_f32,
    b1: 0.0_f32,
    b2: 0.0_f32,
};
