/// `round_clamped(v, max)` is `v` rounded to the nearest integer and clamped to `[0, max]`
///
/// `f32::round` isn't available without `std`, so this adds a half and truncates, which is correct for the
/// non-negative values that survive the clamp.
pub fn round_clamped(v: f32, max: u16) -> u16 {
    let v = v.max(0.0_f32).min(max as f32);
    (v + 0.5_f32) as u16
}

/// `is_almost(v1, v2, e)` is true iff `v1` is within `e` of `v2`
#[cfg(test)]
pub fn is_almost(v1: f32, v2: f32, eps: f32) -> bool {
    fabs(v1 - v2) <= eps
}

/// `fabs(v)` is the absolute value of `v`
#[cfg(test)]
pub fn fabs(v: f32) -> f32 {
    if v < 0.0 {
        -v
    } else {
        v
    }
}
