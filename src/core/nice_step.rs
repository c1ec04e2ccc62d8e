/// Default number of value-axis intervals the range builder aims for.
pub const DEFAULT_TARGET_TICKS: u32 = 4;

/// Rounds a rough step up to `{1, 2, 5, 10} × 10^n`.
///
/// Returns `0.0` for non-finite or non-positive input instead of propagating
/// `NaN` from `log10`.
#[must_use]
pub fn nice_step(rough_step: f64) -> f64 {
    if !rough_step.is_finite() || rough_step <= 0.0 {
        return 0.0;
    }

    let magnitude = 10f64.powf(rough_step.log10().floor());
    let residual = rough_step / magnitude;

    let multiplier = if residual > 5.0 {
        10.0
    } else if residual > 2.0 {
        5.0
    } else if residual > 1.0 {
        2.0
    } else {
        1.0
    };
    multiplier * magnitude
}

/// Smallest multiple of the nice step for `span / target_ticks` that covers `span`.
#[must_use]
pub fn nice_ceil(span: f64, target_ticks: u32) -> f64 {
    let ticks = f64::from(target_ticks.max(1));
    let step = nice_step(span / ticks);
    if step == 0.0 {
        return 0.0;
    }
    (span / step).ceil() * step
}
