//! Interval estimates for failure rates.

/// z for a two-sided 95% interval.
pub const Z_95: f64 = 1.959_963_984_540_054;

/// Agresti–Coull interval for `successes` out of `trials`, clamped to
/// [0, 1]. With no trials the interval is the whole of [0, 1].
pub fn agresti_coull(successes: u64, trials: u64, z: f64) -> (f64, f64) {
    if trials == 0 {
        return (0.0, 1.0);
    }
    let z2 = z * z;
    let n = trials as f64 + z2;
    let p = (successes as f64 + z2 / 2.0) / n;
    let half = z * (p * (1.0 - p) / n).sqrt();
    ((p - half).max(0.0), (p + half).min(1.0))
}
