use std::f64::consts::TAU;

/// Phase advanced per pixel by a sine wave with the given period (in pixels).
pub fn angular_step(period: f64) -> f64 {
    TAU / period
}

/// Converts a sub-pixel offset to whole pixels, truncating toward zero.
///
/// Every displacement in the pipeline truncates rather than floors or rounds, and the drawn
/// noise depends on it.
#[inline]
pub fn px(v: f64) -> i32 {
    v as i32
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_angular_step() {
        assert_eq!(angular_step(2.0), PI);
        assert_eq!(angular_step(100.0), 2.0 * PI / 100.0);
        assert_eq!(angular_step(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_px_truncates_toward_zero() {
        assert_eq!(px(0.0), 0);
        assert_eq!(px(4.99), 4);
        assert_eq!(px(-4.99), -4);
        assert_eq!(px(-0.5), 0);
        assert_eq!(px(f64::NAN), 0);
    }
}
