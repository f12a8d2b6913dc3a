//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Linearly interpolate between `a` and `b`, where `frac` = 0 gives `a` and `frac` = 1 gives `b`.
pub fn lerp<T>(a: T, b: T, frac: T) -> T
where
    T: Float,
{
    a + (b - a) * frac
}

/// Clamp a value into the range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    value.max(min).min(max)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// Due to floating point round-off the result can equal `rhs.abs()` when `lhs` is much smaller
/// in magnitude than `rhs` and negative.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap an angle into the range `(-pi, pi]`.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float,
{
    let pi_t = T::from(std::f64::consts::PI).unwrap_or_else(T::nan);
    let tau_t = T::from(std::f64::consts::TAU).unwrap_or_else(T::nan);

    let wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    // rem_euclid maps pi onto -pi, keep the upper bound inclusive instead
    if wrapped <= -pi_t {
        wrapped + tau_t
    } else {
        wrapped
    }
}

/// Get the signed shortest angular distance from `a` to `b`, in `(-pi, pi]`.
pub fn ang_dist<T>(a: T, b: T) -> T
where
    T: Float,
{
    wrap_pi(b - a)
}

/// Interpolate between two angles along the shortest arc, wrapping the result into `(-pi, pi]`.
pub fn lerp_angle<T>(a: T, b: T, frac: T) -> T
where
    T: Float,
{
    wrap_pi(a + ang_dist(a, b) * frac)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(0f64)).abs() < EPS);
        assert!((wrap_pi(PI) - PI).abs() < EPS);
        assert!((wrap_pi(-PI) - PI).abs() < EPS);
        assert!((wrap_pi(3.0 * PI / 2.0) + PI / 2.0).abs() < EPS);
        assert!((wrap_pi(-3.0 * PI / 2.0) - PI / 2.0).abs() < EPS);
        assert!((wrap_pi(5.0 * PI).abs() - PI).abs() < 1e-9);
    }

    #[test]
    fn test_ang_dist() {
        assert!((ang_dist(1f64, 2f64) - 1.0).abs() < EPS);
        assert!((ang_dist(2f64, 1f64) + 1.0).abs() < EPS);

        // Across the wrap point the short way round is taken
        assert!((ang_dist(PI - 0.1, -PI + 0.1) - 0.2).abs() < 1e-9);
        assert!((ang_dist(-PI + 0.1, PI - 0.1) + 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0f64, 10f64, 0.25), 2.5);
        assert_eq!(lerp(2f64, -2f64, 0.5), 0.0);
        assert_eq!(clamp(5f64, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-5f64, -1.0, 1.0), -1.0);
        assert_eq!(clamp(0.5f64, -1.0, 1.0), 0.5);

        // Halfway between 170 and -170 degrees is 180, not 0
        let mid = lerp_angle(PI - 0.2, -PI + 0.2, 0.5);
        assert!((mid.abs() - PI).abs() < 1e-9);
    }
}
