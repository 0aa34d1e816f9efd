//! Smooth escape-time kernel for the quadratic map `z -> z^2 + c`.

use num_complex::Complex64;

/// Smooth escape counts are divided by this so that colouring can use a fixed period.
pub const ESCAPE_SCALE: f64 = 64.0;

/// Outcome of iterating a single parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Escape {
    /// Renormalized escape count, already divided by [`ESCAPE_SCALE`].
    Escaped(f64),
    /// The orbit stayed inside the escape radius for the whole iteration budget.
    #[default]
    Interior,
}

impl Escape {
    pub fn is_interior(&self) -> bool {
        matches!(self, Escape::Interior)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Escape::Escaped(value) => Some(*value),
            Escape::Interior => None,
        }
    }
}

/**
Iterate `z_{n+1} = z_n^2 + c` from `z_0 = 0`.

The orbit is tested before each step, so `z_i` is checked on iteration `i`
for `i` in `0..max_iter`. The first `z_i` with `|z_i| >= esc_radius` yields the
renormalized count `(i + 1 - log2(log2(|z_i|))) / 64`, which varies continuously
across iteration bands.

`esc_radius` must be greater than 1, otherwise `log2(log2(|z_i|))` is undefined.
Callers go through [`crate::params::RenderParameters`], which enforces this.

If squaring overflows before the radius test fires, the orbit counts as escaped
at that iteration with `|z_i|` taken as `f64::MAX`, so the value stays finite.
*/
pub fn escape_time(c: Complex64, max_iter: u32, esc_radius: f64) -> Escape {
    let mut z = Complex64::new(0.0, 0.0);

    for i in 0..max_iter {
        let mut modulus = z.norm();
        if !modulus.is_finite() {
            modulus = f64::MAX;
        }
        if modulus >= esc_radius {
            let smooth = f64::from(i) + 1.0 - modulus.log2().log2();
            return Escape::Escaped(smooth / ESCAPE_SCALE);
        }

        z = z * z + c;
    }

    Escape::Interior
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_cardioid_centre_never_escapes() {
        for max_iter in [1, 16, 256, 4096] {
            assert_eq!(
                escape_time(Complex64::new(0.0, 0.0), max_iter, 100.0),
                Escape::Interior
            );
        }
    }

    #[test]
    fn tip_of_real_axis_stays_bounded() {
        // The orbit of -2 is 0, -2, 2, 2, ... and never exceeds the radius.
        for max_iter in [1, 64, 2048] {
            assert!(escape_time(Complex64::new(-2.0, 0.0), max_iter, 100.0).is_interior());
        }
    }

    #[test]
    fn one_escapes_quickly() {
        // 0, 1, 2, 5, 26, 677: first crossing of 100 is z_5.
        let escape = escape_time(Complex64::new(1.0, 0.0), 256, 100.0);
        let expected = (6.0 - 677f64.log2().log2()) / ESCAPE_SCALE;
        assert_eq!(escape, Escape::Escaped(expected));
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let c = Complex64::new(-0.743_643_887, 0.131_825_904);
        let first = escape_time(c, 2048, 100.0);
        for _ in 0..8 {
            let again = escape_time(c, 2048, 100.0);
            match (first, again) {
                (Escape::Escaped(a), Escape::Escaped(b)) => assert_eq!(a.to_bits(), b.to_bits()),
                (a, b) => assert_eq!(a, b),
            }
        }
    }

    #[test]
    fn budget_too_small_to_see_escape_is_interior() {
        // c = 1 first crosses 100 on iteration 5.
        assert!(escape_time(Complex64::new(1.0, 0.0), 5, 100.0).is_interior());
        assert!(!escape_time(Complex64::new(1.0, 0.0), 6, 100.0).is_interior());
    }

    #[test]
    fn overflowing_orbit_escapes_with_finite_value() {
        // z_1 = 1e160 is inside the radius, z_2 overflows.
        let escape = escape_time(Complex64::new(1e160, 0.0), 256, 1e200);
        let expected = (3.0 - f64::MAX.log2().log2()) / ESCAPE_SCALE;
        assert_eq!(escape, Escape::Escaped(expected));
        assert!(expected.is_finite());

        // Both parts overflow, so the real part goes NaN.
        let escape = escape_time(Complex64::new(1e160, 1e160), 256, 1e200);
        assert!(escape.value().is_some_and(f64::is_finite));
    }

    #[test]
    fn default_is_interior() {
        assert_eq!(Escape::default(), Escape::Interior);
    }

    #[test]
    fn later_escapes_have_larger_values() {
        let fast = escape_time(Complex64::new(1.0, 0.0), 256, 100.0).value().unwrap();
        let slow = escape_time(Complex64::new(0.3, 0.0), 256, 100.0).value().unwrap();
        assert!(fast > 0.0);
        assert!(slow > fast);
    }
}
