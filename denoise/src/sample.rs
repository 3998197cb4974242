//! Numeric sample types accepted by the denoising pipeline.
//!
//! Waveforms arrive as 16-bit ADC counts or as 32/64-bit floats. All
//! statistics are accumulated in `f64` and converted back to the sample type
//! on store. For `i16` that conversion truncates toward zero (and saturates at
//! the type bounds), so an even-length median of `[9, 12]` is stored as `10`.

use std::fmt::Debug;

use num_traits::AsPrimitive;

mod sealed {
    pub trait Sealed {}
    impl Sealed for i16 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A waveform sample: `i16`, `f32` or `f64`.
pub trait Sample:
    sealed::Sealed
    + Copy
    + Default
    + PartialOrd
    + Debug
    + Send
    + Sync
    + AsPrimitive<f64>
    + 'static
{
    #[inline]
    fn to_f64(self) -> f64 {
        self.as_()
    }

    /// Convert from `f64`; truncates toward zero for integer samples.
    fn from_f64(value: f64) -> Self;

    #[inline]
    fn abs_f64(self) -> f64 {
        self.to_f64().abs()
    }

    /// Square widened to `f64`.
    ///
    /// Float samples are squared in their own type first, so `f32` squares
    /// carry single-precision rounding. `i16` squares are exact either way.
    #[inline]
    fn square_f64(self) -> f64 {
        let v = self.to_f64();
        v * v
    }

    /// `self - baseline` in the sample type.
    ///
    /// Integer samples wrap on overflow, like fixed-width ADC storage.
    fn residual(self, baseline: Self) -> Self;
}

impl Sample for i16 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value.as_()
    }

    #[inline]
    fn residual(self, baseline: Self) -> Self {
        self.wrapping_sub(baseline)
    }
}

macro_rules! impl_float_sample {
    ($($t:ty),*) => {$(
        impl Sample for $t {
            #[inline]
            fn from_f64(value: f64) -> Self {
                value.as_()
            }

            #[inline]
            fn residual(self, baseline: Self) -> Self {
                self - baseline
            }

            #[inline]
            fn square_f64(self) -> f64 {
                (self * self).as_()
            }
        }
    )*};
}

impl_float_sample!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i16_from_f64_truncates_toward_zero() {
        assert_eq!(i16::from_f64(10.5), 10);
        assert_eq!(i16::from_f64(10.99), 10);
        assert_eq!(i16::from_f64(-1.5), -1);
        assert_eq!(i16::from_f64(-0.5), 0);
    }

    #[test]
    fn test_i16_from_f64_saturates() {
        assert_eq!(i16::from_f64(1e9), i16::MAX);
        assert_eq!(i16::from_f64(-1e9), i16::MIN);
    }

    #[test]
    fn test_float_from_f64_keeps_fraction() {
        assert_eq!(f32::from_f64(10.5), 10.5);
        assert_eq!(f64::from_f64(-1.25), -1.25);
    }

    #[test]
    fn test_residual() {
        assert_eq!(12i16.residual(10), 2);
        assert_eq!(i16::MIN.residual(1), i16::MAX);
        assert_eq!(1.5f32.residual(2.0), -0.5);
        assert_eq!(1.5f64.residual(-2.0), 3.5);
    }

    #[test]
    fn test_square_f64() {
        assert_eq!(i16::MIN.square_f64(), 1_073_741_824.0);
        assert_eq!(1.5f64.square_f64(), 2.25);

        let v = 0.1f32;
        assert_eq!(v.square_f64(), (v * v) as f64);
        assert_ne!(v.square_f64(), (v as f64) * (v as f64));
    }

    #[test]
    fn test_abs_f64() {
        assert_eq!((-7i16).abs_f64(), 7.0);
        assert_eq!((-0.25f32).abs_f64(), 0.25);
    }
}
