//! Numeric value types.
//!
//! Declarative [`Modifier`](crate::Modifier)s are written in `f64`. The
//! [`Numeric`] trait lets them run against any of the common numeric value
//! types an inspectable might hold.

use std::fmt;

/// Numeric operations required by modifiers.
///
/// Conversions from `f64` into integer types round to the nearest integer
/// and saturate at the type's bounds (`NaN` becomes zero).
pub trait Numeric: Copy + PartialEq + PartialOrd + fmt::Debug + 'static {
    /// Create a value from `f64`.
    fn from_f64(f: f64) -> Self;

    /// Convert to `f64`.
    fn to_f64(self) -> f64;
}

macro_rules! impl_numeric_float {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                fn from_f64(f: f64) -> Self {
                    f as $ty
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

macro_rules! impl_numeric_int {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                fn from_f64(f: f64) -> Self {
                    f.round() as $ty
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_numeric_float!(f32, f64);
impl_numeric_int!(i32, i64, u32, u64);
