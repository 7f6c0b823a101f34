//! Type aliases for common value types.
//!
//! Each public generic type gets one alias per value type, suffixed
//! `B` (`bool`), `F` (`f32`), `D` (`f64`), `I` (`i32`), `U` (`u32`),
//! `ULL` (`u64`) and `LL` (`i64`).
//!
//! ```rust
//! use inspectable::aliases::{InspectableF, TransformationF};
//!
//! let speed = InspectableF::new(5.0);
//! let slow = TransformationF::from_fn(|v| *v -= 1.0);
//! speed.add_transformation(&slow, true);
//! assert_eq!(speed.get_value(false), 4.0);
//! ```

use crate::inspectable::Inspectable;
use crate::scoped::{ScopedIdentityChangedFn, ScopedTransformation, ScopedValueChangedFn};
use crate::transformation::Transformation;

macro_rules! value_aliases {
    ($generic:ident { $($alias:ident => $ty:ty),* $(,)? }) => {
        $(pub type $alias = $generic<$ty>;)*
    };
    ($generic:ident<$lt:lifetime> { $($alias:ident => $ty:ty),* $(,)? }) => {
        $(pub type $alias<$lt> = $generic<$lt, $ty>;)*
    };
}

value_aliases!(Inspectable {
    InspectableB => bool,
    InspectableF => f32,
    InspectableD => f64,
    InspectableI => i32,
    InspectableU => u32,
    InspectableULL => u64,
    InspectableLL => i64,
});

value_aliases!(Transformation {
    TransformationB => bool,
    TransformationF => f32,
    TransformationD => f64,
    TransformationI => i32,
    TransformationU => u32,
    TransformationULL => u64,
    TransformationLL => i64,
});

value_aliases!(ScopedTransformation<'a> {
    ScopedTransformationB => bool,
    ScopedTransformationF => f32,
    ScopedTransformationD => f64,
    ScopedTransformationI => i32,
    ScopedTransformationU => u32,
    ScopedTransformationULL => u64,
    ScopedTransformationLL => i64,
});

value_aliases!(ScopedValueChangedFn<'a> {
    ScopedValueChangedFnB => bool,
    ScopedValueChangedFnF => f32,
    ScopedValueChangedFnD => f64,
    ScopedValueChangedFnI => i32,
    ScopedValueChangedFnU => u32,
    ScopedValueChangedFnULL => u64,
    ScopedValueChangedFnLL => i64,
});

value_aliases!(ScopedIdentityChangedFn<'a> {
    ScopedIdentityChangedFnB => bool,
    ScopedIdentityChangedFnF => f32,
    ScopedIdentityChangedFnD => f64,
    ScopedIdentityChangedFnI => i32,
    ScopedIdentityChangedFnU => u32,
    ScopedIdentityChangedFnULL => u64,
    ScopedIdentityChangedFnLL => i64,
});
