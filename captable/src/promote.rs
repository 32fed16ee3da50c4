//! Numeric promotion, the rule that computed return types are declared with.
//!
//! [`Promote`] maps a pair of numeric types to the type their arithmetic
//! happens in: floats dominate integers, the wider of the two widths wins,
//! and mixed signedness is only defined where the signed type holds every
//! value of the unsigned one. Pairs with no rule (`u64` with any signed
//! type, signed/unsigned pairs of the same width) have no impl, so a
//! declaration naming their promotion is rejected when the wrapper is
//! generated, never when it is invoked.

use std::ops::Add;

/// The promotion of `Self` and `B`.
///
/// Implemented in both directions for every promotable pair,
/// with the same `Output` on both sides.
///
/// # Example
///
/// ```rust
/// use captable::promote::{promote_add, Promote};
///
/// fn combine<T>(field: T, arg: T) -> <T as Promote<f64>>::Output
/// where
///     T: Promote<f64>,
/// {
///     promote_add::<_, f64>(field, arg)
/// }
///
/// assert_eq!(combine(1_i64, 2_i64), 3.0_f64);
/// ```
pub trait Promote<B>: Sized {
    /// The type both operands convert into.
    type Output: Add<Output = Self::Output>;

    /// `self`, converted into the promoted type.
    fn promote(self) -> Self::Output;
}

/// The promotion of `A` and `B`, for return positions of declarations.
///
/// `Promoted<T, f64>` reads better than `<T as Promote<f64>>::Output`,
/// both name the same type.
pub type Promoted<A, B> = <A as Promote<B>>::Output;

/// Adds two `A`s in the promotion of `A` and `B`.
///
/// `B` is named only in the types, so it usually has to be spelled out,
/// as in `promote_add::<_, f64>(lhs, rhs)`.
///
/// # Example
///
/// ```rust
/// use captable::promote::promote_add;
///
/// assert_eq!(promote_add::<_, f64>(1_i64, 2_i64), 3.0_f64);
/// assert_eq!(promote_add::<_, u64>(3_u8, 4_u8), 7_u64);
/// ```
///
/// Pairs without a promotion rule are rejected at compile time:
///
/// ```compile_fail
/// use captable::promote::promote_add;
///
/// let _ = promote_add::<_, i64>(1_u64, 2_u64);
/// ```
#[inline]
pub fn promote_add<A, B>(lhs: A, rhs: A) -> A::Output
where
    A: Promote<B>,
{
    lhs.promote() + rhs.promote()
}

macro_rules! declare_promotions {
    (reflexive[$($ty:ty),* $(,)?]) => {
        $( declare_promotions!{one($ty, $ty) => $ty} )*
    };
    (symmetric $(($lhs:ty, $rhs:ty) => $promoted:ty),* $(,)?) => {
        $(
            declare_promotions!{one($lhs, $rhs) => $promoted}
            declare_promotions!{one($rhs, $lhs) => $promoted}
        )*
    };
    (one($lhs:ty, $rhs:ty) => $promoted:ty) => {
        impl Promote<$rhs> for $lhs {
            type Output = $promoted;

            #[inline]
            fn promote(self) -> $promoted {
                self as $promoted
            }
        }
    };
}

declare_promotions! {reflexive[i8, i16, i32, i64, u8, u16, u32, u64, f32, f64]}

declare_promotions! {symmetric
    // signed with signed, the wider width
    (i8, i16) => i16,
    (i8, i32) => i32,
    (i8, i64) => i64,
    (i16, i32) => i32,
    (i16, i64) => i64,
    (i32, i64) => i64,
    // unsigned with unsigned, the wider width
    (u8, u16) => u16,
    (u8, u32) => u32,
    (u8, u64) => u64,
    (u16, u32) => u32,
    (u16, u64) => u64,
    (u32, u64) => u64,
    // unsigned with a strictly wider signed type
    (u8, i16) => i16,
    (u8, i32) => i32,
    (u8, i64) => i64,
    (u16, i32) => i32,
    (u16, i64) => i64,
    (u32, i64) => i64,
    // floats dominate, 64 bit operands push `f32` up to `f64`
    (f32, f64) => f64,
    (f32, i8) => f32,
    (f32, i16) => f32,
    (f32, i32) => f32,
    (f32, i64) => f64,
    (f32, u8) => f32,
    (f32, u16) => f32,
    (f32, u32) => f32,
    (f32, u64) => f64,
    (f64, i8) => f64,
    (f64, i16) => f64,
    (f64, i32) => f64,
    (f64, i64) => f64,
    (f64, u8) => f64,
    (f64, u16) => f64,
    (f64, u32) => f64,
    (f64, u64) => f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! check_promotions {
        ($(($lhs:ident, $rhs:ident) => $promoted:ident,)*) => {
            paste::paste!{
                $(
                    #[test]
                    fn [<promotes_ $lhs _with_ $rhs>]() {
                        // The annotation checks the computed type,
                        // the assertion checks the arithmetic.
                        let promoted: $promoted =
                            promote_add::<$lhs, $rhs>(3 as $lhs, 4 as $lhs);
                        assert_eq!(promoted, 7 as $promoted);

                        let reversed: $promoted =
                            promote_add::<$rhs, $lhs>(3 as $rhs, 4 as $rhs);
                        assert_eq!(reversed, 7 as $promoted);
                    }
                )*
            }
        };
    }

    check_promotions! {
        (i8, i64) => i64,
        (i16, i32) => i32,
        (u8, u64) => u64,
        (u16, u32) => u32,
        (u8, i16) => i16,
        (u32, i64) => i64,
        (i32, f32) => f32,
        (i64, f32) => f64,
        (u64, f32) => f64,
        (u32, f64) => f64,
        (f32, f64) => f64,
        (i64, f64) => f64,
    }

    #[test]
    fn promotes_with_itself() {
        let same: u8 = promote_add::<u8, u8>(200, 55);
        assert_eq!(same, 255);

        let same: f32 = promote_add::<f32, f32>(0.5, 0.25);
        assert_eq!(same, 0.75);
    }

    #[test]
    fn promotes_the_declared_example() {
        let summed: f64 = promote_add::<_, f64>(1_i64, 2_i64);
        assert_eq!(summed, 3.0);
    }
}
