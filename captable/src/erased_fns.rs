//! The functions sealed subjects are dropped, cloned, and formatted with.
//!
//! Generated `bind` constructors monomorphize these for the subject type and
//! record them in a `SubjectFns`.

use std::{fmt, ptr::NonNull};

use crate::subject_ref::SubjectRef;

/// Drops the boxed subject.
///
/// # Safety
///
/// `ptr` must be an erased `Box<S>`, and must not be used afterwards.
pub unsafe fn drop_subject_impl<S>(ptr: NonNull<()>) {
    drop(Box::from_raw(ptr.cast::<S>().as_ptr()));
}

/// Clones the subject into a new erased box.
///
/// # Safety
///
/// The subject behind `this` must be an `S`.
pub unsafe fn clone_subject_impl<S: Clone>(this: SubjectRef<'_>) -> NonNull<()> {
    let boxed = Box::new(this.cast_into_ref::<S>().clone());
    // Box never returns null.
    NonNull::new_unchecked(Box::into_raw(boxed)).cast::<()>()
}

/// # Safety
///
/// The subject behind `this` must be an `S`.
pub unsafe fn debug_subject_impl<S: fmt::Debug>(
    this: SubjectRef<'_>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    fmt::Debug::fmt(this.cast_into_ref::<S>(), f)
}

/// # Safety
///
/// The subject behind `this` must be an `S`.
pub unsafe fn display_subject_impl<S: fmt::Display>(
    this: SubjectRef<'_>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    fmt::Display::fmt(this.cast_into_ref::<S>(), f)
}
