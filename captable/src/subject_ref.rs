use std::{fmt, marker::PhantomData, ptr::NonNull};

/// An erased `&'a S`, the subject argument of every dispatch-table function.
///
/// In a generated table the fields take `SubjectRef<'s>` at the wrapper's
/// lifetime, so an operation returning a borrow of the subject hands out a
/// `&'s`. Only [`cast_into_ref`](Self::cast_into_ref) dereferences the
/// pointer; holding a `SubjectRef` that outlived its subject is harmless.
#[repr(transparent)]
#[derive(Copy, Clone)]
pub struct SubjectRef<'a> {
    ptr: NonNull<()>,
    _marker: PhantomData<&'a ()>,
}

impl<'a> SubjectRef<'a> {
    pub(crate) const fn new(ptr: NonNull<()>) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    /// Casts back to the sealed subject type.
    ///
    /// # Safety
    ///
    /// `S` must be the exact type the subject was sealed as, and the
    /// subject must not have been dropped.
    pub unsafe fn cast_into_ref<S>(self) -> &'a S
    where
        S: 'a,
    {
        &*self.ptr.cast::<S>().as_ptr()
    }
}

impl<'a> fmt::Debug for SubjectRef<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SubjectRef").field(&self.ptr).finish()
    }
}
