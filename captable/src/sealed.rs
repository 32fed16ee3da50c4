//! The type-erased box every wrapper stores its subject in, and the
//! wrapper-level functions that are sealed alongside it.

use std::{any::TypeId, fmt, marker::PhantomData, mem::ManuallyDrop, ptr::NonNull};

use crate::{subject_id::SubjectIdFn, subject_ref::SubjectRef};

/// The wrapper-level functions recorded when a subject is sealed:
/// its destructor, its recorded type id, and the optional functions
/// `bind` registers for declarations whose bounds name
/// `Clone`/`Debug`/`Display`.
///
/// The higher-ranked function pointer fields keep this from implementing
/// `Debug`; `Copy` and `Clone` are all it needs.
#[derive(Copy, Clone)]
pub struct SubjectFns {
    type_id: SubjectIdFn,
    drop_subject: unsafe fn(NonNull<()>),
    clone_subject: Option<unsafe fn(SubjectRef<'_>) -> NonNull<()>>,
    debug_subject: Option<unsafe fn(SubjectRef<'_>, &mut fmt::Formatter<'_>) -> fmt::Result>,
    display_subject: Option<unsafe fn(SubjectRef<'_>, &mut fmt::Formatter<'_>) -> fmt::Result>,
}

impl SubjectFns {
    /// Constructs this with only the mandatory functions,
    /// the `with_*` methods register the optional ones.
    pub fn new(type_id: SubjectIdFn, drop_subject: unsafe fn(NonNull<()>)) -> Self {
        Self {
            type_id,
            drop_subject,
            clone_subject: None,
            debug_subject: None,
            display_subject: None,
        }
    }

    /// Registers the function [`SealedSubject::cloned`] calls.
    pub fn with_clone(mut self, f: unsafe fn(SubjectRef<'_>) -> NonNull<()>) -> Self {
        self.clone_subject = Some(f);
        self
    }

    /// Registers the function [`SealedSubject::fmt_debug`] calls.
    pub fn with_debug(
        mut self,
        f: unsafe fn(SubjectRef<'_>, &mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> Self {
        self.debug_subject = Some(f);
        self
    }

    /// Registers the function [`SealedSubject::fmt_display`] calls.
    pub fn with_display(
        mut self,
        f: unsafe fn(SubjectRef<'_>, &mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> Self {
        self.display_subject = Some(f);
        self
    }
}

/// An owned subject with its type erased, plus its [`SubjectFns`].
///
/// `'s` is a lower bound on what the subject borrows, wrappers over
/// owned subjects can use `'static`.
pub struct SealedSubject<'s> {
    ptr: NonNull<()>,
    fns: SubjectFns,
    _marker: PhantomData<&'s ()>,
}

impl<'s> SealedSubject<'s> {
    /// Boxes `subject` and erases its type.
    ///
    /// # Safety
    ///
    /// Every function in `fns` must have been monomorphized for `S`,
    /// and `fns.type_id` must return either `S`'s type id or `None`.
    pub unsafe fn seal<S>(subject: S, fns: SubjectFns) -> Self
    where
        S: 's,
    {
        Self {
            ptr: NonNull::new_unchecked(Box::into_raw(Box::new(subject))).cast::<()>(),
            fns,
            _marker: PhantomData,
        }
    }

    /// The erased subject, branded with the full `'s` so dispatch-table
    /// functions can return borrows at the wrapper lifetime. Dereferencing
    /// it is on [`SubjectRef::cast_into_ref`]'s terms.
    #[inline]
    pub fn subject_ref(&self) -> SubjectRef<'s> {
        SubjectRef::new(self.ptr)
    }

    /// The type id recorded when sealing,
    /// `None` if the subject was sealed with `SD_Opaque`.
    pub fn stored_type_id(&self) -> Option<TypeId> {
        self.fns.type_id.get()
    }

    /// Clones the sealed subject into a new `SealedSubject`.
    ///
    /// # Panics
    ///
    /// Panics if no clone function was registered,
    /// `bind` registers one exactly when the declared bounds include `Clone`.
    pub fn cloned(&self) -> Self {
        let clone_subject = self
            .fns
            .clone_subject
            .expect("sealing did not register a clone function");
        Self {
            ptr: unsafe { clone_subject(self.subject_ref()) },
            fns: self.fns,
            _marker: PhantomData,
        }
    }

    /// Formats the sealed subject with its `Debug` impl.
    ///
    /// # Panics
    ///
    /// Panics if no debug function was registered,
    /// `bind` registers one exactly when the declared bounds include `Debug`.
    pub fn fmt_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let debug_subject = self
            .fns
            .debug_subject
            .expect("sealing did not register a debug function");
        unsafe { debug_subject(self.subject_ref(), f) }
    }

    /// Formats the sealed subject with its `Display` impl.
    ///
    /// # Panics
    ///
    /// Panics if no display function was registered,
    /// `bind` registers one exactly when the declared bounds include `Display`.
    pub fn fmt_display(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_subject = self
            .fns
            .display_subject
            .expect("sealing did not register a display function");
        unsafe { display_subject(self.subject_ref(), f) }
    }

    /// The recorded id has to be the id of `S`,
    /// otherwise this was not sealed from an `S`.
    fn check_subject_id<S>(&self) -> Result<(), UnsealError<()>>
    where
        S: 'static,
    {
        let stored_id = self.stored_type_id();
        let requested_id = TypeId::of::<S>();
        if stored_id == Some(requested_id) {
            Ok(())
        } else {
            Err(UnsealError {
                sealed: (),
                stored_id,
                requested_id,
            })
        }
    }

    /// Attempts to move the subject back out.
    ///
    /// # Errors
    ///
    /// Returns this `SealedSubject` intact inside the error if `S` is not
    /// the sealed type, or if sealing recorded no type id.
    pub fn unseal<S>(self) -> Result<S, UnsealError<Self>>
    where
        S: 'static,
    {
        if let Err(e) = self.check_subject_id::<S>() {
            return Err(e.map(|_| self));
        }
        unsafe {
            let this = ManuallyDrop::new(self);
            Ok(*Box::from_raw(this.ptr.cast::<S>().as_ptr()))
        }
    }

    /// Attempts to borrow the subject back.
    ///
    /// # Errors
    ///
    /// Errs if `S` is not the sealed type, or if sealing recorded no type id.
    pub fn unseal_ref<S>(&self) -> Result<&S, UnsealError<()>>
    where
        S: 'static,
    {
        self.check_subject_id::<S>()?;
        unsafe { Ok(self.subject_ref().cast_into_ref::<S>()) }
    }
}

impl Drop for SealedSubject<'_> {
    fn drop(&mut self) {
        unsafe {
            (self.fns.drop_subject)(self.ptr);
        }
    }
}

//////////////////////////////////////////////////////////////////

/// Error from unsealing a subject as a type other than the sealed one,
/// with one of the `*unseal*` methods.
#[derive(Copy, Clone)]
pub struct UnsealError<C> {
    sealed: C,
    stored_id: Option<TypeId>,
    requested_id: TypeId,
}

impl<C> UnsealError<C> {
    /// Replaces the sealed value, generated `cap_unseal` methods use this
    /// to return the intact wrapper.
    pub fn map<F, U>(self, f: F) -> UnsealError<U>
    where
        F: FnOnce(C) -> U,
    {
        UnsealError {
            sealed: f(self.sealed),
            stored_id: self.stored_id,
            requested_id: self.requested_id,
        }
    }

    /// Extracts the sealed value, to handle the failure to unseal it.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.sealed
    }

    /// The type id recorded when sealing, `None` for `SD_Opaque` wrappers.
    pub fn stored_type_id(&self) -> Option<TypeId> {
        self.stored_id
    }

    /// The type id of the type that unsealing requested.
    pub fn requested_type_id(&self) -> TypeId {
        self.requested_id
    }
}

impl<C> fmt::Debug for UnsealError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnsealError")
            .field("sealed", &"<not shown>")
            .field("stored_id", &self.stored_id)
            .field("requested_id", &self.requested_id)
            .finish()
    }
}

impl<C> fmt::Display for UnsealError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl<C> std::error::Error for UnsealError<C> {}

//////////////////////////////////////////////////////////////////
