//! Type-level values passed to `bind` constructors.

/// Markers deciding whether a wrapper records the type it was bound from.
pub mod unsealing {
    use crate::subject_id::{none_subject_id, some_subject_id, SubjectIdFn};

    /// Passed to `bind` to make the wrapper unseal capable,
    /// as opposed to [`SD_Opaque`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use captable::{
    ///     doc_examples::{Cistern, Meter},
    ///     type_level::unsealing::SD_CanUnseal,
    /// };
    ///
    /// // The type annotation is purely for the reader.
    /// let meter: Meter<'static, i64> = Meter::bind(Cistern { stored: 640 }, SD_CanUnseal);
    ///
    /// assert_eq!(meter.cap_unseal_ref::<u8>().ok(), None);
    /// assert_eq!(
    ///     meter.cap_unseal_ref::<Cistern>().ok(),
    ///     Some(&Cistern { stored: 640 }),
    /// );
    /// ```
    #[allow(non_camel_case_types)]
    #[derive(Copy, Clone)]
    pub struct SD_CanUnseal;

    /// Passed to `bind` to make the wrapper record nothing about the
    /// subject's type, as opposed to [`SD_CanUnseal`].
    ///
    /// This is also the only choice for subjects that borrow
    /// non-`'static` data.
    ///
    /// # Example
    ///
    /// ```rust
    /// use captable::{
    ///     doc_examples::{Cistern, Meter},
    ///     type_level::unsealing::SD_Opaque,
    /// };
    ///
    /// let meter: Meter<'static, i64> = Meter::bind(Cistern { stored: 640 }, SD_Opaque);
    ///
    /// assert_eq!(meter.cap_unseal_ref::<u8>().ok(), None);
    ///
    /// // Because `Meter::bind` was passed `SD_Opaque`,
    /// // not even the sealed type itself can be recovered.
    /// assert_eq!(meter.cap_unseal_ref::<Cistern>().ok(), None);
    /// ```
    #[allow(non_camel_case_types)]
    #[derive(Copy, Clone)]
    pub struct SD_Opaque;

    /// Gets the function that computes the type id `bind` records for an
    /// `S` subject.
    ///
    /// The recorded id is what `cap_unseal`/`cap_unseal_ref` trust when
    /// casting back to `S`:
    ///
    /// - [`SD_CanUnseal`]: the function returns `Some(S`'s type id`)`.
    ///
    /// - [`SD_Opaque`]: the function returns `None`.
    ///
    /// # Safety
    ///
    /// `ID` must call a function that returns either `None` or the type id
    /// of `S`, an id of any other type makes unsealing cast to that type.
    pub unsafe trait GetSubjectId<S> {
        /// the function.
        const ID: SubjectIdFn;
    }

    unsafe impl<S> GetSubjectId<S> for SD_CanUnseal
    where
        S: 'static,
    {
        const ID: SubjectIdFn = SubjectIdFn::new(some_subject_id::<S>);
    }

    unsafe impl<S> GetSubjectId<S> for SD_Opaque {
        const ID: SubjectIdFn = SubjectIdFn::new(none_subject_id);
    }
}
