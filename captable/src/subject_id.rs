use std::any::TypeId;

/// A function pointer compared by the value it returns.
///
/// Monomorphized function addresses may be distinct or merged across
/// codegen units, so the recorded id is recovered by calling the function,
/// never by comparing addresses.
#[derive(Debug, Copy, Clone)]
pub struct SubjectIdFn {
    function: fn() -> Option<TypeId>,
}

impl SubjectIdFn {
    pub(crate) const fn new(function: fn() -> Option<TypeId>) -> Self {
        Self { function }
    }

    /// The type id recorded at sealing time, `None` for opaque seals.
    pub fn get(&self) -> Option<TypeId> {
        (self.function)()
    }
}

impl PartialEq for SubjectIdFn {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for SubjectIdFn {}

pub(crate) fn some_subject_id<S: 'static>() -> Option<TypeId> {
    Some(TypeId::of::<S>())
}

pub(crate) fn none_subject_id() -> Option<TypeId> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compares_by_returned_id() {
        let a = SubjectIdFn::new(some_subject_id::<String>);
        let b = SubjectIdFn::new(some_subject_id::<String>);
        let c = SubjectIdFn::new(some_subject_id::<u32>);
        let none = SubjectIdFn::new(none_subject_id);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, none);
        assert_eq!(none, SubjectIdFn::new(none_subject_id));
        assert_eq!(a.get(), Some(TypeId::of::<String>()));
        assert_eq!(none.get(), None);
    }
}
