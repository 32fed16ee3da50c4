use std::any::TypeId;

use crate::{
    doc_examples::{Cistern, Meter, Turnstile},
    SD_CanUnseal, SD_Opaque,
};

#[test]
fn unsealing_returns_the_bound_subject() {
    let meter = Meter::bind(Cistern { stored: 640 }, SD_CanUnseal);

    assert_eq!(
        meter.cap_unseal::<Cistern>().ok(),
        Some(Cistern { stored: 640 }),
    );
}

#[test]
fn unsealing_as_the_wrong_type_returns_the_wrapper() {
    let meter = Meter::bind(Cistern { stored: 7 }, SD_CanUnseal);

    let err = meter.cap_unseal::<Turnstile>().err().unwrap();
    assert_eq!(err.stored_type_id(), Some(TypeId::of::<Cistern>()));
    assert_eq!(err.requested_type_id(), TypeId::of::<Turnstile>());

    // The wrapper comes back intact and stays usable.
    let meter = err.into_inner();
    assert_eq!(meter.level(), 7);
    assert_eq!(meter.cap_unseal::<Cistern>().ok(), Some(Cistern { stored: 7 }));
}

#[test]
fn unseal_ref_borrows_without_consuming() {
    let meter = Meter::bind(Cistern { stored: 12 }, SD_CanUnseal);

    assert_eq!(
        meter.cap_unseal_ref::<Cistern>().ok(),
        Some(&Cistern { stored: 12 }),
    );
    assert_eq!(meter.cap_unseal_ref::<Turnstile>().ok(), None);
    assert_eq!(meter.level(), 12);
}

#[test]
fn opaque_wrappers_never_unseal() {
    let meter = Meter::bind(Cistern { stored: 3 }, SD_Opaque);

    let err = meter.cap_unseal_ref::<Cistern>().err().unwrap();
    assert_eq!(err.stored_type_id(), None);
    assert_eq!(err.requested_type_id(), TypeId::of::<Cistern>());

    assert_eq!(meter.level(), 3);
}
