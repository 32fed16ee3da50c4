use crossbeam_utils::thread::scope as scoped_thread;

use crate::{
    doc_examples::{Cistern, Meter},
    SD_CanUnseal,
};

#[test]
fn wrappers_are_shared_across_threads() {
    let meter = Meter::bind(Cistern { stored: 640 }, SD_CanUnseal);
    let meter = &meter;

    scoped_thread(|scope| {
        let level = scope.spawn(move |_| meter.level());
        let plus = scope.spawn(move |_| meter.level_plus(2));

        assert_eq!(level.join().unwrap(), 640);
        assert_eq!(plus.join().unwrap(), 642.0);
    })
    .unwrap();
}

#[test]
fn wrappers_are_sent_across_threads() {
    let meter = Meter::bind(Cistern { stored: 81 }, SD_CanUnseal);

    let label = scoped_thread(|scope| {
        scope
            .spawn(move |_| {
                assert_eq!(meter.level(), 81);
                meter.label()
            })
            .join()
            .unwrap()
    })
    .unwrap();

    assert_eq!(label, "cistern at 81");
}
