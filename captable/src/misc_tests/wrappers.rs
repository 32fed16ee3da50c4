use std::{
    fmt::{self, Display},
    sync::Arc,
};

use crate::{
    doc_examples::{Cistern, Meter, Meterable, Turnstile},
    test_utils::check_formatting_equivalence,
    SD_CanUnseal, SD_Opaque,
};

fn assert_same_type<T>(_: &T, _: &T) {}

#[test]
fn wrappers_over_distinct_subjects_are_one_type() {
    let over_cistern = Meter::bind(Cistern { stored: 640 }, SD_CanUnseal);
    let over_turnstile = Meter::<i64>::bind(Turnstile { entries: 3 }, SD_CanUnseal);

    assert_same_type(&over_cistern, &over_turnstile);

    let meters: Vec<Meter<'_, i64>> = vec![over_cistern, over_turnstile];
    let levels = meters.iter().map(|meter| meter.level()).collect::<Vec<_>>();
    assert_eq!(levels, vec![640, 3]);
}

#[test]
fn invocation_matches_the_implementation_body() {
    let cistern = Cistern { stored: 1 };
    let meter = Meter::bind(cistern.clone(), SD_CanUnseal);

    assert_eq!(meter.level(), cistern.level());
    assert_eq!(meter.label(), cistern.label());
    assert_eq!(meter.level_plus(2), 3.0_f64);
}

#[test]
fn formatting_delegates_to_the_subject() {
    let cistern = Cistern { stored: 55 };
    let meter = Meter::bind(cistern.clone(), SD_CanUnseal);

    check_formatting_equivalence(&meter, &cistern);
}

#[test]
fn cloning_clones_the_subject() {
    #[derive(Debug, Clone)]
    struct Gauge {
        depth: i64,
        tag: Arc<String>,
    }

    impl Display for Gauge {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} at {}", self.tag, self.depth)
        }
    }

    impl Meterable<i64> for Gauge {
        fn level(&self) -> i64 {
            self.depth
        }

        fn label(&self) -> String {
            (*self.tag).clone()
        }
    }

    let tag = Arc::new("well".to_string());
    let meter = Meter::bind(
        Gauge {
            depth: 9,
            tag: tag.clone(),
        },
        SD_CanUnseal,
    );
    let copied = meter.clone();

    assert_eq!(Arc::strong_count(&tag), 3);
    assert_eq!(copied.level(), 9);
    assert_eq!(copied.label(), "well");

    drop(meter);
    drop(copied);
    assert_eq!(Arc::strong_count(&tag), 1);
}

#[test]
fn borrowed_subjects_bind_behind_references() {
    let cistern = Cistern { stored: 81 };
    let meter = Meter::bind(&cistern, SD_Opaque);

    assert_eq!(meter.level(), 81);
    assert_eq!(meter.level_plus(9), 90.0_f64);
    assert_eq!(meter.label(), "cistern at 81");
}

#[test]
fn the_dispatch_table_is_copy() {
    let meter = Meter::bind(Cistern { stored: 2 }, SD_CanUnseal);

    let fns = *meter.cap_fns();
    let copied = fns;
    drop(meter);
    let _ = (fns, copied);
}
