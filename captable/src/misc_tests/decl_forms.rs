//! Declaration forms beyond the documentation examples: empty
//! declarations, borrowed returns, qualified bounds, and multiple
//! type parameters.

use crate::*;

use std::fmt::{Debug, Display};

use crate::promote::{promote_add, Promote};

trait Tallied {
    fn tally(&self) -> i64;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone)]
struct Row {
    hits: i64,
    name: String,
}

impl Tallied for Row {
    fn tally(&self) -> i64 {
        self.hits
    }

    fn name(&self) -> &str {
        &self.name
    }
}

capability! {
    struct Spread for row: Tallied + Send + Sync + Clone + Debug {
        fn tally(&self) -> i64 = row.tally();
        fn name(&self) -> &str = row.name();
        fn between(&self, lo: i64, hi: i64) -> bool = lo <= row.tally() && row.tally() <= hi;
        fn poke(&self) = drop(row.tally());
    }
}

#[test]
fn operations_return_borrows_of_the_subject() {
    let spread = Spread::bind(
        Row {
            hits: 31,
            name: "latch".to_string(),
        },
        SD_CanUnseal,
    );

    assert_eq!(spread.name(), "latch");
    assert_eq!(spread.tally(), 31);
    assert!(spread.between(30, 40));
    assert!(!spread.between(0, 30));
    spread.poke();
}

capability! {
    struct Mute for anything: Send {}
}

#[test]
fn empty_declarations_still_bind_and_unseal() {
    let mute = Mute::bind(0_u8, SD_CanUnseal);
    assert_eq!(mute.cap_unseal::<u8>().ok(), Some(0));
}

capability! {
    struct Shown for subject: Send + Sync + Display {
        fn chars(&self) -> usize = subject.to_string().len();
    }
}

#[test]
fn display_only_declarations_format_through_the_subject() {
    let shown = Shown::bind(907_u32, SD_CanUnseal);

    assert_eq!(format!("{}", shown), "907");
    assert_eq!(shown.chars(), 3);
}

trait Paired<A, B> {
    fn first(&self) -> A;
    fn second(&self) -> B;
}

#[derive(Debug, Clone)]
struct Minmax;

impl Paired<u8, u16> for Minmax {
    fn first(&self) -> u8 {
        3
    }

    fn second(&self) -> u16 {
        65_535
    }
}

capability! {
    struct Ends<A, B> for pair: Paired<A, B> + Send + Sync + Clone + Debug {
        fn first(&self) -> A = pair.first();
        fn second(&self) -> B = pair.second();
    }
}

#[test]
fn declarations_take_multiple_type_parameters() {
    let ends = Ends::bind(Minmax, SD_CanUnseal);

    assert_eq!(ends.first(), 3_u8);
    assert_eq!(ends.second(), 65_535_u16);
}

capability! {
    struct Plain for value: std::fmt::Debug + Send + Sync {
        fn rendered(&self) -> String = format!("{:?}", value);
    }
}

#[test]
fn qualified_bounds_are_capabilities_without_wrapper_impls() {
    let plain = Plain::bind(3.5_f64, SD_CanUnseal);
    assert_eq!(plain.rendered(), "3.5");
}

trait Counted<T> {
    fn count(&self) -> T;
}

#[derive(Debug, Clone)]
struct Votes {
    yes: u8,
}

impl Counted<u8> for Votes {
    fn count(&self) -> u8 {
        self.yes
    }
}

capability! {
    struct Tally<T> for counted: Counted<T> + Send + Sync + Clone + Debug
    where
        T: Promote<i64>
    {
        fn total_with(&self, extra: T) -> <T as Promote<i64>>::Output =
            promote_add::<_, i64>(counted.count(), extra);
    }
}

#[test]
fn integer_promotions_compute_in_the_wider_type() {
    let tally = Tally::bind(Votes { yes: 200 }, SD_CanUnseal);

    // `u8` and `i64` promote into `i64`, so the sum does not wrap.
    let total: i64 = tally.total_with(100);
    assert_eq!(total, 300);
}
