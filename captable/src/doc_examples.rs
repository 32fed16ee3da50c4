/*!
Examples of `capability!{..}` generated wrappers, for the documentation.

Wrappers bound from different subjects are one type, so they store
together:

```rust
use captable::{
    doc_examples::{Cistern, Meter, Turnstile},
    prelude::*,
};

let meters: Vec<Meter<'static, i64>> = vec![
    Meter::bind(Cistern { stored: 640 }, SD_CanUnseal),
    Meter::bind(Turnstile { entries: 3 }, SD_CanUnseal),
];

assert_eq!(meters[0].level(), 640);
assert_eq!(meters[1].level(), 3);
```

Wrappers with different type arguments are distinct types:

```compile_fail
use captable::{
    doc_examples::{Cistern, Meter, Turnstile},
    prelude::*,
};

fn same_type<T>(_: &T, _: &T) {}

let over_i64 = Meter::<i64>::bind(Cistern { stored: 1 }, SD_CanUnseal);
let over_u32 = Meter::<u32>::bind(Turnstile { entries: 9 }, SD_CanUnseal);

// `Meter<'_, i64>` and `Meter<'_, u32>` do not unify.
same_type(&over_i64, &over_u32);
```
*/

use crate::*;

use std::fmt::{self, Debug, Display};

use crate::promote::{promote_add, Promote, Promoted};

/// What a subject has to provide to be wrapped in a [`Meter`].
pub trait Meterable<T> {
    /// The current level.
    fn level(&self) -> T;

    /// A human readable description.
    fn label(&self) -> String;
}

/// Shared references to a subject are subjects too,
/// which is how `SD_Opaque` wrappers bind borrowed data.
impl<'a, T, M> Meterable<T> for &'a M
where
    M: ?Sized + Meterable<T>,
{
    fn level(&self) -> T {
        M::level(*self)
    }

    fn label(&self) -> String {
        M::label(*self)
    }
}

capability! {
    /// A meter over any [`Meterable`] subject, used to show what
    /// `capability!{..}` generates in the docs.
    ///
    /// Every `Meter<'_, T>` is the same type no matter which subject it was
    /// bound from, so meters over different subjects store together.
    pub struct Meter<T> for subject: Meterable<T> + Send + Sync + Clone + Debug + Display
    where
        T: Promote<f64>
    {
        /// The subject's current level.
        fn level(&self) -> T = subject.level();

        /// The level plus `extra`, in the promotion of `T` and `f64`.
        fn level_plus(&self, extra: T) -> Promoted<T, f64> =
            promote_add::<_, f64>(subject.level(), extra);

        /// The subject's description.
        fn label(&self) -> String = subject.label();
    }
}

/// A water tank, the example subject for owned meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Cistern {
    /// How many units the tank holds right now.
    pub stored: i64,
}

impl Display for Cistern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cistern at {}", self.stored)
    }
}

impl Meterable<i64> for Cistern {
    fn level(&self) -> i64 {
        self.stored
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

/// A counting turnstile, a second subject with the same capabilities
/// as [`Cistern`].
#[derive(Debug, Clone, PartialEq)]
pub struct Turnstile {
    /// How many people came through.
    pub entries: u32,
}

impl Display for Turnstile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turnstile after {} entries", self.entries)
    }
}

impl Meterable<i64> for Turnstile {
    fn level(&self) -> i64 {
        i64::from(self.entries)
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

impl Meterable<u32> for Turnstile {
    fn level(&self) -> u32 {
        self.entries
    }

    fn label(&self) -> String {
        self.to_string()
    }
}
