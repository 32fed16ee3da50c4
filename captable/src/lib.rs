/*!

Uniform wrappers over subjects that share a set of capabilities.

A [`capability!{..}`](capability) declaration names a wrapper struct, the
capabilities its subjects must have, and a list of operations with inline
implementation bodies. The generated wrapper:

- is one type per declaration: wrappers bound from different subject types
    are the same type, with the same layout, so they store together in
    homogeneous collections.

- stores one bound function per operation, monomorphized for the subject
    when `bind` runs, so invoking an operation is a direct function pointer
    call, with no lookup and no branching.

- is checked when it is generated and specialized: a subject missing a
    capability, or a computed return type with no applicable promotion
    rule, is rejected at compile time, never when an operation is invoked.

- is immutable once bound: nothing can replace the subject or the
    dispatch table of an existing wrapper.

# Example

```rust
use captable::prelude::*;

use std::fmt::Debug;

/// The capabilities the wrapper needs from its subjects.
trait Stocked {
    fn on_hand(&self) -> u32;
}

#[derive(Debug, Clone)]
struct Pantry {
    jars: u32,
}

#[derive(Debug, Clone)]
struct Cellar {
    bottles: u32,
    reserved: u32,
}

impl Stocked for Pantry {
    fn on_hand(&self) -> u32 {
        self.jars
    }
}

impl Stocked for Cellar {
    fn on_hand(&self) -> u32 {
        self.bottles - self.reserved
    }
}

capability! {
    /// An inventory over any stocked subject.
    struct Inventory for stock: Stocked + Send + Sync + Clone + Debug {
        fn on_hand(&self) -> u32 = stock.on_hand();
        fn short_of(&self, target: u32) -> u32 = target.saturating_sub(stock.on_hand());
    }
}

fn main() {
    let pantry = Inventory::bind(Pantry { jars: 12 }, SD_CanUnseal);
    let cellar = Inventory::bind(Cellar { bottles: 30, reserved: 4 }, SD_CanUnseal);

    // Both wrappers are the same type, so they store together.
    let shelves: Vec<Inventory<'_>> = vec![pantry, cellar];

    assert_eq!(shelves[0].on_hand(), 12);
    assert_eq!(shelves[1].on_hand(), 26);
    assert_eq!(shelves[1].short_of(40), 14);
}
```

# Computed return types

An operation's return type may be computed from the declaration's type
parameters with the [`Promote`](promote::Promote) rule, resolved when the
wrapper is specialized:

```rust
use captable::{
    doc_examples::{Cistern, Meter},
    prelude::*,
};

// The type annotation is purely for the reader.
let meter: Meter<'_, i64> = Meter::bind(Cistern { stored: 1 }, SD_CanUnseal);

assert_eq!(meter.level(), 1_i64);
// `level_plus` returns the promotion of `i64` and `f64`.
assert_eq!(meter.level_plus(2), 3.0_f64);
assert_eq!(meter.label(), "cistern at 1");
```

# Construction errors

A subject missing a declared capability is rejected where `bind` is
called, so operations cannot fail at invocation time:

```compile_fail
use captable::prelude::*;

use std::fmt::Debug;

trait Audited {
    fn balance(&self) -> i64;
}

#[derive(Debug, Clone)]
struct Ledger;

capability! {
    struct Audit for books: Audited + Send + Sync + Clone + Debug {
        fn balance(&self) -> i64 = books.balance();
    }
}

fn main() {
    // `Ledger` does not implement `Audited`.
    let _ = Audit::bind(Ledger, SD_CanUnseal);
}
```

So is specializing a computed return type with a pair of types that have
no promotion rule:

```compile_fail
use captable::{
    prelude::*,
    promote::{promote_add, Promote},
};

use std::fmt::Debug;

trait Counted<T> {
    fn count(&self) -> T;
}

#[derive(Debug, Clone)]
struct Clicks;

impl Counted<u64> for Clicks {
    fn count(&self) -> u64 {
        3
    }
}

capability! {
    struct Tally<T> for t: Counted<T> + Send + Sync + Clone + Debug
    where
        T: Promote<i64>
    {
        fn total(&self, extra: T) -> <T as Promote<i64>>::Output =
            promote_add::<_, i64>(t.count(), extra);
    }
}

fn main() {
    // `u64` and `i64` have no promotion rule.
    let _ = Tally::<u64>::bind(Clicks, SD_CanUnseal);
}
```

# The declaration, item by item

```text
capability! {
    /// Attributes and a visibility, applied to the wrapper struct.
    pub struct Name<T> for subject: SomeTrait<T> + Send + Clone
    where
        T: SomeBound
    {
        fn operation(&self, param: T) -> Ret = body_expression;
    }
}
```

- `for subject:` names the binding the implementation bodies see the
    subject through, as `&SubjectType`.

- The bounds after it are the subject's capabilities. Naming `Send`,
    `Sync`, `Clone`, `Debug`, or `Display` among them also implements
    that trait for the wrapper itself, delegating to the subject.

- Operations take `&self` plus any number of parameters, and their
    bodies may use the subject binding, the parameters, and the
    declaration's type parameters. Operations are in declaration order in
    the generated dispatch table.

- An operation may return a borrow of the subject, `fn name(&self) -> &str`
    style. Such an operation cannot also take reference parameters; the
    macro rejects that combination.

A declaration expands to the wrapper struct `Name`, its dispatch table
struct `NameFns`, and a module `Name_capability` that both are
re-exported from. The wrapper's constructor is
`Name::bind(subject, unseal)`, where `unseal` is
[`SD_CanUnseal`](type_level::unsealing::SD_CanUnseal) or
[`SD_Opaque`](type_level::unsealing::SD_Opaque), and the wrapper-level
methods are prefixed with `cap_` so they cannot collide with operations.

The wrapper takes one lifetime parameter before the declared type
parameters, a lower bound on what the subject borrows: `Name<'static, T>`
for owned subjects, and for a subject behind `&'a S` the wrapper is a
`Name<'a, T>` that cannot outlive the borrow.

*/

#![allow(unused_unsafe)]
#![warn(rust_2018_idioms)]

// Generated code names this crate `captable` even when it expands inside it.
extern crate self as captable;

pub use captable_derive::capability;

#[cfg(test)]
#[macro_use]
mod test_utils;

pub mod doc_examples;
mod erased_fns;
pub mod promote;
mod sealed;
mod subject_id;
mod subject_ref;
pub mod type_level;

#[cfg(test)]
mod misc_tests;

#[doc(hidden)]
pub mod __cap_re {
    pub use std::marker::PhantomData;

    pub use crate::{
        erased_fns::{
            clone_subject_impl, debug_subject_impl, display_subject_impl, drop_subject_impl,
        },
        sealed::{SealedSubject, SubjectFns, UnsealError},
        subject_id::SubjectIdFn,
        subject_ref::SubjectRef,
        type_level::unsealing::GetSubjectId,
    };
}

/// A prelude for modules declaring and binding wrappers.
pub mod prelude {
    pub use crate::{
        capability,
        promote::{promote_add, Promote, Promoted},
        type_level::unsealing::{SD_CanUnseal, SD_Opaque},
    };
}

pub use crate::type_level::unsealing::{SD_CanUnseal, SD_Opaque};

pub use crate::{
    sealed::{SealedSubject, SubjectFns, UnsealError},
    subject_id::SubjectIdFn,
    subject_ref::SubjectRef,
};
