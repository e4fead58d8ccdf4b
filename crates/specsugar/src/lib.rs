//! # specsugar — data-driven, property, free-spec and fixture test addons
//!
//! Generate suite-style tests from data collections, `proptest`
//! strategies, plain spec strings, and fixture generators. Derived names
//! stay readable: middle truncation against configurable budgets,
//! control-character escaping, a `!` disable marker, and a path-length
//! guard that fails construction before a report pipeline silently drops
//! a test.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! fn main() {
//!     specsugar::run(|scope| {
//!         scope.suite("parsing", |suite| {
//!             suite
//!                 .with_data_map([("thirteen", "13"), ("seven", "7")])
//!                 .run(|raw| {
//!                     let n: i32 = raw.parse().unwrap();
//!                     assert!(n > 0);
//!                 });
//!
//!             suite.spec("rejects garbage").test(|| {
//!                 assert!("garbage".parse::<i32>().is_err());
//!             });
//!         });
//!     });
//! }
//! ```
//!
//! Each data case registers as its own test by default; `.compact(true)`
//! folds a batch into one test that runs every case and reports a single
//! collated verdict.
//!
//! ## Features
//!
//! - `property` *(default)*: `check_all` over [`proptest`] strategies;
//!   re-exports `proptest::prelude` via [`strategies`]

pub mod runner;

mod collate;
mod config;
mod data;
mod fixture;
mod freespec;
mod label;
mod name;
mod register;
mod suite;

#[cfg(feature = "property")]
mod property;

pub use collate::{CaseFailure, CollatedFailure, FailureKind, OutcomeLedger};
pub use config::{AddonDefaults, BaseDefaults, Defaults, DEFAULT_NAME_MAX, NO_LIMIT};
pub use data::DataCases;
pub use fixture::{FixtureScope, FixtureSpec};
pub use freespec::SpecEntry;
pub use label::CaseLabel;
pub use name::{
    escape_for_display, short_type_name, strip_disable_marker, truncate_middle, DISABLE_MARKER,
    ELLIPSIS,
};
pub use suite::{
    build, build_with, check_path_len, run, run_with, PathLengthError, SuiteScope, TestBody,
    TestConfig, TestNode,
};

#[cfg(feature = "property")]
pub use property::PropertyCases;

/// Re-export of the [`proptest`] crate. Available with the `property`
/// feature.
#[cfg(feature = "property")]
pub use proptest;

/// Strategy combinators re-exported from [`proptest::prelude`].
#[cfg(feature = "property")]
pub mod strategies {
    pub use proptest::prelude::*;
}
