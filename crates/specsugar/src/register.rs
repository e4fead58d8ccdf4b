//! The iteration-to-registration engine shared by the data and property
//! addons.
//!
//! Expanded mode registers one test (or suite) per case as the case
//! iterator produces it, so lazy sequences stay lazy. Compacted mode folds
//! every case into a single registration named after the first case's type
//! tag and collates per-case outcomes into one verdict.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use crate::collate::{CaseFailure, OutcomeLedger};
use crate::label::{peek_type_and_replay, CaseLabel};
use crate::name::{escape_for_display, strip_disable_marker, truncate_middle};
use crate::suite::{SuiteScope, TestConfig};

/// Settings resolved from the three configuration tiers for one
/// `run`/`suites` call.
pub(crate) struct CaseSettings {
    pub compact: bool,
    pub name_max: i32,
    pub display_name_max: i32,
    pub prefix: String,
    pub config: TestConfig,
    /// Leads the compacted registration name: `[compacted]` for data,
    /// `[*]` for properties.
    pub marker: &'static str,
}

impl CaseSettings {
    fn decorate(&self, label: &str) -> String {
        if self.prefix.is_empty() {
            label.to_string()
        } else {
            format!("{} {}", self.prefix, label)
        }
    }

    /// Escaped and truncated `(name, display name)` for a decorated label.
    fn shape(&self, decorated: &str) -> (String, String) {
        let escaped = escape_for_display(decorated);
        (
            truncate_middle(&escaped, self.name_max),
            truncate_middle(&escaped, self.display_name_max),
        )
    }
}

/// Registers tests for `(label, value)` cases.
pub(crate) fn case_tests<V, I>(
    scope: &mut SuiteScope<'_>,
    cases: I,
    settings: CaseSettings,
    action: impl Fn(&V) + 'static,
) where
    V: CaseLabel + 'static,
    I: Iterator<Item = (String, V)>,
{
    if settings.compact {
        compact_test(scope, cases, settings, action);
        return;
    }
    let action = Rc::new(action);
    for (label, value) in cases {
        let (clean, disabled) = strip_disable_marker(&label);
        let (name, display_name) = settings.shape(&settings.decorate(clean));
        let config = if disabled {
            settings.config.clone().disable()
        } else {
            settings.config.clone()
        };
        let action = Rc::clone(&action);
        scope.test_with(&name, &display_name, config, move || action(&value));
    }
}

fn compact_test<V, I>(
    scope: &mut SuiteScope<'_>,
    cases: I,
    settings: CaseSettings,
    action: impl Fn(&V) + 'static,
) where
    V: CaseLabel + 'static,
    I: Iterator<Item = (String, V)>,
{
    let (tag, replay) = peek_type_and_replay(cases, |(_, value)| value.type_tag());
    let context_label = settings.decorate(&format!("{} {tag}", settings.marker));
    let (name, display_name) = settings.shape(&context_label);
    // the single body reruns every case, so the sequence is materialized
    let all: Vec<(String, V)> = replay.collect();
    scope.test_with(&name, &display_name, settings.config, move || {
        let ledger = OutcomeLedger::new();
        for (i, (label, value)) in all.iter().enumerate() {
            record_outcome(&ledger, i, label, || action(value));
        }
        if let Err(failure) = ledger.finalize(&context_label) {
            failure.raise();
        }
    });
}

/// Registers suites for `(label, value)` cases. Suite actions run at build
/// time and may borrow their environment.
pub(crate) fn case_suites<V, I>(
    scope: &mut SuiteScope<'_>,
    cases: I,
    settings: CaseSettings,
    mut action: impl FnMut(&mut SuiteScope<'_>, &V),
) where
    V: CaseLabel,
    I: Iterator<Item = (String, V)>,
{
    if settings.compact {
        let (tag, replay) = peek_type_and_replay(cases, |(_, value)| value.type_tag());
        let context_label = settings.decorate(&format!("{} {tag}", settings.marker));
        let (name, display_name) = settings.shape(&context_label);
        scope.suite_with(&name, &display_name, settings.config, |suite| {
            let ledger = OutcomeLedger::new();
            for (i, (label, value)) in replay.enumerate() {
                record_outcome(&ledger, i, &label, || action(suite, &value));
            }
            if let Err(failure) = ledger.finalize(&context_label) {
                failure.raise();
            }
        });
        return;
    }
    for (label, value) in cases {
        let (clean, disabled) = strip_disable_marker(&label);
        let (name, display_name) = settings.shape(&settings.decorate(clean));
        let config = if disabled {
            settings.config.clone().disable()
        } else {
            settings.config.clone()
        };
        scope.suite_with(&name, &display_name, config, |suite| action(suite, &value));
    }
}

fn record_outcome(ledger: &OutcomeLedger, index: usize, label: &str, case: impl FnOnce()) {
    let description = format!("{}: {label}", index + 1);
    match catch_unwind(AssertUnwindSafe(case)) {
        Ok(()) => ledger.record_success(description),
        Err(payload) => ledger.record_failure(description, CaseFailure::from_panic(payload)),
    }
}
