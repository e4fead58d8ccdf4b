//! Property-style registration over [`proptest`] strategies.
//!
//! Values are drawn up front, at build time; each draw becomes either its
//! own registered test (expanded) or one iteration of a single compacted
//! test. There is no shrinking here: a failing draw fails the case it
//! named, which keeps registered names and outcomes stable.
//!
//! ```rust
//! use specsugar::strategies::*;
//!
//! let nodes = specsugar::build(|scope| {
//!     scope
//!         .check_all(0..100i32)
//!         .iterations(5)
//!         .run(|n| assert!(*n < 100));
//! });
//! # assert_eq!(nodes.len(), 5);
//! ```

use proptest::strategy::{Strategy, ValueTree};
use proptest::test_runner::TestRunner;

use crate::config::{resolve_compact, NameBudget};
use crate::label::CaseLabel;
use crate::register::{case_suites, case_tests, CaseSettings};
use crate::suite::{SuiteScope, TestConfig};

/// Fluent builder for property cases. Created by
/// [`SuiteScope::check_all`]; nothing registers until
/// [`run`](PropertyCases::run) or [`suites`](PropertyCases::suites).
#[must_use = "call .run(..) or .suites(..) to register the cases"]
pub struct PropertyCases<'s, 'p, S> {
    scope: &'s mut SuiteScope<'p>,
    strategy: S,
    iterations: Option<u32>,
    compact: Option<bool>,
    budget: NameBudget,
    prefix: String,
    config: TestConfig,
}

impl<'p> SuiteScope<'p> {
    /// Property cases drawn from a [`proptest`] strategy.
    pub fn check_all<S: Strategy>(&mut self, strategy: S) -> PropertyCases<'_, 'p, S> {
        PropertyCases {
            scope: self,
            strategy,
            iterations: None,
            compact: None,
            budget: NameBudget::default(),
            prefix: String::new(),
            config: TestConfig::new(),
        }
    }
}

impl<'s, 'p, S> PropertyCases<'s, 'p, S>
where
    S: Strategy,
    S::Value: CaseLabel,
{
    /// Overrides the number of values drawn.
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Overrides compaction for this batch.
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = Some(compact);
        self
    }

    /// Overrides the registered-name budget for this batch.
    pub fn max_name_len(mut self, max: i32) -> Self {
        self.budget.name_max = Some(max);
        self
    }

    /// Overrides the display-name budget for this batch.
    pub fn max_display_len(mut self, max: i32) -> Self {
        self.budget.display_name_max = Some(max);
        self
    }

    /// Text prepended (with one separating space) to every generated name.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Base configuration for the generated registrations.
    pub fn config(mut self, config: TestConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers one test per drawn value, or one compacted test.
    pub fn run(self, action: impl Fn(&S::Value) + 'static)
    where
        S::Value: 'static,
    {
        let settings = self.settings();
        let cases = self.draw_labelled(settings.compact);
        case_tests(self.scope, cases.into_iter(), settings, action);
    }

    /// Registers one suite per drawn value, or one compacted suite. Suite
    /// actions run immediately and may borrow their environment.
    pub fn suites(self, action: impl FnMut(&mut SuiteScope<'_>, &S::Value)) {
        let settings = self.settings();
        let cases = self.draw_labelled(settings.compact);
        case_suites(self.scope, cases.into_iter(), settings, action);
    }

    fn settings(&self) -> CaseSettings {
        let defaults = self.scope.defaults();
        let (name_max, display_name_max) = self.budget.resolve(&defaults.property, &defaults.base);
        CaseSettings {
            compact: resolve_compact(self.compact, &defaults.property, &defaults.base),
            name_max,
            display_name_max,
            prefix: self.prefix.clone(),
            config: self.config.clone(),
            marker: "[*]",
        }
    }

    /// Draws the resolved number of values and labels each one. Expanded
    /// labels carry their position (`3 of 100 i32: 42`); compacted
    /// iterations leave the position to the outcome ledger.
    fn draw_labelled(&self, compact: bool) -> Vec<(String, S::Value)> {
        let iterations = self
            .iterations
            .unwrap_or(self.scope.defaults().base.property_iterations);
        let mut runner = TestRunner::default();
        (0..iterations)
            .map(|i| {
                let value = match self.strategy.new_tree(&mut runner) {
                    Ok(tree) => tree.current(),
                    Err(reason) => panic!("specsugar: drawing a value failed: {reason}"),
                };
                let tag = value.type_tag().unwrap_or_else(|| "None".to_string());
                let label = if compact {
                    format!("{tag}: {}", value.case_label())
                } else {
                    format!("{} of {iterations} {tag}: {}", i + 1, value.case_label())
                };
                (label, value)
            })
            .collect()
    }
}
