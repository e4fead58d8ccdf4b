//! Data-driven registration: one test or suite per data case.
//!
//! ```rust
//! let nodes = specsugar::build(|scope| {
//!     scope.suite("parsing", |suite| {
//!         suite
//!             .with_data_map([("thirteen", 13i32), ("seven", 7)])
//!             .run(|n| assert!(*n > 0));
//!     });
//! });
//! # assert_eq!(nodes.len(), 1);
//! ```

use crate::config::{resolve_compact, NameBudget};
use crate::label::CaseLabel;
use crate::register::{case_suites, case_tests, CaseSettings};
use crate::suite::{SuiteScope, TestConfig};

/// Fluent builder for a batch of data cases. Created by
/// [`SuiteScope::with_data`] and friends; nothing registers until
/// [`run`](DataCases::run) or [`suites`](DataCases::suites).
#[must_use = "call .run(..) or .suites(..) to register the cases"]
pub struct DataCases<'s, 'p, V, I>
where
    I: Iterator<Item = (String, V)>,
{
    scope: &'s mut SuiteScope<'p>,
    cases: I,
    compact: Option<bool>,
    budget: NameBudget,
    prefix: String,
    config: TestConfig,
}

impl<'p> SuiteScope<'p> {
    /// Data cases labelled by their own display form.
    pub fn with_data<V, D>(
        &mut self,
        data: D,
    ) -> DataCases<'_, 'p, V, impl Iterator<Item = (String, V)>>
    where
        V: CaseLabel,
        D: IntoIterator<Item = V>,
    {
        DataCases::new(self, data.into_iter().map(|value| (value.case_label(), value)))
    }

    /// Data cases with explicit labels.
    pub fn with_data_map<V, K, D>(
        &mut self,
        data: D,
    ) -> DataCases<'_, 'p, V, impl Iterator<Item = (String, V)>>
    where
        V: CaseLabel,
        K: Into<String>,
        D: IntoIterator<Item = (K, V)>,
    {
        DataCases::new(self, data.into_iter().map(|(key, value)| (key.into(), value)))
    }

    /// Data cases labelled through `name_fn`.
    pub fn with_data_by<V, D, F>(
        &mut self,
        name_fn: F,
        data: D,
    ) -> DataCases<'_, 'p, V, impl Iterator<Item = (String, V)>>
    where
        V: CaseLabel,
        D: IntoIterator<Item = V>,
        F: Fn(&V) -> String,
    {
        DataCases::new(
            self,
            data.into_iter().map(move |value| (name_fn(&value), value)),
        )
    }
}

impl<'s, 'p, V, I> DataCases<'s, 'p, V, I>
where
    V: CaseLabel,
    I: Iterator<Item = (String, V)>,
{
    fn new(scope: &'s mut SuiteScope<'p>, cases: I) -> Self {
        Self {
            scope,
            cases,
            compact: None,
            budget: NameBudget::default(),
            prefix: String::new(),
            config: TestConfig::new(),
        }
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

    fn settings(&self) -> CaseSettings {
        let defaults = self.scope.defaults();
        let (name_max, display_name_max) = self.budget.resolve(&defaults.datatest, &defaults.base);
        CaseSettings {
            compact: resolve_compact(self.compact, &defaults.datatest, &defaults.base),
            name_max,
            display_name_max,
            prefix: self.prefix.clone(),
            config: self.config.clone(),
            marker: "[compacted]",
        }
    }

    /// Registers one test per case, or one compacted test.
    pub fn run(self, action: impl Fn(&V) + 'static)
    where
        V: 'static,
    {
        let settings = self.settings();
        case_tests(self.scope, self.cases, settings, action);
    }

    /// Registers one suite per case, or one compacted suite. Suite actions
    /// run immediately and may borrow their environment.
    pub fn suites(self, action: impl FnMut(&mut SuiteScope<'_>, &V)) {
        let settings = self.settings();
        case_suites(self.scope, self.cases, settings, action);
    }
}
