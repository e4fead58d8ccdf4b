//! Free-spec entries: tests and suites named by plain strings, with
//! display names, length budgets and the disable marker applied in one
//! place.
//!
//! ```rust
//! let nodes = specsugar::build(|scope| {
//!     scope.spec("when the page loads").suite(|suite| {
//!         suite.spec("shows the greeting").test(|| {});
//!         suite.spec("!flaky on CI").test(|| {});
//!     });
//! });
//! # assert_eq!(nodes.len(), 1);
//! ```

use crate::config::{AddonDefaults, BaseDefaults, NameBudget};
use crate::name::{escape_for_display, strip_disable_marker, truncate_middle};
use crate::suite::{SuiteScope, TestConfig};

/// One named entry, finished as either a test or a suite. Created by
/// [`SuiteScope::spec`].
#[must_use = "call .test(..) or .suite(..) to register the entry"]
pub struct SpecEntry<'s, 'p> {
    scope: &'s mut SuiteScope<'p>,
    name: String,
    display_name: Option<String>,
    budget: NameBudget,
    config: TestConfig,
}

impl<'p> SuiteScope<'p> {
    /// Starts a free-spec entry. A leading `!` registers it disabled.
    pub fn spec(&mut self, name: &str) -> SpecEntry<'_, 'p> {
        SpecEntry {
            scope: self,
            name: name.to_string(),
            display_name: None,
            budget: NameBudget::default(),
            config: TestConfig::new(),
        }
    }
}

impl SpecEntry<'_, '_> {
    /// Explicit display name, used verbatim (no marker stripping).
    pub fn display_name(mut self, display_name: &str) -> Self {
        self.display_name = Some(display_name.to_string());
        self
    }

    /// Overrides the registered-name budget for this entry.
    pub fn max_name_len(mut self, max: i32) -> Self {
        self.budget.name_max = Some(max);
        self
    }

    /// Overrides the display-name budget for this entry.
    pub fn max_display_len(mut self, max: i32) -> Self {
        self.budget.display_name_max = Some(max);
        self
    }

    /// Base configuration for the entry.
    pub fn config(mut self, config: TestConfig) -> Self {
        self.config = config;
        self
    }

    fn shape(&self) -> (String, String, TestConfig) {
        let defaults = self.scope.defaults();
        shape_spec_entry(
            &self.name,
            self.display_name.as_deref(),
            self.budget,
            &defaults.freespec,
            &defaults.base,
            self.config.clone(),
        )
    }

    /// Registers the entry as a test.
    pub fn test(self, body: impl Fn() + 'static) {
        let (name, display_name, config) = self.shape();
        self.scope.test_with(&name, &display_name, config, body);
    }

    /// Registers the entry as a suite; `body` runs immediately.
    pub fn suite(self, body: impl FnOnce(&mut SuiteScope<'_>)) {
        let (name, display_name, config) = self.shape();
        self.scope.suite_with(&name, &display_name, config, body);
    }
}

/// Central name decoration for spec-named entries: marker stripping,
/// escape, truncation against one addon tier, and the derived config.
pub(crate) fn shape_spec_entry(
    raw_name: &str,
    explicit_display: Option<&str>,
    budget: NameBudget,
    addon: &AddonDefaults,
    base: &BaseDefaults,
    config: TestConfig,
) -> (String, String, TestConfig) {
    let (name_max, display_name_max) = budget.resolve(addon, base);
    let (clean, disabled) = strip_disable_marker(raw_name);
    let name = truncate_middle(&escape_for_display(clean), name_max);
    let display_source = explicit_display.unwrap_or(clean);
    let display_name = truncate_middle(&escape_for_display(display_source), display_name_max);
    let config = if disabled { config.disable() } else { config };
    (name, display_name, config)
}
