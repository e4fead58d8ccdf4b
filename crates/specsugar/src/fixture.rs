//! Fixture-backed registration: test bodies receive freshly generated
//! values.
//!
//! ```rust
//! let nodes = specsugar::build(|scope| {
//!     scope.with_fixture(|| Vec::<i32>::new(), |fx| {
//!         fx.test("starts empty", |v| assert!(v.is_empty()));
//!         fx.test("is fresh per test", |v| assert_eq!(v.len(), 0));
//!     });
//! });
//! # assert_eq!(nodes.len(), 2);
//! ```

use std::rc::Rc;

use crate::config::NameBudget;
use crate::freespec::shape_spec_entry;
use crate::name::{escape_for_display, truncate_middle};
use crate::suite::{SuiteScope, TestConfig};

/// Registration scope whose tests receive a fresh generated value per
/// execution. Created by [`SuiteScope::with_fixture`].
pub struct FixtureScope<'s, 'p, T> {
    scope: &'s mut SuiteScope<'p>,
    generator: Rc<dyn Fn() -> T>,
}

impl<'p> SuiteScope<'p> {
    /// Opens a fixture scope around `generator`. Tests registered inside
    /// run the generator once per execution; suites get one fresh value
    /// each at build time.
    pub fn with_fixture<T, G>(
        &mut self,
        generator: G,
        block: impl FnOnce(&mut FixtureScope<'_, 'p, T>),
    ) where
        T: 'static,
        G: Fn() -> T + 'static,
    {
        let mut fixture = FixtureScope {
            scope: self,
            generator: Rc::new(generator),
        };
        block(&mut fixture);
    }
}

impl<'s, 'p, T: 'static> FixtureScope<'s, 'p, T> {
    /// Registers a test whose body receives a fresh value.
    pub fn test(&mut self, name: &str, body: impl Fn(&T) + 'static) {
        self.test_with(name, name, TestConfig::new(), body);
    }

    /// Registers a test.
    pub fn test_with(
        &mut self,
        name: &str,
        display_name: &str,
        config: TestConfig,
        body: impl Fn(&T) + 'static,
    ) {
        let (name, display_name) = self.shape(name, display_name);
        let generator = Rc::clone(&self.generator);
        self.scope
            .test_with(&name, &display_name, config, move || body(&generator()));
    }

    /// Registers a suite; its body receives one fresh value.
    pub fn suite(&mut self, name: &str, body: impl FnOnce(&mut SuiteScope<'_>, T)) {
        self.suite_with(name, name, TestConfig::new(), body);
    }

    /// Registers a suite.
    pub fn suite_with(
        &mut self,
        name: &str,
        display_name: &str,
        config: TestConfig,
        body: impl FnOnce(&mut SuiteScope<'_>, T),
    ) {
        let (name, display_name) = self.shape(name, display_name);
        let value = (self.generator)();
        self.scope
            .suite_with(&name, &display_name, config, move |suite| {
                body(suite, value)
            });
    }

    /// Starts a free-spec entry whose body receives fresh values. A
    /// leading `!` registers it disabled.
    pub fn spec(&mut self, name: &str) -> FixtureSpec<'_, 's, 'p, T> {
        FixtureSpec {
            fixture: self,
            name: name.to_string(),
            display_name: None,
            config: TestConfig::new(),
        }
    }

    fn shape(&self, name: &str, display_name: &str) -> (String, String) {
        let defaults = self.scope.defaults();
        let (name_max, display_name_max) =
            NameBudget::default().resolve(&defaults.fixtures, &defaults.base);
        (
            truncate_middle(&escape_for_display(name), name_max),
            truncate_middle(&escape_for_display(display_name), display_name_max),
        )
    }
}

/// A free-spec entry inside a fixture scope. Created by
/// [`FixtureScope::spec`].
#[must_use = "call .test(..) or .suite(..) to register the entry"]
pub struct FixtureSpec<'f, 's, 'p, T> {
    fixture: &'f mut FixtureScope<'s, 'p, T>,
    name: String,
    display_name: Option<String>,
    config: TestConfig,
}

impl<T: 'static> FixtureSpec<'_, '_, '_, T> {
    /// Explicit display name, used verbatim.
    pub fn display_name(mut self, display_name: &str) -> Self {
        self.display_name = Some(display_name.to_string());
        self
    }

    /// Base configuration for the entry.
    pub fn config(mut self, config: TestConfig) -> Self {
        self.config = config;
        self
    }

    fn shape(&self) -> (String, String, TestConfig) {
        let defaults = self.fixture.scope.defaults();
        shape_spec_entry(
            &self.name,
            self.display_name.as_deref(),
            NameBudget::default(),
            &defaults.fixtures,
            &defaults.base,
            self.config.clone(),
        )
    }

    /// Registers the entry as a test receiving a fresh value.
    pub fn test(self, body: impl Fn(&T) + 'static) {
        let (name, display_name, config) = self.shape();
        let generator = Rc::clone(&self.fixture.generator);
        self.fixture
            .scope
            .test_with(&name, &display_name, config, move || body(&generator()));
    }

    /// Registers the entry as a suite; its body receives one fresh value.
    pub fn suite(self, body: impl FnOnce(&mut SuiteScope<'_>, T)) {
        let (name, display_name, config) = self.shape();
        let value = (self.fixture.generator)();
        self.fixture
            .scope
            .suite_with(&name, &display_name, config, move |suite| {
                body(suite, value)
            });
    }
}
