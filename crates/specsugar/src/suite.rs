//! The registration seam: test tree nodes, per-registration configuration
//! and the explicit scope handle suite bodies receive.
//!
//! Trees are built in one pass (suite bodies run immediately) and executed
//! afterwards by [`crate::runner`]. Addons sit on top of the same two
//! primitives everything else uses: [`SuiteScope::test_with`] and
//! [`SuiteScope::suite_with`].

use std::process;

use thiserror::Error;

use crate::config::Defaults;
use crate::runner::{self, RunConfig, Suite};

/// Boxed test body.
pub type TestBody = Box<dyn Fn()>;

/// A node in a built test tree.
pub enum TestNode {
    /// A named group of child nodes.
    Suite {
        name: String,
        display_name: String,
        config: TestConfig,
        children: Vec<TestNode>,
    },
    /// A leaf test case.
    Test {
        name: String,
        display_name: String,
        config: TestConfig,
        body: TestBody,
    },
}

impl TestNode {
    /// The registered name (the one execution paths are made of).
    pub fn name(&self) -> &str {
        match self {
            TestNode::Suite { name, .. } | TestNode::Test { name, .. } => name,
        }
    }

    /// The name shown in reports.
    pub fn display_name(&self) -> &str {
        match self {
            TestNode::Suite { display_name, .. } | TestNode::Test { display_name, .. } => {
                display_name
            }
        }
    }

    pub fn config(&self) -> &TestConfig {
        match self {
            TestNode::Suite { config, .. } | TestNode::Test { config, .. } => config,
        }
    }
}

/// Per-registration configuration. Addons derive modified copies; the
/// runner reads the final state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestConfig {
    disabled: bool,
}

impl TestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derived copy that registers in disabled state.
    pub fn disable(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Raised (as a panic) when a registration would push its full path over
/// the configured ceiling. Pipelines that cap identifier lengths tend to
/// truncate or drop such tests silently; failing at construction time
/// points at the exact registration instead.
#[derive(Debug, Error)]
#[error(
    "test path would grow to {length} characters, over the limit of {limit}:\n  \
     {path}\nshorten the name, tighten the name budgets, or raise `max_path_len`"
)]
pub struct PathLengthError {
    path: String,
    length: usize,
    limit: i32,
}

impl PathLengthError {
    /// The would-be path, parent and new segment separated by `↘`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn limit(&self) -> i32 {
        self.limit
    }
}

/// Checks that appending `segment` to `current_path` keeps the combined
/// character count within `limit`. Negative limits disable the check.
pub fn check_path_len(
    current_path: &str,
    segment: &str,
    limit: i32,
) -> Result<(), PathLengthError> {
    if limit < 0 {
        return Ok(());
    }
    let length = current_path.chars().count() + segment.chars().count();
    if length > limit as usize {
        return Err(PathLengthError {
            path: if current_path.is_empty() {
                segment.to_string()
            } else {
                format!("{current_path} ↘ {segment}")
            },
            length,
            limit,
        });
    }
    Ok(())
}

/// Explicit registration handle passed into suite bodies.
///
/// Suite bodies run at build time, so anything they register lands
/// directly in the parent's child list. Each scope carries its own copy of
/// the configuration bundle, taken from the parent at creation:
/// [`defaults_mut`](Self::defaults_mut) changes reach registrations made
/// afterwards in this subtree and nothing else.
pub struct SuiteScope<'p> {
    children: &'p mut Vec<TestNode>,
    path: String,
    defaults: Defaults,
}

impl<'p> SuiteScope<'p> {
    /// Registers a test with identical name and display name.
    pub fn test(&mut self, name: &str, body: impl Fn() + 'static) {
        self.test_with(name, name, TestConfig::new(), body);
    }

    /// Registers a test.
    pub fn test_with(
        &mut self,
        name: &str,
        display_name: &str,
        config: TestConfig,
        body: impl Fn() + 'static,
    ) {
        self.guard(name);
        self.children.push(TestNode::Test {
            name: name.to_string(),
            display_name: display_name.to_string(),
            config,
            body: Box::new(body),
        });
    }

    /// Registers a suite; `body` runs immediately against the child scope.
    pub fn suite(&mut self, name: &str, body: impl FnOnce(&mut SuiteScope<'_>)) {
        self.suite_with(name, name, TestConfig::new(), body);
    }

    /// Registers a suite.
    pub fn suite_with(
        &mut self,
        name: &str,
        display_name: &str,
        config: TestConfig,
        body: impl FnOnce(&mut SuiteScope<'_>),
    ) {
        self.guard(name);
        let mut children = Vec::new();
        let mut child = SuiteScope {
            children: &mut children,
            path: self.join_path(name),
            defaults: self.defaults,
        };
        body(&mut child);
        self.children.push(TestNode::Suite {
            name: name.to_string(),
            display_name: display_name.to_string(),
            config,
            children,
        });
    }

    /// Full `>`-joined path of this scope. Empty at the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The configuration bundle in effect for this scope.
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Mutable access for subtree-scoped configuration changes.
    pub fn defaults_mut(&mut self) -> &mut Defaults {
        &mut self.defaults
    }

    fn join_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{} > {}", self.path, name)
        }
    }

    fn guard(&self, segment: &str) {
        if let Err(err) = check_path_len(&self.path, segment, self.defaults.base.max_path_len) {
            panic!("specsugar: {err}");
        }
    }
}

/// Builds a test tree without running it.
pub fn build(body: impl FnOnce(&mut SuiteScope<'_>)) -> Vec<TestNode> {
    build_with(Defaults::default(), body)
}

/// Builds a test tree with an explicit configuration bundle.
pub fn build_with(defaults: Defaults, body: impl FnOnce(&mut SuiteScope<'_>)) -> Vec<TestNode> {
    let mut children = Vec::new();
    let mut root = SuiteScope {
        children: &mut children,
        path: String::new(),
        defaults,
    };
    body(&mut root);
    children
}

/// Builds and runs a tree, honoring CLI flags, exiting nonzero when
/// anything failed. The entry point for `harness = false` test targets.
pub fn run(body: impl FnOnce(&mut SuiteScope<'_>)) {
    run_with(Defaults::default(), body)
}

/// [`run`] with an explicit configuration bundle.
pub fn run_with(defaults: Defaults, body: impl FnOnce(&mut SuiteScope<'_>)) {
    let nodes = build_with(defaults, body);
    let config = RunConfig::from_args();
    let result = runner::run_suites(&[Suite::new("", "", nodes)], &config);
    if result.failed > 0 {
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NO_LIMIT;

    #[test]
    fn test_path_guard_boundaries() {
        assert!(check_path_len("a/b/c", "d", 6).is_ok());
        let err = check_path_len("a/b/c", "d", 5).expect_err("6 > 5");
        assert_eq!(err.length(), 6);
        assert_eq!(err.limit(), 5);
        assert_eq!(err.path(), "a/b/c ↘ d");
    }

    #[test]
    fn test_path_guard_negative_limit_is_off() {
        assert!(check_path_len(&"x".repeat(1000), "y", NO_LIMIT).is_ok());
    }

    #[test]
    fn test_path_guard_counts_chars_not_bytes() {
        // 4 chars, 8 bytes
        assert!(check_path_len("ää", "öö", 4).is_ok());
        assert!(check_path_len("ää", "öö", 3).is_err());
    }

    #[test]
    fn test_scope_paths_join_with_arrows() {
        let mut seen = Vec::new();
        build(|root| {
            root.suite("outer", |outer| {
                outer.suite("inner", |inner| {
                    seen.push(inner.path().to_string());
                });
                seen.push(outer.path().to_string());
            });
            seen.push(root.path().to_string());
        });
        assert_eq!(seen, vec!["outer > inner", "outer", ""]);
    }

    #[test]
    fn test_build_collects_nodes_in_registration_order() {
        let nodes = build(|scope| {
            scope.test("first", || {});
            scope.suite("group", |suite| {
                suite.test("nested", || {});
            });
            scope.test("last", || {});
        });
        let names: Vec<&str> = nodes.iter().map(TestNode::name).collect();
        assert_eq!(names, vec!["first", "group", "last"]);
        match &nodes[1] {
            TestNode::Suite { children, .. } => assert_eq!(children[0].name(), "nested"),
            TestNode::Test { .. } => panic!("expected a suite"),
        }
    }

    #[test]
    fn test_child_scopes_copy_defaults_at_creation() {
        build(|root| {
            root.defaults_mut().base.name_max = 10;
            root.suite("child", |child| {
                assert_eq!(child.defaults().base.name_max, 10);
                child.defaults_mut().base.name_max = 99;
            });
            // sibling registrations keep the parent's value
            assert_eq!(root.defaults().base.name_max, 10);
        });
    }

    #[test]
    #[should_panic(expected = "specsugar: test path would grow")]
    fn test_long_registration_fails_construction() {
        let mut defaults = Defaults::default();
        defaults.base.max_path_len = 8;
        build_with(defaults, |scope| {
            scope.suite("abcdef", |suite| {
                suite.test("ghi", || {});
            });
        });
    }

    #[test]
    fn test_disable_derives_a_copy() {
        let config = TestConfig::new();
        let disabled = config.clone().disable();
        assert!(!config.is_disabled());
        assert!(disabled.is_disabled());
    }
}
