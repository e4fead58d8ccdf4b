use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU32, Ordering};

use specsugar::{build, build_with, CollatedFailure, Defaults, TestConfig, TestNode, NO_LIMIT};

fn names(nodes: &[TestNode]) -> Vec<&str> {
    nodes.iter().map(TestNode::name).collect()
}

fn leaf_count(nodes: &[TestNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            TestNode::Suite { children, .. } => leaf_count(children),
            TestNode::Test { .. } => 1,
        })
        .sum()
}

fn run_body(node: &TestNode) -> Result<(), Box<dyn std::any::Any + Send>> {
    match node {
        TestNode::Test { body, .. } => catch_unwind(AssertUnwindSafe(|| body())),
        TestNode::Suite { .. } => panic!("expected a test node"),
    }
}

// ============================================================================
// Expanded data cases
// ============================================================================

#[test]
fn each_data_case_registers_its_own_test() {
    let nodes = build(|scope| {
        scope
            .with_data_map([("foo", 13i32), ("bar", 7)])
            .run(|n| assert!(*n > 0));
    });
    assert_eq!(names(&nodes), vec!["foo", "bar"]);
    for node in &nodes {
        assert!(run_body(node).is_ok());
    }
}

#[test]
fn values_label_themselves_without_a_map() {
    let nodes = build(|scope| {
        scope.with_data([13i32, 7]).run(|_| {});
    });
    assert_eq!(names(&nodes), vec!["13", "7"]);
}

#[test]
fn name_fn_beats_value_labels() {
    let nodes = build(|scope| {
        scope
            .with_data_by(|v| format!("case {v}"), ["a", "b"])
            .run(|_| {});
    });
    assert_eq!(names(&nodes), vec!["case a", "case b"]);
}

#[test]
fn expanded_mode_streams_lazy_sequences() {
    let nodes = build(|scope| {
        scope.with_data((1i32..).take(3).map(|n| n * 10)).run(|_| {});
    });
    assert_eq!(names(&nodes), vec!["10", "20", "30"]);
}

#[test]
fn expanded_mode_registers_nothing_for_empty_input() {
    let nodes = build(|scope| {
        scope.with_data(Vec::<i32>::new()).run(|_| {});
    });
    assert!(nodes.is_empty());
}

#[test]
fn byte_vectors_read_as_hex_in_names() {
    let nodes = build(|scope| {
        scope.with_data([vec![0xAAu8, 0x2F, 0x00]]).run(|_| {});
    });
    assert_eq!(names(&nodes), vec!["AA:2F:00"]);
}

// ============================================================================
// Name decoration: escape, disable marker, prefix, budgets
// ============================================================================

#[test]
fn labels_are_escaped_and_markers_stripped() {
    let nodes = build(|scope| {
        scope
            .with_data_map([("line\nbreak", 1i32), ("!parked case", 2)])
            .run(|_| {});
    });
    assert_eq!(nodes[0].name(), "line\\nbreak");
    assert!(!nodes[0].config().is_disabled());
    assert_eq!(nodes[1].name(), "parked case");
    assert!(nodes[1].config().is_disabled());
}

#[test]
fn prefix_joins_with_one_space_in_both_modes() {
    let nodes = build(|scope| {
        scope.with_data([1i32]).prefix("edge").run(|_| {});
        scope
            .with_data([2i32])
            .prefix("edge")
            .compact(true)
            .run(|_| {});
    });
    assert_eq!(nodes[0].name(), "edge 1");
    assert_eq!(nodes[1].name(), "edge [compacted] i32");
}

#[test]
fn name_budget_truncates_but_display_stays_whole() {
    let long = "a very long explanatory case label indeed";
    let nodes = build(|scope| {
        scope
            .with_data_map([(long, 1i32)])
            .max_name_len(10)
            .run(|_| {});
    });
    assert_eq!(nodes[0].name().chars().count(), 10);
    assert!(nodes[0].name().contains('…'));
    assert_eq!(nodes[0].display_name(), long);
}

#[test]
fn addon_tier_budget_applies_until_overridden() {
    let mut defaults = Defaults::default();
    defaults.datatest.name_max = Some(5);
    let nodes = build_with(defaults, |scope| {
        scope.with_data_map([("abcdefgh", 1i32)]).run(|_| {});
        scope
            .with_data_map([("abcdefgh", 2i32)])
            .max_name_len(NO_LIMIT)
            .run(|_| {});
    });
    assert_eq!(nodes[0].name().chars().count(), 5);
    assert_eq!(nodes[1].name(), "abcdefgh");
}

#[test]
fn defaults_changes_stay_inside_their_subtree() {
    let nodes = build(|scope| {
        scope.suite("tight", |suite| {
            suite.defaults_mut().base.name_max = 5;
            suite.with_data_map([("abcdefgh", 1i32)]).run(|_| {});
        });
        scope.with_data_map([("abcdefgh", 2i32)]).run(|_| {});
    });
    match &nodes[0] {
        TestNode::Suite { children, .. } => {
            assert_eq!(children[0].name().chars().count(), 5);
        }
        TestNode::Test { .. } => panic!("expected a suite"),
    }
    assert_eq!(nodes[1].name(), "abcdefgh");
}

#[test]
fn config_passes_through_to_registrations() {
    let nodes = build(|scope| {
        scope
            .with_data([1i32])
            .config(TestConfig::new().disable())
            .run(|_| {});
    });
    assert!(nodes[0].config().is_disabled());
}

// ============================================================================
// Compacted data cases
// ============================================================================

#[test]
fn compact_batch_registers_one_test_and_collates_outcomes() {
    let nodes = build(|scope| {
        scope
            .with_data(1i32..=4)
            .compact(true)
            .run(|n| assert!(*n < 3, "{n} is not below 3"));
    });
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name(), "[compacted] i32");

    let payload = run_body(&nodes[0]).expect_err("cases 3 and 4 fail");
    let collated = payload
        .downcast_ref::<CollatedFailure>()
        .expect("collated payload keeps its type");
    let lines: Vec<&str> = collated.message().lines().collect();
    assert_eq!(lines[0], "[compacted] i32");
    assert_eq!(lines[1], "OK:    1: 1");
    assert_eq!(lines[2], "OK:    2: 2");
    assert_eq!(lines[3], "Error: 3: 3: 3 is not below 3");
    assert_eq!(lines[4], "Error: 4: 4: 4 is not below 3");
    assert_eq!(collated.failures().len(), 2);
}

#[test]
fn compact_batch_passes_when_every_case_passes() {
    let nodes = build(|scope| {
        scope.with_data([2i32, 4, 6]).compact(true).run(|n| assert_eq!(n % 2, 0));
    });
    assert_eq!(nodes.len(), 1);
    assert!(run_body(&nodes[0]).is_ok());
}

#[test]
fn compact_mode_on_empty_input_registers_a_trivial_pass() {
    let nodes = build(|scope| {
        scope.with_data(Vec::<i32>::new()).compact(true).run(|_| {});
    });
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name(), "[compacted] no data");
    assert!(run_body(&nodes[0]).is_ok());
}

#[test]
fn compact_mode_skips_absent_values_when_naming() {
    let nodes = build(|scope| {
        scope
            .with_data([None, None, Some(9i32)])
            .compact(true)
            .run(|_| {});
    });
    assert_eq!(nodes[0].name(), "[compacted] i32");
}

// ============================================================================
// Suites terminals
// ============================================================================

#[test]
fn data_suites_nest_and_multiply() {
    let nodes = build(|scope| {
        scope.with_data(["red", "blue"]).suites(|suite, color| {
            let color = color.to_string();
            suite
                .with_data([1i32, 2])
                .run(move |size| assert!(*size > 0 && !color.is_empty()));
        });
    });
    assert_eq!(nodes.len(), 2);
    assert_eq!(leaf_count(&nodes), 4);
    match &nodes[0] {
        TestNode::Suite { name, children, .. } => {
            assert_eq!(name, "red");
            assert_eq!(names(children), vec!["1", "2"]);
        }
        TestNode::Test { .. } => panic!("expected a suite"),
    }
}

#[test]
fn suite_actions_may_borrow_their_environment() {
    let mut seen = Vec::new();
    build(|scope| {
        scope.with_data([10i32, 20]).suites(|suite, n| {
            seen.push(*n);
            suite.test("anything", || {});
        });
    });
    assert_eq!(seen, vec![10, 20]);
}

#[test]
fn compact_suites_group_under_one_name() {
    let nodes = build(|scope| {
        scope.with_data([1i32, 2]).compact(true).suites(|suite, n| {
            suite.test(&format!("child {n}"), || {});
        });
    });
    assert_eq!(nodes.len(), 1);
    match &nodes[0] {
        TestNode::Suite { name, children, .. } => {
            assert_eq!(name, "[compacted] i32");
            assert_eq!(names(children), vec!["child 1", "child 2"]);
        }
        TestNode::Test { .. } => panic!("expected a suite"),
    }
}

#[test]
fn compact_suites_collate_construction_failures() {
    let result = catch_unwind(AssertUnwindSafe(|| {
        build(|scope| {
            scope.with_data([1i32, 2, 3]).compact(true).suites(|suite, n| {
                assert!(*n < 3, "suite {n} failed to build");
                suite.test("fine", || {});
            });
        });
    }));
    let payload = result.expect_err("third suite body fails during construction");
    let collated = payload
        .downcast_ref::<CollatedFailure>()
        .expect("collated payload keeps its type");
    assert!(collated.message().contains("OK:    1: 1"));
    assert!(collated.message().contains("Error: 3: 3: suite 3 failed to build"));
}

// ============================================================================
// Free-spec entries
// ============================================================================

#[test]
fn spec_entries_decorate_centrally() {
    let nodes = build(|scope| {
        scope.spec("when input is valid").suite(|suite| {
            suite.spec("!accepts it").test(|| {});
            suite
                .spec("reports size")
                .display_name("reports size (bytes)")
                .test(|| {});
        });
    });
    match &nodes[0] {
        TestNode::Suite { name, children, .. } => {
            assert_eq!(name, "when input is valid");
            assert_eq!(children[0].name(), "accepts it");
            assert_eq!(children[0].display_name(), "accepts it");
            assert!(children[0].config().is_disabled());
            assert_eq!(children[1].name(), "reports size");
            assert_eq!(children[1].display_name(), "reports size (bytes)");
        }
        TestNode::Test { .. } => panic!("expected a suite"),
    }
}

#[test]
fn spec_budgets_resolve_against_the_freespec_tier() {
    let mut defaults = Defaults::default();
    defaults.freespec.name_max = Some(6);
    let nodes = build_with(defaults, |scope| {
        scope.spec("a name past the budget").test(|| {});
        scope
            .spec("a name past the budget")
            .max_name_len(NO_LIMIT)
            .test(|| {});
    });
    assert_eq!(nodes[0].name().chars().count(), 6);
    assert_eq!(nodes[1].name(), "a name past the budget");
}

// ============================================================================
// Fixtures
// ============================================================================

#[test]
fn fixture_tests_get_a_fresh_value_per_execution() {
    static GENERATED: AtomicU32 = AtomicU32::new(0);
    let nodes = build(|scope| {
        scope.with_fixture(
            || GENERATED.fetch_add(1, Ordering::SeqCst),
            |fx| {
                fx.test("first", |_| {});
                fx.test("second", |_| {});
            },
        );
    });
    assert_eq!(names(&nodes), vec!["first", "second"]);
    // nothing generated while building
    assert_eq!(GENERATED.load(Ordering::SeqCst), 0);

    for node in &nodes {
        assert!(run_body(node).is_ok());
    }
    assert_eq!(GENERATED.load(Ordering::SeqCst), 2);

    // rerunning draws fresh values again
    for node in &nodes {
        assert!(run_body(node).is_ok());
    }
    assert_eq!(GENERATED.load(Ordering::SeqCst), 4);
}

#[test]
fn fixture_suites_get_one_value_at_build_time() {
    static GENERATED: AtomicU32 = AtomicU32::new(0);
    let nodes = build(|scope| {
        scope.with_fixture(
            || GENERATED.fetch_add(1, Ordering::SeqCst),
            |fx| {
                fx.suite("group", |suite, value| {
                    suite.test("sees the value", move || {
                        let _ = value;
                    });
                });
            },
        );
    });
    assert_eq!(GENERATED.load(Ordering::SeqCst), 1);
    assert_eq!(leaf_count(&nodes), 1);
}

#[test]
fn fixture_spec_entries_honor_the_marker_and_generate_fresh_values() {
    let nodes = build(|scope| {
        scope.with_fixture(
            || 5i32,
            |fx| {
                fx.spec("!parked").test(|v| assert_eq!(*v, 5));
                fx.spec("active").test(|v| assert_eq!(*v, 5));
            },
        );
    });
    assert_eq!(nodes[0].name(), "parked");
    assert!(nodes[0].config().is_disabled());
    assert_eq!(nodes[1].name(), "active");
    assert!(run_body(&nodes[1]).is_ok());
}

// ============================================================================
// Path ceiling through the addons
// ============================================================================

#[test]
fn path_ceiling_fails_construction_loudly() {
    let mut defaults = Defaults::default();
    defaults.base.max_path_len = 16;
    let result = catch_unwind(AssertUnwindSafe(|| {
        build_with(defaults, |scope| {
            scope.suite("twelve chars", |suite| {
                suite.with_data_map([("too long here", 1i32)]).run(|_| {});
            });
        });
    }));
    let payload = result.expect_err("13 more chars over a 16-char ceiling");
    let message = payload
        .downcast_ref::<String>()
        .expect("panic message")
        .clone();
    assert!(message.starts_with("specsugar: test path would grow to 25 characters"));
    assert!(message.contains("twelve chars ↘ too long here"));
}
