//! Name budgets, compaction and iteration counts.
//!
//! Resolution is three-tiered and lazy: a call-site override beats the
//! addon tier, which beats the base tier, evaluated when the registering
//! call runs. `-1` means "no limit" wherever a length appears.

/// Default budget for registered names (characters).
pub const DEFAULT_NAME_MAX: i32 = 64;

/// Sentinel disabling a length limit.
pub const NO_LIMIT: i32 = -1;

/// Base-tier defaults, the last word when neither the call site nor the
/// addon tier has an opinion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseDefaults {
    /// Budget for registered test and suite names.
    pub name_max: i32,
    /// Budget for display names.
    pub display_name_max: i32,
    /// Register one compacted entry per call instead of one per case.
    pub compact: bool,
    /// Ceiling for full registration paths. Some report pipelines
    /// (device-farm runners in particular) cap test identifiers near 120
    /// characters and then truncate or drop entries without a word; set
    /// this to get a readable construction-time error instead.
    pub max_path_len: i32,
    /// Values drawn per `check_all` when the call does not say.
    pub property_iterations: u32,
}

impl Default for BaseDefaults {
    fn default() -> Self {
        Self {
            name_max: DEFAULT_NAME_MAX,
            display_name_max: NO_LIMIT,
            compact: false,
            max_path_len: NO_LIMIT,
            property_iterations: 100,
        }
    }
}

/// Addon-tier defaults. `None` defers to the base tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddonDefaults {
    pub name_max: Option<i32>,
    pub display_name_max: Option<i32>,
    pub compact: Option<bool>,
}

/// The configuration bundle a scope carries: base defaults plus one addon
/// tier per registration surface.
///
/// Child scopes copy their parent's bundle at creation, so a
/// `defaults_mut` change applies to later registrations in that subtree
/// and nowhere else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Defaults {
    pub base: BaseDefaults,
    pub datatest: AddonDefaults,
    pub property: AddonDefaults,
    pub freespec: AddonDefaults,
    pub fixtures: AddonDefaults,
}

/// Call-site overrides for the two name budgets.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct NameBudget {
    pub name_max: Option<i32>,
    pub display_name_max: Option<i32>,
}

impl NameBudget {
    /// Resolved `(name, display name)` budgets for one addon tier.
    pub(crate) fn resolve(self, addon: &AddonDefaults, base: &BaseDefaults) -> (i32, i32) {
        (
            self.name_max.or(addon.name_max).unwrap_or(base.name_max),
            self.display_name_max
                .or(addon.display_name_max)
                .unwrap_or(base.display_name_max),
        )
    }
}

pub(crate) fn resolve_compact(
    call: Option<bool>,
    addon: &AddonDefaults,
    base: &BaseDefaults,
) -> bool {
    call.or(addon.compact).unwrap_or(base.compact)
}
