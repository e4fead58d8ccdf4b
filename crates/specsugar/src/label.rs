//! Value labelling for generated tests.

use crate::name::short_type_name;

/// Tag used when a sequence has no element to name a compacted
/// registration after.
pub(crate) const NO_DATA_TAG: &str = "no data";

/// How a value shows up in generated test names.
///
/// `case_label` is the value's display form, `type_tag` the short type
/// name used for compacted registrations. Collections render through
/// `join_labels`, which bytes override so `vec![0xAA, 0x2F]` prints as
/// `AA:2F` instead of decimal soup.
pub trait CaseLabel {
    /// Display form of the value.
    fn case_label(&self) -> String;

    /// Short type name for compacted registrations. `None` when the value
    /// cannot speak for its type (absent optionals); peeking skips such
    /// values.
    fn type_tag(&self) -> Option<String> {
        Some(short_type_name::<Self>())
    }

    /// Rendering for a collection of this type.
    fn join_labels(items: &[Self]) -> String
    where
        Self: Sized,
    {
        let parts: Vec<String> = items.iter().map(Self::case_label).collect();
        parts.join(", ")
    }
}

macro_rules! label_via_display {
    ($($t:ty),* $(,)?) => {
        $(impl CaseLabel for $t {
            fn case_label(&self) -> String {
                self.to_string()
            }
        })*
    };
}

label_via_display!(
    i8, i16, i32, i64, i128, isize, u16, u32, u64, u128, usize, f32, f64, bool, char,
);

impl CaseLabel for u8 {
    fn case_label(&self) -> String {
        self.to_string()
    }

    // byte slices read as hex pairs: AA:2F:00
    fn join_labels(items: &[Self]) -> String {
        let parts: Vec<String> = items.iter().map(|b| format!("{b:02X}")).collect();
        parts.join(":")
    }
}

impl CaseLabel for String {
    fn case_label(&self) -> String {
        self.clone()
    }
}

impl CaseLabel for &str {
    fn case_label(&self) -> String {
        (*self).to_string()
    }
}

impl<T: CaseLabel> CaseLabel for Option<T> {
    fn case_label(&self) -> String {
        match self {
            Some(value) => value.case_label(),
            None => "None".to_string(),
        }
    }

    fn type_tag(&self) -> Option<String> {
        self.as_ref().and_then(CaseLabel::type_tag)
    }
}

impl<T: CaseLabel> CaseLabel for Vec<T> {
    fn case_label(&self) -> String {
        T::join_labels(self)
    }
}

impl<T: CaseLabel> CaseLabel for &[T] {
    fn case_label(&self) -> String {
        T::join_labels(self)
    }
}

impl<T: CaseLabel, const N: usize> CaseLabel for [T; N] {
    fn case_label(&self) -> String {
        T::join_labels(self)
    }
}

impl<A: CaseLabel, B: CaseLabel> CaseLabel for (A, B) {
    fn case_label(&self) -> String {
        format!("({}, {})", self.0.case_label(), self.1.case_label())
    }
}

impl<A: CaseLabel, B: CaseLabel, C: CaseLabel> CaseLabel for (A, B, C) {
    fn case_label(&self) -> String {
        format!(
            "({}, {}, {})",
            self.0.case_label(),
            self.1.case_label(),
            self.2.case_label()
        )
    }
}

/// Finds the type tag of the first value that has one, consuming as little
/// of the iterator as possible, then hands back an iterator replaying the
/// consumed prefix followed by the untouched remainder. The input reaches
/// the caller fully and exactly once either way.
///
/// An empty input (or one with only tagless values) peeks to
/// [`NO_DATA_TAG`].
pub(crate) fn peek_type_and_replay<V, I>(
    mut cases: I,
    tag_of: impl Fn(&V) -> Option<String>,
) -> (String, impl Iterator<Item = V>)
where
    I: Iterator<Item = V>,
{
    let mut prefix = Vec::new();
    let mut tag = None;
    for item in cases.by_ref() {
        let found = tag_of(&item);
        prefix.push(item);
        if let Some(t) = found {
            tag = Some(t);
            break;
        }
    }
    (
        tag.unwrap_or_else(|| NO_DATA_TAG.to_string()),
        prefix.into_iter().chain(cases),
    )
}
