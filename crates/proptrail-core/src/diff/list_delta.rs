//! Membership delta between two scalar lists.

use crate::model::ScalarValue;

/// Elements added to and removed from a scalar list
///
/// Both sides are reduced to distinct members, kept in first-occurrence order
/// of the list they come from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListDelta<'a> {
    pub added: Vec<&'a ScalarValue>,
    pub removed: Vec<&'a ScalarValue>,
}

impl ListDelta<'_> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute the membership delta from `before` to `after`
///
/// An absent `before` list counts as empty for additions and reports no
/// removals at all. An absent `after` list counts as empty.
pub fn list_delta<'a>(
    before: Option<&'a [ScalarValue]>,
    after: Option<&'a [ScalarValue]>,
) -> ListDelta<'a> {
    let after = after.unwrap_or(&[]);

    let added = distinct(after.iter().filter(|v| !before.is_some_and(|b| b.contains(*v))));

    let removed = match before {
        Some(before) => distinct(before.iter().filter(|v| !after.contains(*v))),
        None => Vec::new(),
    };

    ListDelta { added, removed }
}

fn distinct<'a>(values: impl Iterator<Item = &'a ScalarValue>) -> Vec<&'a ScalarValue> {
    let mut out: Vec<&ScalarValue> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<ScalarValue> {
        items.iter().map(|s| ScalarValue::from(*s)).collect()
    }

    #[test]
    fn test_absent_before_reports_only_additions() {
        let after = list(&["science"]);
        let delta = list_delta(None, Some(after.as_slice()));
        assert_eq!(delta.added, vec![&after[0]]);
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn test_replace_reports_both_sides() {
        let before = list(&["science"]);
        let after = list(&["art"]);
        let delta = list_delta(Some(before.as_slice()), Some(after.as_slice()));
        assert_eq!(delta.added, vec![&ScalarValue::from("art")]);
        assert_eq!(delta.removed, vec![&ScalarValue::from("science")]);
    }

    #[test]
    fn test_reorder_is_no_change() {
        let before = list(&["a", "b"]);
        let after = list(&["b", "a"]);
        assert!(list_delta(Some(before.as_slice()), Some(after.as_slice())).is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let before = list(&["a"]);
        let after = list(&["b", "b", "a", "c", "b"]);
        let delta = list_delta(Some(before.as_slice()), Some(after.as_slice()));
        assert_eq!(
            delta.added,
            vec![&ScalarValue::from("b"), &ScalarValue::from("c")]
        );
    }

    #[test]
    fn test_absent_after_removes_everything() {
        let before = list(&["a", "b"]);
        let delta = list_delta(Some(before.as_slice()), None);
        assert!(delta.added.is_empty());
        assert_eq!(delta.removed.len(), 2);
    }
}
