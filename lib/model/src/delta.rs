use crate::Value;
use oxrdf::{NamedNode, NamedNodeRef};
use std::collections::BTreeMap;

/// The changes accumulated on a resource since it was last synchronized with the repository.
///
/// For every predicate, a value is either pending addition, pending removal or untouched. Adding a
/// value that is pending removal (and vice versa) cancels both out, so the two sides never share a
/// value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Delta {
    added: BTreeMap<NamedNode, Vec<Value>>,
    removed: BTreeMap<NamedNode, Vec<Value>>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// The number of (predicate, value) pairs that would be sent to the repository.
    pub fn len(&self) -> usize {
        self.added.values().chain(self.removed.values()).map(Vec::len).sum()
    }

    pub fn added(&self) -> &BTreeMap<NamedNode, Vec<Value>> {
        &self.added
    }

    pub fn removed(&self) -> &BTreeMap<NamedNode, Vec<Value>> {
        &self.removed
    }

    pub fn added_for(&self, predicate: NamedNodeRef<'_>) -> &[Value] {
        self.added
            .get(&predicate.into_owned())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn removed_for(&self, predicate: NamedNodeRef<'_>) -> &[Value] {
        self.removed
            .get(&predicate.into_owned())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Records that `value` became present for `predicate`.
    pub fn record_addition(&mut self, predicate: NamedNodeRef<'_>, value: Value) {
        if !take(&mut self.removed, predicate, &value) {
            push_unique(&mut self.added, predicate, value);
        }
    }

    /// Records that `value` is no longer present for `predicate`.
    pub fn record_removal(&mut self, predicate: NamedNodeRef<'_>, value: Value) {
        if !take(&mut self.added, predicate, &value) {
            push_unique(&mut self.removed, predicate, value);
        }
    }
}

/// Removes `value` from the entry of `predicate`. Returns whether it was present.
fn take(
    map: &mut BTreeMap<NamedNode, Vec<Value>>,
    predicate: NamedNodeRef<'_>,
    value: &Value,
) -> bool {
    let predicate = predicate.into_owned();
    let Some(values) = map.get_mut(&predicate) else {
        return false;
    };
    let Some(position) = values.iter().position(|v| v == value) else {
        return false;
    };
    values.remove(position);
    if values.is_empty() {
        map.remove(&predicate);
    }
    true
}

fn push_unique(
    map: &mut BTreeMap<NamedNode, Vec<Value>>,
    predicate: NamedNodeRef<'_>,
    value: Value,
) {
    let values = map.entry(predicate.into_owned()).or_default();
    if !values.contains(&value) {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::dc;

    #[test]
    fn addition_then_removal_cancels_out() {
        let mut delta = Delta::new();
        delta.record_addition(dc::TITLE, Value::string("a"));
        delta.record_removal(dc::TITLE, Value::string("a"));
        assert!(delta.is_empty());
    }

    #[test]
    fn removal_then_addition_cancels_out() {
        let mut delta = Delta::new();
        delta.record_removal(dc::TITLE, Value::string("a"));
        delta.record_addition(dc::TITLE, Value::string("a"));
        assert!(delta.is_empty());
    }

    #[test]
    fn repeated_records_are_kept_once() {
        let mut delta = Delta::new();
        delta.record_addition(dc::TITLE, Value::string("a"));
        delta.record_addition(dc::TITLE, Value::string("a"));
        delta.record_removal(dc::CREATOR, Value::string("b"));
        delta.record_removal(dc::CREATOR, Value::string("b"));
        assert_eq!(delta.added_for(dc::TITLE), &[Value::string("a")]);
        assert_eq!(delta.removed_for(dc::CREATOR), &[Value::string("b")]);
        assert_eq!(delta.len(), 2);
    }
}
