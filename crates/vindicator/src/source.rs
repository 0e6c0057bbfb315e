//! Raw parameter input.
//!
//! Validation reads its input through [`ParameterSource`]: anything that can
//! hand back the ordered raw values supplied under a name. Multi-valued maps
//! are supported directly, so query strings and form bodies with repeated
//! keys need no flattening.

use indexmap::IndexMap;
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// A batch of raw input keyed by parameter name.
pub trait ParameterSource {
    /// Raw value type.
    type Value: AsRef<str>;

    /// Values supplied for `name`, in the order they were given.
    ///
    /// `None` means the name did not appear at all.
    fn values_for(&self, name: &str) -> Option<&[Self::Value]>;
}

impl<S: ParameterSource + ?Sized> ParameterSource for &S {
    type Value = S::Value;

    fn values_for(&self, name: &str) -> Option<&[Self::Value]> {
        (**self).values_for(name)
    }
}

impl<K, V, H> ParameterSource for HashMap<K, Vec<V>, H>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    H: BuildHasher,
{
    type Value = V;

    fn values_for(&self, name: &str) -> Option<&[V]> {
        self.get(name).map(Vec::as_slice)
    }
}

impl<K, V, const N: usize, H> ParameterSource for HashMap<K, [V; N], H>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    H: BuildHasher,
{
    type Value = V;

    fn values_for(&self, name: &str) -> Option<&[V]> {
        self.get(name).map(<[V; N]>::as_slice)
    }
}

impl<K, V, H> ParameterSource for HashMap<K, Box<[V]>, H>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    H: BuildHasher,
{
    type Value = V;

    fn values_for(&self, name: &str) -> Option<&[V]> {
        self.get(name).map(|values| &**values)
    }
}

impl<K, V, H> ParameterSource for HashMap<K, &[V], H>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    H: BuildHasher,
{
    type Value = V;

    fn values_for(&self, name: &str) -> Option<&[V]> {
        self.get(name).copied()
    }
}

impl<K, V, H> ParameterSource for IndexMap<K, Vec<V>, H>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    H: BuildHasher,
{
    type Value = V;

    fn values_for(&self, name: &str) -> Option<&[V]> {
        self.get(name).map(Vec::as_slice)
    }
}

impl<K, V> ParameterSource for BTreeMap<K, Vec<V>>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    type Value = V;

    fn values_for(&self, name: &str) -> Option<&[V]> {
        self.get(name).map(Vec::as_slice)
    }
}

// ============================================================================
// RAW PARAMETERS
// ============================================================================

/// An insertion-ordered multi-map of raw parameter values.
///
/// Collecting `(name, value)` pairs appends repeated names in order, which is
/// how query strings and HTML forms deliver multi-valued fields.
///
/// ```rust,ignore
/// let raw: RawParameters = [("tag", "a"), ("limit", "10"), ("tag", "b")]
///     .into_iter()
///     .collect();
/// assert_eq!(raw.values_for("tag").unwrap(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    entries: IndexMap<String, Vec<String>>,
}

impl RawParameters {
    /// Creates an empty set of parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value under `name`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Replaces every value under `name`.
    pub fn insert<I, V>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.entries
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Builder form of [`append`](Self::append).
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// Whether any value was supplied under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no names are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates names with their values, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl ParameterSource for RawParameters {
    type Value = String;

    fn values_for(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }
}

impl<K, V> FromIterator<(K, V)> for RawParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = Self::new();
        raw.extend(iter);
        raw
    }
}

impl<K, V> Extend<(K, V)> for RawParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hash_map_of_vectors() {
        let input = HashMap::from([("a".to_owned(), vec!["1".to_owned(), "2".to_owned()])]);
        assert_eq!(input.values_for("a").unwrap(), ["1", "2"]);
        assert!(input.values_for("b").is_none());
    }

    #[test]
    fn hash_map_of_arrays() {
        let input = HashMap::from([("p0", ["x"]), ("p1", ["y"])]);
        assert_eq!(input.values_for("p1").unwrap(), ["y"]);
    }

    #[test]
    fn value_counts_may_differ_per_name() {
        let boxed: HashMap<&str, Box<[&str]>> = HashMap::from([
            ("a", vec!["1"].into_boxed_slice()),
            ("b", vec!["2", "3"].into_boxed_slice()),
        ]);
        assert_eq!(boxed.values_for("a").unwrap(), ["1"]);
        assert_eq!(boxed.values_for("b").unwrap(), ["2", "3"]);

        let one = ["1"];
        let two = ["2", "3"];
        let borrowed: HashMap<&str, &[&str]> = HashMap::from([("a", &one[..]), ("b", &two[..])]);
        assert_eq!(borrowed.values_for("b").unwrap(), ["2", "3"]);
        assert!(borrowed.values_for("c").is_none());
    }

    #[test]
    fn index_map_of_vectors() {
        let input: IndexMap<String, Vec<String>> =
            IndexMap::from([("k".to_owned(), vec!["x".to_owned(), "y".to_owned()])]);
        assert_eq!(input.values_for("k").unwrap(), ["x", "y"]);
    }

    #[test]
    fn btree_map_and_references() {
        let input = BTreeMap::from([("k", vec!["v"])]);
        let by_ref = &input;
        assert_eq!(by_ref.values_for("k").unwrap(), ["v"]);
    }

    #[test]
    fn raw_parameters_keep_repeated_names_in_order() {
        let raw: RawParameters = [("tag", "a"), ("limit", "10"), ("tag", "b")]
            .into_iter()
            .collect();

        assert_eq!(raw.len(), 2);
        assert_eq!(raw.values_for("tag").unwrap(), ["a", "b"]);
        let names: Vec<&str> = raw.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["tag", "limit"]);
    }

    #[test]
    fn insert_replaces_values() {
        let mut raw = RawParameters::new().with("a", "1").with("a", "2");
        raw.insert("a", ["3"]);
        assert_eq!(raw.values_for("a").unwrap(), ["3"]);
        assert!(raw.contains("a"));
        assert!(!raw.contains("b"));
    }
}
