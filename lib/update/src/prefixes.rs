use fcrepo_model::vocab::NAMESPACES;
use fcrepo_model::NamedNodeRef;
use std::collections::BTreeMap;

/// The namespace prefixes an update document may use to abbreviate IRIs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixMap {
    /// prefix -> namespace
    namespaces: BTreeMap<String, String>,
}

impl PrefixMap {
    /// Creates a map without any prefix. Every IRI is written in full.
    pub fn empty() -> Self {
        Self {
            namespaces: BTreeMap::new(),
        }
    }

    /// Binds `prefix` to `namespace`, replacing a previous binding of the prefix.
    ///
    /// The prefix must be a valid SPARQL prefix name.
    #[must_use]
    pub fn with(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.insert(prefix, namespace);
        self
    }

    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.namespaces.insert(prefix.into(), namespace.into());
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
    }

    /// Splits `iri` into a prefix and a local name.
    ///
    /// The longest matching namespace wins. Returns [`None`] if no namespace matches or the
    /// remainder cannot be written as a prefixed name.
    pub fn compact<'s, 'i>(&'s self, iri: NamedNodeRef<'i>) -> Option<(&'s str, &'i str)> {
        let iri = iri.as_str();
        self.namespaces
            .iter()
            .filter_map(|(prefix, namespace)| {
                iri.strip_prefix(namespace.as_str())
                    .map(|local| (prefix.as_str(), namespace.len(), local))
            })
            .filter(|(_, _, local)| is_local_name(local))
            .max_by_key(|(_, length, _)| *length)
            .map(|(prefix, _, local)| (prefix, local))
    }
}

impl Default for PrefixMap {
    /// The namespaces known to Fedora Commons repositories.
    fn default() -> Self {
        let mut map = Self::empty();
        for (prefix, namespace) in NAMESPACES {
            map.insert(*prefix, *namespace);
        }
        map
    }
}

/// A conservative subset of the SPARQL `PN_LOCAL` production.
fn is_local_name(local: &str) -> bool {
    let Some(first) = local.chars().next() else {
        return false;
    };
    (first.is_ascii_alphanumeric() || first == '_')
        && !local.ends_with('.')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcrepo_model::vocab::{dc, fedora};

    #[test]
    fn compacts_known_namespaces() {
        let map = PrefixMap::default();
        assert_eq!(map.compact(dc::TITLE), Some(("dc", "title")));
        assert_eq!(map.compact(fedora::HAS_PARENT), Some(("fedora", "hasParent")));
    }

    #[test]
    fn longest_namespace_wins() {
        let map = PrefixMap::empty()
            .with("ex", "http://example.com/")
            .with("exv", "http://example.com/vocab#");
        let iri = NamedNodeRef::new_unchecked("http://example.com/vocab#term");
        assert_eq!(map.compact(iri), Some(("exv", "term")));
    }

    #[test]
    fn unsafe_local_names_are_not_compacted() {
        let map = PrefixMap::empty().with("ex", "http://example.com/");
        for iri in [
            "http://example.com/",
            "http://example.com/a/b",
            "http://example.com/a.",
            "http://example.com/-a",
            "http://other.com/a",
        ] {
            assert_eq!(map.compact(NamedNodeRef::new_unchecked(iri)), None, "{iri}");
        }
    }
}
