use crate::PrefixMap;
use fcrepo_model::vocab::xsd;
use fcrepo_model::{
    Delta, LiteralTag, NamedNode, NamedNodeRef, ResourceMetadata, TaggedLiteral, Value,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// Writes [`Delta`]s as SPARQL Update documents relative to the resource being patched.
///
/// Every triple is written with the empty relative reference `<>` as subject. Removed values end up
/// in the `DELETE` block, added values in the `INSERT` block, and the `WHERE` clause is always
/// empty. Prefix declarations are emitted only for namespaces that are used.
///
/// The output is deterministic: prefixes are sorted by name, predicates by IRI and the lines of a
/// predicate by their text.
#[derive(Clone, Debug, Default)]
pub struct UpdateSerializer {
    prefixes: PrefixMap,
}

impl UpdateSerializer {
    pub fn new(prefixes: PrefixMap) -> Self {
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Serializes `delta` into an update document.
    pub fn serialize(&self, delta: &Delta) -> UpdateDocument {
        let mut writer = LineWriter {
            prefixes: &self.prefixes,
            used: BTreeSet::new(),
        };
        let delete = writer.lines(delta.removed());
        let insert = writer.lines(delta.added());
        let prefixes = writer
            .used
            .into_iter()
            .filter_map(|prefix| {
                self.prefixes
                    .namespace(prefix)
                    .map(|namespace| (prefix.to_owned(), namespace.to_owned()))
            })
            .collect();
        UpdateDocument {
            prefixes,
            delete,
            insert,
        }
    }

    /// Serializes the pending changes of `metadata` and marks it as clean.
    ///
    /// If sending the document fails, the caller is responsible for retrying with the returned
    /// document, as the changes are no longer tracked by `metadata`.
    pub fn serialize_pending(&self, metadata: &mut ResourceMetadata) -> UpdateDocument {
        let delta = metadata.take_delta();
        let document = self.serialize(&delta);
        tracing::debug!(
            subject = %metadata.id(),
            removed = document.delete.len(),
            added = document.insert.len(),
            "serialized pending changes"
        );
        document
    }
}

/// A `DELETE { } INSERT { } WHERE { }` update. Use [`Display`] to get the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateDocument {
    prefixes: Vec<(String, String)>,
    delete: Vec<String>,
    insert: Vec<String>,
}

impl UpdateDocument {
    /// Whether the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.insert.is_empty()
    }

    /// The triple patterns of the `DELETE` block, without the trailing ` .`.
    pub fn delete(&self) -> &[String] {
        &self.delete
    }

    /// The triple patterns of the `INSERT` block, without the trailing ` .`.
    pub fn insert(&self) -> &[String] {
        &self.insert
    }
}

impl Display for UpdateDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (prefix, namespace) in &self.prefixes {
            writeln!(f, "PREFIX {prefix}: <{namespace}>")?;
        }
        writeln!(f, "DELETE {{")?;
        for line in &self.delete {
            writeln!(f, "    {line} .")?;
        }
        writeln!(f, "}}")?;
        writeln!(f, "INSERT {{")?;
        for line in &self.insert {
            writeln!(f, "    {line} .")?;
        }
        writeln!(f, "}}")?;
        writeln!(f, "WHERE {{ }}")
    }
}

struct LineWriter<'a> {
    prefixes: &'a PrefixMap,
    used: BTreeSet<&'a str>,
}

impl LineWriter<'_> {
    fn lines(&mut self, values: &BTreeMap<NamedNode, Vec<Value>>) -> Vec<String> {
        let mut lines = Vec::new();
        for (predicate, values) in values {
            let predicate = self.iri(predicate.as_ref());
            let mut group: Vec<String> = values
                .iter()
                .map(|value| format!("<> {predicate} {}", self.value(value)))
                .collect();
            group.sort();
            group.dedup();
            lines.extend(group);
        }
        lines
    }

    fn value(&mut self, value: &Value) -> String {
        match value {
            Value::Iri(iri) => format!("<{}>", iri.as_str()),
            Value::Literal(literal) => self.literal(literal),
        }
    }

    fn literal(&mut self, literal: &TaggedLiteral) -> String {
        let mut output = String::with_capacity(literal.value().len() + 2);
        output.push('"');
        escape_into(literal.value(), &mut output);
        output.push('"');
        match literal.tag() {
            LiteralTag::Language(language) => {
                output.push('@');
                output.push_str(language);
            }
            LiteralTag::Datatype(datatype) if datatype.as_ref() == xsd::STRING => {}
            LiteralTag::Datatype(datatype) => {
                output.push_str("^^");
                output.push_str(&self.iri(datatype.as_ref()));
            }
        }
        output
    }

    fn iri(&mut self, iri: NamedNodeRef<'_>) -> String {
        let prefixes = self.prefixes;
        match prefixes.compact(iri) {
            Some((prefix, local)) => {
                self.used.insert(prefix);
                format!("{prefix}:{local}")
            }
            None => format!("<{}>", iri.as_str()),
        }
    }
}

fn escape_into(value: &str, output: &mut String) {
    for c in value.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c => output.push(c),
        }
    }
}
