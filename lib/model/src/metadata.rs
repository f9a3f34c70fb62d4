use crate::vocab::{fedora, rdf};
use crate::{Delta, ModelError, ModelResult, Value};
use oxrdf::{Graph, NamedNode, NamedNodeRef, Triple, TripleRef};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// The RDF description of a single repository resource.
///
/// The metadata owns the triples whose subject is the resource [id](Self::id) and tracks every
/// change made through [`add`](Self::add), [`set`](Self::set) and [`delete`](Self::delete) in a
/// [`Delta`], so that only the changed slice has to be sent to the repository. The backing graph
/// may also hold descriptions of other resources (e.g., children embedded in a container
/// response). Those can be extracted with [`clone_for`](Self::clone_for).
#[derive(Clone, Debug)]
pub struct ResourceMetadata {
    id: NamedNode,
    graph: Graph,
    delta: Delta,
}

impl ResourceMetadata {
    /// Creates the metadata of a new, local resource.
    pub fn new(id: NamedNode) -> Self {
        Self {
            id,
            graph: Graph::new(),
            delta: Delta::new(),
        }
    }

    /// Creates the metadata of a resource fetched from the repository. There are no pending changes.
    ///
    /// If the graph does not describe `id`, the variant of `id` with (or without) a trailing slash
    /// is tried, as the repository is not consistent in this regard.
    pub fn from_graph(id: NamedNode, graph: Graph) -> ModelResult<Self> {
        let id = resolve_subject(id, &graph);
        for triple in graph.triples_for_subject(id.as_ref()) {
            Value::try_from(triple.object)?;
        }
        Ok(Self {
            id,
            graph,
            delta: Delta::new(),
        })
    }

    /// Creates the metadata of a resource from an iterator of triples, none of them pending.
    pub fn from_triples(
        id: NamedNode,
        triples: impl IntoIterator<Item = Triple>,
    ) -> ModelResult<Self> {
        let mut graph = Graph::new();
        for triple in triples {
            graph.insert(&triple);
        }
        Self::from_graph(id, graph)
    }

    /// The identifier (URL) of the resource.
    pub fn id(&self) -> &NamedNode {
        &self.id
    }

    /// The whole backing graph, including descriptions of other resources.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The triples describing this resource.
    pub fn triples(&self) -> impl Iterator<Item = TripleRef<'_>> {
        self.graph.triples_for_subject(self.id.as_ref())
    }

    /// All predicates used in the description of this resource.
    pub fn predicates(&self) -> BTreeSet<NamedNode> {
        self.triples()
            .map(|triple| triple.predicate.into_owned())
            .collect()
    }

    /// Returns all current values of `predicate`, or an empty list if there are none.
    pub fn get(&self, predicate: NamedNodeRef<'_>) -> Vec<Value> {
        self.graph
            .objects_for_subject_predicate(self.id.as_ref(), predicate)
            .filter_map(|object| Value::try_from(object).ok())
            .collect()
    }

    /// Returns one of the values of `predicate`.
    pub fn first(&self, predicate: NamedNodeRef<'_>) -> Option<Value> {
        self.graph
            .object_for_subject_predicate(self.id.as_ref(), predicate)
            .and_then(|object| Value::try_from(object).ok())
    }

    pub fn contains(&self, predicate: NamedNodeRef<'_>) -> bool {
        self.first(predicate).is_some()
    }

    /// Adds a value to `predicate`. Adding a value that is already present does nothing.
    ///
    /// Returns whether the value was added.
    pub fn add(&mut self, predicate: NamedNodeRef<'_>, value: Value) -> bool {
        if !self.insert_value(predicate, &value) {
            return false;
        }
        tracing::trace!(subject = %self.id, %predicate, %value, "adding value");
        self.delta.record_addition(predicate, value);
        true
    }

    /// Replaces all values of `predicate` with `values`.
    ///
    /// Only the difference to the current state is recorded: values present before and after are
    /// left untouched.
    pub fn set(&mut self, predicate: NamedNodeRef<'_>, values: impl IntoIterator<Item = Value>) {
        let mut wanted: Vec<Value> = Vec::new();
        for value in values {
            if !wanted.contains(&value) {
                wanted.push(value);
            }
        }

        let current = self.get(predicate);
        for value in current.iter().filter(|value| !wanted.contains(value)) {
            self.remove_value(predicate, value.clone());
        }
        for value in wanted.into_iter().filter(|value| !current.contains(value)) {
            if self.insert_value(predicate, &value) {
                self.delta.record_addition(predicate, value);
            }
        }
        tracing::trace!(subject = %self.id, %predicate, "values replaced");
    }

    /// Removes all values of `predicate`.
    pub fn delete(&mut self, predicate: NamedNodeRef<'_>) {
        for value in self.get(predicate) {
            self.remove_value(predicate, value);
        }
    }

    /// Adds an `rdf:type`.
    pub fn add_type(&mut self, rdf_type: NamedNodeRef<'_>) -> bool {
        self.add(rdf::TYPE, rdf_type.into())
    }

    pub fn has_type(&self, rdf_type: NamedNodeRef<'_>) -> bool {
        self.graph
            .contains(TripleRef::new(self.id.as_ref(), rdf::TYPE, rdf_type))
    }

    pub fn types(&self) -> Vec<NamedNode> {
        self.get(rdf::TYPE)
            .into_iter()
            .filter_map(|value| match value {
                Value::Iri(iri) => Some(iri),
                Value::Literal(_) => None,
            })
            .collect()
    }

    /// Extracts the description of another resource from the backing graph.
    ///
    /// The returned metadata contains the triples whose subject is `subject`, with a
    /// `fedora:hasParent` reference to this resource added on top. `subject` must differ from the
    /// id of this resource.
    pub fn clone_for(&self, subject: NamedNodeRef<'_>) -> ModelResult<Self> {
        if subject == self.id.as_ref() {
            return Err(ModelError::SelfReference {
                id: self.id.as_str().to_owned(),
            });
        }
        let mut graph = Graph::new();
        for triple in self.graph.triples_for_subject(subject) {
            Value::try_from(triple.object)?;
            graph.insert(triple);
        }
        let mut child = Self {
            id: subject.into_owned(),
            graph,
            delta: Delta::new(),
        };
        child.add(fedora::HAS_PARENT, Value::Iri(self.id.clone()));
        Ok(child)
    }

    /// Changes the identifier. All triples describing this resource move to the new subject.
    pub fn rename(&mut self, new_id: NamedNode) {
        let owned: Vec<Triple> = self.triples().map(TripleRef::into_owned).collect();
        for triple in &owned {
            self.graph.remove(triple);
        }
        for triple in owned {
            self.graph.insert(TripleRef::new(
                new_id.as_ref(),
                triple.predicate.as_ref(),
                triple.object.as_ref(),
            ));
        }
        tracing::debug!(from = %self.id, to = %new_id, "resource renamed");
        self.id = new_id;
    }

    /// The changes that have not been sent to the repository yet.
    pub fn delta(&self) -> &Delta {
        &self.delta
    }

    pub fn is_dirty(&self) -> bool {
        !self.delta.is_empty()
    }

    /// Returns the pending changes and marks the metadata as synchronized.
    pub fn take_delta(&mut self) -> Delta {
        std::mem::take(&mut self.delta)
    }

    /// Forgets the pending changes, e.g., after they have been applied by the repository.
    pub fn mark_clean(&mut self) {
        self.delta = Delta::new();
    }

    fn insert_value(&mut self, predicate: NamedNodeRef<'_>, value: &Value) -> bool {
        let object = value.to_term();
        self.graph
            .insert(TripleRef::new(self.id.as_ref(), predicate, object.as_ref()))
    }

    fn remove_value(&mut self, predicate: NamedNodeRef<'_>, value: Value) {
        let object = value.to_term();
        if self
            .graph
            .remove(TripleRef::new(self.id.as_ref(), predicate, object.as_ref()))
        {
            self.delta.record_removal(predicate, value);
        }
    }
}

impl PartialEq for ResourceMetadata {
    /// Two descriptions are equal if they describe the same resource with the same triples.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.triples().count() == other.triples().count()
            && self.triples().all(|triple| other.graph.contains(triple))
    }
}

impl Display for ResourceMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut lines: Vec<String> = self.triples().map(|triple| format!("{triple} .")).collect();
        lines.sort();
        for line in lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn resolve_subject(id: NamedNode, graph: &Graph) -> NamedNode {
    if graph.triples_for_subject(id.as_ref()).next().is_some() || graph.is_empty() {
        return id;
    }

    let alternative = match id.as_str().strip_suffix('/') {
        Some(stripped) => stripped.to_owned(),
        None => format!("{}/", id.as_str()),
    };
    match NamedNode::new(alternative) {
        Ok(alternative) if graph.triples_for_subject(alternative.as_ref()).next().is_some() => {
            alternative
        }
        _ => {
            tracing::warn!(%id, "graph does not contain any metadata for the resource");
            id
        }
    }
}
