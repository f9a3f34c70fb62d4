use crate::{ModelSchema, ResourceMetadata};
use oxrdf::NamedNode;
use std::cmp::Ordering;

/// Describes when a model applies to fetched metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeRegistration {
    pub model: String,
    /// Ancestor model names, nearest first.
    pub ancestors: Vec<String>,
    /// The model applies if the metadata has all of these `rdf:type`s.
    pub rdf_types: Vec<NamedNode>,
    /// The model applies if the metadata has values for all of these predicates.
    pub predicates: Vec<NamedNode>,
    pub priority: f64,
}

impl TypeRegistration {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ancestors: Vec::new(),
            rdf_types: Vec::new(),
            predicates: Vec::new(),
            priority: 1.0,
        }
    }

    /// Registers a schema on its rdf types.
    pub fn for_schema(schema: &ModelSchema) -> Self {
        Self {
            model: schema.model_name().to_owned(),
            ancestors: schema.ancestors().to_vec(),
            rdf_types: schema.rdf_types().to_vec(),
            predicates: Vec::new(),
            priority: 1.0,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn on_predicate(mut self, predicate: impl Into<NamedNode>) -> Self {
        self.predicates.push(predicate.into());
        self
    }

    #[must_use]
    pub fn on_rdf_type(mut self, rdf_type: impl Into<NamedNode>) -> Self {
        self.rdf_types.push(rdf_type.into());
        self
    }

    #[must_use]
    pub fn with_ancestors(mut self, ancestors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ancestors = ancestors.into_iter().map(Into::into).collect();
        self
    }
}

/// Collects [`TypeRegistration`]s during start-up.
#[derive(Debug)]
pub struct TypeRegistryBuilder {
    base_model: String,
    registrations: Vec<TypeRegistration>,
}

impl TypeRegistryBuilder {
    /// Registers a model. Registering the same model twice keeps the first registration.
    #[must_use]
    pub fn register(mut self, registration: TypeRegistration) -> Self {
        if self
            .registrations
            .iter()
            .any(|r| r.model == registration.model)
        {
            return self;
        }
        self.registrations.push(registration);
        self
    }

    pub fn build(self) -> TypeRegistry {
        TypeRegistry {
            base_model: self.base_model,
            registrations: self.registrations,
        }
    }
}

/// Picks the models that best describe fetched metadata.
///
/// The registry is immutable once built and can be shared between threads.
#[derive(Debug)]
pub struct TypeRegistry {
    base_model: String,
    registrations: Vec<TypeRegistration>,
}

impl TypeRegistry {
    /// Creates a builder. `base_model` is the ancestor of every model and the fallback result.
    pub fn builder(base_model: impl Into<String>) -> TypeRegistryBuilder {
        TypeRegistryBuilder {
            base_model: base_model.into(),
            registrations: Vec::new(),
        }
    }

    pub fn base_model(&self) -> &str {
        &self.base_model
    }

    /// Finds a registration by its fully-qualified or short model name.
    pub fn model(&self, name: &str) -> Option<&TypeRegistration> {
        self.registrations.iter().find(|r| {
            r.model == name || r.model.rsplit('.').next() == Some(name)
        })
    }

    /// Returns the models that should jointly represent `metadata`, best match first.
    ///
    /// Every candidate is scored by its own priority plus the priorities of all candidates in its
    /// lineage. Candidates that are already part of a better candidate's lineage are dropped.
    /// Ties are broken by registration order. `hint` is a model requested by the caller.
    pub fn resolve(&self, metadata: &ResourceMetadata, hint: Option<&str>) -> Vec<String> {
        let mut candidates: Vec<(String, f64)> = vec![(self.base_model.clone(), 0.0)];
        if let Some(hint) = hint {
            add_candidate(&mut candidates, hint, 1.0);
        }

        let types = metadata.types();
        for registration in &self.registrations {
            if !registration.rdf_types.is_empty()
                && registration.rdf_types.iter().all(|t| types.contains(t))
            {
                add_candidate(&mut candidates, &registration.model, registration.priority);
            }
        }
        for registration in &self.registrations {
            if !registration.predicates.is_empty()
                && registration
                    .predicates
                    .iter()
                    .all(|p| metadata.contains(p.as_ref()))
            {
                add_candidate(&mut candidates, &registration.model, registration.priority);
            }
        }

        let mut scored: Vec<(String, f64)> = candidates
            .iter()
            .map(|(model, priority)| {
                let inherited: f64 = self
                    .lineage(model)
                    .iter()
                    .skip(1)
                    .filter_map(|m| candidates.iter().find(|(c, _)| c == m))
                    .map(|(_, p)| p)
                    .sum();
                (model.clone(), priority + inherited)
            })
            .collect();
        // stable, keeps registration order for equal scores
        scored.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

        let mut resolved: Vec<String> = Vec::new();
        let mut covered: Vec<String> = Vec::new();
        for (model, _) in scored {
            if covered.contains(&model) {
                continue;
            }
            covered.extend(self.lineage(&model));
            resolved.push(model);
        }
        tracing::debug!(id = %metadata.id(), ?resolved, "resolved models");
        resolved
    }

    /// The model itself, its registered ancestors and the base model.
    fn lineage(&self, model: &str) -> Vec<String> {
        let mut lineage = vec![model.to_owned()];
        if let Some(registration) = self.registrations.iter().find(|r| r.model == model) {
            lineage.extend(registration.ancestors.iter().cloned());
        }
        if !lineage.contains(&self.base_model) {
            lineage.push(self.base_model.clone());
        }
        lineage
    }
}

fn add_candidate(candidates: &mut Vec<(String, f64)>, model: &str, priority: f64) {
    match candidates.iter_mut().find(|(m, _)| m == model) {
        Some((_, existing)) => *existing = existing.max(priority),
        None => candidates.push((model.to_owned(), priority)),
    }
}
