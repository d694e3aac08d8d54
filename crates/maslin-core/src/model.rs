//! # Model
//!
//! The in-memory instance pool populated during ingestion and read during
//! the dump.
//!
//! ## Lifecycle
//!
//! ```text
//! Model::new ──set_option──▶ Model ──insert (ingestion)──▶ Model ──seal──▶ SealedModel ──▶ export
//! ```
//!
//! Sealing consumes the [`Model`], so no mutation can follow the end of the
//! stream and the end signal fires exactly once. [`SealedModel`] only offers
//! read access.

use crate::schema::{ClassDef, Schema};
use crate::{ClassNumber, DomainNumber, Instance, MaslinError, primitives};
use std::collections::BTreeMap;

// =============================================================================
// OPTIONS
// =============================================================================

/// Configuration options a model accepts before ingestion starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelOption {
    /// Action language dialect of imported action bodies.
    ActionDialect,
    /// Root directory of the target project.
    ProjectRoot,
}

impl ModelOption {
    /// Canonical option name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ActionDialect => primitives::OPTION_ACTION_DIALECT,
            Self::ProjectRoot => primitives::OPTION_PROJECT_ROOT,
        }
    }

    /// Every option, in canonical order.
    pub const ALL: [Self; 2] = [Self::ActionDialect, Self::ProjectRoot];
}

// =============================================================================
// MODEL (ingestion phase)
// =============================================================================

/// The mutable model, owned by the ingestion phase.
#[derive(Debug, Clone)]
pub struct Model {
    schema: Schema,
    options: BTreeMap<ModelOption, String>,
    instances: BTreeMap<(DomainNumber, ClassNumber), Vec<Instance>>,
}

impl Model {
    /// Create an empty model over the given schema.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            options: BTreeMap::new(),
            instances: BTreeMap::new(),
        }
    }

    /// Set a configuration option, replacing any previous value.
    pub fn set_option(&mut self, option: ModelOption, value: impl Into<String>) {
        self.options.insert(option, value.into());
    }

    /// Get a configuration option.
    #[must_use]
    pub fn option(&self, option: ModelOption) -> Option<&str> {
        self.options.get(&option).map(String::as_str)
    }

    /// The schema this model is built over.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Add an instance to `domain`.
    ///
    /// Fails if the instance's class is outside the schema.
    pub fn insert(&mut self, domain: DomainNumber, instance: Instance) -> Result<(), MaslinError> {
        let class = instance.class();
        if self.schema.class(class).is_none() {
            return Err(MaslinError::Schema(format!(
                "class {} is not part of the schema",
                class
            )));
        }
        self.instances
            .entry((domain, class))
            .or_default()
            .push(instance);
        Ok(())
    }

    /// Mutable access to the instances of one class, for handlers that
    /// update earlier instances instead of creating new ones.
    pub fn instances_mut(&mut self, domain: DomainNumber, class: ClassNumber) -> &mut Vec<Instance> {
        self.instances.entry((domain, class)).or_default()
    }

    /// Instances of one class in insertion order.
    #[must_use]
    pub fn instances(&self, domain: DomainNumber, class: ClassNumber) -> &[Instance] {
        self.instances
            .get(&(domain, class))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of instances across all classes.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.values().map(Vec::len).sum()
    }

    /// Signal the end of ingestion.
    ///
    /// Consumes the model; the returned [`SealedModel`] is read-only.
    #[must_use]
    pub fn seal(self) -> SealedModel {
        SealedModel { inner: self }
    }
}

// =============================================================================
// SEALED MODEL (dump phase)
// =============================================================================

/// A model whose ingestion has ended.
#[derive(Debug, Clone)]
pub struct SealedModel {
    inner: Model,
}

impl SealedModel {
    /// The schema this model is built over.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        self.inner.schema()
    }

    /// Get a configuration option.
    #[must_use]
    pub fn option(&self, option: ModelOption) -> Option<&str> {
        self.inner.option(option)
    }

    /// Instances of one class in insertion order.
    #[must_use]
    pub fn instances(&self, domain: DomainNumber, class: ClassNumber) -> &[Instance] {
        self.inner.instances(domain, class)
    }

    /// Total number of instances across all classes.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.inner.instance_count()
    }

    /// Every class except the system class, in ascending class-number order.
    pub fn dump_classes(&self) -> impl Iterator<Item = &ClassDef> {
        let system = self.schema().system_class();
        self.schema()
            .classes()
            .filter(move |class| class.number != system)
    }
}

// =============================================================================
// TESTS
// =============================================================================
