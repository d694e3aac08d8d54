//! # Handler Registry
//!
//! Resolves an element name to the handler that turns a record's values
//! into model state.
//!
//! The registry is built once from the class schema. Lookup is an exact,
//! case-sensitive string match; a miss is [`MaslinError::UnknownElement`],
//! never a silent no-op.

use crate::model::Model;
use crate::primitives::MAX_VALUES;
use crate::record::Values;
use crate::schema::{ClassDef, Schema};
use crate::{DomainNumber, Instance, MaslinError};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// HANDLER TRAIT
// =============================================================================

/// Turns one record into model state.
///
/// Handlers always receive all [`MAX_VALUES`] slots; slots the input line
/// did not carry are empty strings.
pub trait RecordHandler: fmt::Debug {
    /// Create or update state in `model` from the record's values.
    fn populate(&self, model: &mut Model, values: &Values) -> Result<(), MaslinError>;
}

/// The schema-driven handler: one new instance per record.
///
/// Slot `n` becomes the class's `n`-th attribute. An empty slot whose
/// attribute declares a default option takes that option's value when the
/// model has it set.
#[derive(Debug, Clone)]
pub struct ClassHandler {
    class: ClassDef,
}

impl ClassHandler {
    /// Create a handler for `class`.
    #[must_use]
    pub fn new(class: ClassDef) -> Self {
        Self { class }
    }
}

impl RecordHandler for ClassHandler {
    fn populate(&self, model: &mut Model, values: &Values) -> Result<(), MaslinError> {
        let expected = self.class.attributes.len();
        if let Some(slot) = (expected..MAX_VALUES).find(|&slot| !values[slot].is_empty()) {
            return Err(MaslinError::ExtraValues {
                element: self.class.element.to_string(),
                slot,
                expected,
            });
        }

        let mut instance = Instance::new(self.class.number);
        for (attribute, value) in self.class.attributes.iter().zip(values.iter()) {
            let value = match attribute.default_option {
                Some(option) if value.is_empty() => model.option(option).unwrap_or_default(),
                _ => value.as_str(),
            };
            instance.push(attribute.name, value);
        }

        model.insert(DomainNumber::DEFAULT, instance)
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Mapping from element name to record handler.
#[derive(Debug, Default)]
pub struct Registry {
    handlers: BTreeMap<String, Box<dyn RecordHandler>>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a [`ClassHandler`] for every class in `schema`.
    #[must_use]
    pub fn from_schema(schema: &Schema) -> Self {
        let mut registry = Self::new();
        for class in schema.classes() {
            registry.register(class.element, ClassHandler::new(class.clone()));
        }
        registry
    }

    /// Register `handler` for `element`, returning the handler it replaces.
    pub fn register(
        &mut self,
        element: impl Into<String>,
        handler: impl RecordHandler + 'static,
    ) -> Option<Box<dyn RecordHandler>> {
        self.handlers.insert(element.into(), Box::new(handler))
    }

    /// Find the handler for `element`.
    pub fn resolve(&self, element: &str) -> Result<&dyn RecordHandler, MaslinError> {
        self.handlers
            .get(element)
            .map(|handler| handler.as_ref())
            .ok_or_else(|| MaslinError::UnknownElement(element.to_string()))
    }

    /// Resolve `element` and feed it `values`.
    pub fn populate(
        &self,
        model: &mut Model,
        element: &str,
        values: &Values,
    ) -> Result<(), MaslinError> {
        self.resolve(element)?.populate(model, values)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClassNumber;
    use crate::model::ModelOption;

    fn values(fields: &[&str]) -> Values {
        let mut values = Values::default();
        for (slot, field) in fields.iter().enumerate() {
            values[slot] = (*field).to_string();
        }
        values
    }

    #[test]
    fn registry_covers_every_class() {
        let schema = Schema::builtin();
        let registry = Registry::from_schema(&schema);

        for class in schema.classes() {
            assert!(registry.resolve(class.element).is_ok(), "{}", class.element);
        }
        assert!(registry.resolve("pkg").is_err());
    }

    #[test]
    fn unknown_element_is_an_error() {
        let registry = Registry::from_schema(&Schema::builtin());
        let err = registry.resolve("NOPE").expect_err("unknown");
        assert!(matches!(err, MaslinError::UnknownElement(name) if name == "NOPE"));
    }

    #[test]
    fn class_handler_creates_instance() {
        let schema = Schema::builtin();
        let registry = Registry::from_schema(&schema);
        let mut model = Model::new(schema);

        registry
            .populate(&mut model, "PKG", &values(&["MyPackage", "1"]))
            .expect("populate");

        let sealed = model.seal();
        let pkgs = sealed.instances(DomainNumber::DEFAULT, ClassNumber(0));
        assert_eq!(pkgs.len(), 1);
        assert_eq!(pkgs[0].get("name"), Some("MyPackage"));
        assert_eq!(pkgs[0].get("number"), Some("1"));
    }

    #[test]
    fn class_handler_applies_option_defaults() {
        let schema = Schema::builtin();
        let registry = Registry::from_schema(&schema);
        let mut model = Model::new(schema);
        model.set_option(ModelOption::ActionDialect, "masl");

        registry
            .populate(&mut model, "SVC", &values(&["D", "O", "op", "object", "public"]))
            .expect("defaulted");
        registry
            .populate(
                &mut model,
                "SVC",
                &values(&["D", "O", "op2", "object", "public", "oal"]),
            )
            .expect("explicit");

        let sealed = model.seal();
        let dialects: Vec<_> = sealed
            .instances(DomainNumber::DEFAULT, ClassNumber(8))
            .iter()
            .filter_map(|i| i.get("dialect"))
            .collect();
        assert_eq!(dialects, vec!["masl", "oal"]);
    }

    #[test]
    fn class_handler_rejects_values_past_its_attributes() {
        let schema = Schema::builtin();
        let registry = Registry::from_schema(&schema);
        let mut model = Model::new(schema);

        let err = registry
            .populate(&mut model, "PKG", &values(&["a", "1", "extra"]))
            .expect_err("extra");
        assert!(matches!(
            err,
            MaslinError::ExtraValues {
                slot: 2,
                expected: 2,
                ..
            }
        ));
        assert_eq!(model.instance_count(), 0);
    }

    #[derive(Debug)]
    struct RenamePackage;

    impl RecordHandler for RenamePackage {
        fn populate(&self, model: &mut Model, values: &Values) -> Result<(), MaslinError> {
            let pkgs = model.instances_mut(DomainNumber::DEFAULT, ClassNumber(0));
            if let Some(last) = pkgs.last_mut() {
                *last = Instance::new(ClassNumber(0))
                    .with("name", values[0].as_str())
                    .with("number", last.get("number").unwrap_or_default().to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn custom_handler_can_update_existing_instances() {
        let schema = Schema::builtin();
        let mut registry = Registry::from_schema(&schema);
        assert!(registry.register("RENAME", RenamePackage).is_none());
        let mut model = Model::new(schema);

        registry
            .populate(&mut model, "PKG", &values(&["Old", "7"]))
            .expect("create");
        registry
            .populate(&mut model, "RENAME", &values(&["New"]))
            .expect("update");

        let sealed = model.seal();
        let pkgs = sealed.instances(DomainNumber::DEFAULT, ClassNumber(0));
        assert_eq!(pkgs.len(), 1);
        assert_eq!(pkgs[0].get("name"), Some("New"));
        assert_eq!(pkgs[0].get("number"), Some("7"));
    }
}
