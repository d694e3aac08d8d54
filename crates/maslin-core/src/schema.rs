//! # Class Schema
//!
//! Static description of the instantiable classes: the class-number space
//! `[0, MAX_CLASS)`, the element name each class is imported under, the key
//! letters it is dumped under, and its attributes in slot order.
//!
//! The schema is fixed at startup and never derived from input.

use crate::model::ModelOption;
use crate::primitives::MAX_VALUES;
use crate::{ClassNumber, MaslinError};
use std::collections::BTreeSet;

// =============================================================================
// DEFINITIONS
// =============================================================================

/// One attribute of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
    /// Attribute name.
    pub name: &'static str,
    /// Model option whose value fills this attribute when a record leaves it empty.
    pub default_option: Option<ModelOption>,
}

impl AttributeDef {
    /// A plain attribute.
    #[must_use]
    pub const fn plain(name: &'static str) -> Self {
        Self {
            name,
            default_option: None,
        }
    }

    /// An attribute defaulted from a model option.
    #[must_use]
    pub const fn from_option(name: &'static str, option: ModelOption) -> Self {
        Self {
            name,
            default_option: Some(option),
        }
    }
}

/// One instantiable class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Position in the class-number space.
    pub number: ClassNumber,
    /// Element name records for this class are tagged with.
    pub element: &'static str,
    /// Key letters the class is dumped under.
    pub key_letters: &'static str,
    /// Human-readable class name.
    pub name: &'static str,
    /// Attributes in value-slot order.
    pub attributes: Vec<AttributeDef>,
}

impl ClassDef {
    /// Create a class definition.
    #[must_use]
    pub fn new(
        number: usize,
        element: &'static str,
        key_letters: &'static str,
        name: &'static str,
        attributes: Vec<AttributeDef>,
    ) -> Self {
        Self {
            number: ClassNumber(number),
            element,
            key_letters,
            name,
            attributes,
        }
    }
}

// =============================================================================
// SCHEMA
// =============================================================================

/// The complete class schema with its designated system class.
#[derive(Debug, Clone)]
pub struct Schema {
    classes: Vec<ClassDef>,
    system_class: ClassNumber,
}

impl Schema {
    /// Build a schema, validating that:
    /// - class numbers are exactly `0..classes.len()` in order
    /// - element names are non-empty, comma-free and unique
    /// - key letters are non-empty, free of whitespace and unique
    /// - no class has more attributes than a record has value slots
    /// - the system class is inside the class-number space
    pub fn new(classes: Vec<ClassDef>, system_class: ClassNumber) -> Result<Self, MaslinError> {
        let mut elements = BTreeSet::new();
        let mut key_letters = BTreeSet::new();

        for (index, class) in classes.iter().enumerate() {
            if class.number.value() != index {
                return Err(MaslinError::Schema(format!(
                    "class {} is declared at position {}",
                    class.number, index
                )));
            }
            if class.element.is_empty() || class.element.contains(',') {
                return Err(MaslinError::Schema(format!(
                    "class {} has an invalid element name '{}'",
                    class.number, class.element
                )));
            }
            if !elements.insert(class.element) {
                return Err(MaslinError::Schema(format!(
                    "element name '{}' is declared twice",
                    class.element
                )));
            }
            if class.key_letters.is_empty() || class.key_letters.contains(char::is_whitespace) {
                return Err(MaslinError::Schema(format!(
                    "class {} has invalid key letters '{}'",
                    class.number, class.key_letters
                )));
            }
            if !key_letters.insert(class.key_letters) {
                return Err(MaslinError::Schema(format!(
                    "key letters '{}' are declared twice",
                    class.key_letters
                )));
            }
            if class.attributes.len() > MAX_VALUES {
                return Err(MaslinError::Schema(format!(
                    "class {} has {} attributes (maximum {})",
                    class.element,
                    class.attributes.len(),
                    MAX_VALUES
                )));
            }
        }

        if system_class.value() >= classes.len() {
            return Err(MaslinError::Schema(format!(
                "system class {} is outside [0, {})",
                system_class,
                classes.len()
            )));
        }

        Ok(Self {
            classes,
            system_class,
        })
    }

    /// Size of the class-number space (`MAX_CLASS`).
    #[must_use]
    pub fn max_class(&self) -> usize {
        self.classes.len()
    }

    /// The class excluded from the dump.
    #[must_use]
    pub fn system_class(&self) -> ClassNumber {
        self.system_class
    }

    /// Look up a class by number.
    #[must_use]
    pub fn class(&self, number: ClassNumber) -> Option<&ClassDef> {
        self.classes.get(number.value())
    }

    /// Look up a class by element name (exact match).
    #[must_use]
    pub fn by_element(&self, element: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|class| class.element == element)
    }

    /// Look up a class by the key letters it is dumped under (exact match).
    #[must_use]
    pub fn by_key_letters(&self, key_letters: &str) -> Option<&ClassDef> {
        self.classes
            .iter()
            .find(|class| class.key_letters == key_letters)
    }

    /// All classes in ascending class-number order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.iter()
    }

    /// The built-in MASL import schema.
    ///
    /// | # | Element | Key letters | Class |
    /// |---|---------|-------------|-------|
    /// | 0 | `PKG` | `EP_PKG` | Package |
    /// | 1 | `SYS` | `S_SYS` | System (system class) |
    /// | 2 | `DOM` | `S_DOM` | Domain |
    /// | 3 | `TERM` | `S_EE` | Terminator |
    /// | 4 | `OBJ` | `O_OBJ` | Object |
    /// | 5 | `ATTR` | `O_ATTR` | Attribute |
    /// | 6 | `IDENT` | `O_ID` | Identifier |
    /// | 7 | `REL` | `R_REL` | Relationship |
    /// | 8 | `SVC` | `S_SYNC` | Service |
    /// | 9 | `STATE` | `SM_STATE` | State |
    /// | 10 | `EVT` | `SM_EVT` | Event |
    /// | 11 | `TRANS` | `SM_TXN` | Transition |
    /// | 12 | `TYPE` | `S_DT` | Data Type |
    /// | 13 | `PARAM` | `S_SPARM` | Parameter |
    #[must_use]
    pub fn builtin() -> Self {
        use AttributeDef as A;
        use ModelOption::{ActionDialect, ProjectRoot};

        let classes = vec![
            ClassDef::new(0, "PKG", "EP_PKG", "Package", vec![
                A::plain("name"),
                A::plain("number"),
            ]),
            ClassDef::new(1, "SYS", "S_SYS", "System", vec![
                A::plain("name"),
                A::from_option("project_root", ProjectRoot),
            ]),
            ClassDef::new(2, "DOM", "S_DOM", "Domain", vec![
                A::plain("name"),
                A::plain("package"),
            ]),
            ClassDef::new(3, "TERM", "S_EE", "Terminator", vec![
                A::plain("domain"),
                A::plain("name"),
                A::plain("key_letters"),
            ]),
            ClassDef::new(4, "OBJ", "O_OBJ", "Object", vec![
                A::plain("domain"),
                A::plain("name"),
                A::plain("key_letters"),
                A::plain("number"),
            ]),
            ClassDef::new(5, "ATTR", "O_ATTR", "Attribute", vec![
                A::plain("domain"),
                A::plain("object"),
                A::plain("name"),
                A::plain("type"),
                A::plain("preferred"),
                A::plain("referential"),
                A::plain("default"),
            ]),
            ClassDef::new(6, "IDENT", "O_ID", "Identifier", vec![
                A::plain("domain"),
                A::plain("object"),
                A::plain("number"),
                A::plain("attributes"),
            ]),
            ClassDef::new(7, "REL", "R_REL", "Relationship", vec![
                A::plain("domain"),
                A::plain("number"),
                A::plain("kind"),
                A::plain("from"),
                A::plain("to"),
                A::plain("phrase"),
            ]),
            ClassDef::new(8, "SVC", "S_SYNC", "Service", vec![
                A::plain("domain"),
                A::plain("parent"),
                A::plain("name"),
                A::plain("kind"),
                A::plain("visibility"),
                A::from_option("dialect", ActionDialect),
                A::plain("body"),
            ]),
            ClassDef::new(9, "STATE", "SM_STATE", "State", vec![
                A::plain("domain"),
                A::plain("object"),
                A::plain("name"),
                A::plain("kind"),
                A::from_option("dialect", ActionDialect),
                A::plain("body"),
            ]),
            ClassDef::new(10, "EVT", "SM_EVT", "Event", vec![
                A::plain("domain"),
                A::plain("object"),
                A::plain("name"),
                A::plain("kind"),
            ]),
            ClassDef::new(11, "TRANS", "SM_TXN", "Transition", vec![
                A::plain("domain"),
                A::plain("object"),
                A::plain("from"),
                A::plain("event"),
                A::plain("to"),
            ]),
            ClassDef::new(12, "TYPE", "S_DT", "Data Type", vec![
                A::plain("domain"),
                A::plain("name"),
                A::plain("visibility"),
                A::plain("definition"),
            ]),
            ClassDef::new(13, "PARAM", "S_SPARM", "Parameter", vec![
                A::plain("domain"),
                A::plain("parent"),
                A::plain("name"),
                A::plain("mode"),
                A::plain("type"),
            ]),
        ];

        Self {
            classes,
            system_class: ClassNumber(1),
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::builtin()
    }
}

// =============================================================================
// TESTS
// =============================================================================
