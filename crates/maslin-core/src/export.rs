//! # Instance Dump
//!
//! Writes a sealed model as a versioned textual dump:
//!
//! ```text
//! -- root-types-contained: Package_c
//! -- BP 7.1 content: StreamData syschar: 3 persistence-version: 7.1.6
//!
//! <class 0 instances>
//! <class 1 instances>
//! ...
//! ```
//!
//! The banner is constant. Classes are visited in strictly ascending
//! class-number order, each exactly once, except the system class which is
//! never visited. How a single class renders its instances is delegated to
//! an [`InstanceDumper`].

use crate::model::SealedModel;
use crate::primitives::{PERSISTENCE_LINE, ROOT_TYPES_LINE};
use crate::schema::ClassDef;
use crate::{DomainNumber, Instance, MaslinError};
use std::io::Write;

// =============================================================================
// DUMPER TRAIT
// =============================================================================

/// Renders the instances of one class.
///
/// Called once per non-system class, including classes with no instances.
pub trait InstanceDumper {
    /// Write every instance of `class` in `domain` to `out`.
    fn dump_class(
        &mut self,
        domain: DomainNumber,
        class: &ClassDef,
        instances: &[Instance],
        out: &mut dyn Write,
    ) -> Result<(), MaslinError>;
}

/// The default dumper: one SQL `INSERT` statement per instance.
///
/// ```text
/// INSERT INTO EP_PKG VALUES ('MyPackage', '1');
/// ```
///
/// Values are single-quoted with embedded quotes doubled. A class without
/// instances writes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlDumper;

impl InstanceDumper for SqlDumper {
    fn dump_class(
        &mut self,
        _domain: DomainNumber,
        class: &ClassDef,
        instances: &[Instance],
        out: &mut dyn Write,
    ) -> Result<(), MaslinError> {
        for instance in instances {
            write!(out, "INSERT INTO {} VALUES (", class.key_letters)?;
            for (index, value) in instance.values().enumerate() {
                if index > 0 {
                    out.write_all(b", ")?;
                }
                write!(out, "'{}'", value.replace('\'', "''"))?;
            }
            out.write_all(b");\n")?;
        }
        Ok(())
    }
}

// =============================================================================
// EXPORT
// =============================================================================

/// Counters for one dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOutcome {
    /// Classes handed to the dumper.
    pub classes: usize,
    /// Instances across those classes.
    pub instances: usize,
}

/// Write the two banner lines followed by a blank line.
pub fn write_banner(out: &mut dyn Write) -> Result<(), MaslinError> {
    writeln!(out, "{}", ROOT_TYPES_LINE)?;
    writeln!(out, "{}", PERSISTENCE_LINE)?;
    writeln!(out)?;
    Ok(())
}

/// Write the banner, then dump every non-system class in ascending order.
pub fn export(
    model: &SealedModel,
    dumper: &mut dyn InstanceDumper,
    out: &mut dyn Write,
) -> Result<ExportOutcome, MaslinError> {
    write_banner(out)?;

    let domain = DomainNumber::DEFAULT;
    let mut outcome = ExportOutcome::default();
    for class in model.dump_classes() {
        let instances = model.instances(domain, class.number);
        dumper.dump_class(domain, class, instances, out)?;
        outcome.classes += 1;
        outcome.instances += instances.len();
    }

    Ok(outcome)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClassNumber;
    use crate::model::Model;
    use crate::schema::{AttributeDef, Schema};

    const BANNER: &str = "-- root-types-contained: Package_c\n\
                          -- BP 7.1 content: StreamData syschar: 3 persistence-version: 7.1.6\n\n";

    #[derive(Debug, Default)]
    struct Recorder {
        visited: Vec<(usize, usize)>,
    }

    impl InstanceDumper for Recorder {
        fn dump_class(
            &mut self,
            _domain: DomainNumber,
            class: &ClassDef,
            instances: &[Instance],
            _out: &mut dyn Write,
        ) -> Result<(), MaslinError> {
            self.visited.push((class.number.value(), instances.len()));
            Ok(())
        }
    }

    fn numbered_schema(max_class: usize, system: usize) -> Schema {
        const ELEMENTS: [&str; 8] = ["C0", "C1", "C2", "C3", "C4", "C5", "C6", "C7"];
        let classes = (0..max_class)
            .map(|n| {
                ClassDef::new(n, ELEMENTS[n], ELEMENTS[n], ELEMENTS[n], vec![
                    AttributeDef::plain("name"),
                ])
            })
            .collect();
        Schema::new(classes, ClassNumber(system)).expect("schema")
    }

    #[test]
    fn banner_is_byte_exact() {
        let mut out = Vec::new();
        write_banner(&mut out).expect("banner");
        assert_eq!(String::from_utf8(out).expect("utf8"), BANNER);
    }

    #[test]
    fn visits_classes_ascending_and_skips_system() {
        let mut model = Model::new(numbered_schema(7, 3));
        for class in [5, 0, 2] {
            model
                .insert(DomainNumber::DEFAULT, Instance::new(ClassNumber(class)))
                .expect("insert");
        }

        let mut recorder = Recorder::default();
        let mut out = Vec::new();
        let outcome = export(&model.seal(), &mut recorder, &mut out).expect("export");

        assert_eq!(
            recorder.visited,
            vec![(0, 1), (1, 0), (2, 1), (4, 0), (5, 1), (6, 0)]
        );
        assert_eq!(outcome.classes, 6);
        assert_eq!(outcome.instances, 3);
    }

    #[test]
    fn system_class_instances_are_never_dumped() {
        let mut model = Model::new(Schema::builtin());
        model
            .insert(
                DomainNumber::DEFAULT,
                Instance::new(ClassNumber(1)).with("name", "sys"),
            )
            .expect("insert");

        let mut out = Vec::new();
        let outcome = export(&model.seal(), &mut SqlDumper, &mut out).expect("export");

        assert_eq!(outcome.instances, 0);
        assert_eq!(String::from_utf8(out).expect("utf8"), BANNER);
    }

    #[test]
    fn sql_dumper_quotes_values() {
        let schema = Schema::builtin();
        let class = schema.by_element("PKG").expect("PKG").clone();
        let instances = vec![
            Instance::new(ClassNumber(0))
                .with("name", "it's")
                .with("number", ""),
        ];

        let mut out = Vec::new();
        SqlDumper
            .dump_class(DomainNumber::DEFAULT, &class, &instances, &mut out)
            .expect("dump");

        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "INSERT INTO EP_PKG VALUES ('it''s', '');\n"
        );
    }
}
