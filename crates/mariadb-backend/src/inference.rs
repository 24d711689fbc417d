//! Column type inference.
//!
//! A column's semantic [`Variable`] is decided from its protocol type code,
//! optionally backed by a live probe of its distinct values. The decision is
//! a declared, priority-ordered rule table ([`RULES`]); the first rule whose
//! predicate matches fires and later rules are never consulted:
//!
//! | # | type family            | outcome                                          |
//! |---|------------------------|--------------------------------------------------|
//! | 1 | floating / decimal     | continuous                                       |
//! | 2 | date- or time-bearing  | time, `has_date` / `has_time` from the code      |
//! | 3 | integer                | discrete over probed values, else continuous     |
//! | 4 | boolean (BIT)          | discrete `["0", "1"]`, never probed              |
//! | 5 | character              | discrete over right-trimmed probed values        |
//! | - | anything else          | string                                           |
//!
//! An explicit override for the field short-circuits the table entirely.
//!
//! Predicates are pure functions of the type code. Probing is a capability
//! ([`DistinctValues`]) handed in by the caller; errors it returns propagate
//! unchanged.

use crate::driver::ColumnDescription;
use crate::error::BackendResult;
use crate::ident::quote_identifier;
use crate::type_code::TypeCode;
use crate::variable::Variable;
use std::collections::HashMap;

/// Source of distinct column values for ambiguous type codes.
pub trait DistinctValues {
    /// Distinct values of `field` in `table`, rendered as text.
    ///
    /// An empty result means "no usable categories" (no rows, or too many
    /// distinct values).
    fn distinct_values(&mut self, field: &str, table: &str) -> BackendResult<Vec<String>>;
}

impl<F> DistinctValues for F
where
    F: FnMut(&str, &str) -> BackendResult<Vec<String>>,
{
    fn distinct_values(&mut self, field: &str, table: &str) -> BackendResult<Vec<String>> {
        self(field, table)
    }
}

/// Permission to probe a live table during inference.
pub struct Probe<'a> {
    source: &'a mut dyn DistinctValues,
    table: &'a str,
}

impl<'a> Probe<'a> {
    pub fn new(source: &'a mut dyn DistinctValues, table: &'a str) -> Self {
        Self { source, table }
    }

    fn run(&mut self, field: &str) -> BackendResult<Vec<String>> {
        self.source.distinct_values(field, self.table)
    }
}

/// What a matching rule does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Continuous,
    Time,
    /// Probe; categories if any, else continuous.
    ProbedInteger,
    Boolean,
    /// Probe and right-trim; categories if any, else string.
    ProbedCharacter,
}

/// One entry of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(TypeCode) -> bool,
    pub classification: Classification,
}

/// The classification table, highest priority first.
pub const RULES: &[Rule] = &[
    Rule {
        name: "floating",
        matches: TypeCode::is_floating,
        classification: Classification::Continuous,
    },
    Rule {
        name: "temporal",
        matches: TypeCode::is_temporal,
        classification: Classification::Time,
    },
    Rule {
        name: "integer",
        matches: TypeCode::is_integer,
        classification: Classification::ProbedInteger,
    },
    Rule {
        name: "boolean",
        matches: TypeCode::is_boolean,
        classification: Classification::Boolean,
    },
    Rule {
        name: "character",
        matches: TypeCode::is_character,
        classification: Classification::ProbedCharacter,
    },
];

/// Labels of a boolean column.
pub const BOOLEAN_VALUES: [&str; 2] = ["0", "1"];

/// First rule matching `type_code`, if any.
pub fn classify(type_code: TypeCode) -> Option<&'static Rule> {
    RULES.iter().find(|rule| (rule.matches)(type_code))
}

/// Guess the variable for a column from its type code (no override, no projection).
pub fn guess_variable(
    field_name: &str,
    type_code: TypeCode,
    mut probe: Option<Probe<'_>>,
) -> BackendResult<Variable> {
    let Some(rule) = classify(type_code) else {
        return Ok(Variable::string(field_name));
    };

    tracing::trace!(
        target: "mariadb_backend.inference",
        field = field_name,
        type_code = %type_code,
        rule = rule.name,
        "classification rule matched"
    );

    let var = match rule.classification {
        Classification::Continuous => Variable::continuous(field_name),
        Classification::Time => {
            Variable::time(field_name, type_code.has_date(), type_code.has_time())
        }
        Classification::ProbedInteger => {
            let values = match probe.as_mut() {
                Some(probe) => probe.run(field_name)?,
                None => Vec::new(),
            };
            if values.is_empty() {
                Variable::continuous(field_name)
            } else {
                Variable::discrete(field_name, values)
            }
        }
        Classification::Boolean => Variable::discrete(field_name, BOOLEAN_VALUES),
        Classification::ProbedCharacter => {
            let values: Vec<String> = match probe.as_mut() {
                Some(probe) => probe
                    .run(field_name)?
                    .into_iter()
                    .map(|v| v.trim_end().to_string())
                    .collect(),
                None => Vec::new(),
            };
            if values.is_empty() {
                Variable::string(field_name)
            } else {
                Variable::discrete(field_name, values)
            }
        }
    };
    Ok(var)
}

/// Build the variable for one column, attaching its projection.
///
/// An entry for `field_name` in `overrides` is used verbatim (only its
/// projection is recomputed); otherwise the kind is inferred with
/// [`guess_variable`].
pub fn create_variable(
    field_name: &str,
    field_metadata: &ColumnDescription,
    overrides: &HashMap<String, Variable>,
    probe: Option<Probe<'_>>,
) -> BackendResult<Variable> {
    let var = match overrides.get(field_name) {
        Some(var) => var.clone(),
        None => guess_variable(field_name, field_metadata.type_code, probe)?,
    };

    let projection = var.projection_for(&quote_identifier(field_name));
    tracing::debug!(
        target: "mariadb_backend.inference",
        field = field_name,
        kind = ?var.kind(),
        to_sql = %projection,
        "column classified"
    );
    Ok(var.with_to_sql(projection))
}
