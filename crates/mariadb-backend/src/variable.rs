//! Semantic column descriptors.

use serde::{Deserialize, Serialize};

/// Semantic kind of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VariableKind {
    /// Numeric scalar.
    Continuous,
    /// Categorical, with ordered category labels.
    Discrete { values: Vec<String> },
    /// Date and/or time of day.
    Time { has_date: bool, has_time: bool },
    /// Free text.
    String,
}

/// A column descriptor: name, semantic kind, and the projection used to
/// select the column's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    kind: VariableKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to_sql: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            to_sql: None,
        }
    }

    pub fn continuous(name: impl Into<String>) -> Self {
        Self::new(name, VariableKind::Continuous)
    }

    pub fn discrete<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            VariableKind::Discrete {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn time(name: impl Into<String>, has_date: bool, has_time: bool) -> Self {
        Self::new(name, VariableKind::Time { has_date, has_time })
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, VariableKind::String)
    }

    /// Attach a projection expression, replacing any previous one.
    pub fn with_to_sql(mut self, expr: impl Into<String>) -> Self {
        self.to_sql = Some(expr.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &VariableKind {
        &self.kind
    }

    /// Projection expression, once one has been attached.
    pub fn to_sql(&self) -> Option<&str> {
        self.to_sql.as_deref()
    }

    /// Numeric in the broad sense: continuous and time variables.
    pub fn is_continuous(&self) -> bool {
        matches!(
            self.kind,
            VariableKind::Continuous | VariableKind::Time { .. }
        )
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self.kind, VariableKind::Discrete { .. })
    }

    pub fn is_time(&self) -> bool {
        matches!(self.kind, VariableKind::Time { .. })
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, VariableKind::String)
    }

    /// Category labels; empty for non-discrete variables.
    pub fn values(&self) -> &[String] {
        match &self.kind {
            VariableKind::Discrete { values } => values,
            _ => &[],
        }
    }

    /// Projection that selects this variable's value from `quoted_column`.
    ///
    /// - time: `UNIX_TIMESTAMP(col)`
    /// - continuous: `(col)+0`, forcing a numeric result for DECIMAL columns
    /// - discrete and string: `(col)`
    pub fn projection_for(&self, quoted_column: &str) -> String {
        match self.kind {
            VariableKind::Time { .. } => format!("UNIX_TIMESTAMP({quoted_column})"),
            VariableKind::Continuous => format!("({quoted_column})+0"),
            VariableKind::Discrete { .. } | VariableKind::String => format!("({quoted_column})"),
        }
    }
}
