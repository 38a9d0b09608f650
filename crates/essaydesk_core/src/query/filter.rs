//! Declarative filter compiler.
//!
//! # Responsibility
//! - Turn a sparse resource plus a definition list into a [`Predicate`] tree.
//! - Keep the tree independent from the physical query language.
//!
//! # Invariants
//! - An absent resource compiles to [`Predicate::Empty`] (no filtering).
//! - A definition that resolves nothing compiles to [`Predicate::Empty`];
//!   an empty combinator is never emitted.
//! - Compilation is total: malformed definitions never fail here.

use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Loosely typed filter input, keyed by logical filter name.
pub type Resource = Map<String, Value>;

/// Boolean composition of compiled operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Per-field comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Equals,
    Not,
    Contains,
    StartsWith,
    EndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 10] = [
        FilterOperator::Equals,
        FilterOperator::Not,
        FilterOperator::Contains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::Lt,
        FilterOperator::Lte,
        FilterOperator::In,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Not => "not",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
        }
    }

    pub fn parse(value: &str) -> Result<Self, UnknownOperator> {
        Self::ALL
            .into_iter()
            .find(|operator| operator.as_str() == value)
            .ok_or_else(|| UnknownOperator(value.to_string()))
    }
}

/// Operator name outside [`FilterOperator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl Display for UnknownOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown filter operator `{}`", self.0)
    }
}

impl Error for UnknownOperator {}

/// Condition applied to a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Direct equality; `null` means "is null".
    Equals(Value),
    Op(FilterOperator, Value),
}

/// Compiled, language-neutral predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches everything.
    Empty,
    Field {
        field: String,
        condition: Condition,
    },
    /// Equality on a nested path below `root`, e.g. `user` + `$.email`.
    Path {
        root: String,
        path: String,
        value: Value,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    /// Precomputed sub-condition merged verbatim.
    Fragment(Value),
}

impl Predicate {
    pub fn field(field: impl Into<String>, condition: Condition) -> Self {
        Self::Field {
            field: field.into(),
            condition,
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(field, Condition::Equals(value.into()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Restricts `filter` to rows without a soft-delete tombstone.
    pub fn active_only(filter: Predicate) -> Self {
        let not_deleted = Self::equals("deleted_at", Value::Null);
        match filter {
            Self::Empty => Self::And(vec![not_deleted]),
            other => Self::And(vec![not_deleted, other]),
        }
    }

    /// Renders the tree in its object shape (`{"AND": [{"name": {"contains": "x"}}]}`).
    pub fn to_json(&self) -> Value {
        match self {
            Self::Empty => Value::Object(Map::new()),
            Self::Field { field, condition } => {
                let condition = match condition {
                    Condition::Equals(value) => value.clone(),
                    Condition::Op(operator, value) => single(operator.as_str(), value.clone()),
                };
                single(field, condition)
            }
            Self::Path { root, path, value } => {
                let mut inner = Map::new();
                inner.insert("path".to_string(), Value::from(path.as_str()));
                inner.insert("equals".to_string(), value.clone());
                single(root, Value::Object(inner))
            }
            Self::And(items) => single(
                Combinator::And.as_str(),
                Value::Array(items.iter().map(Self::to_json).collect()),
            ),
            Self::Or(items) => single(
                Combinator::Or.as_str(),
                Value::Array(items.iter().map(Self::to_json).collect()),
            ),
            Self::Fragment(value) => value.clone(),
        }
    }
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Where an entry takes its value from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EntryValue {
    /// Read `resource[field]`.
    #[default]
    FromResource,
    /// Use this value, even when it is absent; the resource is not consulted.
    Explicit(Option<Value>),
}

/// Maps one logical filter key onto a condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterDefinitionEntry {
    pub field: Option<String>,
    pub operator: Option<FilterOperator>,
    pub value: EntryValue,
}

impl FilterDefinitionEntry {
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::default()
        }
    }

    /// Field-less entry contributing `value` as a raw sub-condition.
    pub fn fragment(value: Option<Value>) -> Self {
        Self {
            value: EntryValue::Explicit(value),
            ..Self::default()
        }
    }

    pub fn with_operator(mut self, operator: FilterOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn with_value(mut self, value: Option<Value>) -> Self {
        self.value = EntryValue::Explicit(value);
        self
    }

    fn resolve(&self, resource: &Resource) -> Option<Value> {
        match &self.value {
            EntryValue::Explicit(value) => value.clone(),
            EntryValue::FromResource => self
                .field
                .as_ref()
                .and_then(|field| resource.get(field))
                .cloned(),
        }
    }
}

/// Input of [`make_filter`].
#[derive(Debug, Clone, Copy)]
pub struct FilterInput<'a> {
    pub resource: Option<&'a Resource>,
    pub definition: &'a [FilterDefinitionEntry],
    /// Defaults to [`Combinator::Or`]; callers wanting conjunction pass `And`.
    pub operator: Option<Combinator>,
}

/// Compiles `input` into a predicate tree.
pub fn make_filter(input: &FilterInput<'_>) -> Predicate {
    let Some(resource) = input.resource else {
        return Predicate::Empty;
    };

    let mut operations = Vec::new();
    for entry in input.definition {
        let Some(value) = entry.resolve(resource) else {
            continue;
        };

        let Some(field) = entry.field.as_ref() else {
            operations.push(Predicate::Fragment(value));
            continue;
        };

        let condition = match entry.operator {
            Some(operator) => Condition::Op(operator, value),
            None => Condition::Equals(value),
        };
        operations.push(Predicate::field(field.clone(), condition));
    }

    if operations.is_empty() {
        return Predicate::Empty;
    }

    match input.operator.unwrap_or(Combinator::Or) {
        Combinator::And => Predicate::And(operations),
        Combinator::Or => Predicate::Or(operations),
    }
}

/// Builds equality conditions, expanding dotted types into nested paths.
///
/// `("user.email", v)` becomes `{user: {path: "$.email", equals: v}}`.
pub fn find_by_many(conditions: &[(&str, Value)]) -> Vec<Predicate> {
    conditions
        .iter()
        .map(|(kind, value)| match kind.split_once('.') {
            Some((root, rest)) => Predicate::Path {
                root: root.to_string(),
                path: format!("$.{rest}"),
                value: value.clone(),
            },
            None => Predicate::equals(*kind, value.clone()),
        })
        .collect()
}
