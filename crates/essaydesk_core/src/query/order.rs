//! Order compiler: flat dotted keys into a nested ordering structure.
//!
//! # Invariants
//! - `a.b` compiles to `{a: {b: dir}}`; a flat key passes through.
//! - Each top-level key appears once; a later key replaces an earlier one
//!   sharing the same top-level segment (no deep merge).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Insertion-ordered mapping of dotted field path to direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpec {
    entries: Vec<(String, Direction)>,
}

impl OrderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key`; re-adding a key overwrites its direction in place.
    pub fn with(mut self, key: impl Into<String>, direction: Direction) -> Self {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = direction,
            None => self.entries.push((key, direction)),
        }
        self
    }

    /// Reads a loose `{"field": "asc"}` object, dropping unknown directions.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        object
            .iter()
            .filter_map(|(key, direction)| {
                direction
                    .as_str()
                    .and_then(Direction::parse)
                    .map(|direction| (key.clone(), direction))
            })
            .fold(Self::default(), |spec, (key, direction)| spec.with(key, direction))
    }

    pub fn entries(&self) -> &[(String, Direction)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One compiled ordering term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderTerm {
    Field {
        field: String,
        direction: Direction,
    },
    Nested {
        relation: String,
        field: String,
        direction: Direction,
    },
}

impl OrderTerm {
    pub fn top_level(&self) -> &str {
        match self {
            Self::Field { field, .. } => field,
            Self::Nested { relation, .. } => relation,
        }
    }
}

/// Compiled ordering, keyed by top-level segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedOrder {
    terms: Vec<OrderTerm>,
}

impl NestedOrder {
    /// Newest records first.
    pub fn created_at_desc() -> Self {
        let mut order = Self::default();
        order.insert(OrderTerm::Field {
            field: "created_at".to_string(),
            direction: Direction::Desc,
        });
        order
    }

    pub fn terms(&self) -> &[OrderTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn insert(&mut self, term: OrderTerm) {
        match self
            .terms
            .iter_mut()
            .find(|existing| existing.top_level() == term.top_level())
        {
            Some(existing) => *existing = term,
            None => self.terms.push(term),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for term in &self.terms {
            match term {
                OrderTerm::Field { field, direction } => {
                    map.insert(field.clone(), Value::from(direction.as_str()));
                }
                OrderTerm::Nested {
                    relation,
                    field,
                    direction,
                } => {
                    let mut inner = Map::new();
                    inner.insert(field.clone(), Value::from(direction.as_str()));
                    map.insert(relation.clone(), Value::Object(inner));
                }
            }
        }
        Value::Object(map)
    }
}

/// Compiles `order` into its nested form.
pub fn order_by(order: &OrderSpec) -> NestedOrder {
    let mut compiled = NestedOrder::default();
    for (key, direction) in order.entries() {
        let term = match key.split_once('.') {
            Some((left, rest)) => OrderTerm::Nested {
                relation: left.to_string(),
                field: rest.split('.').next().unwrap_or_default().to_string(),
                direction: *direction,
            },
            None => OrderTerm::Field {
                field: key.clone(),
                direction: *direction,
            },
        };
        compiled.insert(term);
    }
    compiled
}

#[cfg(test)]
mod tests {
    use super::{order_by, Direction, NestedOrder, OrderSpec};
    use serde_json::json;

    #[test]
    fn dotted_key_expands_and_flat_key_passes_through() {
        let nested = order_by(&OrderSpec::new().with("a.b", Direction::Asc));
        assert_eq!(nested.to_json(), json!({"a": {"b": "asc"}}));

        let flat = order_by(&OrderSpec::new().with("c", Direction::Desc));
        assert_eq!(flat.to_json(), json!({"c": "desc"}));
    }

    #[test]
    fn same_top_level_segment_keeps_last_definition() {
        let spec = OrderSpec::new()
            .with("user.name", Direction::Asc)
            .with("title", Direction::Desc)
            .with("user.email", Direction::Desc);
        let compiled = order_by(&spec);

        assert_eq!(compiled.terms().len(), 2);
        assert_eq!(compiled.terms()[0].top_level(), "user");
        assert_eq!(
            compiled.to_json(),
            json!({"user": {"email": "desc"}, "title": "desc"})
        );
    }

    #[test]
    fn segments_beyond_the_second_are_ignored() {
        let compiled = order_by(&OrderSpec::new().with("a.b.c", Direction::Asc));
        assert_eq!(compiled.to_json(), json!({"a": {"b": "asc"}}));
    }

    #[test]
    fn from_json_drops_invalid_directions() {
        let spec = OrderSpec::from_json(&json!({"name": "asc", "email": "sideways", "age": 3}));
        assert_eq!(spec.entries(), &[("name".to_string(), Direction::Asc)]);
        assert!(OrderSpec::from_json(&json!("name")).is_empty());
    }

    #[test]
    fn json_keys_keep_their_written_priority() {
        let spec = OrderSpec::from_json(&json!({"title": "desc", "created_at": "asc"}));
        assert_eq!(
            spec.entries(),
            &[
                ("title".to_string(), Direction::Desc),
                ("created_at".to_string(), Direction::Asc),
            ]
        );

        let compiled = order_by(&spec).to_json();
        let keys: Vec<&str> = compiled
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["title", "created_at"]);
    }

    #[test]
    fn empty_spec_compiles_to_empty_order() {
        assert!(order_by(&OrderSpec::new()).is_empty());
        assert_eq!(
            NestedOrder::created_at_desc().to_json(),
            json!({"created_at": "desc"})
        );
    }
}
