//! Predicate and ordering translation into parameterized SQL.
//!
//! # Invariants
//! - Field names are resolved against a [`TableScope`] whitelist and never
//!   interpolated from input; values are always bound.
//! - Relation paths (`user.email`, `{"user": {...}}`) compile to
//!   `local_key IN (SELECT id FROM target WHERE ...)`.

use crate::query::filter::{Condition, FilterOperator, Predicate};
use crate::query::order::{Direction, NestedOrder, OrderTerm};
use crate::store::{StoreError, StoreResult};
use rusqlite::types::Value;
use serde_json::{Map, Value as Json};

/// Queryable columns of one table and the relations reachable from it.
#[derive(Debug)]
pub struct TableScope {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub relations: &'static [Relation],
}

/// Many-to-one link from `local_key` to `target.id`.
#[derive(Debug)]
pub struct Relation {
    pub name: &'static str,
    pub local_key: &'static str,
    pub target: &'static TableScope,
}

impl TableScope {
    fn column(&self, field: &str) -> Option<String> {
        self.columns
            .contains(&field)
            .then(|| format!("{}.{field}", self.table))
    }

    fn relation(&self, name: &str) -> Option<&'static Relation> {
        self.relations.iter().find(|relation| relation.name == name)
    }
}

/// SQL text plus the values bound to its `?` placeholders, in order.
#[derive(Debug, Default)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Compiles `predicate` into a boolean SQL expression over `scope`.
pub fn compile_where(scope: &TableScope, predicate: &Predicate) -> StoreResult<SqlFragment> {
    let mut params = Vec::new();
    let sql = predicate_sql(scope, predicate, &mut params)?;
    Ok(SqlFragment { sql, params })
}

/// Compiles `order` into an `ORDER BY` list, ending with `id ASC` so pages
/// are stable.
pub fn compile_order(scope: &TableScope, order: &NestedOrder) -> StoreResult<String> {
    let mut terms = Vec::with_capacity(order.terms().len() + 1);
    for term in order.terms() {
        terms.push(order_term_sql(scope, term)?);
    }
    terms.push(format!("{}.id ASC", scope.table));
    Ok(terms.join(", "))
}

fn order_term_sql(scope: &TableScope, term: &OrderTerm) -> StoreResult<String> {
    match term {
        OrderTerm::Field { field, direction } => {
            let column = scope
                .column(field)
                .ok_or_else(|| StoreError::UnknownField(field.clone()))?;
            Ok(format!("{column} {}", direction_sql(*direction)))
        }
        OrderTerm::Nested {
            relation,
            field,
            direction,
        } => {
            let link = scope
                .relation(relation)
                .ok_or_else(|| StoreError::UnknownField(relation.clone()))?;
            let target = link.target;
            let column = target
                .column(field)
                .ok_or_else(|| StoreError::UnknownField(format!("{relation}.{field}")))?;
            Ok(format!(
                "(SELECT {column} FROM {table} WHERE {table}.id = {outer}.{local_key}) {dir}",
                table = target.table,
                outer = scope.table,
                local_key = link.local_key,
                dir = direction_sql(*direction),
            ))
        }
    }
}

fn direction_sql(direction: Direction) -> &'static str {
    match direction {
        Direction::Asc => "ASC",
        Direction::Desc => "DESC",
    }
}

fn predicate_sql(
    scope: &TableScope,
    predicate: &Predicate,
    params: &mut Vec<Value>,
) -> StoreResult<String> {
    match predicate {
        Predicate::Empty => Ok("1 = 1".to_string()),
        Predicate::Field { field, condition } => field_sql(scope, field, condition, params),
        Predicate::Path { root, path, value } => {
            let field = path.strip_prefix("$.").unwrap_or(path);
            let link = scope
                .relation(root)
                .ok_or_else(|| StoreError::UnknownField(root.clone()))?;
            let inner = field_sql(
                link.target,
                field,
                &Condition::Equals(value.clone()),
                params,
            )?;
            Ok(relation_subquery(scope, link, &inner))
        }
        Predicate::And(items) => join_sql(scope, items, " AND ", "1 = 1", params),
        Predicate::Or(items) => join_sql(scope, items, " OR ", "1 = 0", params),
        Predicate::Fragment(value) => fragment_sql(scope, value, params),
    }
}

fn join_sql(
    scope: &TableScope,
    items: &[Predicate],
    separator: &str,
    when_empty: &str,
    params: &mut Vec<Value>,
) -> StoreResult<String> {
    if items.is_empty() {
        return Ok(when_empty.to_string());
    }
    let parts = items
        .iter()
        .map(|item| predicate_sql(scope, item, params))
        .collect::<StoreResult<Vec<_>>>()?;
    Ok(format!("({})", parts.join(separator)))
}

fn relation_subquery(scope: &TableScope, link: &Relation, inner: &str) -> String {
    format!(
        "{outer}.{local_key} IN (SELECT {table}.id FROM {table} WHERE {inner})",
        outer = scope.table,
        local_key = link.local_key,
        table = link.target.table,
    )
}

fn field_sql(
    scope: &TableScope,
    field: &str,
    condition: &Condition,
    params: &mut Vec<Value>,
) -> StoreResult<String> {
    if let Some(column) = scope.column(field) {
        return condition_sql(&column, condition, params);
    }

    if let Some((root, rest)) = field.split_once('.') {
        let link = scope
            .relation(root)
            .ok_or_else(|| StoreError::UnknownField(field.to_string()))?;
        let inner = field_sql(link.target, rest, condition, params)?;
        return Ok(relation_subquery(scope, link, &inner));
    }

    match (scope.relation(field), condition) {
        (Some(link), Condition::Equals(nested @ Json::Object(_))) => {
            let inner = fragment_sql(link.target, nested, params)?;
            Ok(relation_subquery(scope, link, &inner))
        }
        _ => Err(StoreError::UnknownField(field.to_string())),
    }
}

fn condition_sql(
    column: &str,
    condition: &Condition,
    params: &mut Vec<Value>,
) -> StoreResult<String> {
    match condition {
        Condition::Equals(Json::Object(operators)) => operators_sql(column, operators, params),
        Condition::Equals(value) => operator_sql(column, FilterOperator::Equals, value, params),
        Condition::Op(operator, value) => operator_sql(column, *operator, value, params),
    }
}

/// `{"contains": "a", "gte": 3}` style condition objects.
fn operators_sql(
    column: &str,
    operators: &Map<String, Json>,
    params: &mut Vec<Value>,
) -> StoreResult<String> {
    if operators.is_empty() {
        return Ok("1 = 1".to_string());
    }
    let mut parts = Vec::with_capacity(operators.len());
    for (name, value) in operators {
        let operator = FilterOperator::parse(name)
            .map_err(|err| StoreError::UnsupportedCondition(err.to_string()))?;
        parts.push(operator_sql(column, operator, value, params)?);
    }
    Ok(format!("({})", parts.join(" AND ")))
}

fn operator_sql(
    column: &str,
    operator: FilterOperator,
    value: &Json,
    params: &mut Vec<Value>,
) -> StoreResult<String> {
    let sql = match operator {
        FilterOperator::Equals if value.is_null() => format!("{column} IS NULL"),
        FilterOperator::Not if value.is_null() => format!("{column} IS NOT NULL"),
        FilterOperator::Equals => bind_scalar(column, "=", value, params)?,
        FilterOperator::Not => bind_scalar(column, "<>", value, params)?,
        FilterOperator::Gt => bind_scalar(column, ">", value, params)?,
        FilterOperator::Gte => bind_scalar(column, ">=", value, params)?,
        FilterOperator::Lt => bind_scalar(column, "<", value, params)?,
        FilterOperator::Lte => bind_scalar(column, "<=", value, params)?,
        FilterOperator::Contains => bind_like(column, value, "%", "%", params)?,
        FilterOperator::StartsWith => bind_like(column, value, "", "%", params)?,
        FilterOperator::EndsWith => bind_like(column, value, "%", "", params)?,
        FilterOperator::In => {
            let Json::Array(items) = value else {
                return Err(StoreError::UnsupportedCondition(format!(
                    "`in` on {column} expects an array"
                )));
            };
            if items.is_empty() {
                return Ok("1 = 0".to_string());
            }
            for item in items {
                params.push(to_sql_value(item)?);
            }
            let placeholders = vec!["?"; items.len()].join(", ");
            format!("{column} IN ({placeholders})")
        }
    };
    Ok(sql)
}

fn bind_scalar(
    column: &str,
    comparison: &str,
    value: &Json,
    params: &mut Vec<Value>,
) -> StoreResult<String> {
    params.push(to_sql_value(value)?);
    Ok(format!("{column} {comparison} ?"))
}

fn bind_like(
    column: &str,
    value: &Json,
    before: &str,
    after: &str,
    params: &mut Vec<Value>,
) -> StoreResult<String> {
    let Json::String(text) = value else {
        return Err(StoreError::UnsupportedCondition(format!(
            "pattern match on {column} expects a string"
        )));
    };
    params.push(Value::Text(format!("{before}{}{after}", escape_like(text))));
    Ok(format!("{column} LIKE ? ESCAPE '\\'"))
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn fragment_sql(scope: &TableScope, value: &Json, params: &mut Vec<Value>) -> StoreResult<String> {
    let Json::Object(object) = value else {
        return Err(StoreError::UnsupportedCondition(format!(
            "filter fragment must be an object, got {value}"
        )));
    };
    if object.is_empty() {
        return Ok("1 = 1".to_string());
    }

    let mut parts = Vec::with_capacity(object.len());
    for (key, inner) in object {
        let part = match key.as_str() {
            "AND" => combined_fragments_sql(scope, inner, " AND ", "1 = 1", params)?,
            "OR" => combined_fragments_sql(scope, inner, " OR ", "1 = 0", params)?,
            "NOT" => format!("NOT {}", fragment_sql(scope, inner, params)?),
            _ => match (scope.relation(key), inner) {
                (Some(link), Json::Object(nested))
                    if nested.contains_key("path") && nested.contains_key("equals") =>
                {
                    let path = nested
                        .get("path")
                        .and_then(Json::as_str)
                        .ok_or_else(|| {
                            StoreError::UnsupportedCondition(format!(
                                "`{key}.path` must be a string"
                            ))
                        })?;
                    let equals = nested.get("equals").cloned().unwrap_or(Json::Null);
                    predicate_sql(
                        scope,
                        &Predicate::Path {
                            root: link.name.to_string(),
                            path: path.to_string(),
                            value: equals,
                        },
                        params,
                    )?
                }
                _ => field_sql(scope, key, &Condition::Equals(inner.clone()), params)?,
            },
        };
        parts.push(part);
    }
    Ok(format!("({})", parts.join(" AND ")))
}

fn combined_fragments_sql(
    scope: &TableScope,
    value: &Json,
    separator: &str,
    when_empty: &str,
    params: &mut Vec<Value>,
) -> StoreResult<String> {
    let items = match value {
        Json::Array(items) => items.as_slice(),
        single @ Json::Object(_) => std::slice::from_ref(single),
        other => {
            return Err(StoreError::UnsupportedCondition(format!(
                "combinator expects an object or array, got {other}"
            )))
        }
    };
    if items.is_empty() {
        return Ok(when_empty.to_string());
    }
    let parts = items
        .iter()
        .map(|item| fragment_sql(scope, item, params))
        .collect::<StoreResult<Vec<_>>>()?;
    Ok(format!("({})", parts.join(separator)))
}

/// Converts a scalar JSON value into a bindable SQLite value.
pub fn to_sql_value(value: &Json) -> StoreResult<Value> {
    match value {
        Json::Null => Ok(Value::Null),
        Json::Bool(flag) => Ok(Value::Integer(i64::from(*flag))),
        Json::Number(number) => match number.as_i64() {
            Some(integer) => Ok(Value::Integer(integer)),
            None => number
                .as_f64()
                .map(Value::Real)
                .ok_or_else(|| StoreError::UnsupportedCondition(format!("number {number}"))),
        },
        Json::String(text) => Ok(Value::Text(text.clone())),
        other => Err(StoreError::UnsupportedCondition(format!(
            "cannot bind non-scalar value {other}"
        ))),
    }
}
