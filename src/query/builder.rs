use serde_json::Value;

use super::error::QueryError;
use super::params::ListParams;
use super::types::{FilterCondition, FilterOp, SqlQuery};

/// Builds the data and count statements for one list request over a single
/// table. Filter values become `$n` bind parameters; identifiers are
/// validated before quoting. The data statement always fetches full rows;
/// the `select` projection is applied after decoding.
#[derive(Debug)]
pub struct ListQuery {
    table_name: String,
    params: ListParams,
    array_columns: Vec<String>,
}

impl ListQuery {
    pub fn new(table_name: impl Into<String>, params: ListParams) -> Result<Self, QueryError> {
        let table_name = table_name.into();
        validate_table_name(&table_name)?;
        for cond in &params.filters {
            validate_column(&cond.column)?;
        }
        if let Some(columns) = &params.select {
            for column in columns {
                validate_column(column)?;
            }
        }
        for key in &params.sort {
            validate_column(&key.column)?;
        }
        Ok(Self {
            table_name,
            params,
            array_columns: vec![],
        })
    }

    /// Mark array-typed columns (e.g. a `TEXT[]` careers column) so equality
    /// and `[in]` render as membership tests instead of scalar comparisons.
    pub fn array_columns(mut self, columns: &[&str]) -> Self {
        self.array_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn params(&self) -> &ListParams {
        &self.params
    }

    /// SELECT with WHERE, ORDER BY, then LIMIT/OFFSET. Sort is applied
    /// before the window so pagination stays deterministic. Full rows come
    /// back so the typed decode always has every column.
    pub fn to_sql(&self) -> SqlQuery {
        let (where_clause, params) = self.build_where_clause();
        let text = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", self.table_name),
            if where_clause.is_empty() {
                String::new()
            } else {
                format!("WHERE {}", where_clause)
            },
            self.build_order_clause(),
            format!(
                "LIMIT {} OFFSET {}",
                self.params.limit,
                self.params.offset()
            ),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlQuery { text, params }
    }

    /// COUNT over the same predicate, unfiltered by pagination.
    pub fn to_count_sql(&self) -> SqlQuery {
        let (where_clause, params) = self.build_where_clause();
        let text = if where_clause.is_empty() {
            format!("SELECT COUNT(*) as count FROM \"{}\"", self.table_name)
        } else {
            format!(
                "SELECT COUNT(*) as count FROM \"{}\" WHERE {}",
                self.table_name, where_clause
            )
        };
        SqlQuery { text, params }
    }

    fn build_where_clause(&self) -> (String, Vec<Value>) {
        let mut parts = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        for cond in &self.params.filters {
            parts.push(self.build_condition(cond, &mut params));
        }

        (parts.join(" AND "), params)
    }

    /// One SQL predicate per condition. Equality against string values casts
    /// the column to text so text-typed columns (zipcodes, uuids, booleans
    /// rendered as `true`/`false`) compare without a type error. Array
    /// columns use membership operators.
    fn build_condition(&self, cond: &FilterCondition, params: &mut Vec<Value>) -> String {
        let quoted = format!("\"{}\"", cond.column);
        let is_array = self.array_columns.iter().any(|c| c == &cond.column);
        match (&cond.op, &cond.value) {
            (FilterOp::In, Value::Array(values)) => {
                if values.is_empty() {
                    return "1=0".to_string();
                }
                let placeholders: Vec<String> =
                    values.iter().map(|v| push_param(params, v.clone())).collect();
                if is_array {
                    // any-of overlap against an array column
                    format!("{} && ARRAY[{}]", quoted, placeholders.join(", "))
                } else {
                    format!("{}::text IN ({})", quoted, placeholders.join(", "))
                }
            }
            // Single value degrades to equality
            (FilterOp::In, other) | (FilterOp::Eq, other) => {
                let placeholder = push_param(params, other.clone());
                if is_array {
                    format!("{} = ANY({})", placeholder, quoted)
                } else if matches!(other, Value::String(_)) {
                    format!("{}::text = {}", quoted, placeholder)
                } else {
                    format!("{} = {}", quoted, placeholder)
                }
            }
            (op, Value::String(s)) => format!(
                "{}::text {} {}",
                quoted,
                op.to_sql(),
                push_param(params, Value::String(s.clone()))
            ),
            (op, value) => format!(
                "{} {} {}",
                quoted,
                op.to_sql(),
                push_param(params, value.clone())
            ),
        }
    }

    fn build_order_clause(&self) -> String {
        if self.params.sort.is_empty() {
            // Newest first when the request does not say otherwise
            return "ORDER BY \"created_at\" DESC".to_string();
        }
        let parts: Vec<String> = self
            .params
            .sort
            .iter()
            .map(|k| format!("\"{}\" {}", k.column, k.direction.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

fn push_param(params: &mut Vec<Value>, value: Value) -> String {
    params.push(value);
    format!("${}", params.len())
}

pub fn validate_table_name(name: &str) -> Result<(), QueryError> {
    if !is_valid_identifier(name) {
        return Err(QueryError::InvalidTableName(format!(
            "Invalid table name format: {}",
            name
        )));
    }
    Ok(())
}

fn validate_column(name: &str) -> Result<(), QueryError> {
    if !is_valid_identifier(name) {
        return Err(QueryError::InvalidColumn(format!(
            "Invalid column name format: {}",
            name
        )));
    }
    Ok(())
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn params_from(entries: &[(&str, &str)]) -> ListParams {
        let raw: HashMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ListParams::from_query(&raw)
    }

    #[test]
    fn empty_params_build_unfiltered_defaulted_query() {
        let query = ListQuery::new("bootcamps", params_from(&[])).unwrap();
        let sql = query.to_sql();
        assert_eq!(
            sql.text,
            "SELECT * FROM \"bootcamps\" ORDER BY \"created_at\" DESC LIMIT 25 OFFSET 0"
        );
        assert!(sql.params.is_empty());
    }

    #[test]
    fn gte_filter_becomes_comparison_with_bind() {
        let query =
            ListQuery::new("bootcamps", params_from(&[("average_cost[gte]", "1000")])).unwrap();
        let sql = query.to_sql();
        assert!(sql.text.contains("WHERE \"average_cost\" >= $1"));
        assert_eq!(sql.params, vec![Value::from(1000)]);
    }

    #[test]
    fn filters_combine_with_and() {
        let query = ListQuery::new(
            "bootcamps",
            params_from(&[("average_cost[lte]", "10000"), ("housing", "true")]),
        )
        .unwrap();
        let sql = query.to_sql();
        // Conditions are sorted by column for deterministic output
        assert!(sql.text.contains("\"average_cost\" <= $1 AND \"housing\"::text = $2"));
        assert_eq!(sql.params, vec![Value::from(10000), Value::from("true")]);
    }

    #[test]
    fn string_equality_casts_column_to_text() {
        // A numeric-looking zipcode stays text; no text = bigint comparison
        let query = ListQuery::new("bootcamps", params_from(&[("zipcode", "02115")])).unwrap();
        let sql = query.to_sql();
        assert!(sql.text.contains("WHERE \"zipcode\"::text = $1"));
        assert_eq!(sql.params, vec![Value::from("02115")]);
    }

    #[test]
    fn in_filter_on_scalar_column_expands_placeholders() {
        let query =
            ListQuery::new("bootcamps", params_from(&[("city[in]", "Boston,Lowell")])).unwrap();
        let sql = query.to_sql();
        assert!(sql.text.contains("\"city\"::text IN ($1, $2)"));
        assert_eq!(sql.params.len(), 2);
    }

    #[test]
    fn in_filter_on_array_column_uses_overlap() {
        let query = ListQuery::new("bootcamps", params_from(&[("careers[in]", "Business,UI/UX")]))
            .unwrap()
            .array_columns(&["careers"]);
        let sql = query.to_sql();
        assert!(sql.text.contains("\"careers\" && ARRAY[$1, $2]"));
        assert_eq!(
            sql.params,
            vec![Value::from("Business"), Value::from("UI/UX")]
        );
    }

    #[test]
    fn equality_on_array_column_is_membership() {
        let query = ListQuery::new("bootcamps", params_from(&[("careers", "Business")]))
            .unwrap()
            .array_columns(&["careers"]);
        let sql = query.to_sql();
        assert!(sql.text.contains("WHERE $1 = ANY(\"careers\")"));
    }

    #[test]
    fn select_never_narrows_the_fetched_row() {
        // Projection happens after decode; the statement still needs every
        // column of the row type
        let query =
            ListQuery::new("bootcamps", params_from(&[("select", "name,description")])).unwrap();
        let sql = query.to_sql();
        assert!(sql.text.starts_with("SELECT * FROM"));
        assert_eq!(
            query.params().select.as_deref(),
            Some(&["name".to_string(), "description".to_string()][..])
        );
    }

    #[test]
    fn select_with_invalid_column_is_rejected() {
        let err =
            ListQuery::new("bootcamps", params_from(&[("select", "name,\"bad col\"")])).unwrap_err();
        assert!(matches!(err, QueryError::InvalidColumn(_)));
    }

    #[test]
    fn sort_applies_before_limit_in_tie_break_order() {
        let query =
            ListQuery::new("bootcamps", params_from(&[("sort", "-name,average_cost")])).unwrap();
        let sql = query.to_sql();
        let order_at = sql.text.find("ORDER BY \"name\" DESC, \"average_cost\" ASC").unwrap();
        let limit_at = sql.text.find("LIMIT").unwrap();
        assert!(order_at < limit_at);
    }

    #[test]
    fn pagination_window_uses_offset() {
        let query =
            ListQuery::new("bootcamps", params_from(&[("page", "2"), ("limit", "10")])).unwrap();
        let sql = query.to_sql();
        assert!(sql.text.ends_with("LIMIT 10 OFFSET 10"));
    }

    #[test]
    fn count_sql_ignores_pagination_but_keeps_filter() {
        let query = ListQuery::new(
            "bootcamps",
            params_from(&[("housing", "true"), ("page", "3"), ("limit", "5")]),
        )
        .unwrap();
        let sql = query.to_count_sql();
        assert_eq!(
            sql.text,
            "SELECT COUNT(*) as count FROM \"bootcamps\" WHERE \"housing\"::text = $1"
        );
        assert!(!sql.text.contains("LIMIT"));
    }

    #[test]
    fn malicious_column_name_is_rejected() {
        let err = ListQuery::new(
            "bootcamps",
            params_from(&[("name\";DROP TABLE users;--", "x")]),
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidColumn(_)));
    }

    #[test]
    fn scoped_filter_is_plain_equality() {
        let params = params_from(&[]).with_filter("bootcamp_id", Value::from("abc"));
        let query = ListQuery::new("courses", params).unwrap();
        let sql = query.to_sql();
        assert!(sql.text.contains("WHERE \"bootcamp_id\"::text = $1"));
    }
}
