use serde::Serialize;
use serde_json::Value;
use sqlx::{self, postgres::PgArguments, postgres::PgRow, FromRow, PgPool, Row};
use uuid::Uuid;

use crate::query::{ListParams, ListQuery, ListResult, Pagination, QueryError};

/// Read-side access to one table: list endpoints and id lookups. Mutations
/// live in the per-entity service modules.
pub struct Repository<T> {
    table_name: String,
    pool: PgPool,
    array_columns: Vec<&'static str>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Serialize + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>, pool: PgPool) -> Result<Self, QueryError> {
        let table_name = table_name.into();
        crate::query::builder::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            pool,
            array_columns: vec![],
            _phantom: std::marker::PhantomData,
        })
    }

    /// Declare array-typed columns of this table so filters on them render
    /// as membership tests.
    pub fn array_columns(mut self, columns: &[&'static str]) -> Self {
        self.array_columns = columns.to_vec();
        self
    }

    /// Run one list request: count over the filter predicate, then the
    /// windowed data query, then the pagination block. Rows come back as
    /// serialized objects with the `select` projection applied, so the
    /// typed decode always sees every column.
    pub async fn list(&self, params: ListParams) -> Result<ListResult<Value>, QueryError> {
        let query =
            ListQuery::new(&self.table_name, params)?.array_columns(&self.array_columns);

        let count_sql = query.to_count_sql();
        let mut count_query = sqlx::query(&count_sql.text);
        for param in count_sql.params.iter() {
            count_query = bind_value(count_query, param);
        }
        let total: i64 = count_query.fetch_one(&self.pool).await?.try_get("count")?;

        let data_sql = query.to_sql();
        let mut data_query = sqlx::query_as::<_, T>(&data_sql.text);
        for param in data_sql.params.iter() {
            data_query = bind_value_as(data_query, param);
        }
        let rows = data_query.fetch_all(&self.pool).await?;

        let mut data = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut value = serde_json::to_value(row)?;
            if let Some(columns) = &query.params().select {
                value = project_columns(value, columns);
            }
            data.push(value);
        }

        let pagination =
            Pagination::compute(query.params().page, query.params().limit, total);

        Ok(ListResult {
            count: data.len(),
            total,
            pagination,
            data,
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, QueryError> {
        let sql = format!("SELECT * FROM \"{}\" WHERE \"id\" = $1", self.table_name);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

/// Keep only the requested fields plus the identifier. Unknown field names
/// simply project to nothing rather than erroring.
pub fn project_columns(row: Value, columns: &[String]) -> Value {
    match row {
        Value::Object(fields) => {
            let mut projected = serde_json::Map::new();
            if let Some(id) = fields.get("id") {
                projected.insert("id".to_string(), id.clone());
            }
            for column in columns {
                if column == "id" {
                    continue;
                }
                if let Some(value) = fields.get(column) {
                    projected.insert(column.clone(), value.clone());
                }
            }
            Value::Object(projected)
        }
        other => other,
    }
}

fn bind_value<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // Arrays are expanded into individual placeholders before binding
        other => q.bind(other.to_string()),
    }
}

fn bind_value_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        other => q.bind(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn projection_keeps_requested_fields_plus_id() {
        let row = json!({
            "id": "b1",
            "name": "Devworks",
            "description": "full stack",
            "housing": true,
        });
        let projected = project_columns(row, &["name".to_string()]);
        assert_eq!(projected, json!({ "id": "b1", "name": "Devworks" }));
    }

    #[test]
    fn projection_ignores_unknown_fields() {
        let row = json!({ "id": "b1", "name": "Devworks" });
        let projected =
            project_columns(row, &["name".to_string(), "no_such_field".to_string()]);
        assert_eq!(projected, json!({ "id": "b1", "name": "Devworks" }));
    }

    #[test]
    fn projection_never_duplicates_id() {
        let row = json!({ "id": "b1", "name": "Devworks" });
        let projected = project_columns(row, &["id".to_string(), "name".to_string()]);
        assert_eq!(projected, json!({ "id": "b1", "name": "Devworks" }));
    }
}
