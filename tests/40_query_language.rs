use std::collections::HashMap;

use anyhow::Result;
use serde_json::Value;

use bootcamp_api::database::repository::project_columns;
use bootcamp_api::query::{ListParams, ListQuery, Page, Pagination};

// End-to-end checks of the list query language: raw URL parameters in,
// parameterized SQL and pagination metadata out. No database required.

fn raw(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn full_query_produces_filtered_sorted_window() -> Result<()> {
    let params = ListParams::from_query(&raw(&[
        ("average_cost", "[lte]10000"),
        ("housing", "true"),
        ("select", "name,average_cost"),
        ("sort", "-average_cost"),
        ("page", "2"),
        ("limit", "10"),
    ]));
    let query = ListQuery::new("bootcamps", params)?;
    let sql = query.to_sql();

    assert!(sql.text.starts_with("SELECT * FROM"));
    assert!(sql.text.contains("\"average_cost\" <= $"));
    assert!(sql.text.contains("\"housing\"::text = $"));
    assert!(sql.text.contains("ORDER BY \"average_cost\" DESC"));
    assert!(sql.text.ends_with("LIMIT 10 OFFSET 10"));
    assert!(sql.params.contains(&Value::from(10000)));
    assert!(sql.params.contains(&Value::from("true")));
    Ok(())
}

#[test]
fn select_projects_decoded_rows_not_the_statement() -> Result<()> {
    // Full rows always come off the wire; the projection is applied to the
    // serialized row so typed decoding keeps every column it needs
    let params = ListParams::from_query(&raw(&[("select", "name,average_cost")]));
    let query = ListQuery::new("bootcamps", params)?;
    assert!(query.to_sql().text.starts_with("SELECT * FROM \"bootcamps\""));

    let row = serde_json::json!({
        "id": "d713995b-5f8f-4b59-9a1d-24f461a1fdd0",
        "name": "Devworks Bootcamp",
        "description": "Devworks is a full stack JavaScript Bootcamp",
        "average_cost": 10000,
        "user_id": "0c8cfa19-3a5f-4c8c-9a1d-24f461a1fdd0",
    });
    let columns = query.params().select.clone().unwrap();
    let projected = project_columns(row, &columns);
    assert_eq!(
        projected,
        serde_json::json!({
            "id": "d713995b-5f8f-4b59-9a1d-24f461a1fdd0",
            "name": "Devworks Bootcamp",
            "average_cost": 10000,
        })
    );
    Ok(())
}

#[test]
fn in_filter_against_array_column_uses_overlap_operator() -> Result<()> {
    let params = ListParams::from_query(&raw(&[("careers[in]", "Business,UI/UX")]));
    let query = ListQuery::new("bootcamps", params)?.array_columns(&["careers"]);
    let sql = query.to_sql();

    assert!(sql.text.contains("\"careers\" && ARRAY[$1, $2]"));
    assert_eq!(sql.params, vec![Value::from("Business"), Value::from("UI/UX")]);
    Ok(())
}

#[test]
fn numeric_looking_equality_stays_textual() -> Result<()> {
    // zipcode=02115 must not become a bigint bind; the leading zero matters
    let params = ListParams::from_query(&raw(&[("zipcode", "02115")]));
    let query = ListQuery::new("bootcamps", params)?;
    let sql = query.to_sql();

    assert!(sql.text.contains("\"zipcode\"::text = $1"));
    assert_eq!(sql.params, vec![Value::from("02115")]);
    Ok(())
}

#[test]
fn reserved_keys_never_become_filters() -> Result<()> {
    let params = ListParams::from_query(&raw(&[
        ("select", "name"),
        ("sort", "name"),
        ("page", "3"),
        ("limit", "5"),
    ]));
    assert!(params.filters.is_empty());

    let query = ListQuery::new("bootcamps", params)?;
    assert!(!query.to_sql().text.contains("WHERE"));
    Ok(())
}

#[test]
fn malformed_paging_falls_back_to_defaults() -> Result<()> {
    let params = ListParams::from_query(&raw(&[("page", "abc"), ("limit", "-3")]));
    assert_eq!(params.page, 1);
    assert_eq!(params.limit, 25);

    let query = ListQuery::new("courses", params)?;
    assert!(query.to_sql().text.ends_with("LIMIT 25 OFFSET 0"));
    Ok(())
}

#[test]
fn count_query_shares_predicate_without_window() -> Result<()> {
    let params = ListParams::from_query(&raw(&[("weeks", "[gt]4"), ("limit", "2")]));
    let query = ListQuery::new("courses", params)?;

    let count = query.to_count_sql();
    assert!(count.text.starts_with("SELECT COUNT(*)"));
    assert!(count.text.contains("\"weeks\" > $1"));
    assert!(!count.text.contains("LIMIT"));
    assert_eq!(count.params, query.to_sql().params);
    Ok(())
}

#[test]
fn hostile_identifiers_are_rejected() {
    let params = ListParams::from_query(&raw(&[("name; DROP TABLE users", "x")]));
    assert!(ListQuery::new("bootcamps", params).is_err());

    let params = ListParams::from_query(&raw(&[("name", "x")]));
    assert!(ListQuery::new("bootcamps\"; --", params).is_err());
}

#[test]
fn pagination_window_edges() {
    // 50 rows, 25 per page: page 1 has next only, page 2 has previous only
    let first = Pagination::compute(1, 25, 50);
    assert_eq!(first.next, Some(Page { page: 2, limit: 25 }));
    assert_eq!(first.previous, None);

    let last = Pagination::compute(2, 25, 50);
    assert_eq!(last.next, None);
    assert_eq!(last.previous, Some(Page { page: 1, limit: 25 }));
}
