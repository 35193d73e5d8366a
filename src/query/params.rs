use std::collections::HashMap;

use serde_json::Value;

use super::types::{FilterCondition, FilterOp, SortDirection, SortKey};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 25;

/// Keys that steer the query instead of filtering it. Always stripped from
/// the filter candidate set before filter construction.
const RESERVED_KEYS: [&str; 4] = ["select", "sort", "page", "limit"];

/// Sanitized list directives parsed from a raw query-parameter map.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub filters: Vec<FilterCondition>,
    pub select: Option<Vec<String>>,
    pub sort: Vec<SortKey>,
    pub page: i64,
    pub limit: i64,
}

impl ListParams {
    /// Parse raw key/value query parameters. Never errors: malformed
    /// directives fall back to defaults, and filter values pass through
    /// unmodified apart from the bracket-token rewrite.
    pub fn from_query(raw: &HashMap<String, String>) -> Self {
        let mut params = Self {
            filters: vec![],
            select: None,
            sort: vec![],
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        };

        for (key, value) in raw {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            params.filters.push(parse_filter_entry(key, value));
        }
        // Deterministic condition order regardless of map iteration
        params.filters.sort_by(|a, b| a.column.cmp(&b.column));

        if let Some(select) = raw.get("select") {
            let columns: Vec<String> = select
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if !columns.is_empty() {
                params.select = Some(columns);
            }
        }

        if let Some(sort) = raw.get("sort") {
            params.sort = parse_sort(sort);
        }

        params.page = parse_positive(raw.get("page")).unwrap_or(DEFAULT_PAGE);
        params.limit = parse_positive(raw.get("limit")).unwrap_or(DEFAULT_LIMIT);

        params
    }

    /// Cap the page size; requests beyond the cap are quietly clamped.
    pub fn clamp_limit(mut self, max_limit: Option<i64>) -> Self {
        if let Some(max) = max_limit {
            if self.limit > max {
                tracing::debug!("limit {} exceeds max {}, clamping", self.limit, max);
                self.limit = max;
            }
        }
        self
    }

    /// Add an exact-equality condition programmatically (used for scoped
    /// child routes such as a bootcamp's courses).
    pub fn with_filter(mut self, column: impl Into<String>, value: Value) -> Self {
        self.filters.push(FilterCondition {
            column: column.into(),
            op: FilterOp::Eq,
            value,
        });
        self
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Rewrite one raw entry into a condition. The comparison token may ride on
/// the key (`averageCost[gte]=1000`, the URL-decoded form) or prefix the
/// value (`averageCost=[gte]1000`); anything else is exact equality.
fn parse_filter_entry(key: &str, value: &str) -> FilterCondition {
    if let Some((column, token)) = split_bracket_key(key) {
        if let Some(op) = FilterOp::from_token(token) {
            return condition(column, op, value);
        }
    }
    if let Some((token, rest)) = split_bracket_value(value) {
        if let Some(op) = FilterOp::from_token(token) {
            return condition(key, op, rest);
        }
    }
    condition(key, FilterOp::Eq, value)
}

/// Equality and membership values pass through as raw strings (the SQL side
/// compares text-to-text, so `zipcode=02115` keeps its leading zero).
/// Ordered comparisons get a numeric bind when the value parses as one.
fn condition(column: &str, op: FilterOp, raw: &str) -> FilterCondition {
    let value = match op {
        FilterOp::In => Value::Array(
            raw.split(',')
                .map(|v| Value::String(v.trim().to_string()))
                .collect(),
        ),
        FilterOp::Eq => Value::String(raw.to_string()),
        _ => numeric_value(raw),
    };
    FilterCondition {
        column: column.to_string(),
        op,
        value,
    }
}

/// `name[token]` -> (name, token)
fn split_bracket_key(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    if !key.ends_with(']') || open == 0 {
        return None;
    }
    Some((&key[..open], &key[open + 1..key.len() - 1]))
}

/// `[token]rest` -> (token, rest)
fn split_bracket_value(value: &str) -> Option<(&str, &str)> {
    let rest = value.strip_prefix('[')?;
    let close = rest.find(']')?;
    Some((&rest[..close], &rest[close + 1..]))
}

/// Typed bind for ordered comparisons so `tuition[gte]=5000` compares
/// numerically. Non-numeric values stay strings.
fn numeric_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::from(f);
    }
    Value::String(raw.to_string())
}

fn parse_sort(spec: &str) -> Vec<SortKey> {
    spec.split(',')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| match part.strip_prefix('-') {
            Some(column) => SortKey {
                column: column.to_string(),
                direction: SortDirection::Desc,
            },
            None => SortKey {
                column: part.to_string(),
                direction: SortDirection::Asc,
            },
        })
        .collect()
}

fn parse_positive(raw: Option<&String>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reserved_keys_leave_filter_empty() {
        let params = ListParams::from_query(&raw(&[
            ("select", "name"),
            ("sort", "-name"),
            ("page", "2"),
            ("limit", "10"),
        ]));
        assert!(params.filters.is_empty());
    }

    #[test]
    fn bracket_token_in_key() {
        let params = ListParams::from_query(&raw(&[("averageCost[gte]", "1000")]));
        assert_eq!(params.filters.len(), 1);
        let cond = &params.filters[0];
        assert_eq!(cond.column, "averageCost");
        assert_eq!(cond.op, FilterOp::Gte);
        assert_eq!(cond.value, Value::from(1000));
    }

    #[test]
    fn bracket_token_in_value() {
        let params = ListParams::from_query(&raw(&[("averageCost", "[gte]1000")]));
        let cond = &params.filters[0];
        assert_eq!(cond.column, "averageCost");
        assert_eq!(cond.op, FilterOp::Gte);
        assert_eq!(cond.value, Value::from(1000));
    }

    #[test]
    fn all_comparison_tokens_map() {
        for (token, op) in [
            ("gt", FilterOp::Gt),
            ("gte", FilterOp::Gte),
            ("lt", FilterOp::Lt),
            ("lte", FilterOp::Lte),
        ] {
            let key = format!("tuition[{}]", token);
            let params = ListParams::from_query(&raw(&[(key.as_str(), "5000")]));
            assert_eq!(params.filters[0].op, op, "token {}", token);
        }
    }

    #[test]
    fn in_token_splits_on_commas() {
        let params = ListParams::from_query(&raw(&[("careers[in]", "Business,UI/UX")]));
        let cond = &params.filters[0];
        assert_eq!(cond.op, FilterOp::In);
        assert_eq!(
            cond.value,
            Value::Array(vec![Value::from("Business"), Value::from("UI/UX")])
        );
    }

    #[test]
    fn plain_key_is_equality_with_raw_value() {
        let params = ListParams::from_query(&raw(&[("housing", "true")]));
        let cond = &params.filters[0];
        assert_eq!(cond.op, FilterOp::Eq);
        assert_eq!(cond.value, Value::from("true"));
    }

    #[test]
    fn equality_value_keeps_leading_zeros() {
        let params = ListParams::from_query(&raw(&[("zipcode", "02115")]));
        let cond = &params.filters[0];
        assert_eq!(cond.op, FilterOp::Eq);
        assert_eq!(cond.value, Value::from("02115"));
    }

    #[test]
    fn ordered_comparison_value_is_numeric() {
        let params = ListParams::from_query(&raw(&[("tuition[gte]", "5000")]));
        assert_eq!(params.filters[0].value, Value::from(5000));

        let params = ListParams::from_query(&raw(&[("created_at[gte]", "2020-01-01")]));
        assert_eq!(params.filters[0].value, Value::from("2020-01-01"));
    }

    #[test]
    fn value_with_non_leading_bracket_passes_through() {
        let params = ListParams::from_query(&raw(&[("name", "Devworks [West] Campus")]));
        let cond = &params.filters[0];
        assert_eq!(cond.op, FilterOp::Eq);
        assert_eq!(cond.value, Value::from("Devworks [West] Campus"));
    }

    #[test]
    fn page_and_limit_default_when_missing() {
        let params = ListParams::from_query(&raw(&[]));
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 25);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn page_and_limit_default_when_not_numeric() {
        let params = ListParams::from_query(&raw(&[("page", "abc"), ("limit", "-5")]));
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 25);
    }

    #[test]
    fn offset_follows_page_and_limit() {
        let params = ListParams::from_query(&raw(&[("page", "2"), ("limit", "10")]));
        assert_eq!(params.offset(), 10);
    }

    #[test]
    fn limit_clamps_to_max() {
        let params =
            ListParams::from_query(&raw(&[("limit", "500")])).clamp_limit(Some(100));
        assert_eq!(params.limit, 100);
    }

    #[test]
    fn sort_parses_direction_and_order() {
        let params = ListParams::from_query(&raw(&[("sort", "-name,tuition")]));
        assert_eq!(params.sort.len(), 2);
        assert_eq!(params.sort[0].column, "name");
        assert_eq!(params.sort[0].direction, SortDirection::Desc);
        assert_eq!(params.sort[1].column, "tuition");
        assert_eq!(params.sort[1].direction, SortDirection::Asc);
    }

    #[test]
    fn select_splits_on_commas() {
        let params = ListParams::from_query(&raw(&[("select", "name,description")]));
        assert_eq!(
            params.select.as_deref(),
            Some(&["name".to_string(), "description".to_string()][..])
        );
    }
}
