use serde::Serialize;
use serde_json::Value;

/// Comparison operators accepted in list query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOp {
    /// Map a bracket token (`gt`, `gte`, `lt`, `lte`, `in`) to an operator.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            "in" => Some(FilterOp::In),
            _ => None,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
            FilterOp::In => "IN",
        }
    }
}

/// One field condition; conditions combine with logical AND.
#[derive(Debug, Clone)]
pub struct FilterCondition {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

/// One page descriptor as echoed back in the pagination block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

/// Neighbouring page descriptors, recomputed on every request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Page>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Page>,
}

impl Pagination {
    /// `next` exists iff the window before the next page ends short of
    /// `total`; `previous` exists iff this is not the first page.
    pub fn compute(page: i64, limit: i64, total: i64) -> Self {
        let offset = (page - 1) * limit;
        let next = if offset + limit < total {
            Some(Page { page: page + 1, limit })
        } else {
            None
        };
        let previous = if page > 1 {
            Some(Page { page: page - 1, limit })
        } else {
            None
        };
        Self { next, previous }
    }
}

/// A page of results plus the metadata the response envelope carries.
#[derive(Debug)]
pub struct ListResult<T> {
    pub count: usize,
    pub total: i64,
    pub pagination: Pagination,
    pub data: Vec<T>,
}

/// Generated SQL text plus its positional bind parameters.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    pub text: String,
    pub params: Vec<Value>,
}
