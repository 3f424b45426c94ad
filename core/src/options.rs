//! Composable query-string options.
//!
//! # Design
//! A `QueryOption` is plain data; nothing is validated until the option is
//! applied to a [`Query`]. Services collect the caller's options, append their
//! own (an id filter, a search term), and apply the lot in order. The first
//! option that fails rejects the call before any request is built.
//!
//! `Query` keeps its parameters in a `BTreeMap` so the encoded string is
//! stable: keys come out sorted, and setting a key twice keeps the last value.

use std::collections::BTreeMap;

use crate::error::ApiError;

/// Smallest `limit` the API accepts.
pub const LIMIT_MIN: u32 = 1;
/// Largest `limit` the API accepts.
pub const LIMIT_MAX: u32 = 50;
/// Largest `offset` the API accepts.
pub const OFFSET_MAX: u32 = 5000;

/// Filter comparison operator, encoded as the second bracket of
/// `filter[field][op]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    Prefix,
    Exists,
    NotExists,
    In,
    NotIn,
    /// Matches when the field contains at least one of the values.
    ContainsAtLeast,
    /// Matches when the field contains every one of the values.
    ContainsAll,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "eq",
            Operator::NotEquals => "not_eq",
            Operator::GreaterThan => "gt",
            Operator::GreaterThanEqual => "gte",
            Operator::LessThan => "lt",
            Operator::LessThanEqual => "lte",
            Operator::Prefix => "prefix",
            Operator::Exists => "exists",
            Operator::NotExists => "not_exists",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::ContainsAtLeast => "any",
            Operator::ContainsAll => "all",
        }
    }

    /// `exists` and `not_exists` stand alone; every other operator needs at
    /// least one value.
    fn takes_values(self) -> bool {
        !matches!(self, Operator::Exists | Operator::NotExists)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        }
    }
}

/// Aggregate applied when ordering by an array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubFilter {
    Min,
    Max,
    Avg,
    Sum,
    Median,
}

impl SubFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            SubFilter::Min => "min",
            SubFilter::Max => "max",
            SubFilter::Avg => "avg",
            SubFilter::Sum => "sum",
            SubFilter::Median => "median",
        }
    }
}

/// A single query-string modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOption {
    Fields(Vec<String>),
    Expand(Vec<String>),
    Filter {
        field: String,
        op: Operator,
        values: Vec<String>,
    },
    Order {
        field: String,
        order: Order,
        sub: Option<SubFilter>,
    },
    Limit(u32),
    Offset(u32),
    Search(String),
}

impl QueryOption {
    /// Restrict the response to the named fields.
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryOption::Fields(fields.into_iter().map(Into::into).collect())
    }

    /// Inline the named related objects instead of their ids.
    pub fn expand<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryOption::Expand(fields.into_iter().map(Into::into).collect())
    }

    pub fn filter<I, V>(field: impl Into<String>, op: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        QueryOption::Filter {
            field: field.into(),
            op,
            values: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn order(field: impl Into<String>, order: Order, sub: Option<SubFilter>) -> Self {
        QueryOption::Order {
            field: field.into(),
            order,
            sub,
        }
    }

    pub fn limit(n: u32) -> Self {
        QueryOption::Limit(n)
    }

    pub fn offset(n: u32) -> Self {
        QueryOption::Offset(n)
    }

    pub fn search(query: impl Into<String>) -> Self {
        QueryOption::Search(query.into())
    }

    /// Validate this option and write its parameter into `query`.
    pub fn apply(&self, query: &mut Query) -> Result<(), ApiError> {
        match self {
            QueryOption::Fields(fields) => query.set("fields", join_names(fields)?),
            QueryOption::Expand(fields) => query.set("expand", join_names(fields)?),
            QueryOption::Filter { field, op, values } => {
                let field = non_blank(field)?;
                if op.takes_values() && values.is_empty() {
                    return Err(ApiError::EmptyField);
                }
                query.set(
                    format!("filter[{field}][{}]", op.as_str()),
                    values.join(","),
                );
            }
            QueryOption::Order { field, order, sub } => {
                let mut value = format!("{}:{}", non_blank(field)?, order.as_str());
                if let Some(sub) = sub {
                    value.push(':');
                    value.push_str(sub.as_str());
                }
                query.set("order", value);
            }
            QueryOption::Limit(n) => {
                if !(LIMIT_MIN..=LIMIT_MAX).contains(n) {
                    return Err(ApiError::OutOfRange);
                }
                query.set("limit", n.to_string());
            }
            QueryOption::Offset(n) => {
                if *n > OFFSET_MAX {
                    return Err(ApiError::OutOfRange);
                }
                query.set("offset", n.to_string());
            }
            QueryOption::Search(q) => {
                if q.trim().is_empty() {
                    return Err(ApiError::BlankQuery);
                }
                query.set("search", q.clone());
            }
        }
        Ok(())
    }
}

fn non_blank(field: &str) -> Result<&str, ApiError> {
    let field = field.trim();
    if field.is_empty() {
        return Err(ApiError::EmptyField);
    }
    Ok(field)
}

fn join_names(names: &[String]) -> Result<String, ApiError> {
    if names.is_empty() {
        return Err(ApiError::EmptyField);
    }
    let names = names
        .iter()
        .map(|n| non_blank(n))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.join(","))
}

/// Accumulated query parameters, ready to be URL-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: BTreeMap<String, String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `options` in order, stopping at the first invalid one.
    pub fn from_options(options: &[QueryOption]) -> Result<Self, ApiError> {
        let mut query = Query::new();
        for option in options {
            option.apply(&mut query)?;
        }
        Ok(query)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// `application/x-www-form-urlencoded` rendering, keys sorted.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}
