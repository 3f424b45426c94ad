use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

/// Records per endpoint, keyed by endpoint name (`platforms`, ...).
pub type Db = Arc<HashMap<String, Vec<Value>>>;

/// Page size when the request carries no `limit`.
pub const DEFAULT_LIMIT: usize = 10;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

const FIXTURES: &[(&str, &[&str])] = &[
    (
        "platforms",
        &[
            include_str!("../../test-data/platform_get.json"),
            include_str!("../../test-data/platform_list.json"),
        ],
    ),
    (
        "pulse_groups",
        &[
            include_str!("../../test-data/pulse_group_get.json"),
            include_str!("../../test-data/pulse_group_list.json"),
        ],
    ),
    (
        "test_dummies",
        &[
            include_str!("../../test-data/test_dummy_get.json"),
            include_str!("../../test-data/test_dummy_list.json"),
        ],
    ),
];

/// Load the fixture records, keeping the first record seen for each id.
pub fn fixtures() -> HashMap<String, Vec<Value>> {
    FIXTURES
        .iter()
        .map(|(endpoint, files)| {
            let mut records: Vec<Value> = Vec::new();
            for file in *files {
                let parsed: Vec<Value> =
                    serde_json::from_str(file).expect("fixture files are valid JSON arrays");
                for record in parsed {
                    if !records.iter().any(|r| r["id"] == record["id"]) {
                        records.push(record);
                    }
                }
            }
            (endpoint.to_string(), records)
        })
        .collect()
}

pub fn app() -> Router {
    app_with(fixtures())
}

pub fn app_with(records: HashMap<String, Vec<Value>>) -> Router {
    let db: Db = Arc::new(records);
    Router::new()
        .route("/{endpoint}/", get(index))
        .route("/{endpoint}/count", get(count))
        .route("/{endpoint}/meta", get(meta))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn index(
    State(db): State<Db>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult {
    authorize(&headers)?;
    let records = endpoint_records(&db, &endpoint)?;

    let offset = parse_param(&params, "offset", 0)?;
    let limit = parse_param(&params, "limit", DEFAULT_LIMIT)?;
    let fields = params.get("fields").map(String::as_str).unwrap_or("*");

    let selected: Vec<Value> = matching(records, &params)
        .skip(offset)
        .take(limit)
        .map(|record| project(record, fields))
        .collect();

    tracing::debug!(endpoint = %endpoint, results = selected.len(), "served index");
    Ok(Json(Value::Array(selected)))
}

async fn count(
    State(db): State<Db>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult {
    authorize(&headers)?;
    let records = endpoint_records(&db, &endpoint)?;
    Ok(Json(json!({ "count": matching(records, &params).count() })))
}

async fn meta(
    State(db): State<Db>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    authorize(&headers)?;
    let records = endpoint_records(&db, &endpoint)?;
    let fields: Vec<Value> = records
        .first()
        .and_then(Value::as_object)
        .map(|obj| obj.keys().map(|k| Value::String(k.clone())).collect())
        .unwrap_or_default();
    Ok(Json(Value::Array(fields)))
}

fn error(status: StatusCode, title: &str, cause: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!([{ "title": title, "status": status.as_u16(), "cause": cause }])),
    )
}

fn authorize(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let key = headers
        .get("user-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if key.trim().is_empty() {
        return Err(error(
            StatusCode::UNAUTHORIZED,
            "Authentication failed",
            "Missing user-key",
        ));
    }
    Ok(())
}

fn endpoint_records<'a>(
    db: &'a Db,
    endpoint: &str,
) -> Result<&'a [Value], (StatusCode, Json<Value>)> {
    db.get(endpoint)
        .map(Vec::as_slice)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Not found", "Unknown endpoint"))
}

fn parse_param(
    params: &HashMap<String, String>,
    key: &str,
    default: usize,
) -> Result<usize, (StatusCode, Json<Value>)> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            error(
                StatusCode::BAD_REQUEST,
                "Syntax error",
                &format!("{key} must be a non-negative integer"),
            )
        }),
    }
}

/// Records passing the `filter[id][eq]`, `filter[id][any]` and `search`
/// parameters. Other filters are ignored.
fn matching<'a>(
    records: &'a [Value],
    params: &'a HashMap<String, String>,
) -> impl Iterator<Item = &'a Value> + 'a {
    let eq: Option<i64> = params.get("filter[id][eq]").and_then(|v| v.parse().ok());
    let any: Option<Vec<i64>> = params
        .get("filter[id][any]")
        .map(|v| v.split(',').filter_map(|id| id.trim().parse().ok()).collect());
    let search = params.get("search").map(|s| s.to_lowercase());

    records.iter().filter(move |record| {
        let id = record["id"].as_i64();
        if let Some(eq) = eq {
            if id != Some(eq) {
                return false;
            }
        }
        if let Some(any) = &any {
            if !id.is_some_and(|id| any.contains(&id)) {
                return false;
            }
        }
        if let Some(search) = &search {
            let name = record["name"].as_str().unwrap_or("").to_lowercase();
            if !name.contains(search.as_str()) {
                return false;
            }
        }
        true
    })
}

/// Keep only the requested fields. `id` is always returned.
fn project(record: &Value, fields: &str) -> Value {
    if fields.split(',').any(|f| f.trim() == "*") {
        return record.clone();
    }
    let Some(obj) = record.as_object() else {
        return record.clone();
    };
    let wanted: Vec<&str> = fields.split(',').map(str::trim).collect();
    let projected: Map<String, Value> = obj
        .iter()
        .filter(|(k, _)| k.as_str() == "id" || wanted.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::Object(projected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn fixtures_dedupe_by_id() {
        let db = fixtures();
        let ids: Vec<i64> = db["test_dummies"]
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(db["platforms"].len(), 6);
    }

    #[test]
    fn matching_by_any_id() {
        let db = fixtures();
        let p = params(&[("filter[id][any]", "19,96,12345")]);
        let ids: Vec<i64> = matching(&db["platforms"], &p)
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![96, 19]);
    }

    #[test]
    fn matching_by_search_is_case_insensitive() {
        let db = fixtures();
        let p = params(&[("search", "NINTENDO")]);
        assert_eq!(matching(&db["platforms"], &p).count(), 1);
    }

    #[test]
    fn project_keeps_id_and_requested_fields() {
        let record = json!({"id": 8, "name": "PlayStation 2", "slug": "ps2"});
        assert_eq!(project(&record, "name"), json!({"id": 8, "name": "PlayStation 2"}));
        assert_eq!(project(&record, "*"), record);
    }
}
