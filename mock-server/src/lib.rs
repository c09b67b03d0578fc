use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

/// Member records keyed by display name, plus knobs for failure tests.
#[derive(Clone, Debug, Default)]
pub struct Directory {
    pub members: HashMap<String, Value>,
    /// When set, every lookup answers with this status and no JSON.
    pub outage: Option<u16>,
    /// Delay applied before answering.
    pub latency: Duration,
}

impl Directory {
    pub fn insert(&mut self, record: Value) {
        if let Some(name) = record.get("名前").and_then(Value::as_str) {
            self.members.insert(name.to_string(), record);
        }
    }

    /// A small roster covering a complete record and a sparse one.
    pub fn sample() -> Self {
        let mut directory = Self::default();
        directory.insert(json!({
            "No.": 12,
            "名前": "Tanaka",
            "最終更新": "2024/05/01 12:00",
            "集計人数": 48,
            "累計半荘数ランキング": 3,
            "総スコアランキング": 7,
            "最高スコアランキング": 15,
            "平均スコアランキング": 11,
            "平均着順ランキング": 9,
            "累計半荘数": 120,
            "総スコア": 345.6,
            "最高スコア": 88.2,
            "平均スコア": 2.88,
            "平均着順": 2.4125,
            "1着の回数": 30,
            "1.5着の回数": 2,
            "2着の回数": 28,
            "2.5着の回数": 1,
            "3着の回数": 31,
            "3.5着の回数": 0,
            "4着の回数": 28,
            "1着率": 0.25,
            "1.5着率": 0.0167,
            "2着率": 0.2333,
            "2.5着率": 0.0083,
            "3着率": 0.2583,
            "3.5着率": 0,
            "4着率": 0.2333
        }));
        directory.insert(json!({
            "No.": "205",
            "名前": "Sato",
            "集計人数": 48,
            "累計半荘数": "4",
            "総スコア": "",
            "平均着順ランキング": null
        }));
        directory
    }
}

pub type Db = Arc<Directory>;

#[derive(Deserialize)]
pub struct LookupParams {
    pub name: Option<String>,
}

pub fn app() -> Router {
    app_with(Directory::sample())
}

pub fn app_with(directory: Directory) -> Router {
    let db: Db = Arc::new(directory);
    Router::new().route("/exec", get(lookup)).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, directory: Directory) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(directory)).await
}

async fn lookup(State(db): State<Db>, Query(params): Query<LookupParams>) -> Response {
    if !db.latency.is_zero() {
        tokio::time::sleep(db.latency).await;
    }

    if let Some(status) = db.outage {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        info!(%status, "lookup during outage");
        return (status, "service unavailable").into_response();
    }

    let name = params.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Json(json!({ "error": "名前が指定されていません" })).into_response();
    }

    match db.members.get(name) {
        Some(record) => {
            info!(name, "lookup hit");
            Json(record.clone()).into_response()
        }
        None => {
            info!(name, "lookup miss");
            Json(json!({ "error": format!("{name} が見つかりません") })).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_complete_and_sparse_members() {
        let directory = Directory::sample();
        assert_eq!(directory.members.len(), 2);
        assert_eq!(directory.members["Tanaka"]["No."], 12);
        assert!(directory.members["Sato"].get("1着率").is_none());
    }

    #[test]
    fn insert_without_name_is_ignored() {
        let mut directory = Directory::default();
        directory.insert(json!({ "No.": 1 }));
        assert!(directory.members.is_empty());
    }

    #[test]
    fn lookup_params_name_is_optional() {
        let params: LookupParams = serde_json::from_str("{}").unwrap();
        assert!(params.name.is_none());
    }
}
