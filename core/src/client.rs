//! Stateless HTTP request builder and response parser for the scoring API.
//!
//! # Design
//! `ScoreClient` holds only the endpoint. `build_lookup` produces the
//! `HttpRequest` for a name and `parse_lookup` turns whatever came back into
//! either normalized `MemberStats` or a `LookupError`. The caller executes
//! the round-trip in between.

use serde_json::Value;
use tracing::debug;

use crate::error::{LookupError, TransportFailure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{MemberStats, SearchQuery};

/// Substring the backend puts in its error text when no member matches.
pub const NOT_FOUND_MARKER: &str = "見つかりません";

#[derive(Debug, Clone)]
pub struct ScoreClient {
    endpoint: String,
}

impl ScoreClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `GET <endpoint>?name=<encoded name>`, no headers, no body.
    pub fn build_lookup(&self, query: &SearchQuery) -> HttpRequest {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{separator}name={}",
            self.endpoint,
            urlencoding::encode(query.as_str())
        );
        debug!(%url, "built lookup request");
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_lookup(&self, response: HttpResponse) -> Result<MemberStats, LookupError> {
        if !response.is_success() {
            return Err(TransportFailure::HttpStatus {
                status: response.status,
            }
            .into());
        }

        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| TransportFailure::Body(e.to_string()))?;
        let Value::Object(record) = body else {
            return Err(TransportFailure::Body("expected a JSON object".to_string()).into());
        };

        if let Some(message) = record.get("error").and_then(error_text) {
            debug!(%message, "backend reported an error");
            return Err(if message.contains(NOT_FOUND_MARKER) {
                LookupError::NotFound(message)
            } else {
                LookupError::Domain(message)
            });
        }

        Ok(MemberStats::from_record(&record))
    }
}

/// The error field only counts when it carries something: `null`, `false`,
/// `0` and `""` are treated as absent.
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
