//! Run the controller against the JSON vectors in `test-vectors/`.
//!
//! Each vector names the raw input, the request the controller must build,
//! a simulated response, and the status line and results panel that must
//! come out. Comparing rendered text keeps the vectors readable by anyone
//! checking the page by eye.

use std::time::Instant;

use score_lookup_core::{
    Cell, HttpMethod, HttpResponse, LookupConfig, LookupController, ResultsView, RowKind, Table,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

fn data_rows<const N: usize>(table: &Table<N>) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .filter(|row| row.kind == RowKind::Data)
        .map(|row| row.cells.iter().map(|c| Cell::as_str(c).to_string()).collect())
        .collect()
}

fn check_view(name: &str, view: &ResultsView, expected: &Value) {
    assert_eq!(view.member_line, expected["member_line"], "{name}: member line");
    assert_eq!(view.period, expected["period"], "{name}: period");
    assert_eq!(view.tally, expected["tally"], "{name}: tally");

    assert_eq!(data_rows(&view.rankings), vec![strings(&expected["rankings"])], "{name}: rankings");
    assert_eq!(
        data_rows(&view.score_summary),
        vec![strings(&expected["score_summary"])],
        "{name}: score summary"
    );
    let counts: Vec<Vec<String>> = expected["placement_counts"]
        .as_array()
        .unwrap()
        .iter()
        .map(strings)
        .collect();
    assert_eq!(data_rows(&view.placement_counts), counts, "{name}: placement counts");

    let pie: Vec<f64> = view.pie.slices.iter().map(|s| s.value).collect();
    let expected_pie: Vec<f64> = expected["pie"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(pie, expected_pie, "{name}: pie");

    // Nothing unformatted leaks into the page.
    for text in data_rows(&view.score_summary).concat() {
        assert!(!text.contains("NaN") && !text.contains("inf"), "{name}: {text}");
    }
}

#[test]
fn lookup_test_vectors() {
    let raw = include_str!("../../test-vectors/lookup.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mut c = LookupController::new(LookupConfig::with_endpoint(&format!("{BASE_URL}/exec")));
        let now = Instant::now();

        // Verify the request
        let pending = c.submit(case["input"].as_str().unwrap(), now).unwrap();
        let expected_req = &case["expected_request"];
        assert_eq!(
            pending.request.method,
            parse_method(expected_req["method"].as_str().unwrap()),
            "{name}: method"
        );
        assert_eq!(
            pending.request.url,
            format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()),
            "{name}: url"
        );
        assert!(pending.request.body.is_none(), "{name}: body should be None");

        // Verify the rendered outcome
        let sim = &case["simulated_response"];
        let response = HttpResponse::new(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        );
        assert!(c.complete(pending.id, Ok(response), now).is_some(), "{name}: applied");
        assert_eq!(c.status().to_string(), case["expected_status"], "{name}: status");

        match &case["expected_view"] {
            Value::Null => assert!(c.results().is_none(), "{name}: results should be hidden"),
            expected => check_view(name, c.results().expect("results panel visible"), expected),
        }
    }
}
