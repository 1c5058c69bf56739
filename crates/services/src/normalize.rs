//! Folds the judge's two response envelopes into one `SubmissionOutcome`.
//!
//! Newer responses nest the result under `summary` and repeat the verdict as
//! a top-level `status`; older ones inline the result body. Callers never
//! need to know which one arrived.

use lesson_client::{ResultBody, SubmissionResponse, TestRecord};
use lesson_core::model::{SubmissionOutcome, TestCaseId, TestCaseResult, Verdict};

/// The runner always sends these fields, empty when unused.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn test_result(record: TestRecord) -> TestCaseResult {
    let status = non_empty(record.status)
        .map_or_else(|| Verdict::Other("unknown".into()), |code| Verdict::from_code(&code));
    TestCaseResult {
        id: record.test_id.map(TestCaseId::new),
        status,
        stdout: non_empty(record.stdout),
        stderr: non_empty(record.stderr),
        runtime_ms: record.runtime_ms,
        hidden: record.hidden,
    }
}

/// Normalize a raw submission response.
///
/// - `summary`, when present, is the result body; otherwise the response is.
/// - A top-level `status` overrides the body's `final_status`.
/// - `passed` comes from the response, or is derived from an `ac` verdict.
#[must_use]
pub fn normalize(response: SubmissionResponse) -> SubmissionOutcome {
    let SubmissionResponse {
        passed,
        status,
        summary,
        body,
        ..
    } = response;

    let mut body: ResultBody = summary.unwrap_or(body);
    if let Some(status) = non_empty(status) {
        body.final_status = Some(status);
    }

    let final_status = non_empty(body.final_status).map(|code| Verdict::from_code(&code));
    let passed = passed.unwrap_or_else(|| final_status.as_ref().is_some_and(Verdict::is_accepted));

    SubmissionOutcome {
        final_status,
        passed,
        tests: body
            .tests
            .unwrap_or_default()
            .into_iter()
            .map(test_result)
            .collect(),
        compile_output: non_empty(body.compile_output),
        stderr: non_empty(body.stderr),
        message: non_empty(body.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> SubmissionResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn top_level_status_wins_over_nested_final_status() {
        let outcome = normalize(response(json!({
            "summary": { "final_status": "wa" },
            "status": "ac"
        })));

        assert_eq!(outcome.final_status, Some(Verdict::Accepted));
        assert!(outcome.passed);
    }

    #[test]
    fn summary_envelope_is_unwrapped() {
        let outcome = normalize(response(json!({
            "passed": false,
            "status": "wa",
            "submission_id": "s1",
            "summary": {
                "final_status": "wa",
                "tests": [
                    {
                        "test_id": "t1", "status": "ok", "hidden": false,
                        "stdout": "3", "stderr": ""
                    },
                    { "test_id": "t2", "status": "wa", "hidden": true, "runtime_ms": 40 }
                ],
                "compile_output": "",
                "stderr": ""
            }
        })));

        assert_eq!(outcome.final_status, Some(Verdict::WrongAnswer));
        assert!(!outcome.passed);
        assert_eq!(outcome.tests.len(), 2);
        assert!(outcome.tests[0].passed());
        assert_eq!(outcome.tests[0].stdout.as_deref(), Some("3"));
        assert_eq!(outcome.tests[0].stderr, None);
        assert!(outcome.tests[1].hidden);
        assert_eq!(outcome.tests[1].runtime_ms, Some(40));
        assert_eq!(outcome.compile_output, None);
        assert_eq!(outcome.stderr, None);
    }

    #[test]
    fn inline_body_is_used_without_summary() {
        let outcome = normalize(response(json!({
            "final_status": "ce",
            "compile_output": "main.cpp:1: error",
            "tests": []
        })));

        assert_eq!(outcome.final_status, Some(Verdict::CompilationError));
        assert!(!outcome.passed);
        assert_eq!(outcome.compile_output.as_deref(), Some("main.cpp:1: error"));
    }

    #[test]
    fn passed_is_derived_from_accepted_verdict_when_absent() {
        let outcome = normalize(response(json!({ "final_status": "AC" })));
        assert!(outcome.passed);

        let outcome = normalize(response(json!({})));
        assert!(!outcome.passed);
        assert_eq!(outcome.final_status, None);
        assert_eq!(outcome.failure_label(), "Failed");
    }

    #[test]
    fn explicit_passed_flag_is_kept_even_against_the_verdict() {
        let outcome = normalize(response(json!({ "passed": true, "final_status": "wa" })));
        assert!(outcome.passed);
        assert!(outcome.is_success());
    }
}
