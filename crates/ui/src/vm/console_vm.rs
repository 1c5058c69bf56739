use lesson_core::model::{Problem, SampleTestCase, SubmissionOutcome, TestCaseResult};
use serde::Serialize;
use services::{ConsoleTab, JudgeMode};

pub const READY_TO_RUN: &str = "Ready to run";
pub const NO_SAMPLES: &str = "No sample data available.";
pub const NO_TESTS: &str = "No test cases found in results.";
pub const NO_ERRORS: &str = "(no errors)";
pub const NO_ERROR_DETAILS: &str = "No error details available.";
const NO_INPUT: &str = "(no input)";
const NO_EXPECTED_OUTPUT: &str = "(no expected output)";
const SAMPLE_TEST: &str = "Sample Test";

/// What the console panel under the editor shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "tab", rename_all = "snake_case")]
pub enum ConsoleVm {
    Sample(SampleTabVm),
    Test(TestTabVm),
    Status(StatusTabVm),
    /// Test or status tab before anything has run.
    Empty { message: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SampleTabVm {
    pub cases: Vec<SampleCaseVm>,
    pub message: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SampleCaseVm {
    /// Only set when the problem has more than one sample.
    pub caption: Option<String>,
    pub input: String,
    pub expected_output: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestTabVm {
    pub final_status: String,
    pub status_class: String,
    pub rows: Vec<TestRowVm>,
    pub message: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestRowVm {
    pub label: String,
    pub passed: bool,
    pub runtime: Option<String>,
    pub detail: Option<TestDetailVm>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TestDetailVm {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusTabVm {
    pub error_log: String,
    pub has_error_output: bool,
}

/// Project the console for the active tab. The sample tab never depends on
/// an outcome; the other two need one.
#[must_use]
pub fn console_vm(
    tab: ConsoleTab,
    samples: &[SampleTestCase],
    outcome: Option<&SubmissionOutcome>,
    is_submit_mode: bool,
) -> ConsoleVm {
    match (tab, outcome) {
        (ConsoleTab::Sample, _) => ConsoleVm::Sample(sample_tab(samples)),
        (ConsoleTab::Test | ConsoleTab::Status, None) => ConsoleVm::Empty {
            message: READY_TO_RUN,
        },
        (ConsoleTab::Test, Some(outcome)) => ConsoleVm::Test(test_tab(outcome, is_submit_mode)),
        (ConsoleTab::Status, Some(outcome)) => ConsoleVm::Status(status_tab(outcome)),
    }
}

#[must_use]
pub fn judge_console(problem: &Problem, judge: &JudgeMode) -> ConsoleVm {
    console_vm(
        judge.tab(),
        problem.samples(),
        judge.outcome(),
        judge.is_submit_mode(),
    )
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_owned()
    } else {
        value.to_owned()
    }
}

#[must_use]
pub fn sample_tab(samples: &[SampleTestCase]) -> SampleTabVm {
    let numbered = samples.len() > 1;
    let cases: Vec<SampleCaseVm> = samples
        .iter()
        .enumerate()
        .map(|(index, sample)| SampleCaseVm {
            caption: numbered.then(|| format!("Sample Case #{}", index + 1)),
            input: or_placeholder(&sample.input, NO_INPUT),
            expected_output: or_placeholder(&sample.expected_output, NO_EXPECTED_OUTPUT),
        })
        .collect();
    SampleTabVm {
        message: cases.is_empty().then_some(NO_SAMPLES),
        cases,
    }
}

fn runtime(result: &TestCaseResult) -> Option<String> {
    result
        .runtime_ms
        .filter(|ms| *ms > 0)
        .map(|ms| format!("{ms}ms"))
}

/// Submit mode lists every case, with output only for visible ones. Run mode
/// shows just the first visible case.
#[must_use]
pub fn test_tab(outcome: &SubmissionOutcome, is_submit_mode: bool) -> TestTabVm {
    let (final_status, status_class) = match &outcome.final_status {
        Some(verdict) => (
            verdict.code().to_ascii_uppercase(),
            verdict.code().to_ascii_lowercase(),
        ),
        None if outcome.passed => ("AC".to_owned(), "ac".to_owned()),
        None => ("WA".to_owned(), "wa".to_owned()),
    };

    let rows: Vec<TestRowVm> = if is_submit_mode {
        outcome
            .tests
            .iter()
            .enumerate()
            .map(|(index, result)| TestRowVm {
                label: if index == 0 {
                    SAMPLE_TEST.to_owned()
                } else {
                    format!("Test {index}")
                },
                passed: result.passed(),
                runtime: runtime(result),
                detail: (!result.hidden).then(|| TestDetailVm {
                    stdout: result.stdout.clone(),
                    stderr: result.stderr.clone(),
                }),
            })
            .collect()
    } else {
        outcome
            .tests
            .iter()
            .find(|result| !result.hidden)
            .map(|result| TestRowVm {
                label: SAMPLE_TEST.to_owned(),
                passed: result.passed(),
                runtime: runtime(result),
                detail: Some(TestDetailVm {
                    stdout: result.stdout.clone(),
                    stderr: None,
                }),
            })
            .into_iter()
            .collect()
    };

    TestTabVm {
        final_status,
        status_class,
        message: outcome.tests.is_empty().then_some(NO_TESTS),
        rows,
    }
}

/// Error log for the first failing case, or the first case when all passed.
#[must_use]
pub fn status_tab(outcome: &SubmissionOutcome) -> StatusTabVm {
    let target = outcome
        .tests
        .iter()
        .find(|result| !result.passed())
        .or_else(|| outcome.tests.first());
    let log = outcome
        .stderr
        .clone()
        .or_else(|| outcome.compile_output.clone())
        .or_else(|| target.and_then(|result| result.stderr.clone()));

    match log {
        Some(error_log) => StatusTabVm {
            error_log,
            has_error_output: true,
        },
        None => StatusTabVm {
            error_log: if outcome.is_accepted() {
                NO_ERRORS
            } else {
                NO_ERROR_DETAILS
            }
            .to_owned(),
            has_error_output: false,
        },
    }
}
