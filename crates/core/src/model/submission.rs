use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::ids::TestCaseId;

/// Judge verdict code, used both for the final status and per test case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    CompilationError,
    RuntimeError,
    /// Engine-specific code (e.g. `mle`), kept verbatim.
    Other(String),
}

impl Verdict {
    /// Parses a judge code. Matching is case-insensitive; the runner reports
    /// passing test cases as `ok`, which is accepted as well.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "ac" | "ok" => Self::Accepted,
            "wa" => Self::WrongAnswer,
            "tle" => Self::TimeLimitExceeded,
            "ce" => Self::CompilationError,
            "re" => Self::RuntimeError,
            _ => Self::Other(code.to_owned()),
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Accepted => "ac",
            Self::WrongAnswer => "wa",
            Self::TimeLimitExceeded => "tle",
            Self::CompilationError => "ce",
            Self::RuntimeError => "re",
            Self::Other(code) => code,
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Human label for a failing verdict. Unknown codes pass through as-is.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Accepted => "Accepted",
            Self::WrongAnswer => "Wrong Answer",
            Self::TimeLimitExceeded => "Time Limit Exceeded",
            Self::CompilationError => "Compilation Error",
            Self::RuntimeError => "Runtime Error",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

/// Label shown for an unsuccessful submission; absent codes read "Failed".
#[must_use]
pub fn failure_label(final_status: Option<&Verdict>) -> String {
    final_status.map_or_else(|| "Failed".to_owned(), |v| v.label().to_owned())
}

/// Outcome of one judged test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseResult {
    pub id: Option<TestCaseId>,
    pub status: Verdict,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub runtime_ms: Option<u64>,
    /// Detail (I/O) is withheld from the learner; pass/fail is still shown.
    pub hidden: bool,
}

impl TestCaseResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status.is_accepted()
    }
}

/// Canonical result of a code submission, whatever envelope it arrived in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub final_status: Option<Verdict>,
    pub passed: bool,
    pub tests: Vec<TestCaseResult>,
    pub compile_output: Option<String>,
    pub stderr: Option<String>,
    pub message: Option<String>,
}

impl SubmissionOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.final_status.as_ref().is_some_and(Verdict::is_accepted)
    }

    /// A submission succeeds when the backend says it passed or the verdict
    /// is accepted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.passed || self.is_accepted()
    }

    #[must_use]
    pub fn failure_label(&self) -> String {
        failure_label(self.final_status.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_labels() {
        assert_eq!(Verdict::from_code("wa").label(), "Wrong Answer");
        assert_eq!(Verdict::from_code("TLE").label(), "Time Limit Exceeded");
        assert_eq!(Verdict::from_code("ce").label(), "Compilation Error");
        assert_eq!(Verdict::from_code("re").label(), "Runtime Error");
    }

    #[test]
    fn unknown_codes_pass_through_and_absent_reads_failed() {
        assert_eq!(failure_label(Some(&Verdict::from_code("mle"))), "mle");
        assert_eq!(failure_label(None), "Failed");
    }

    #[test]
    fn ok_is_an_accepted_test_verdict() {
        assert!(Verdict::from_code("ok").is_accepted());
        assert!(Verdict::from_code("AC").is_accepted());
        assert_eq!(Verdict::from_code("ok").code(), "ac");
    }

    #[test]
    fn success_is_passed_or_accepted() {
        let accepted = SubmissionOutcome {
            final_status: Some(Verdict::Accepted),
            ..SubmissionOutcome::default()
        };
        assert!(accepted.is_success());

        let passed_flag = SubmissionOutcome {
            final_status: Some(Verdict::WrongAnswer),
            passed: true,
            ..SubmissionOutcome::default()
        };
        assert!(passed_flag.is_success());

        assert!(!SubmissionOutcome::default().is_success());
    }
}
