//! Learner-facing notice texts.

pub const QUIZ_PASSED: &str = "Congratulations! You passed the quiz.";
pub const QUIZ_FAILED: &str = "Incorrect. Please try again.";
pub const QUIZ_TRANSPORT: &str = "Error submitting quiz";

pub const CODE_ACCEPTED: &str = "Correct! Lesson Completed.";
pub const RUN_PASSED: &str = "All tests passed!";
pub const CODE_TRANSPORT: &str = "Error processing execution";

pub const LOAD_FAILED: &str = "Could not load lesson content";
pub const FINAL_LESSON: &str = "You have completed the final lesson!";

#[must_use]
pub fn code_failed(label: &str) -> String {
    format!("Result: {label}")
}
