//! Plain-text rendering of the lesson view models.

use std::fmt::{self, Display, Formatter};

use services::SubmitReport;
use ui::vm::{
    ConsoleVm, JudgeEditorVm, LessonBodyVm, LessonScreenVm, LessonVm, MarkdownBlock, NavBarVm,
    QuizFormVm,
};

pub struct ScreenText<'a>(pub &'a LessonScreenVm);

pub struct ConsoleText<'a>(pub &'a ConsoleVm);

pub struct ReportText<'a>(pub &'a SubmitReport);

impl Display for ScreenText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            LessonScreenVm::Loading { message } | LessonScreenVm::Failed { message } => {
                writeln!(f, "{message}")
            }
            LessonScreenVm::Ready(lesson) => write_lesson(f, lesson),
        }
    }
}

fn write_lesson(f: &mut Formatter<'_>, lesson: &LessonVm) -> fmt::Result {
    writeln!(f, "{}  [{}]", lesson.header.title, lesson.header.badge)?;
    write_nav(f, lesson.nav)?;
    writeln!(f)?;
    for block in &lesson.blocks {
        write_block(f, block)?;
        writeln!(f)?;
    }
    match &lesson.body {
        LessonBodyVm::Quiz(form) => write_quiz(f, form),
        LessonBodyVm::Judge(editor) => write_editor(f, editor),
    }
}

fn write_nav(f: &mut Formatter<'_>, nav: NavBarVm) -> fmt::Result {
    let back = if nav.has_prev { "‹ back" } else { "" };
    let next = match (nav.has_next, nav.next_disabled) {
        (false, _) => "",
        (true, true) => "next › (locked)",
        (true, false) => "next ›",
    };
    if back.is_empty() && next.is_empty() {
        return Ok(());
    }
    writeln!(f, "{back:<10}{next}")
}

fn write_block(f: &mut Formatter<'_>, block: &MarkdownBlock) -> fmt::Result {
    match block {
        MarkdownBlock::Heading { level, text } => {
            let underline = if *level <= 1 { '=' } else { '-' };
            writeln!(f, "{text}")?;
            writeln!(f, "{}", underline.to_string().repeat(text.chars().count()))
        }
        MarkdownBlock::Paragraph { text } => writeln!(f, "{text}"),
        MarkdownBlock::Code { code, .. } => {
            for line in code.lines() {
                writeln!(f, "    {line}")?;
            }
            Ok(())
        }
        MarkdownBlock::List { ordered, items } => {
            for (index, item) in items.iter().enumerate() {
                if *ordered {
                    writeln!(f, "{}. {item}", index + 1)?;
                } else {
                    writeln!(f, "- {item}")?;
                }
            }
            Ok(())
        }
        MarkdownBlock::Quote { text } => {
            for line in text.lines() {
                writeln!(f, "> {line}")?;
            }
            Ok(())
        }
        MarkdownBlock::Rule => writeln!(f, "----"),
    }
}

fn write_quiz(f: &mut Formatter<'_>, form: &QuizFormVm) -> fmt::Result {
    for question in &form.questions {
        writeln!(f, "{} {}", question.heading, question.text)?;
        for choice in &question.choices {
            let mark = if choice.selected { "(x)" } else { "( )" };
            writeln!(f, "  {mark} {}  [{}]", choice.text, choice.id)?;
        }
        writeln!(f, "  question id: {}", question.id)?;
        writeln!(f)?;
    }
    writeln!(f, "[{}]", form.submit_label)
}

fn write_editor(f: &mut Formatter<'_>, editor: &JudgeEditorVm) -> fmt::Result {
    writeln!(f, "Requirements")?;
    writeln!(f, "Challenge: {}", editor.challenge)?;
    let languages: Vec<String> = editor
        .languages
        .iter()
        .map(|lang| {
            if lang.active {
                format!("*{}*", lang.key)
            } else {
                lang.key.clone()
            }
        })
        .collect();
    writeln!(f, "Languages: {}", languages.join(" "))?;
    writeln!(f)?;
    writeln!(f, "── {} ({}) ──", editor.file_name, editor.syntax)?;
    for line in editor.code.lines() {
        writeln!(f, "  {line}")?;
    }
    writeln!(f)?;
    write!(f, "{}", ConsoleText(&editor.console))
}

impl Display for ConsoleText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            ConsoleVm::Empty { message } => writeln!(f, "{message}"),
            ConsoleVm::Sample(sample) => {
                writeln!(f, "Sample")?;
                if let Some(message) = sample.message {
                    return writeln!(f, "{message}");
                }
                for case in &sample.cases {
                    if let Some(caption) = &case.caption {
                        writeln!(f, "{}", caption.to_uppercase())?;
                    }
                    writeln!(f, "Sample Input:")?;
                    writeln!(f, "{}", case.input)?;
                    writeln!(f, "Expected Output:")?;
                    writeln!(f, "{}", case.expected_output)?;
                }
                Ok(())
            }
            ConsoleVm::Test(tests) => {
                writeln!(f, "Final Status: {}", tests.final_status)?;
                if let Some(message) = tests.message {
                    return writeln!(f, "{message}");
                }
                for row in &tests.rows {
                    let mark = if row.passed { "✓" } else { "✗" };
                    match &row.runtime {
                        Some(runtime) => writeln!(f, "{}: {mark}  {runtime}", row.label)?,
                        None => writeln!(f, "{}: {mark}", row.label)?,
                    }
                    if let Some(detail) = &row.detail {
                        if let Some(stdout) = &detail.stdout {
                            writeln!(f, "  Your Output: {stdout}")?;
                        }
                        if let Some(stderr) = &detail.stderr {
                            writeln!(f, "  Error: {stderr}")?;
                        }
                    }
                }
                Ok(())
            }
            ConsoleVm::Status(status) => {
                writeln!(f, "Error Log")?;
                writeln!(f, "{}", status.error_log)
            }
        }
    }
}

impl Display for ReportText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            SubmitReport::Passed {
                navigation: Some(path),
            } => write!(f, "passed; opening {path} shortly"),
            SubmitReport::Passed { navigation: None } => write!(f, "passed"),
            SubmitReport::Failed { label: Some(label) } => write!(f, "failed: {label}"),
            SubmitReport::Failed { label: None } => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ui::vm::{LOADING, READY_TO_RUN, StatusTabVm, TestRowVm, TestTabVm};

    #[test]
    fn loading_screen_prints_message() {
        let screen = LessonScreenVm::Loading { message: LOADING };
        assert_eq!(ScreenText(&screen).to_string(), "Loading lesson...\n");
    }

    #[test]
    fn test_tab_lists_rows_with_marks() {
        let console = ConsoleVm::Test(TestTabVm {
            final_status: "WA".into(),
            status_class: "wa".into(),
            rows: vec![
                TestRowVm {
                    label: "Sample Test".into(),
                    passed: true,
                    runtime: Some("5ms".into()),
                    detail: None,
                },
                TestRowVm {
                    label: "Test 1".into(),
                    passed: false,
                    runtime: None,
                    detail: None,
                },
            ],
            message: None,
        });

        assert_eq!(
            ConsoleText(&console).to_string(),
            "Final Status: WA\nSample Test: ✓  5ms\nTest 1: ✗\n"
        );
    }

    #[test]
    fn status_and_empty_console() {
        let status = ConsoleVm::Status(StatusTabVm {
            error_log: "Traceback".into(),
            has_error_output: true,
        });
        assert_eq!(ConsoleText(&status).to_string(), "Error Log\nTraceback\n");

        let empty = ConsoleVm::Empty {
            message: READY_TO_RUN,
        };
        assert_eq!(ConsoleText(&empty).to_string(), "Ready to run\n");
    }

    #[test]
    fn report_mentions_next_route() {
        let report = SubmitReport::Passed {
            navigation: Some("/rust/loops".into()),
        };
        assert_eq!(
            ReportText(&report).to_string(),
            "passed; opening /rust/loops shortly"
        );
        let failed = SubmitReport::Failed {
            label: Some("Wrong Answer".into()),
        };
        assert_eq!(ReportText(&failed).to_string(), "failed: Wrong Answer");
    }
}
