use lesson_core::model::{
    ChoiceId, LanguageId, LessonContent, LessonDescriptor, LessonType, Problem, QuestionId, Quiz,
    SelectedAnswers,
};
use serde::Serialize;
use services::sessions::messages;
use services::{JudgeMode, LessonMode, LoadPhase, SessionSnapshot};

use crate::vm::console_vm::{ConsoleVm, judge_console};
use crate::vm::markdown_vm::{MarkdownBlock, markdown_blocks, markdown_to_html};
use crate::vm::nav_vm::NavBarVm;

pub const LOADING: &str = "Loading lesson...";
pub const JUDGE_BADGE: &str = "Judge Mode";
const SUBMIT_NOW: &str = "Submit Now";
const SUBMITTING: &str = "Submitting...";

/// Editor syntax modes with dedicated highlighting; anything else is plain.
const SYNTAXES: [&str; 5] = ["python", "cpp", "java", "javascript", "go"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LessonHeaderVm {
    pub title: String,
    pub badge: String,
}

#[must_use]
pub fn lesson_header(lesson: &LessonDescriptor) -> LessonHeaderVm {
    let badge = match lesson.lesson_type() {
        LessonType::Quiz => lesson.progress().as_str(),
        LessonType::Judge => JUDGE_BADGE,
    };
    LessonHeaderVm {
        title: lesson.title().to_owned(),
        badge: badge.to_owned(),
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuizFormVm {
    pub questions: Vec<QuestionVm>,
    pub submit_label: &'static str,
    pub submit_disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionVm {
    pub id: QuestionId,
    pub heading: String,
    pub text: String,
    pub choices: Vec<ChoiceVm>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChoiceVm {
    pub id: ChoiceId,
    pub text: String,
    pub selected: bool,
}

#[must_use]
pub fn quiz_form(quiz: &Quiz, selected: &SelectedAnswers, submitting: bool) -> QuizFormVm {
    let questions = quiz
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let chosen = selected.selected(&question.id);
            QuestionVm {
                id: question.id.clone(),
                heading: format!("Question {}:", index + 1),
                text: question.text.clone(),
                choices: question
                    .choices
                    .iter()
                    .map(|choice| ChoiceVm {
                        id: choice.id.clone(),
                        text: choice.text.clone(),
                        selected: chosen == Some(&choice.id),
                    })
                    .collect(),
            }
        })
        .collect();

    QuizFormVm {
        questions,
        submit_label: if submitting { SUBMITTING } else { SUBMIT_NOW },
        submit_disabled: submitting,
    }
}

//
// ─── JUDGE ─────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LanguageTagVm {
    pub id: LanguageId,
    pub key: String,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JudgeEditorVm {
    pub challenge: String,
    pub languages: Vec<LanguageTagVm>,
    pub file_name: &'static str,
    pub syntax: &'static str,
    pub code: String,
    pub tab: &'static str,
    /// Run and submit are both locked while a submission is in flight.
    pub actions_disabled: bool,
    pub console: ConsoleVm,
}

#[must_use]
pub fn editor_file_name(language_key: Option<&str>) -> &'static str {
    if language_key == Some("python") {
        "main.py"
    } else {
        "main.cpp"
    }
}

#[must_use]
pub fn editor_syntax(language_key: Option<&str>) -> &'static str {
    language_key
        .and_then(|key| SYNTAXES.into_iter().find(|syntax| *syntax == key))
        .unwrap_or("plaintext")
}

#[must_use]
pub fn judge_editor(problem: &Problem, judge: &JudgeMode, submitting: bool) -> JudgeEditorVm {
    let languages = problem
        .languages()
        .iter()
        .map(|lang| LanguageTagVm {
            id: lang.id.clone(),
            key: lang.key.clone(),
            active: judge.language_id() == Some(&lang.id),
        })
        .collect();

    JudgeEditorVm {
        challenge: problem.title().to_owned(),
        languages,
        file_name: editor_file_name(judge.language_key()),
        syntax: editor_syntax(judge.language_key()),
        code: judge.code().to_owned(),
        tab: judge.tab().as_str(),
        actions_disabled: submitting,
        console: judge_console(problem, judge),
    }
}

//
// ─── SCREEN ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LessonBodyVm {
    Quiz(QuizFormVm),
    Judge(JudgeEditorVm),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LessonVm {
    pub header: LessonHeaderVm,
    pub nav: NavBarVm,
    pub blocks: Vec<MarkdownBlock>,
    pub content_html: String,
    pub body: LessonBodyVm,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LessonScreenVm {
    Loading { message: &'static str },
    Failed { message: &'static str },
    Ready(Box<LessonVm>),
}

fn lesson_body(
    lesson: &LessonDescriptor,
    mode: &LessonMode,
    submitting: bool,
) -> Option<LessonBodyVm> {
    match (lesson.content(), mode) {
        (LessonContent::Quiz(quiz), LessonMode::Quiz(state)) => Some(LessonBodyVm::Quiz(
            quiz_form(quiz, state.selected(), submitting),
        )),
        (LessonContent::Judge(problem), LessonMode::Judge(judge)) => Some(LessonBodyVm::Judge(
            judge_editor(problem, judge, submitting),
        )),
        _ => None,
    }
}

impl From<&SessionSnapshot> for LessonScreenVm {
    fn from(snapshot: &SessionSnapshot) -> Self {
        let loading = Self::Loading { message: LOADING };
        match snapshot.phase {
            LoadPhase::Idle | LoadPhase::Loading => loading,
            LoadPhase::Failed => Self::Failed {
                message: messages::LOAD_FAILED,
            },
            LoadPhase::Ready => {
                let (Some(lesson), Some(mode)) = (&snapshot.lesson, &snapshot.mode) else {
                    return loading;
                };
                let Some(body) = lesson_body(lesson, mode, snapshot.submitting) else {
                    return loading;
                };
                Self::Ready(Box::new(LessonVm {
                    header: lesson_header(lesson),
                    nav: NavBarVm::from(snapshot),
                    blocks: markdown_blocks(lesson.content_md()),
                    content_html: markdown_to_html(lesson.content_md()),
                    body,
                }))
            }
        }
    }
}
