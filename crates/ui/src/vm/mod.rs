mod console_vm;
mod lesson_vm;
mod markdown_vm;
mod nav_vm;

pub use console_vm::{
    ConsoleVm, NO_ERROR_DETAILS, NO_ERRORS, NO_SAMPLES, NO_TESTS, READY_TO_RUN, SampleCaseVm,
    SampleTabVm, StatusTabVm, TestDetailVm, TestRowVm, TestTabVm, console_vm, judge_console,
    sample_tab, status_tab, test_tab,
};
pub use lesson_vm::{
    ChoiceVm, JUDGE_BADGE, JudgeEditorVm, LOADING, LanguageTagVm, LessonBodyVm, LessonHeaderVm,
    LessonScreenVm, LessonVm, QuestionVm, QuizFormVm, editor_file_name, editor_syntax,
    judge_editor, lesson_header, quiz_form,
};
pub use markdown_vm::{MarkdownBlock, markdown_blocks, markdown_to_html, sanitize_html};
pub use nav_vm::NavBarVm;
