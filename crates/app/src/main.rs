mod render;
mod telemetry;
mod terminal;

use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use lesson_client::{ApiConfig, HttpLessonApi};
use lesson_core::model::{ChoiceId, LessonKey, QuestionId};
use services::{
    ConsoleTab, LessonSessionController, SessionConfig, SessionSnapshot, SubmitReport,
};
use tracing::{debug, error};
use ui::LessonScreenVm;
use ui::vm::judge_console;

use crate::render::{ConsoleText, ReportText, ScreenText};
use crate::terminal::{TerminalNavigator, TerminalNotifier};

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingSubcommand,
    UnknownSubcommand(String),
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    InvalidAnswer { raw: String },
    UnknownLanguage { key: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingSubcommand => write!(f, "missing subcommand"),
            ArgsError::UnknownSubcommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidAnswer { raw } => {
                write!(f, "invalid --answer value: {raw} (expected <question>=<choice>)")
            }
            ArgsError::UnknownLanguage { key } => {
                write!(f, "language {key} is not allowed for this lesson")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app show   --course <c> --lesson <l>");
    eprintln!("  app quiz   --course <c> --lesson <l> --answer <question>=<choice>...");
    eprintln!("  app run    --course <c> --lesson <l> --file <path> [--language <key>]");
    eprintln!("  app submit --course <c> --lesson <l> --file <path> [--language <key>]");
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  --api <url>     lessons API base URL");
    eprintln!("  --token <t>     bearer token");
    eprintln!("  --json          print the view model as JSON");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LESSON_API_BASE_URL, LESSON_API_TOKEN, LESSON_NAV_DELAY_MS,");
    eprintln!("  LOG_LEVEL, LOG_FORMAT");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Show,
    Quiz { answers: Vec<(QuestionId, ChoiceId)> },
    Code { file: PathBuf, language: Option<String>, final_submit: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Show,
    Quiz,
    Run,
    Submit,
}

impl CommandKind {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "show" => Some(Self::Show),
            "quiz" => Some(Self::Quiz),
            "run" => Some(Self::Run),
            "submit" => Some(Self::Submit),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    course: String,
    lesson: String,
    api: Option<String>,
    token: Option<String>,
    json: bool,
    command: Command,
}

fn parse_answer(raw: String) -> Result<(QuestionId, ChoiceId), ArgsError> {
    match raw.split_once('=') {
        Some((question, choice)) if !question.trim().is_empty() && !choice.trim().is_empty() => {
            Ok((QuestionId::new(question.trim()), ChoiceId::new(choice.trim())))
        }
        _ => Err(ArgsError::InvalidAnswer { raw }),
    }
}

impl Args {
    /// `Ok(None)` means help was requested.
    fn parse(argv: impl IntoIterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut args = argv.into_iter();
        let kind = match args.next() {
            None => return Err(ArgsError::MissingSubcommand),
            Some(arg) if arg == "--help" || arg == "-h" => return Ok(None),
            Some(arg) => CommandKind::from_arg(&arg).ok_or(ArgsError::UnknownSubcommand(arg))?,
        };

        let mut course = None;
        let mut lesson = None;
        let mut api = None;
        let mut token = None;
        let mut json = false;
        let mut answers = Vec::new();
        let mut file = None;
        let mut language = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--course" => course = Some(require_value(&mut args, "--course")?),
                "--lesson" => lesson = Some(require_value(&mut args, "--lesson")?),
                "--api" => api = Some(require_value(&mut args, "--api")?),
                "--token" => token = Some(require_value(&mut args, "--token")?),
                "--json" => json = true,
                "--answer" if kind == CommandKind::Quiz => {
                    answers.push(parse_answer(require_value(&mut args, "--answer")?)?);
                }
                "--file" if matches!(kind, CommandKind::Run | CommandKind::Submit) => {
                    file = Some(PathBuf::from(require_value(&mut args, "--file")?));
                }
                "--language" if matches!(kind, CommandKind::Run | CommandKind::Submit) => {
                    language = Some(require_value(&mut args, "--language")?);
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let command = match kind {
            CommandKind::Show => Command::Show,
            CommandKind::Quiz => Command::Quiz { answers },
            CommandKind::Run | CommandKind::Submit => Command::Code {
                file: file.ok_or(ArgsError::MissingFlag { flag: "--file" })?,
                language,
                final_submit: kind == CommandKind::Submit,
            },
        };

        Ok(Some(Self {
            course: course.ok_or(ArgsError::MissingFlag { flag: "--course" })?,
            lesson: lesson.ok_or(ArgsError::MissingFlag { flag: "--lesson" })?,
            api,
            token,
            json,
            command,
        }))
    }

    fn api_config(&self) -> Result<ApiConfig, Box<dyn std::error::Error>> {
        let env = ApiConfig::from_env()?;
        let config = match &self.api {
            Some(url) => ApiConfig::new(url)?.with_token(env.token),
            None => env,
        };
        Ok(match &self.token {
            Some(token) => config.with_token(Some(token.clone())),
            None => config,
        })
    }
}

fn print_screen(snapshot: &SessionSnapshot, json: bool) -> Result<(), serde_json::Error> {
    let screen = LessonScreenVm::from(snapshot);
    if json {
        println!("{}", serde_json::to_string_pretty(&screen)?);
    } else {
        print!("{}", ScreenText(&screen));
    }
    Ok(())
}

fn print_console(snapshot: &SessionSnapshot) {
    let problem = snapshot.lesson.as_ref().and_then(|lesson| lesson.problem());
    if let (Some(problem), Some(judge)) = (problem, snapshot.judge()) {
        print!("{}", ConsoleText(&judge_console(problem, judge)));
    }
}

/// Keeps the process alive until a scheduled navigation fires.
async fn wait_for_navigation(controller: &LessonSessionController, delay: Duration) {
    if controller.has_pending_navigation() {
        tokio::time::sleep(delay + Duration::from_millis(50)).await;
    }
}

fn exit_code(report: &SubmitReport) -> ExitCode {
    if report.is_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

async fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => {
            print_usage();
            return Err(err.into());
        }
    };

    let session_config = SessionConfig::from_env();
    let delay = session_config.navigation_delay;
    let controller = LessonSessionController::new(
        Arc::new(HttpLessonApi::new(args.api_config()?)),
        Arc::new(TerminalNotifier),
        Arc::new(TerminalNavigator),
        session_config,
    );

    let key = LessonKey::parse(&args.course, &args.lesson)?;
    debug!(%key, command = ?args.command, "opening lesson");
    controller.open(key).await?;

    match args.command {
        Command::Show => {
            if controller.snapshot().judge().is_some() {
                controller.set_console_tab(ConsoleTab::Sample)?;
            }
            print_screen(&controller.snapshot(), args.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Quiz { answers } => {
            for (question, choice) in answers {
                controller.select_answer(question, choice)?;
            }
            let report = controller.submit_quiz().await?;
            println!("{}", ReportText(&report));
            wait_for_navigation(&controller, delay).await;
            Ok(exit_code(&report))
        }
        Command::Code {
            file,
            language,
            final_submit,
        } => {
            if let Some(key) = language {
                let id = controller
                    .snapshot()
                    .lesson
                    .as_ref()
                    .and_then(|lesson| lesson.problem())
                    .and_then(|problem| problem.language_by_key(&key))
                    .map(|lang| lang.id.clone())
                    .ok_or(ArgsError::UnknownLanguage { key })?;
                controller.select_language(&id)?;
            }
            controller.set_code(std::fs::read_to_string(&file)?)?;

            let report = controller.submit_code(final_submit).await?;
            if args.json {
                print_screen(&controller.snapshot(), true)?;
            } else {
                for tab in [ConsoleTab::Test, ConsoleTab::Status] {
                    controller.set_console_tab(tab)?;
                    print_console(&controller.snapshot());
                    println!();
                }
            }
            println!("{}", ReportText(&report));
            wait_for_navigation(&controller, delay).await;
            Ok(exit_code(&report))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();
    match run().await {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("{err}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn parses_quiz_answers() {
        let raw = "quiz --course rust --lesson intro --answer q1=a --answer q2=b";
        let args = Args::parse(argv(raw)).unwrap().unwrap();
        assert_eq!(args.course, "rust");
        assert_eq!(
            args.command,
            Command::Quiz {
                answers: vec![
                    (QuestionId::new("q1"), ChoiceId::new("a")),
                    (QuestionId::new("q2"), ChoiceId::new("b")),
                ]
            }
        );
    }

    #[test]
    fn submit_requires_file() {
        assert_eq!(
            Args::parse(argv("submit --course rust --lesson intro")),
            Err(ArgsError::MissingFlag { flag: "--file" })
        );
    }

    #[test]
    fn run_collects_language_and_globals() {
        let args = Args::parse(argv(
            "run --course c --lesson l --file main.py --language python --api http://x/ --json",
        ))
        .unwrap()
        .unwrap();
        assert_eq!(
            args.command,
            Command::Code {
                file: PathBuf::from("main.py"),
                language: Some("python".into()),
                final_submit: false,
            }
        );
        assert_eq!(args.api.as_deref(), Some("http://x/"));
        assert!(args.json);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            Args::parse(argv("quiz --course c --lesson l --answer q1")),
            Err(ArgsError::InvalidAnswer { raw: "q1".into() })
        );
        assert_eq!(
            Args::parse(argv("show --course c --lesson l --file x")),
            Err(ArgsError::UnknownArg("--file".into()))
        );
        assert_eq!(
            Args::parse(argv("grade")),
            Err(ArgsError::UnknownSubcommand("grade".into()))
        );
        assert_eq!(Args::parse(Vec::new()), Err(ArgsError::MissingSubcommand));
        assert_eq!(Args::parse(argv("show --help")), Ok(None));
    }
}
