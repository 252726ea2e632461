//! Interactive study session over stdin.
//!
//! Plain lines are questions. Lines starting with `:` are directives:
//! `:upload <path>`, `:syllabus <path>`, `:build`, `:files`, `:help` and
//! `:quit`.

use std::io::Write;
use std::path::PathBuf;

use color_eyre::eyre::Result;
use studybuddy_core::{Controller, Session};
use studybuddy_llm::TextGenerator;
use studybuddy_shared::UploadedFile;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::commands::load_file;

const HELP: &str = "\
Type a question and press Enter, or use one of:
  :upload <path>    add a course material file
  :syllabus <path>  analyze a syllabus
  :build            rebuild the chatbot (and roadmap)
  :files            list uploaded files
  :help             show this help
  :quit             end the session";

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Question(String),
    Upload(PathBuf),
    Syllabus(PathBuf),
    Build,
    Files,
    Help,
    Quit,
    /// A directive that is unknown or is missing its argument.
    Invalid(String),
}

impl Input {
    /// Parse a line; blank lines yield `None`.
    pub(crate) fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(directive) = line.strip_prefix(':') else {
            return Some(Self::Question(line.to_string()));
        };

        let (name, arg) = match directive.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (directive, ""),
        };
        let path = || (!arg.is_empty()).then(|| PathBuf::from(arg));

        Some(match name {
            "upload" | "u" => match path() {
                Some(p) => Self::Upload(p),
                None => Self::Invalid("usage: :upload <path>".into()),
            },
            "syllabus" | "s" => match path() {
                Some(p) => Self::Syllabus(p),
                None => Self::Invalid("usage: :syllabus <path>".into()),
            },
            "build" | "b" => Self::Build,
            "files" | "f" => Self::Files,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => Self::Invalid(format!("unknown command ':{other}' (try :help)")),
        })
    }
}

/// Run the session until `:quit` or end of input.
pub(crate) async fn run<G: TextGenerator>(
    controller: &Controller<'_, G>,
    files: Vec<UploadedFile>,
    syllabus: Option<UploadedFile>,
) -> Result<()> {
    let mut session = Session::new();
    info!(session = %session.id(), "chat session started");

    session.upload(files);
    if let Some(syllabus) = &syllabus {
        controller.upload_syllabus(&mut session, syllabus).await;
    }
    if !session.files().is_empty() {
        build(controller, &mut session).await;
    }

    eprintln!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(input) = Input::parse(&line) else {
            continue;
        };
        debug!(?input, "chat input");

        match input {
            Input::Question(question) => {
                if let Some(answer) = controller.ask(&mut session, &question).await {
                    println!("{answer}");
                }
            }
            Input::Upload(path) => match load_file(&path) {
                Ok(file) => {
                    let name = file.name.clone();
                    if session.upload([file]) == 0 {
                        eprintln!("'{name}' is already uploaded.");
                    } else {
                        eprintln!("Added '{name}'. Use :build to refresh the roadmap.");
                    }
                }
                Err(e) => eprintln!("error: {e:#}"),
            },
            Input::Syllabus(path) => match load_file(&path) {
                Ok(file) => {
                    controller.upload_syllabus(&mut session, &file).await;
                }
                Err(e) => eprintln!("error: {e:#}"),
            },
            Input::Build => build(controller, &mut session).await,
            Input::Files => list_files(&session),
            Input::Help => eprintln!("{HELP}"),
            Input::Invalid(message) => eprintln!("{message}"),
            Input::Quit => break,
        }
    }

    info!(session = %session.id(), "chat session ended");
    Ok(())
}

async fn build<G: TextGenerator>(controller: &Controller<'_, G>, session: &mut Session) {
    if controller.create_chatbot(session).await {
        if let Some(roadmap) = session.roadmap() {
            println!("{roadmap}");
        }
    }
}

fn list_files(session: &Session) {
    if session.files().is_empty() {
        eprintln!("No files uploaded yet.");
        return;
    }
    for (i, file) in session.files().iter().enumerate() {
        eprintln!("{:>3}. {} ({} bytes)", i + 1, file.name, file.size());
    }
}

fn prompt() -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}
