//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use studybuddy_core::{Controller, Corpus, Session, StudyAssistant};
use studybuddy_llm::OpenRouterClient;
use studybuddy_shared::{
    AppConfig, UploadedFile, init_config, load_config, load_config_from, validate_api_key,
};
use tracing::{debug, info};

use crate::chat;
use crate::terminal::Terminal;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// StudyBuddy: your AI study companion.
#[derive(Parser)]
#[command(
    name = "studybuddy",
    version,
    about = "Summarize a syllabus, plan your studies and ask questions about your course materials.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Model to use instead of the configured default.
    #[arg(long, global = true, env = "STUDYBUDDY_MODEL")]
    pub model: Option<String>,

    /// Config file to use instead of ~/.studybuddy/studybuddy.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the combined text of course materials (no model calls).
    Extract {
        /// PDF, DOC or DOCX files, in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Analyze a syllabus and print the result as JSON.
    Analyze {
        /// Syllabus file (PDF, DOC or DOCX).
        syllabus: PathBuf,
    },

    /// Analyze a syllabus and generate a study roadmap for the materials.
    Roadmap {
        /// Syllabus file (PDF, DOC or DOCX).
        #[arg(short, long)]
        syllabus: PathBuf,

        /// Course material files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Answer one question from the course materials.
    Ask {
        /// The question to answer.
        #[arg(short, long)]
        question: String,

        /// Course material files.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Start an interactive study session.
    Chat {
        /// Optional syllabus to analyze before the session starts.
        #[arg(short, long)]
        syllabus: Option<PathBuf>,

        /// Course material files (more can be added with `:upload`).
        files: Vec<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "studybuddy=info",
        1 => "studybuddy=debug",
        _ => "studybuddy=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output on stdout stays clean.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        config: cli.config,
        model: cli.model,
    };

    match cli.command {
        Command::Extract { files } => cmd_extract(&files),
        Command::Analyze { syllabus } => cmd_analyze(&overrides, &syllabus).await,
        Command::Roadmap { syllabus, files } => cmd_roadmap(&overrides, &syllabus, &files).await,
        Command::Ask { question, files } => cmd_ask(&overrides, &question, &files).await,
        Command::Chat { syllabus, files } => {
            cmd_chat(&overrides, syllabus.as_deref(), &files).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&overrides),
        },
    }
}

/// Global flags that override config file values.
pub(crate) struct Overrides {
    config: Option<PathBuf>,
    model: Option<String>,
}

impl Overrides {
    /// Load the config file (explicit path or default location) and apply
    /// command-line overrides.
    fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path)?,
            None => load_config()?,
        };
        if let Some(model) = &self.model {
            config.openrouter.default_model = model.clone();
        }
        Ok(config)
    }

    /// Resolve the config, check the API key and build the model client.
    fn assistant(&self) -> Result<StudyAssistant<OpenRouterClient>> {
        let config = self.resolve()?;
        validate_api_key(&config)?;
        let client = OpenRouterClient::from_config(&config)?;
        info!(model = %config.openrouter.default_model, "using model");
        Ok(StudyAssistant::new(client))
    }
}

/// Read every path into an [`UploadedFile`], in order.
pub(crate) fn load_files(paths: &[PathBuf]) -> Result<Vec<UploadedFile>> {
    paths
        .iter()
        .map(|path| load_file(path))
        .collect()
}

pub(crate) fn load_file(path: &Path) -> Result<UploadedFile> {
    let file = UploadedFile::from_path(path)
        .wrap_err_with(|| format!("cannot read '{}'", path.display()))?;
    debug!(file = %file.name, size = file.size(), "loaded");
    Ok(file)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_extract(paths: &[PathBuf]) -> Result<()> {
    let files = load_files(paths)?;
    let terminal = Terminal::new();

    let corpus = Corpus::build(&files, &terminal);
    print!("{corpus}");
    eprintln!(
        "{} of {} file(s) contributed text.",
        corpus.contributing(),
        corpus.file_count()
    );
    Ok(())
}

async fn cmd_analyze(overrides: &Overrides, syllabus: &Path) -> Result<()> {
    let assistant = overrides.assistant()?;
    let syllabus = load_file(syllabus)?;
    let terminal = Terminal::new();
    let controller = Controller::new(&assistant, &terminal, &terminal);
    let mut session = Session::new();

    if !controller.upload_syllabus(&mut session, &syllabus).await {
        return Err(eyre!("syllabus '{}' could not be analyzed", syllabus.name));
    }
    let analysis = session
        .syllabus_analysis()
        .ok_or_else(|| eyre!("no syllabus analysis was stored"))?;
    println!("{}", serde_json::to_string_pretty(analysis)?);
    Ok(())
}

async fn cmd_roadmap(overrides: &Overrides, syllabus: &Path, paths: &[PathBuf]) -> Result<()> {
    let assistant = overrides.assistant()?;
    let syllabus = load_file(syllabus)?;
    let files = load_files(paths)?;
    let terminal = Terminal::new();
    let controller = Controller::new(&assistant, &terminal, &terminal);
    let mut session = Session::new();

    if !controller.upload_syllabus(&mut session, &syllabus).await {
        return Err(eyre!("syllabus '{}' could not be analyzed", syllabus.name));
    }
    session.upload(files);
    controller.create_chatbot(&mut session).await;

    let roadmap = session
        .roadmap()
        .ok_or_else(|| eyre!("no roadmap was generated"))?;
    println!("{roadmap}");
    Ok(())
}

async fn cmd_ask(overrides: &Overrides, question: &str, paths: &[PathBuf]) -> Result<()> {
    if question.trim().is_empty() {
        return Err(eyre!("question must not be empty"));
    }
    let assistant = overrides.assistant()?;
    let files = load_files(paths)?;
    let terminal = Terminal::new();
    let controller = Controller::new(&assistant, &terminal, &terminal);
    let mut session = Session::new();

    session.upload(files);
    let answer = controller
        .ask(&mut session, question)
        .await
        .ok_or_else(|| eyre!("no answer was produced"))?;
    println!("{answer}");
    Ok(())
}

async fn cmd_chat(overrides: &Overrides, syllabus: Option<&Path>, paths: &[PathBuf]) -> Result<()> {
    let assistant = overrides.assistant()?;
    let files = load_files(paths)?;
    let syllabus = syllabus.map(load_file).transpose()?;
    let terminal = Terminal::new();
    let controller = Controller::new(&assistant, &terminal, &terminal);

    chat::run(&controller, files, syllabus).await
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(overrides: &Overrides) -> Result<()> {
    let config = overrides.resolve()?;
    let toml_str = toml::to_string_pretty(&config).wrap_err("failed to render config")?;
    println!("{toml_str}");
    Ok(())
}
