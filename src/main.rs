// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tarjome::app_config::{self, Config, ProviderKind};
use tarjome::document::DocumentKind;
use tarjome::file_utils::FileManager;
use tarjome::pipeline::{PipelineOrchestrator, PipelineOutcome};

/// CLI Wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    /// Hugging Face Inference, no key required
    Free,
    /// OpenAI, requires OPENAI_API_KEY
    Paid,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Free => ProviderKind::Free,
            CliProvider::Paid => ProviderKind::Paid,
        }
    }
}

/// CLI Wrapper for DocumentKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliDocumentKind {
    Pdf,
    Subtitle,
    Text,
}

impl From<CliDocumentKind> for DocumentKind {
    fn from(cli_kind: CliDocumentKind) -> Self {
        match cli_kind {
            CliDocumentKind::Pdf => DocumentKind::Pdf,
            CliDocumentKind::Subtitle => DocumentKind::Subtitle,
            CliDocumentKind::Text => DocumentKind::PlainText,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a document into Persian and write it as a PDF
    Translate(TranslateArgs),

    /// Generate shell completions for tarjome
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input document (.pdf, .srt or .txt)
    #[arg(value_name = "FILE")]
    input_file: PathBuf,

    /// Document type; detected from the file when omitted
    #[arg(short = 't', long = "type", value_enum)]
    kind: Option<CliDocumentKind>,

    /// Translation backend to use
    #[arg(short, long, value_enum)]
    provider: Option<CliProvider>,

    /// Directory for the translated PDF (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Print the extracted text before translating
    #[arg(long)]
    preview: bool,

    /// Hugging Face access token
    #[arg(long, env = "HUGGINGFACE_TOKEN", hide_env_values = true)]
    hf_token: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,
}

/// tarjome - translate documents into Persian
///
/// Extracts the text of a PDF, subtitle or plain-text file, translates it
/// into Persian with a hosted AI model and writes a right-to-left PDF.
#[derive(Parser, Debug)]
#[command(name = "tarjome")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered document translation into Persian")]
#[command(long_about = "tarjome extracts text from a document, translates it into Persian and renders the result as a PDF.

EXAMPLES:
    tarjome translate movie.en.srt                # Free backend, writes ترجمه_movie.pdf
    tarjome translate -p paid report.pdf          # Use the paid backend
    tarjome translate -t text notes.dat           # Force the document type
    tarjome translate --preview -o out/ talk.srt  # Show extracted text first
    tarjome completions bash > tarjome.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't
    exist, a default one is created automatically. Credentials are read from
    HUGGINGFACE_TOKEN (optional) and OPENAI_API_KEY (required for paid).

SUPPORTED PROVIDERS:
    free - Hugging Face Inference text generation
    paid - OpenAI chat completions (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config or CLI says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "tarjome", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
    }
}

/// Load the config file and apply command line overrides
fn load_config(options: &TranslateArgs) -> Result<Config> {
    let mut config = Config::load_or_create(&options.config_path)
        .with_context(|| format!("Failed to load configuration from {}", options.config_path))?;

    if let Some(provider) = &options.provider {
        config.provider = provider.clone().into();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(token) = options.hf_token.as_ref().filter(|t| !t.is_empty()) {
        config.free_tier.api_key = token.clone();
    }
    if let Some(key) = options.openai_api_key.as_ref().filter(|k| !k.is_empty()) {
        config.paid.api_key = key.clone();
    }

    Ok(config)
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    if !FileManager::file_exists(&options.input_file) {
        return Err(anyhow!("Input file does not exist: {:?}", options.input_file));
    }

    let document = FileManager::read_document(&options.input_file, options.kind.clone().map(Into::into))?;
    info!("Processing {} as {}", document.name(), document.kind());

    let mut orchestrator = PipelineOrchestrator::new(config.clone());

    if options.preview {
        let extraction = orchestrator.preview(&document);
        match &extraction.error {
            None => println!("{}\n", extraction.text),
            Some(e) => warn!("Preview failed: {}", e),
        }
    }

    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!("Translating {} with {}", document.name(), config.provider.display_name()));

    let outcome = orchestrator.run(&document).await;
    spinner.finish_and_clear();

    match outcome {
        PipelineOutcome::Done(output) => {
            for warning in &output.document.warnings {
                warn!("{}", warning);
            }

            let output_dir = match &options.output_dir {
                Some(dir) => dir.clone(),
                None => options
                    .input_file
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."))
                    .to_path_buf(),
            };
            let path = FileManager::write_rendered(&output.document, &output_dir)?;

            println!("{}", output.translated_text);
            info!("Success: {:?} ({} page(s))", path, output.document.page_count);
            Ok(())
        }
        PipelineOutcome::Failed { message, .. } => {
            eprintln!("{}", message.message);
            eprintln!("{}", message.hint);
            std::process::exit(1);
        }
    }
}
