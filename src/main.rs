//! Freelance Insight - natural-language questions over freelancer earnings
//!
//! A CLI tool that classifies a question with an LLM, computes the matching
//! statistics over a CSV dataset and has the LLM narrate the numbers.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Startup error (missing data file, missing API key, bad config)

mod analysis;
mod cli;
mod config;
mod console;
mod data;
mod error;
mod llm;
mod memory;
mod pipeline;
mod session;

use analysis::FreelancerAnalyzer;
use anyhow::{Context, Result};
use cli::{Args, Command};
use config::Config;
use error::{ConfigError, DataError};
use llm::{ChatModel, LlmConfig, OpenAiClient};
use pipeline::AnalysisPipeline;
use session::{SessionInput, DEMO_QUESTIONS};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // The config file may switch on verbose logging, so read it first
    let loaded = load_config(&args);
    let config_verbose = loaded
        .as_ref()
        .map(|(config, _)| config.general.verbose)
        .unwrap_or(false);

    // Initialize logging
    init_logging(args.log_level(config_verbose));

    info!("Freelance Insight v{}", env!("CARGO_PKG_VERSION"));
    debug!("Command: {:?}", args.command);

    let result = match loaded {
        Ok((config, source)) => {
            log_config_source(&source);
            run(args, config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        for line in startup_diagnostic(&e) {
            eprintln!("{}", line);
        }
        std::process::exit(1);
    }
}

/// Initialize logging at the given level. Logs go to stderr.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Diagnostic lines, with a remediation hint for the known startup errors.
fn startup_diagnostic(e: &anyhow::Error) -> Vec<String> {
    if let Some(DataError::DataFileNotFound(_)) = e.downcast_ref::<DataError>() {
        return vec![
            format!("\n❌ Ошибка данных: {}", e),
            "   Убедитесь, что файл данных находится в правильной директории.".to_string(),
        ];
    }

    match e.downcast_ref::<ConfigError>() {
        Some(ConfigError::MissingApiKey) => vec![
            format!("\n❌ Ошибка конфигурации LLM: {}", ConfigError::MissingApiKey),
            "   Добавьте ключ API в переменную окружения OPENAI_API_KEY.".to_string(),
        ],
        Some(config_error) => vec![
            format!("\n❌ Ошибка файла конфигурации: {}", config_error),
            format!(
                "   Исправьте файл или создайте новый командой init-config ({}).",
                config::DEFAULT_CONFIG_FILE
            ),
        ],
        None => vec![format!("\n❌ Ошибка: {:#}", e)],
    }
}

async fn run(args: Args, mut config: Config) -> Result<()> {
    if args.command == Command::InitConfig {
        return handle_init_config();
    }

    config.merge_with_args(&args);

    // Fail before touching the dataset when the model cannot be reached anyway
    let llm_config = if args.command.needs_model() {
        Some(config.llm_config(args.api_key.as_deref())?)
    } else {
        None
    };

    match args.command {
        Command::Analyze {
            ref question,
            interactive,
        } => {
            println!("⏳ Инициализация анализатора...");
            let mut pipeline = build_pipeline(llm_config, &config)?;
            println!("✅ Анализатор готов к работе!");

            match question {
                Some(question) if !interactive => {
                    run_single_question(&mut pipeline, question, !args.quiet).await;
                }
                _ => run_interactive_mode(&mut pipeline, !args.quiet).await?,
            }
            Ok(())
        }
        Command::Info => handle_info(&config),
        Command::Validate => handle_validate(&config),
        Command::Demo { no_pause } => {
            handle_demo(llm_config, &config, no_pause, !args.quiet).await
        }
        Command::InitConfig => Ok(()),
    }
}

/// Handle init-config: generate a default .freelance-insight.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    println!("   The API key is read from OPENAI_API_KEY, not from this file.");
    Ok(())
}

/// Where the configuration came from. Logged once the subscriber is installed.
#[derive(Debug)]
enum ConfigSource {
    File(PathBuf),
    Defaults,
    InvalidDefault(ConfigError),
}

fn log_config_source(source: &ConfigSource) {
    match source {
        ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
        ConfigSource::Defaults => debug!("No config file found, using defaults"),
        ConfigSource::InvalidDefault(e) => warn!("Failed to load config: {}", e),
    }
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` file must load; a broken default file only warns.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    if args.command == Command::InitConfig {
        return Ok((Config::default(), ConfigSource::Defaults));
    }

    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::File(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((
            config,
            ConfigSource::File(PathBuf::from(config::DEFAULT_CONFIG_FILE)),
        )),
        Ok(None) => Ok((Config::default(), ConfigSource::Defaults)),
        Err(e) => Ok((Config::default(), ConfigSource::InvalidDefault(e))),
    }
}

fn load_analyzer(config: &Config) -> Result<FreelancerAnalyzer> {
    let analyzer = FreelancerAnalyzer::from_path(&config.data.path)?;
    Ok(analyzer.with_sample_rows(config.data.sample_rows))
}

/// Load the dataset and connect the model.
fn build_pipeline(
    llm_config: Option<LlmConfig>,
    config: &Config,
) -> Result<AnalysisPipeline<OpenAiClient>> {
    let llm_config = llm_config.ok_or(ConfigError::MissingApiKey)?;
    let analyzer = load_analyzer(config)?;
    let client = OpenAiClient::new(llm_config).context("Failed to create HTTP client")?;

    Ok(AnalysisPipeline::new(analyzer, client).with_history_window(config.general.history_window))
}

async fn run_single_question<M: ChatModel>(
    pipeline: &mut AnalysisPipeline<M>,
    question: &str,
    show_progress: bool,
) {
    console::print_panel("Анализ", &format!("Вопрос: {}", question));

    let pb = console::spinner("Обработка вопроса...", show_progress);
    let answer = pipeline.analyze_question(question).await;
    pb.finish_and_clear();

    console::print_panel("Результат анализа", &answer);
}

/// Prompt loop. A failed question never ends the session.
async fn run_interactive_mode<M: ChatModel>(
    pipeline: &mut AnalysisPipeline<M>,
    show_progress: bool,
) -> Result<()> {
    console::print_panel(
        "Интерактивный режим",
        "Добро пожаловать в интерактивный анализатор данных фрилансеров!\n\
         Задавайте вопросы о данных или используйте предустановленные запросы.\n\
         Для выхода введите 'quit' или 'exit'. Справка: '/help', информация о данных: '/info', история: '/history'.",
    );
    console::print_predefined_questions();

    let stdin = std::io::stdin();
    loop {
        print!("\nВаш вопрос: ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?
            == 0
        {
            println!();
            break;
        }

        match SessionInput::parse(&line) {
            SessionInput::Quit => {
                println!("До свидания!");
                break;
            }
            SessionInput::Help => console::print_help(),
            SessionInput::History => console::print_history(pipeline.history().entries()),
            SessionInput::Info => {
                let (records, columns) = pipeline
                    .analyzer()
                    .dataset_info()
                    .map(|info| (info.total_records, info.columns.len()))
                    .unwrap_or((0, pipeline.analyzer().table().width()));
                console::print_panel(
                    "Информация о данных",
                    &format!("Всего записей: {}\nКолонок: {}", records, columns),
                );
            }
            SessionInput::Empty => continue,
            SessionInput::Question { text, predefined } => {
                if predefined {
                    println!("Выбран предустановленный запрос: {}", text);
                }
                run_single_question(pipeline, &text, show_progress).await;
            }
        }
    }

    info!(
        "Session finished after {} answered questions",
        pipeline.history().len()
    );
    Ok(())
}

fn handle_info(config: &Config) -> Result<()> {
    println!("⏳ Загрузка данных...");
    let analyzer = load_analyzer(config)?;

    match analyzer.dataset_info() {
        Some(info) => console::print_dataset_info(&info),
        None => println!("Набор данных не содержит записей."),
    }
    Ok(())
}

fn handle_validate(config: &Config) -> Result<()> {
    let analyzer = load_analyzer(config)?;
    info!("Dataset has {} records", analyzer.table().len());

    println!("✅ Конфигурация и данные в порядке!");
    Ok(())
}

async fn handle_demo(
    llm_config: Option<LlmConfig>,
    config: &Config,
    no_pause: bool,
    show_progress: bool,
) -> Result<()> {
    println!("🚀 Запуск демонстрации...");
    let mut pipeline = build_pipeline(llm_config, config)?;

    let total = DEMO_QUESTIONS.len();
    for (i, question) in DEMO_QUESTIONS.iter().enumerate() {
        println!("\nДемо {}/{}: {}", i + 1, total, question);

        let pb = console::spinner("Анализ...", show_progress);
        let answer = pipeline.analyze_question(question).await;
        pb.finish_and_clear();

        console::print_panel(&format!("Результат {}", i + 1), &answer);

        if !no_pause && i + 1 < total {
            print!("Нажмите Enter для продолжения...");
            std::io::stdout().flush().context("Failed to flush stdout")?;
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read from stdin")?;
        }
    }

    println!("\n✅ Демонстрация завершена!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_missing_api_key_diagnostic() {
        let e = anyhow::Error::from(ConfigError::MissingApiKey);
        let lines = startup_diagnostic(&e);

        assert!(lines[0].contains("Ошибка конфигурации LLM"));
        assert!(lines[1].contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_config_file_diagnostic_is_not_an_llm_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[model\nname = 1").unwrap();

        let e = anyhow::Error::from(Config::load(&path).unwrap_err());
        let lines = startup_diagnostic(&e);

        assert!(lines[0].contains("Ошибка файла конфигурации"));
        assert!(!lines.iter().any(|l| l.contains("LLM")));
        assert!(!lines.iter().any(|l| l.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn test_data_file_diagnostic() {
        let e = anyhow::Error::from(DataError::DataFileNotFound(PathBuf::from("x.csv")));
        assert!(startup_diagnostic(&e)[0].contains("Ошибка данных"));
    }

    #[test]
    fn test_config_file_verbose_reaches_log_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verbose.toml");
        std::fs::write(&path, "[general]\nverbose = true\n").unwrap();

        let mut args = make_args(Command::Info);
        args.config = Some(path.clone());

        let (config, source) = load_config(&args).unwrap();
        assert!(matches!(source, ConfigSource::File(p) if p == path));
        assert_eq!(
            args.log_level(config.general.verbose),
            tracing::Level::DEBUG
        );
    }

    #[test]
    fn test_explicit_config_must_load() {
        let mut args = make_args(Command::Info);
        args.config = Some(PathBuf::from("does/not/exist.toml"));
        assert!(load_config(&args).is_err());
    }
}
