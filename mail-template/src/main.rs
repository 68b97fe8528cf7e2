//! CLI tool for rendering mail templates
//!
//! # Usage
//!
//! ```bash
//! # Render a template from the configured directory
//! mail-template render welcome.txt --var domain=example.com --var username=ann --var 'tips=["Say hi"]'
//!
//! # Use a custom delimiter and print JSON
//! mail-template render welcome.txt --vars-file vars.json --delimiter '@@@' --json
//!
//! # List the placeholders of a template (placeholder engine)
//! mail-template variables welcome
//! ```

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use mail_template::config::{Config, EngineKind, LoggingConfig, ProcessorConfig};
use mail_template::context::variables_from_file;
use mail_template::engine::{MiniJinjaEngine, PlaceholderEngine};
use mail_template::{MailProcessor, ProcessedResult, TemplateEngine, Variables};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "mail-template")]
#[command(about = "Render mail templates into subject and body", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./mail-template.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template and print subject and body
    Render {
        /// Template id
        template_id: String,
        /// Language hint
        #[arg(long)]
        lang: Option<String>,
        /// Variable as NAME=VALUE; VALUE is parsed as JSON when possible
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
        /// JSON object with variables
        #[arg(long)]
        vars_file: Option<PathBuf>,
        /// Override the configured delimiter
        #[arg(short, long)]
        delimiter: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the variables referenced by a placeholder template
    Variables {
        /// Template id
        template_id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_path) = load_config(cli.config.as_deref())?;

    init_logging(&config.logging);

    match config_path {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    match cli.command {
        Commands::Render {
            template_id,
            lang,
            vars,
            vars_file,
            delimiter,
            json,
        } => {
            let variables = collect_variables(vars_file, &vars)?;
            let processor_config = ProcessorConfig {
                delimiter: delimiter.or_else(|| config.processor.delimiter.clone()),
            };

            let templates = &config.templates;
            let result = match templates.engine {
                EngineKind::Minijinja => render(
                    MiniJinjaEngine::from_directory(&templates.directory),
                    &processor_config,
                    &template_id,
                    lang.as_deref(),
                    &variables,
                )?,
                EngineKind::Placeholder => render(
                    PlaceholderEngine::from_directory(&templates.directory, &templates.extension)
                        .with_context(|| {
                            format!("Failed to load templates from {}", templates.directory)
                        })?,
                    &processor_config,
                    &template_id,
                    lang.as_deref(),
                    &variables,
                )?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Subject: {}", result.subject);
                println!();
                print!("{}", result.mail_body);
            }
        }
        Commands::Variables { template_id } => {
            let templates = &config.templates;
            if templates.engine != EngineKind::Placeholder {
                return Err(anyhow!(
                    "Listing variables requires the placeholder engine"
                ));
            }

            let engine =
                PlaceholderEngine::from_directory(&templates.directory, &templates.extension)?;
            let source = engine
                .get(&template_id)
                .ok_or_else(|| anyhow!("Template not found: {}", template_id))?;

            for name in PlaceholderEngine::extract_variables(source) {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

const DEFAULT_CONFIG_FILE: &str = "mail-template.toml";

/// An explicit path must exist; without one the default file is optional
fn load_config(explicit: Option<&Path>) -> anyhow::Result<(Config, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !path.exists() {
                return Ok((Config::default(), None));
            }
            path
        }
    };

    let config = Config::from_file(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    Ok((config, Some(path)))
}

fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the rendered mail
    match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        "compact" => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
    }
}

fn render<E: TemplateEngine>(
    engine: E,
    config: &ProcessorConfig,
    template_id: &str,
    lang: Option<&str>,
    variables: &Variables,
) -> anyhow::Result<ProcessedResult> {
    let processor = MailProcessor::builder()
        .template_engine(engine)
        .config(config)
        .build()?;

    let result = processor.process(template_id, lang, variables)?;
    Ok(result)
}

/// `--var` entries win over the variables file
fn collect_variables(vars_file: Option<PathBuf>, vars: &[String]) -> anyhow::Result<Variables> {
    let mut variables = match vars_file {
        Some(path) => variables_from_file(&path)
            .with_context(|| format!("Failed to read variables from {}", path.display()))?,
        None => Variables::new(),
    };

    for entry in vars {
        let (name, raw) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid variable '{}', expected NAME=VALUE", entry))?;
        let value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        variables.insert(name.trim().to_string(), value);
    }

    Ok(variables)
}
