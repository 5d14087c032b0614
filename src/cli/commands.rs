use crate::config::{ApiEnv, Environment};
use crate::logging::{init_logging, LogConfig};
use crate::openapi::{describe, ApiDescription};
use crate::pets::{app_router, doc_meta, lambda_handler, PetStore};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Command-line interface for the Pets API
///
/// Produces build-time artifacts and runs single events through the
/// function entry point.
#[derive(Parser, Debug)]
#[command(name = "pets-api")]
#[command(about = "Pets API tooling", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the API description
    Openapi {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = DescriptionFormat::Yaml)]
        format: DescriptionFormat,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Log the routing table
    Routes,
    /// Run one transport event (JSON) through the entry point and print the response
    ///
    /// Reads `ENVIRONMENT` from the process environment.
    Invoke {
        /// Event file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: String,
    },
}

/// Serialization of the API description.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DescriptionFormat {
    Yaml,
    Json,
}

/// API description of the pets router.
///
/// # Errors
///
/// Fails only if the router definitions are inconsistent.
pub fn pets_description() -> Result<ApiDescription> {
    let router = app_router(Arc::new(PetStore::seeded())).context("Failed to build router")?;
    Ok(describe(&router, &doc_meta()))
}

/// Render the description in `format`.
///
/// # Errors
///
/// Propagates router and serialization failures.
pub fn render_description(format: DescriptionFormat) -> Result<String> {
    let description = pets_description()?;
    match format {
        DescriptionFormat::Yaml => description.to_yaml().context("Failed to render YAML"),
        DescriptionFormat::Json => description
            .to_json_pretty()
            .context("Failed to render JSON"),
    }
}

/// Write the description to `output`, or stdout when `None`.
///
/// # Errors
///
/// Propagates render and I/O failures.
pub fn write_description(format: DescriptionFormat, output: Option<&Path>) -> Result<()> {
    let rendered = render_description(format)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), ?format, "API description written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Run one raw JSON event through a fresh entry point.
///
/// # Errors
///
/// Fails only if the router definitions are inconsistent.
pub fn invoke_event(raw_event: &str, env: ApiEnv, log_config: &LogConfig) -> Result<String> {
    let handler = lambda_handler(env, log_config).context("Failed to build entry point")?;
    Ok(handler.handle_json(raw_event))
}

fn read_event(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read event file {source}"))
    }
}

/// Execute a parsed command.
///
/// # Errors
///
/// Propagates configuration, I/O and render failures.
pub fn run(cli: &Cli, log_config: &LogConfig) -> Result<()> {
    match &cli.command {
        Commands::Openapi { format, output } => write_description(*format, output.as_deref()),
        Commands::Routes => {
            let router =
                app_router(Arc::new(PetStore::seeded())).context("Failed to build router")?;
            router.dump_routes();
            for p in router.procedures() {
                println!("{:<7} {:<20} {} ({})", p.method, p.path_pattern, p.name, p.kind);
            }
            Ok(())
        }
        Commands::Invoke { event } => {
            let env = ApiEnv::from_env().context("Invalid configuration")?;
            let raw = read_event(event)?;
            println!("{}", invoke_event(&raw, env, log_config)?);
            Ok(())
        }
    }
}

/// Parse arguments, install logging and run.
///
/// Logging defaults follow `ENVIRONMENT` (prod when unset, since only
/// `invoke` requires it) with `PETS_API_LOG_*` overrides on top.
///
/// # Errors
///
/// See [`run`].
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let environment = ApiEnv::from_env().map_or(Environment::Prod, |env| env.environment);
    let log_config = LogConfig::from_env(environment);
    init_logging(&log_config)?;
    run(&cli, &log_config)
}
