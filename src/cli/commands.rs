//! CLI Command Implementations
//!
//! Implementations for all CLI subcommands.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::config::CalculatorConfig;
use crate::engine::QueueCalculator;
use crate::error::{QueueError, QueueResult};
use crate::report::{self, OutputFormat, TITLE};
use crate::telemetry::init_telemetry;
use crate::types::{Outcome, QueueInputs, RateInput, TimeUnit};
use crate::VERSION;

use super::{
    CalcCommand, Cli, Commands, ConfigAction, ConfigCommand, InteractiveCommand, Prompter,
    ServeCommand,
};

/// Level used by console commands when none is configured explicitly
const CONSOLE_LOG_LEVEL: &str = "warn";

/// Execute the CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = if let Some(path) = &cli.config {
        CalculatorConfig::from_file(path)?
    } else {
        CalculatorConfig::from_env()?
    };

    let is_serve = matches!(cli.command, Some(Commands::Serve(_)));
    apply_logging_flags(&mut config, cli.json_logs, cli.log_level, is_serve);

    // run_server owns logging setup for serve
    if !is_serve {
        init_telemetry(&config.telemetry)?;
    }

    match cli.command.unwrap_or(Commands::Interactive(InteractiveCommand::default())) {
        Commands::Interactive(cmd) => execute_interactive(cmd, config, cli.quiet),
        Commands::Calc(cmd) => execute_calc(cmd, config),
        Commands::Serve(cmd) => execute_serve(cmd, config, cli.quiet).await,
        Commands::Config(cmd) => execute_config(cmd, config),
        Commands::Version => execute_version(),
    }
}

/// Layer the global logging flags over the loaded configuration.
///
/// Absent flags leave file and environment settings alone, except that
/// console commands fall back to `warn` to keep stdout a clean report.
fn apply_logging_flags(
    config: &mut CalculatorConfig,
    json_logs: bool,
    log_level: Option<String>,
    is_serve: bool,
) {
    if json_logs {
        config.telemetry.json_logs = true;
    }
    match log_level {
        Some(level) => config.telemetry.log_level = level,
        None if !is_serve => config.telemetry.log_level = CONSOLE_LOG_LEVEL.to_string(),
        None => {}
    }
}

/// Prompt for inputs, evaluate them and write the report to `output`.
///
/// Unstable systems are reported and returned as `Outcome::Unstable`; only
/// bad input and I/O failures are errors.
pub fn run_interactive<R, W>(
    input: R,
    mut output: W,
    format: OutputFormat,
    banner: bool,
) -> QueueResult<Outcome>
where
    R: BufRead,
    W: Write,
{
    if banner {
        writeln!(output, "{}\n", TITLE)?;
    }

    let mut prompter = Prompter::new(input, output);
    let inputs = prompter.read_inputs()?;
    let mut output = prompter.into_output();

    let outcome = QueueCalculator::new().evaluate(&inputs)?;
    write_report(&mut output, &outcome, format)?;
    Ok(outcome)
}

/// Write the report for `outcome` in `format`
pub fn write_report<W: Write>(output: &mut W, outcome: &Outcome, format: OutputFormat) -> QueueResult<()> {
    match format {
        OutputFormat::Text => write!(output, "{}", report::render_text(outcome))?,
        OutputFormat::Json => writeln!(output, "{}", report::render_json(outcome)?)?,
    }
    output.flush()?;
    Ok(())
}

/// Unstable systems were already reported; surface them for the exit code
fn finish(outcome: Outcome) -> Result<()> {
    outcome.into_metrics()?;
    Ok(())
}

/// Execute the interactive command
fn execute_interactive(cmd: InteractiveCommand, config: CalculatorConfig, quiet: bool) -> Result<()> {
    let format = cmd.format.unwrap_or(config.output.format);
    let banner = config.output.banner && !quiet;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = run_interactive(stdin.lock(), stdout.lock(), format, banner)?;
    finish(outcome)
}

/// Execute the calc command
fn execute_calc(cmd: CalcCommand, config: CalculatorConfig) -> Result<()> {
    let format = cmd.format.unwrap_or(config.output.format);
    let inputs = QueueInputs::new(
        RateInput { kind: cmd.arrival_kind, value: cmd.arrival },
        RateInput { kind: cmd.service_kind, value: cmd.service },
        TimeUnit::parse_lenient(&cmd.unit),
        cmd.servers,
    );
    debug!(?inputs, "Running one-shot calculation");

    let outcome = QueueCalculator::new().evaluate(&inputs)?;
    write_report(&mut io::stdout().lock(), &outcome, format)?;
    finish(outcome)
}

/// Execute the serve command
async fn execute_serve(cmd: ServeCommand, mut config: CalculatorConfig, quiet: bool) -> Result<()> {
    if let Some(port) = cmd.port {
        config.server.port = port;
    }

    if let Some(host) = cmd.host {
        config.server.host = host;
    }

    if let Some(timeout) = cmd.timeout {
        config.server.request_timeout = Duration::from_secs(timeout);
    }

    if cmd.no_cors {
        config.server.cors_enabled = false;
    }

    config.validate().context("Configuration validation failed")?;

    if !quiet {
        print_banner(&config);
    }

    crate::run_server(config).await
}

/// Execute the config command
fn execute_config(cmd: ConfigCommand, config: CalculatorConfig) -> Result<()> {
    match cmd.action {
        ConfigAction::Show { format } => {
            let output = match format.as_str() {
                "toml" => toml::to_string_pretty(&config)?,
                "json" => serde_json::to_string_pretty(&config)?,
                _ => serde_yaml::to_string(&config)?,
            };
            println!("{}", output);
            Ok(())
        }

        ConfigAction::Validate { file } => {
            let config = CalculatorConfig::from_file(&file)?;
            println!("Configuration at {:?} is valid", file);
            println!("  Server:    {}:{}", config.server.host, config.server.port);
            println!("  Timeout:   {:?}", config.server.request_timeout);
            println!("  Output:    {}", config.output.format);
            Ok(())
        }

        ConfigAction::Init { output, force } => {
            if output.exists() && !force {
                bail!("File {:?} already exists. Use --force to overwrite.", output);
            }

            let yaml = serde_yaml::to_string(&CalculatorConfig::default())?;
            std::fs::write(&output, &yaml)
                .with_context(|| format!("Failed to write {:?}", output))?;
            println!("Created configuration file: {:?}", output);
            Ok(())
        }

        ConfigAction::Env => {
            println!("Environment Variable Mappings:");
            println!();
            for (name, description) in ENV_VARS {
                println!("  {:<28} {}", name, description);
            }
            Ok(())
        }
    }
}

const ENV_VARS: [(&str, &str); 8] = [
    ("MMS_QUEUE_CONFIG", "Configuration file path"),
    ("MMS_QUEUE_PORT", "Server port (default: 8080)"),
    ("MMS_QUEUE_HOST", "Server host (default: 0.0.0.0)"),
    ("MMS_QUEUE_TIMEOUT", "Request timeout (seconds)"),
    ("MMS_QUEUE_OUTPUT_FORMAT", "Console report format (text/json)"),
    ("MMS_QUEUE_BANNER", "Print the title banner (true/false)"),
    ("MMS_QUEUE_LOG_LEVEL", "Log level (trace/debug/info/warn/error)"),
    ("MMS_QUEUE_JSON_LOGS", "Enable JSON log format"),
];

fn execute_version() -> Result<()> {
    println!("mms-queue {}", VERSION);
    println!();
    println!("Build Information:");
    println!("  Version:       {}", VERSION);
    println!("  Rust Version:  {}", env!("CARGO_PKG_RUST_VERSION"));
    println!();
    println!("Models:");
    println!("  M/M/1 closed form");
    println!("  M/M/s Erlang-C, any server count");
    Ok(())
}

fn print_banner(config: &CalculatorConfig) {
    println!("{}", TITLE);
    println!("  mms-queue v{}", VERSION);
    println!();
    println!("Configuration:");
    println!("  • Server:    {}:{}", config.server.host, config.server.port);
    println!("  • Timeout:   {:?}", config.server.request_timeout);
    println!("  • CORS:      {}", if config.server.cors_enabled { "enabled" } else { "disabled" });
    println!();
    println!("Endpoints:");
    println!("  • Metrics:   http://{}:{}/v1/queue/metrics", config.server.host, config.server.port);
    println!("  • Rate:      http://{}:{}/v1/queue/rate", config.server.host, config.server.port);
    println!("  • Health:    http://{}:{}/health", config.server.host, config.server.port);
    println!("  • Prometheus: http://{}:{}{}", config.server.host, config.server.port, config.telemetry.metrics_path);
    println!();
}
