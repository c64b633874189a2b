// Inherit lint configuration from lib.rs for consistency
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::items_after_statements,
    clippy::fn_params_excessive_bools,
    clippy::unnecessary_wraps
)]

use std::path::Path;

use clap::Parser;

use doc2txt::cli::commands::{Cli, Command};
use doc2txt::cli::output;
use doc2txt::config::Config;
use doc2txt::converter;
use doc2txt::db::Ledger;
use doc2txt::driver::CancelToken;
use doc2txt::operations;
use doc2txt::report::TracingReporter;

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

/// Log to stderr; stdout carries the JSON results.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::fmt::Display>> {
    let config_file = cli.config.as_deref();
    match cli.command {
        Command::Convert {
            input,
            output,
            ledger,
            threads,
            no_ocr,
            pretty,
        } => {
            let mut config = get_config(config_file)?;
            if let Some(dir) = input {
                config.set_input_dir(dir);
            }
            if let Some(dir) = output {
                config.set_output_dir(dir);
            }
            if let Some(path) = ledger {
                config.set_ledger_path(path);
            }
            if let Some(n) = threads {
                config.settings.workers.threads = n;
            }
            if no_ocr {
                config.settings.ocr.enabled = false;
            }
            cmd_convert(&config, pretty)
        }
        Command::History { path, ledger } => {
            let mut config = get_config(config_file)?;
            if let Some(p) = ledger {
                config.set_ledger_path(p);
            }
            cmd_history(&config, path.as_deref())
        }
        Command::Supported => cmd_supported(),
        Command::Init { force } => cmd_init(config_file, force),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

fn get_config(config_file: Option<&str>) -> Result<Config, Box<dyn std::fmt::Display>> {
    match config_file {
        Some(path) => {
            let cwd = std::env::current_dir().map_err(map_err)?;
            Config::from_file(cwd, Path::new(path)).map_err(map_err)
        }
        None => Config::from_cwd().map_err(map_err),
    }
}

fn cmd_convert(config: &Config, pretty: bool) -> CmdResult {
    let report =
        converter::run_convert(config, &TracingReporter, CancelToken::new()).map_err(map_err)?;
    if pretty {
        println!("{}", output::format_pretty(&report));
    } else {
        println!("{}", output::format_json(&report));
    }
    Ok(())
}

fn cmd_history(config: &Config, path: Option<&str>) -> CmdResult {
    if !config.ledger_path.exists() {
        return Err(map_err(format!(
            "ledger not found: {} (run `doc2txt convert` first)",
            config.ledger_path.display()
        )));
    }
    let ledger = Ledger::open(&config.ledger_path).map_err(map_err)?;
    let result = operations::list_history(&ledger, path).map_err(map_err)?;
    println!("{}", output::format_json(&result));
    Ok(())
}

fn cmd_supported() -> CmdResult {
    let result = operations::list_supported();
    println!("{}", output::format_json(&result));
    Ok(())
}

fn cmd_init(config_file: Option<&str>, force: bool) -> CmdResult {
    let cwd = std::env::current_dir().map_err(map_err)?;
    let mut config = Config::new(&cwd);
    if let Some(path) = config_file {
        config.config_path = cwd.join(path);
    }
    if config.config_path.exists() && !force {
        return Err(map_err(format!(
            "{} already exists (use --force to overwrite)",
            config.config_path.display()
        )));
    }
    config.settings = doc2txt::config::UserSettings::default();
    config.save_settings().map_err(map_err)?;
    println!(
        "{}",
        output::format_json(&serde_json::json!({ "written": config.config_path }))
    );
    Ok(())
}
