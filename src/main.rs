//! `lightbox-replay` - replay a gesture script and print what the viewer draws.
//!
//! Usage: `lightbox-replay <script.json> [--config <path>] [--log-level <level>]`
//!        `lightbox-replay --print-config [--config <path>]`
//!
//! Each frame and notification is written to stdout as one JSON line.
//! `--print-config` writes the effective configuration instead, which is a
//! convenient starting point for a config file.

use lightbox::{GestureScript, LogLevel, ViewerConfig, replay};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "Usage: lightbox-replay <script.json> [--config <path>] [--log-level <level>]
       lightbox-replay --print-config [--config <path>]";

enum Command {
    Replay(PathBuf),
    PrintConfig,
}

struct Args {
    command: Command,
    config: Option<PathBuf>,
    log_level: Option<LogLevel>,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let print_config = args.contains("--print-config");
    let config = args.opt_value_from_str("--config")?;
    let log_level = args.opt_value_from_str("--log-level")?;
    let command = if print_config {
        Command::PrintConfig
    } else {
        Command::Replay(args.free_from_str()?)
    };

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unexpected arguments: {:?}", rest),
        });
    }

    Ok(Some(Args {
        command,
        config,
        log_level,
    }))
}

fn load_config(path: Option<&Path>) -> lightbox::Result<ViewerConfig> {
    match path {
        Some(path) => Ok(ViewerConfig::load(path)?),
        None => Ok(ViewerConfig::load_from_default_path()?.unwrap_or_default()),
    }
}

fn run(args: &Args, config: &ViewerConfig) -> lightbox::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let script_path = match &args.command {
        Command::Replay(path) => path,
        Command::PrintConfig => {
            writeln!(out, "{}", config.to_json()?)?;
            return Ok(());
        }
    };

    let script = GestureScript::load(script_path)?;
    let base_dir = script_path.parent().unwrap_or_else(|| Path::new("."));
    let records = replay(&script, config, base_dir)?;
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    // The config decides the log level unless overridden, so it is loaded before
    // the logger exists; failures are reported once logging is up.
    let config = load_config(args.config.as_deref());
    let level = args
        .log_level
        .or_else(|| config.as_ref().ok().map(|config| config.log_level))
        .unwrap_or_default();
    env_logger::Builder::new()
        .filter_level(level.into())
        .parse_default_env()
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(&args, &config) {
        log::error!("Replay failed: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
