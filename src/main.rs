//! Entry point for **river-init**.
//!
//! Loads the configuration, plans the bootstrap sequence and runs it
//! against real processes (or prints it with `--dry-run`).  Exits non-zero
//! on the first failure; whatever ran before it stays applied.

use log::{error, info};
use river_init::bootstrap::{plan, Session, Step};
use river_init::config::{Config, ConfigError, ConfigSource};
use river_init::process::dry_run::DryRunDispatcher;
use river_init::process::spawner::ProcessDispatcher;
use river_init::traits::Dispatcher;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "\
usage: river-init [--dry-run] [--config <path>]

  --dry-run        print the commands instead of running them
  --config <path>  read this JSON file instead of
                   $XDG_CONFIG_HOME/river-init/config.json
  -h, --help       show this message";

/// Resolve the config directory (`$XDG_CONFIG_HOME/river-init`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("river-init")
}

/// Resolve the configuration and log where it came from.
fn load_config(explicit: Option<PathBuf>) -> Result<Config, ConfigError> {
    let default_path = config_dir().join("config.json");
    let (cfg, source) = Config::resolve(explicit.as_deref(), &default_path)?;
    match source {
        ConfigSource::Explicit(path) | ConfigSource::File(path) => {
            info!("loaded config from {}", path.display())
        }
        ConfigSource::Defaults(path) => {
            info!("no config file at {}, using defaults", path.display())
        }
    }
    Ok(cfg)
}

struct Args {
    dry_run: bool,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Option<Args>, String> {
    let mut args = Args {
        dry_run: false,
        config: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--dry-run" => args.dry_run = true,
            "--config" => {
                let path = it.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Ok(None),
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(Some(args))
}

fn execute<D: Dispatcher>(dispatcher: D, steps: &[Step]) -> ExitCode {
    match Session::new(dispatcher).run(steps) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("bootstrap aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let config = match load_config(args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let steps = match config
        .tag_table()
        .map_err(|e| e.to_string())
        .and_then(|tags| plan(&config, &tags).map_err(|e| e.to_string()))
    {
        Ok(steps) => steps,
        Err(e) => {
            error!("invalid session: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("{} steps planned", steps.len());

    if args.dry_run {
        execute(DryRunDispatcher::new(std::io::stdout().lock()), &steps)
    } else {
        execute(ProcessDispatcher::new(), &steps)
    }
}
