use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use myazo::app::{self, App, AppError};
use myazo::config::{self, Settings};

#[derive(Parser, Debug)]
#[command(name = "myazo")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("MYAZO_GIT_HASH"), ")"),
    about = "Capture a screen region, upload it, and share the link"
)]
struct Cli {
    /// Read settings from this file instead of ~/.config/myazo/config.toml
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a documented default config file and exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "print_config")]
    init_config: bool,

    /// Print the effective settings and exit
    #[arg(long, action = ArgAction::SetTrue)]
    print_config: bool,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.init_config || cli.print_config {
        return match run_config_command(&cli) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {err:#}");
                ExitCode::from(app::EXIT_CONFIG)
            }
        };
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("Run failed: {:?}", err);
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn config_path(cli: &Cli) -> Result<PathBuf, config::ConfigError> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => Settings::config_path(),
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, config::ConfigError> {
    match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let settings = load_settings(cli)?;
    let app = App::new(&settings)?;
    app.run(&mut io::stdout().lock())?;
    Ok(())
}

fn run_config_command(cli: &Cli) -> anyhow::Result<()> {
    let path = config_path(cli).context("Could not determine config path")?;

    if cli.init_config {
        Settings::create_default_file(&path)
            .with_context(|| format!("Failed to create default config at {}", path.display()))?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let settings = Settings::load_from(&path)?;
    let rendered = settings.to_display_toml()?;
    println!("# {}", path.display());
    print!("{rendered}");
    Ok(())
}
