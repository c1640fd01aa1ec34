use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use listenkit::cli::{Cli, Commands, ConfigAction};
use listenkit::config::Config;
use listenkit::engine::SimulatedEngine;
use listenkit::notify::LogReporter;
use listenkit::permission::{Capability, FakePermissionApi, PermissionStatus};
use listenkit::terminal::{Input, StderrAlertSink, parse_input, render_view};
use listenkit::{SessionController, SessionParts, SessionView};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    match cli.command {
        None => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(locale) = cli.locale {
                config.session.locale = locale;
            }
            if cli.no_color || !std::io::stdout().is_terminal() {
                config.ui.color = false;
            }
            config.validate()?;
            run_session(config, cli.deny_microphone, cli.quiet).await?;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "listenkit", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Info,
        (false, 2) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn config_path(custom: Option<&Path>) -> std::path::PathBuf {
    custom
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path)
}

fn load_config(custom: Option<&Path>) -> Result<Config> {
    let path = config_path(custom);
    let config = Config::load_or_default(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    Ok(config.with_env_overrides())
}

fn handle_config_command(action: ConfigAction, custom: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(custom)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", config_path(custom).display());
        }
    }
    Ok(())
}

async fn run_session(config: Config, deny_microphone: bool, quiet: bool) -> Result<()> {
    let color = config.ui.color;
    let permissions = if deny_microphone {
        FakePermissionApi::undetermined(PermissionStatus::Denied).with_permanent_denial()
    } else {
        FakePermissionApi::undetermined(PermissionStatus::Granted)
    };
    let engine = SimulatedEngine::new().announcing_start();

    let controller = SessionController::mount(
        SessionParts {
            engine: Arc::new(engine.clone()),
            permissions: Arc::new(permissions),
            alerts: Arc::new(StderrAlertSink::new(color)),
            diagnostics: Arc::new(LogReporter),
        },
        config.session.locale.clone(),
    );

    if !quiet {
        eprintln!(
            "listenkit {} ({}, {})",
            listenkit::version_string(),
            controller.locale(),
            Capability::Microphone.platform_name(config.session.platform)
        );
        eprintln!("Enter: toggle | JSON line: inject event | quit: exit\n");
        println!("{}\n", render_view(&SessionView::from_state(&controller.state()), color));
    }

    let mut states = controller.watch();
    let renderer = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            if !quiet {
                let view = SessionView::from_state(&states.borrow_and_update());
                println!("{}\n", render_view(&view, color));
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Toggle => {
                let outcome = controller.toggle().await;
                log::debug!("toggle -> {outcome:?}");
            }
            Input::Quit => break,
            Input::Event(event) => {
                engine.emit(event);
            }
            Input::Invalid(message) => eprintln!("{message}"),
        }
    }

    controller.dispose().await;
    if let Err(e) = renderer.await {
        log::warn!("Renderer ended abnormally: {e}");
    }
    Ok(())
}
