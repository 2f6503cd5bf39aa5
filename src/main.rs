use async_modal::{
    app::headless::{run_headless, ScriptedAnswers},
    config::Config,
    error::{AppError, AppResult},
    initialize_logging,
    ui::ModalHandles,
    App,
};
use std::{
    env,
    path::PathBuf,
    process,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> AppResult<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        process::exit(0);
    }

    let config = match config_path(&args)? {
        Some(path) => Config::load_from_file(&path).await?,
        None => Config::load().await?,
    };

    let demo_mode = args.iter().any(|arg| arg == "--demo")
        || env::var("ASYNC_MODAL_DEMO").is_ok()
        || env::var("TERM").unwrap_or_default().is_empty();

    if demo_mode {
        initialize_logging(config.app.log_file.as_deref())
            .map_err(|e| AppError::application(e.to_string()))?;
        run_demo_mode(config).await
    } else {
        let log_file = config
            .app
            .log_file
            .clone()
            .unwrap_or_else(|| env::temp_dir().join("async-modal.log"));
        initialize_logging(Some(log_file.as_path()))
            .map_err(|e| AppError::application(e.to_string()))?;
        run_tui_mode(config).await
    }
}

/// Value following `--config`, if present
fn config_path(args: &[String]) -> AppResult<Option<PathBuf>> {
    match args.iter().position(|arg| arg == "--config") {
        Some(index) => args
            .get(index + 1)
            .map(|path| Some(PathBuf::from(path)))
            .ok_or_else(|| AppError::config("--config requires a path")),
        None => Ok(None),
    }
}

async fn run_demo_mode(config: Config) -> AppResult<()> {
    let start_time = Instant::now();
    info!("{} demo mode starting", config.app.name);

    let modals = ModalHandles::new(config.modal.overlap_policy);
    let summary = run_headless(modals, ScriptedAnswers::default(), Duration::from_millis(25)).await?;

    info!("Workflow result: {}", summary);
    info!("Demo finished in {:?}", start_time.elapsed());
    Ok(())
}

async fn run_tui_mode(config: Config) -> AppResult<()> {
    let fallback = config.clone();
    let app = App::new(config)?;
    debug!("Application startup time: {:?}", app.startup_time());

    match app.run().await {
        Ok(()) => {
            info!("Application terminated gracefully");
            Ok(())
        }
        Err(e) if !e.is_recoverable() => {
            warn!("TUI mode failed: {}. Falling back to demo mode.", e);
            run_demo_mode(fallback).await
        }
        Err(e) => Err(e),
    }
}

fn print_help() {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS]", env!("CARGO_PKG_NAME"));
    println!();
    println!("OPTIONS:");
    println!("    -h, --help           Print this help message and exit");
    println!("    -V, --version        Print version information and exit");
    println!("        --demo           Answer modals automatically (non-interactive)");
    println!("        --config <PATH>  Load configuration from PATH");
    println!();
    println!("ENVIRONMENT:");
    println!("    ASYNC_MODAL_DEMO     Set to run in demo mode");
    println!("    RUST_LOG             Set logging level (debug, info, warn, error)");
}
