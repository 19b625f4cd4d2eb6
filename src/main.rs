use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chronicles::shell::Shell;
use chronicles::{GameConfig, GameContext, GameResult};

/// Quest Chronicles, a text-based RPG
#[derive(Parser, Debug)]
#[command(name = "chronicles")]
#[command(author, version, about = "Quest Chronicles - a text adventure", long_about = None)]
struct Args {
    /// Directory holding character saves
    #[arg(long = "save-dir")]
    save_dir: Option<PathBuf>,

    /// Directory holding quests.txt and items.txt
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "chronicles=debug" } else { "chronicles=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_context(args: &Args) -> GameResult<GameContext> {
    let config = match (&args.save_dir, &args.data_dir) {
        (Some(save_dir), Some(data_dir)) => GameConfig {
            save_dir: save_dir.clone(),
            data_dir: data_dir.clone(),
        },
        _ => GameConfig::new()?.with_overrides(args.save_dir.clone(), args.data_dir.clone()),
    };
    GameContext::load(config)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let context = match load_context(&args) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut shell = Shell::new(context, stdin.lock(), io::stdout(), rand::thread_rng());
    if let Err(e) = shell.run() {
        tracing::error!(error = %e, "terminal I/O failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
