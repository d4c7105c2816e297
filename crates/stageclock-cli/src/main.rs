use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod audio;
mod commands;
mod host;

#[derive(Parser)]
#[command(name = "stageclock", version, about = "Presentation countdown clock")]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Countdown control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Persisted repeat mode
    Repeat {
        #[command(subcommand)]
        action: commands::repeat::RepeatAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Custom sounds
    Sound {
        #[command(subcommand)]
        action: commands::sound::SoundAction,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action).await,
        Commands::Repeat { action } => commands::repeat::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Sound { action } => commands::sound::run(action).await,
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
