//! chatshelf CLI - chat with saved conversations from the terminal.

use chatshelf::cli;
use chatshelf::config::load_config;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Get the version string.
///
/// - Release builds (on a git tag): "0.1.0"
/// - Development builds: "0.1.0-dev (abc1234)"
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("CHATSHELF_GIT_HASH");
    const IS_RELEASE: &str = env!("CHATSHELF_IS_RELEASE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            VERSION.to_string()
        } else {
            format!("{VERSION}-dev ({GIT_HASH})")
        }
    })
}

#[derive(Parser)]
#[command(name = "chatshelf")]
#[command(author, version = version(), about = "Chat with saved conversations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat.
    Chat {
        /// Continue a saved conversation instead of starting a new one.
        #[arg(short, long)]
        resume: Option<String>,
    },

    /// Send a single message and print the answer.
    Ask {
        /// Message text.
        message: String,

        /// Append to this saved conversation.
        #[arg(short, long)]
        chat: Option<String>,
    },

    /// List saved conversations, most recent first.
    List {
        /// Maximum number of conversations to show. Defaults to 20.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print a saved conversation.
    Show {
        /// Conversation ID.
        id: String,

        /// Print the stored JSON record.
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved conversation.
    Delete {
        /// Conversation ID.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Export a conversation as a standalone HTML page.
    Export {
        /// Conversation ID.
        id: String,

        /// Output file. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("chatshelf: error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging.filter);

    let result = match cli.command {
        Commands::Chat { resume } => cli::chat::run(&config, resume.as_deref()),
        Commands::Ask { message, chat } => cli::ask::run(&config, &message, chat.as_deref()),
        Commands::List { limit } => {
            cli::list::run(&config, limit);
            Ok(())
        }
        Commands::Show { id, json } => cli::show::run(&config, &id, json),
        Commands::Delete { id, yes } => cli::delete::run(&config, &id, yes),
        Commands::Export { id, output } => cli::export::run(&config, &id, output.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("chatshelf: error: {e}");
            ExitCode::FAILURE
        }
    }
}
