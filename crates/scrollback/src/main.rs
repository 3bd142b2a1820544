//! Feed chat messages into a persisted scrollback window and inspect it.
//!
//! Every command prints a JSON envelope on stdout; logs go to stderr.
//!
//! # Examples
//!
//! ```sh
//! # Add a message
//! scrollback add --author ana --content "Can you make a picture of a fox?"
//!
//! # Show the current window and the newest summaries
//! scrollback context
//!
//! # Export / import the context view
//! scrollback export --path ctx.json
//! scrollback import ctx.json
//!
//! # Raw action requests, from an argument or stdin
//! scrollback run '{"action": "get_context"}'
//! echo '{"action": "add_message", "message": {"content": "hi"}}' | scrollback run
//! ```

use clap::{Parser, Subcommand};
use scrollback::action::{ActionResponse, run_action, run_action_value};
use scrollback::config::{CompressorConfig, DEFAULT_SUMMARY_THRESHOLD, DEFAULT_WINDOW_SIZE};
use scrollback::state::{
    CompressorService, DEFAULT_EXPORT_DIR, DEFAULT_STATE_PATH, FileStateStore,
};
use serde_json::json;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Bounded chat history with rule-based summary archiving.
#[derive(Parser)]
#[command(name = "scrollback")]
struct Cli {
    /// Persisted state file
    #[arg(long, env = "SCROLLBACK_STATE", default_value = DEFAULT_STATE_PATH)]
    state_file: PathBuf,

    /// Messages kept in the live window (fresh state only)
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window_size: usize,

    /// Window length that triggers a summary (fresh state only)
    #[arg(long, default_value_t = DEFAULT_SUMMARY_THRESHOLD)]
    summary_threshold: usize,

    /// Directory for auto-named exports
    #[arg(long, env = "SCROLLBACK_EXPORT_DIR", default_value = DEFAULT_EXPORT_DIR)]
    export_dir: PathBuf,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add one message to the window
    Add {
        /// Message text
        #[arg(long)]
        content: String,

        /// Message author
        #[arg(long)]
        author: Option<String>,

        /// Caller-supplied message id
        #[arg(long)]
        id: Option<String>,

        /// ISO-8601 timestamp (defaults to now)
        #[arg(long)]
        timestamp: Option<String>,
    },

    /// Print the current context view
    Context,

    /// Write the context view to a file
    Export {
        /// Output file (auto-named in --export-dir when omitted)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Replace the window and archive from an exported context file
    Import {
        /// Exported context file
        path: PathBuf,
    },

    /// Run a raw JSON action request
    Run {
        /// Request JSON; read from stdin when omitted
        request: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CompressorConfig::new(cli.window_size, cli.summary_threshold);
    let service = CompressorService::new(FileStateStore::new(&cli.state_file), config)
        .with_export_dir(&cli.export_dir);

    let response: ActionResponse = match cli.command {
        Command::Add {
            content,
            author,
            id,
            timestamp,
        } => {
            let mut message = json!({ "content": content });
            if let Some(author) = author {
                message["author"] = json!(author);
            }
            if let Some(id) = id {
                message["id"] = json!(id);
            }
            if let Some(timestamp) = timestamp {
                message["timestamp"] = json!(timestamp);
            }
            run_action_value(&service, &json!({ "action": "add_message", "message": message }))
        }
        Command::Context => run_action_value(&service, &json!({ "action": "get_context" })),
        Command::Export { path } => {
            run_action_value(&service, &json!({ "action": "export", "filepath": path }))
        }
        Command::Import { path } => {
            run_action_value(&service, &json!({ "action": "import", "filepath": path }))
        }
        Command::Run { request } => {
            let request = match request {
                Some(r) => r,
                None => {
                    let mut buf = String::new();
                    if let Err(e) = io::stdin().read_to_string(&mut buf) {
                        eprintln!("Error: failed to read stdin: {e}");
                        process::exit(1);
                    }
                    buf
                }
            };
            run_action(&service, &request)
        }
    };

    match serde_json::to_string_pretty(&response.to_json()) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("Error: failed to encode response: {e}");
            process::exit(1);
        }
    }

    if !response.success {
        process::exit(1);
    }
}
