//! Goji game server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin goji-server
//! cargo run --bin goji-server -- --host 0.0.0.0 --port 3000 --records-path games.jsonl
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use goji_server::{
    domain::GameRecordSink,
    infrastructure::{
        game_record::{InMemoryGameRecordSink, JsonLinesGameRecordSink},
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
        user_directory::InMemoryUserDirectory,
        word_supplier::BuiltinWordSupplier,
    },
    ui::Server,
    usecase::{Collaborators, GameSettings},
};
use goji_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "goji-server")]
#[command(about = "Real-time multi-player five-letter word race server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "GOJI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "GOJI_PORT", default_value = "8080")]
    port: u16,

    /// Round time limit in seconds
    #[arg(long, env = "GOJI_ROUND_SECONDS", default_value = "300")]
    round_seconds: u64,

    /// Interval between remaining-time notifications in milliseconds
    #[arg(long, env = "GOJI_TICK_MILLIS", default_value = "1000")]
    tick_millis: u64,

    /// How long a finished round stays visible before it is discarded, in seconds
    #[arg(long, env = "GOJI_GRACE_SECONDS", default_value = "300")]
    grace_seconds: u64,

    /// Reject guesses that are not in the round's category word list
    #[arg(long, env = "GOJI_STRICT_WORDS", default_value_t = false)]
    strict_words: bool,

    /// Append completed games as JSON lines to this file (kept in memory otherwise)
    #[arg(long, env = "GOJI_RECORDS_PATH")]
    records_path: Option<PathBuf>,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl Args {
    fn settings(&self) -> GameSettings {
        GameSettings {
            round_time: Duration::from_secs(self.round_seconds),
            tick_interval: Duration::from_millis(self.tick_millis.max(1)),
            grace_period: Duration::from_secs(self.grace_seconds),
            strict_words: self.strict_words,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_BIN_NAME"),
        &args.log_level,
    );

    // Initialize dependencies in order:
    // 1. Collaborators (membership store, word supplier, record sink, user directory, pusher)
    // 2. Coordinator and UseCases
    // 3. Server
    let record_sink: Arc<dyn GameRecordSink> = match &args.records_path {
        Some(path) => {
            tracing::info!("Completed games are appended to {}", path.display());
            Arc::new(JsonLinesGameRecordSink::new(path.clone()))
        }
        None => Arc::new(InMemoryGameRecordSink::new()),
    };
    let collaborators = Collaborators {
        repository: Arc::new(InMemoryRoomRepository::new()),
        word_supplier: Arc::new(BuiltinWordSupplier::new(None)),
        record_sink,
        user_directory: Arc::new(InMemoryUserDirectory::new()),
        message_pusher: Arc::new(WebSocketMessagePusher::default()),
    };

    let settings = args.settings();
    tracing::info!(
        "Rounds last {:?} (tick {:?}, grace {:?}, strict words: {})",
        settings.round_time,
        settings.tick_interval,
        settings.grace_period,
        settings.strict_words
    );

    let server = Server::with_collaborators(collaborators, settings);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
