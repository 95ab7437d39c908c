mod client;
mod commands;
mod output;

use clap::{Parser, Subcommand};
use client::FlashdeckClient;
use flashdeck::config;
use output::{OutputConfig, OutputFormat};
use std::process;

/// CLI for the Flashdeck flashcard server
#[derive(Parser, Debug)]
#[clap(name = "flashdeck-cli", about = "CLI for Flashdeck flashcard collections")]
struct Cli {
    /// Server URL to connect to
    #[clap(
        long,
        env = "FLASHDECK_URL",
        global = true
    )]
    server_url: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register, log in and out
    #[command(subcommand)]
    Auth(commands::auth::AuthCommands),
    /// Manage collections
    #[command(subcommand)]
    Collection(commands::collection::CollectionCommands),
    /// Manage cards
    #[command(subcommand)]
    Card(commands::card::CardCommands),
    /// Review a collection interactively
    Study {
        /// The collection ID
        collection_id: String,
    },
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    if let Some(dir) = config::get_config_dir_path() {
        if let Ok(update) = config::config_from_file(Some(dir.join("config.toml"))) {
            if let Some(url) = update.server_url {
                return url;
            }
        }
    }

    "http://127.0.0.1:8080".to_string()
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    if err_string.contains("error sending request")
        || err_string.contains("connection refused")
        || err_string.contains("Connection refused")
        || err_string.contains("tcp connect error")
    {
        return format!(
            "Could not connect to server. Is flashdeck running?\n  {}",
            err_string
        );
    }

    if err_string.contains("(401)") {
        return format!("{}\n  Log in first with `flashdeck-cli auth login`", err_string);
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server_url = resolve_server_url(cli.server_url);
    let token_path = config::get_config_dir_path().map(|dir| dir.join("session_token"));
    let client = FlashdeckClient::new(server_url, token_path);
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Auth(cmd) => commands::auth::execute(&client, cmd, &output_config).await,
        Commands::Collection(cmd) => commands::collection::execute(&client, cmd, &output_config).await,
        Commands::Card(cmd) => commands::card::execute(&client, cmd, &output_config).await,
        Commands::Study { collection_id } => {
            commands::study::execute(&client, collection_id, &output_config).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
